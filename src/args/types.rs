use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::RouteId;

#[derive(Debug, Clone, Copy, Default, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// How a command addresses an existing route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    Id(RouteId),
    Name(String),
}

impl std::fmt::Display for RouteTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteTarget::Id(id) => write!(f, "#{}", id),
            RouteTarget::Name(name) => write!(f, "'{}'", name),
        }
    }
}
