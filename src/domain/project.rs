use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ProjectId(i64);

impl ProjectId {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub base_url: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Target URL for a route path under this project.
    ///
    /// A single trailing slash on the base URL is dropped so `/users` never
    /// turns into `//users`.
    #[must_use]
    pub fn route_url(&self, path: &str) -> String {
        let base = self.base_url.strip_suffix('/').unwrap_or(&self.base_url);
        format!("{}{}", base, path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub base_url: String,
    pub description: Option<String>,
}

impl NewProject {
    #[must_use]
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Checks the name and base URL before the project reaches storage.
    ///
    /// # Errors
    ///
    /// Returns an error when the name is blank or the base URL is not an
    /// absolute http(s) URL.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                field: "Project name",
            });
        }
        validate_base_url(&self.base_url)?;
        Ok(())
    }
}

/// Parses a project base URL.
///
/// # Errors
///
/// Returns an error when the URL does not parse, lacks a host, or uses a
/// scheme other than http/https.
pub fn validate_base_url(value: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(value).map_err(|err| ValidationError::InvalidUrl {
        url: value.to_owned(),
        source: err,
    })?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ValidationError::UnsupportedScheme {
                scheme: other.to_owned(),
            });
        }
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ValidationError::UrlMissingHost {
            url: value.to_owned(),
        });
    }
    Ok(url)
}
