use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use super::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Project,
    Route,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Project => f.write_str("Project"),
            Entity::Route => f.write_str("Route"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} {key} not found.")]
    NotFound { entity: Entity, key: String },
    #[error("{entity} named '{name}' already exists.")]
    DuplicateName { entity: Entity, name: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Failed to {context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: tokio_rusqlite::Error,
    },
    #[error("Failed to create database directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Stored {entity} row is invalid: {detail}")]
    CorruptRow { entity: Entity, detail: String },
    #[error("Database schema version {found} is newer than supported version {supported}.")]
    UnsupportedSchema { found: i64, supported: i64 },
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub(crate) fn not_found(entity: Entity, key: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub(crate) fn duplicate(entity: Entity, name: impl Into<String>) -> Self {
        StoreError::DuplicateName {
            entity,
            name: name.into(),
        }
    }

    pub(crate) const fn storage(context: &'static str, source: tokio_rusqlite::Error) -> Self {
        StoreError::Storage { context, source }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
