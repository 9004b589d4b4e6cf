use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{HttpMethod, ProjectId};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RouteId(i64);

impl RouteId {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub id: RouteId,
    pub project_id: ProjectId,
    pub name: String,
    pub method: HttpMethod,
    pub path: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoute {
    pub project_id: ProjectId,
    pub method: HttpMethod,
    pub path: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl NewRoute {
    #[must_use]
    pub fn new(project_id: ProjectId, method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            project_id,
            method,
            path: path.into(),
            name: None,
            description: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The explicit name, or `"<METHOD> <path>"` when none was given.
    #[must_use]
    pub fn resolved_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| default_route_name(self.method, &self.path))
    }

    /// Validates the path and the resolved name.
    ///
    /// # Errors
    ///
    /// Returns an error when the path lacks a leading slash or the resolved
    /// name is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_path(&self.path)?;
        validate_route_name(&self.resolved_name())
    }
}

/// Sparse update for a stored route.
///
/// `None` leaves a field untouched. For `description`, `Some(None)` clears
/// the stored text and `Some(Some(..))` replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteUpdate {
    pub method: Option<HttpMethod>,
    pub path: Option<String>,
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

impl RouteUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.method.is_none()
            && self.path.is_none()
            && self.name.is_none()
            && self.description.is_none()
    }

    /// Produces the route that results from applying this update.
    ///
    /// # Errors
    ///
    /// Returns an error when a supplied path or name is invalid.
    pub fn apply_to(&self, route: &Route) -> Result<Route, ValidationError> {
        let mut updated = route.clone();
        if let Some(method) = self.method {
            updated.method = method;
        }
        if let Some(path) = self.path.as_ref() {
            validate_path(path)?;
            updated.path.clone_from(path);
        }
        if let Some(name) = self.name.as_ref() {
            validate_route_name(name)?;
            updated.name.clone_from(name);
        }
        if let Some(description) = self.description.as_ref() {
            updated.description.clone_from(description);
        }
        Ok(updated)
    }
}

#[must_use]
pub fn default_route_name(method: HttpMethod, path: &str) -> String {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    format!("{} {}", method, trimmed).trim_end().to_owned()
}

/// Checks that a route path starts with `/`.
///
/// # Errors
///
/// Returns an error for an empty path or one without a leading slash.
pub fn validate_path(path: &str) -> Result<(), ValidationError> {
    if path.is_empty() {
        return Err(ValidationError::EmptyField { field: "Route path" });
    }
    if !path.starts_with('/') {
        return Err(ValidationError::PathMissingLeadingSlash {
            path: path.to_owned(),
        });
    }
    Ok(())
}

fn validate_route_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: "Route name" });
    }
    Ok(())
}
