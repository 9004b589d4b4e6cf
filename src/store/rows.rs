use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Row, ffi};

use crate::domain::{HttpMethod, Project, ProjectId, Route, RouteId};
use crate::error::{Entity, StoreError, StoreResult};

pub(super) const PROJECT_COLUMNS: &str = "id, name, base_url, description, created_at";
pub(super) const ROUTE_COLUMNS: &str =
    "id, project_id, name, method, path, description, created_at";

/// Raw `projects` row, converted to a [`Project`] off the database thread.
#[derive(Debug)]
pub(super) struct ProjectRow {
    id: i64,
    name: String,
    base_url: String,
    description: Option<String>,
    created_at: String,
}

impl ProjectRow {
    pub(super) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            base_url: row.get(2)?,
            description: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    pub(super) fn into_project(self) -> StoreResult<Project> {
        Ok(Project {
            id: ProjectId::new(self.id),
            created_at: parse_timestamp(Entity::Project, &self.created_at)?,
            name: self.name,
            base_url: self.base_url,
            description: self.description,
        })
    }
}

#[derive(Debug)]
pub(super) struct RouteRow {
    id: i64,
    project_id: i64,
    name: String,
    method: String,
    path: String,
    description: Option<String>,
    created_at: String,
}

impl RouteRow {
    pub(super) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            project_id: row.get(1)?,
            name: row.get(2)?,
            method: row.get(3)?,
            path: row.get(4)?,
            description: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    pub(super) fn into_route(self) -> StoreResult<Route> {
        let method = self
            .method
            .parse::<HttpMethod>()
            .map_err(|err| StoreError::CorruptRow {
                entity: Entity::Route,
                detail: err.to_string(),
            })?;
        Ok(Route {
            id: RouteId::new(self.id),
            project_id: ProjectId::new(self.project_id),
            created_at: parse_timestamp(Entity::Route, &self.created_at)?,
            name: self.name,
            method,
            path: self.path,
            description: self.description,
        })
    }
}

pub(super) fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(entity: Entity, value: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| StoreError::CorruptRow {
            entity,
            detail: format!("created_at '{}': {}", value, err),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ConstraintKind {
    Unique,
    ForeignKey,
}

pub(super) fn constraint_kind(err: &rusqlite::Error) -> Option<ConstraintKind> {
    let rusqlite::Error::SqliteFailure(failure, _) = err else {
        return None;
    };
    if failure.code != rusqlite::ErrorCode::ConstraintViolation {
        return None;
    }
    match failure.extended_code {
        ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
            Some(ConstraintKind::Unique)
        }
        ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(ConstraintKind::ForeignKey),
        _ => None,
    }
}
