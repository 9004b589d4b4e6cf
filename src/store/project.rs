use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use rusqlite::{OptionalExtension, params};
use tokio_rusqlite::Connection;
use tracing::debug;

use super::ProjectStore;
use super::rows::{
    ConstraintKind, PROJECT_COLUMNS, ProjectRow, constraint_kind, format_timestamp,
};
use crate::domain::{NewProject, Project, ProjectId};
use crate::error::{Entity, StoreError, StoreResult};

/// SQLite-backed [`ProjectStore`].
#[derive(Clone)]
pub struct SqliteProjectStore {
    conn: Connection,
}

impl SqliteProjectStore {
    pub(super) const fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl ProjectStore for SqliteProjectStore {
    async fn create(&self, project: NewProject) -> StoreResult<Project> {
        project.validate()?;
        let created_at = Utc::now().trunc_subsecs(3);
        let stamp = format_timestamp(created_at);
        let NewProject {
            name,
            base_url,
            description,
        } = project;

        let insert_name = name.clone();
        let insert_url = base_url.clone();
        let insert_description = description.clone();
        let inserted = self
            .conn
            .call(move |conn| {
                let result = conn.execute(
                    "INSERT INTO projects (name, base_url, description, created_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![insert_name, insert_url, insert_description, stamp],
                );
                match result {
                    Ok(_) => Ok(Some(conn.last_insert_rowid())),
                    Err(err) if constraint_kind(&err) == Some(ConstraintKind::Unique) => Ok(None),
                    Err(err) => Err(err.into()),
                }
            })
            .await
            .map_err(|err| StoreError::storage("insert project", err))?;

        let Some(id) = inserted else {
            return Err(StoreError::duplicate(Entity::Project, name));
        };
        debug!("Created project '{}' with id {}", name, id);
        Ok(Project {
            id: ProjectId::new(id),
            name,
            base_url,
            description,
            created_at,
        })
    }

    async fn get_by_name(&self, name: &str) -> StoreResult<Project> {
        let lookup = name.to_owned();
        let row = self
            .conn
            .call(move |conn| {
                let sql = format!("SELECT {} FROM projects WHERE name = ?1", PROJECT_COLUMNS);
                Ok(conn
                    .query_row(&sql, [lookup], ProjectRow::from_row)
                    .optional()?)
            })
            .await
            .map_err(|err| StoreError::storage("query project", err))?;

        row.map_or_else(
            || Err(StoreError::not_found(Entity::Project, format!("'{}'", name))),
            ProjectRow::into_project,
        )
    }

    async fn list(&self) -> StoreResult<Vec<Project>> {
        let rows = self
            .conn
            .call(|conn| {
                let sql = format!("SELECT {} FROM projects ORDER BY id", PROJECT_COLUMNS);
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map([], ProjectRow::from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await
            .map_err(|err| StoreError::storage("list projects", err))?;

        rows.into_iter().map(ProjectRow::into_project).collect()
    }

    async fn delete_by_name(&self, name: &str) -> StoreResult<()> {
        let lookup = name.to_owned();
        let removed = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                let id: Option<i64> = tx
                    .query_row("SELECT id FROM projects WHERE name = ?1", [lookup], |row| {
                        row.get(0)
                    })
                    .optional()?;
                let Some(id) = id else {
                    return Ok(None);
                };
                let routes = tx.execute("DELETE FROM routes WHERE project_id = ?1", [id])?;
                tx.execute("DELETE FROM projects WHERE id = ?1", [id])?;
                tx.commit()?;
                Ok(Some(routes))
            })
            .await
            .map_err(|err| StoreError::storage("delete project", err))?;

        let Some(routes) = removed else {
            return Err(StoreError::not_found(Entity::Project, format!("'{}'", name)));
        };
        debug!("Deleted project '{}' and {} route(s)", name, routes);
        Ok(())
    }
}
