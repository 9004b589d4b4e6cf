use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use rusqlite::{OptionalExtension, params};
use tokio_rusqlite::Connection;
use tracing::debug;

use super::RouteStore;
use super::rows::{ConstraintKind, ROUTE_COLUMNS, RouteRow, constraint_kind, format_timestamp};
use crate::domain::{NewRoute, ProjectId, Route, RouteId, RouteUpdate};
use crate::error::{Entity, StoreError, StoreResult};

/// SQLite-backed [`RouteStore`].
#[derive(Clone)]
pub struct SqliteRouteStore {
    conn: Connection,
}

impl SqliteRouteStore {
    pub(super) const fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

enum Insert {
    Inserted(i64),
    Duplicate,
    MissingProject,
}

fn route_key(id: RouteId) -> String {
    format!("#{}", id)
}

#[async_trait]
impl RouteStore for SqliteRouteStore {
    async fn create(&self, route: NewRoute) -> StoreResult<Route> {
        route.validate()?;
        let name = route.resolved_name();
        let created_at = Utc::now().trunc_subsecs(3);
        let stamp = format_timestamp(created_at);
        let NewRoute {
            project_id,
            method,
            path,
            description,
            ..
        } = route;

        let insert_name = name.clone();
        let insert_path = path.clone();
        let insert_description = description.clone();
        let outcome = self
            .conn
            .call(move |conn| {
                let result = conn.execute(
                    "INSERT INTO routes (project_id, name, method, path, description, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        project_id.get(),
                        insert_name,
                        method.as_str(),
                        insert_path,
                        insert_description,
                        stamp
                    ],
                );
                match result {
                    Ok(_) => Ok(Insert::Inserted(conn.last_insert_rowid())),
                    Err(err) => match constraint_kind(&err) {
                        Some(ConstraintKind::Unique) => Ok(Insert::Duplicate),
                        Some(ConstraintKind::ForeignKey) => Ok(Insert::MissingProject),
                        None => Err(err.into()),
                    },
                }
            })
            .await
            .map_err(|err| StoreError::storage("insert route", err))?;

        match outcome {
            Insert::Inserted(id) => {
                debug!(
                    "Created route '{}' ({} {}) in project {}",
                    name, method, path, project_id
                );
                Ok(Route {
                    id: RouteId::new(id),
                    project_id,
                    name,
                    method,
                    path,
                    description,
                    created_at,
                })
            }
            Insert::Duplicate => Err(StoreError::duplicate(Entity::Route, name)),
            Insert::MissingProject => Err(StoreError::not_found(
                Entity::Project,
                format!("#{}", project_id),
            )),
        }
    }

    async fn list_by_project(&self, project_id: ProjectId) -> StoreResult<Vec<Route>> {
        let rows = self
            .conn
            .call(move |conn| {
                let sql = format!(
                    "SELECT {} FROM routes WHERE project_id = ?1 ORDER BY id",
                    ROUTE_COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map([project_id.get()], RouteRow::from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await
            .map_err(|err| StoreError::storage("list routes", err))?;

        rows.into_iter().map(RouteRow::into_route).collect()
    }

    async fn get_by_id(&self, id: RouteId) -> StoreResult<Route> {
        let row = self
            .conn
            .call(move |conn| {
                let sql = format!("SELECT {} FROM routes WHERE id = ?1", ROUTE_COLUMNS);
                Ok(conn
                    .query_row(&sql, [id.get()], RouteRow::from_row)
                    .optional()?)
            })
            .await
            .map_err(|err| StoreError::storage("query route", err))?;

        row.map_or_else(
            || Err(StoreError::not_found(Entity::Route, route_key(id))),
            RouteRow::into_route,
        )
    }

    async fn get_by_name(&self, project_id: ProjectId, name: &str) -> StoreResult<Route> {
        let lookup = name.to_owned();
        let row = self
            .conn
            .call(move |conn| {
                let sql = format!(
                    "SELECT {} FROM routes WHERE project_id = ?1 AND name = ?2",
                    ROUTE_COLUMNS
                );
                Ok(conn
                    .query_row(&sql, params![project_id.get(), lookup], RouteRow::from_row)
                    .optional()?)
            })
            .await
            .map_err(|err| StoreError::storage("query route", err))?;

        row.map_or_else(
            || Err(StoreError::not_found(Entity::Route, format!("'{}'", name))),
            RouteRow::into_route,
        )
    }

    async fn update(&self, id: RouteId, update: RouteUpdate) -> StoreResult<Route> {
        let result = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                let sql = format!("SELECT {} FROM routes WHERE id = ?1", ROUTE_COLUMNS);
                let current = tx
                    .query_row(&sql, [id.get()], RouteRow::from_row)
                    .optional()?;
                let Some(current) = current else {
                    return Ok(Err(StoreError::not_found(Entity::Route, route_key(id))));
                };
                let merged = match current
                    .into_route()
                    .and_then(|route| update.apply_to(&route).map_err(StoreError::from))
                {
                    Ok(merged) => merged,
                    Err(err) => return Ok(Err(err)),
                };
                if update.is_empty() {
                    return Ok(Ok(merged));
                }

                let written = tx.execute(
                    "UPDATE routes SET name = ?1, method = ?2, path = ?3, description = ?4
                     WHERE id = ?5",
                    params![
                        merged.name,
                        merged.method.as_str(),
                        merged.path,
                        merged.description,
                        id.get()
                    ],
                );
                match written {
                    Ok(_) => {}
                    Err(err) if constraint_kind(&err) == Some(ConstraintKind::Unique) => {
                        return Ok(Err(StoreError::duplicate(Entity::Route, merged.name)));
                    }
                    Err(err) => return Err(err.into()),
                }
                tx.commit()?;
                Ok(Ok(merged))
            })
            .await
            .map_err(|err| StoreError::storage("update route", err))?;

        if let Ok(route) = result.as_ref() {
            debug!("Updated route {} ('{}')", route.id, route.name);
        }
        result
    }

    async fn delete(&self, id: RouteId) -> StoreResult<()> {
        let removed = self
            .conn
            .call(move |conn| Ok(conn.execute("DELETE FROM routes WHERE id = ?1", [id.get()])?))
            .await
            .map_err(|err| StoreError::storage("delete route", err))?;

        if removed == 0 {
            return Err(StoreError::not_found(Entity::Route, route_key(id)));
        }
        debug!("Deleted route {}", id);
        Ok(())
    }
}
