//! Persistence for projects and routes.
//!
//! The stores are traits so the test runner can be exercised against doubles;
//! [`Database`] provides the SQLite-backed implementations. All statements
//! run on the single background thread owned by `tokio_rusqlite`, which
//! serialises writers and makes each transaction atomic for readers.
mod database;
mod project;
mod route;
mod rows;
mod schema;


use async_trait::async_trait;

use crate::domain::{NewProject, NewRoute, Project, ProjectId, Route, RouteId, RouteUpdate};
use crate::error::StoreResult;

pub use database::Database;
pub use project::SqliteProjectStore;
pub use route::SqliteRouteStore;

#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Inserts a project and returns it with its assigned id and timestamp.
    ///
    /// # Errors
    ///
    /// Fails with `DuplicateName` when the name is taken and `Validation` for
    /// a blank name or malformed base URL.
    async fn create(&self, project: NewProject) -> StoreResult<Project>;

    /// # Errors
    ///
    /// Fails with `NotFound` when no project has this name.
    async fn get_by_name(&self, name: &str) -> StoreResult<Project>;

    /// All projects ordered by id.
    ///
    /// # Errors
    ///
    /// Fails when the database cannot be read.
    async fn list(&self) -> StoreResult<Vec<Project>>;

    /// Removes a project together with its routes.
    ///
    /// # Errors
    ///
    /// Fails with `NotFound` when no project has this name.
    async fn delete_by_name(&self, name: &str) -> StoreResult<()>;
}

#[async_trait]
pub trait RouteStore: Send + Sync {
    /// Inserts a route under its project, applying the default name.
    ///
    /// # Errors
    ///
    /// Fails with `DuplicateName` when the project already has a route with
    /// the resolved name, `NotFound` when the project does not exist and
    /// `Validation` for a bad path or blank name.
    async fn create(&self, route: NewRoute) -> StoreResult<Route>;

    /// Routes owned by a project ordered by id.
    ///
    /// # Errors
    ///
    /// Fails when the database cannot be read.
    async fn list_by_project(&self, project_id: ProjectId) -> StoreResult<Vec<Route>>;

    /// # Errors
    ///
    /// Fails with `NotFound` when no route has this id.
    async fn get_by_id(&self, id: RouteId) -> StoreResult<Route>;

    /// # Errors
    ///
    /// Fails with `NotFound` when the project has no route with this name.
    async fn get_by_name(&self, project_id: ProjectId, name: &str) -> StoreResult<Route>;

    /// Applies the supplied fields of `update` and returns the stored route.
    ///
    /// # Errors
    ///
    /// Fails with `NotFound` for an unknown id, `DuplicateName` when a rename
    /// collides and `Validation` for a bad path or blank name.
    async fn update(&self, id: RouteId, update: RouteUpdate) -> StoreResult<Route>;

    /// # Errors
    ///
    /// Fails with `NotFound` when no route has this id.
    async fn delete(&self, id: RouteId) -> StoreResult<()>;
}
