//! Resolves a project's routes and replays them through an [`Executor`].
//!
//! Resolution failures (unknown project, unknown route, storage errors) abort
//! the run. Once the route set is known every route yields exactly one
//! [`RouteResult`], in resolution order, whatever happens to its request.
mod execute;
mod types;


use tracing::info;

use crate::domain::{Project, Route};
use crate::error::RunnerError;
use crate::http::Executor;
use crate::shutdown::ShutdownReceiver;
use crate::store::{ProjectStore, RouteStore};

pub use types::{DEFAULT_TIMEOUT, RouteOutcome, RouteResult, RunOptions, RunRequest};

pub struct TestRunner<P, R, E> {
    projects: P,
    routes: R,
    executor: E,
}

impl<P, R, E> TestRunner<P, R, E>
where
    P: ProjectStore,
    R: RouteStore,
    E: Executor,
{
    #[must_use]
    pub const fn new(projects: P, routes: R, executor: E) -> Self {
        Self {
            projects,
            routes,
            executor,
        }
    }

    /// Runs the requested routes and returns one result per route.
    ///
    /// When `shutdown` fires, routes not yet dispatched are reported as
    /// cancelled while in-flight requests finish or time out.
    ///
    /// # Errors
    ///
    /// Returns an error when the project or the requested route does not
    /// exist, or when the stores fail.
    pub async fn run(
        &self,
        request: &RunRequest,
        shutdown: Option<ShutdownReceiver>,
    ) -> Result<Vec<RouteResult>, RunnerError> {
        let project = self.resolve_project(&request.project).await?;
        let routes = self.resolve_routes(&project, request.route.as_deref()).await?;
        info!(
            "Testing {} route(s) of project '{}' (timeout {}ms, concurrency {})",
            routes.len(),
            project.name,
            request.options.timeout.as_millis(),
            request.options.concurrency
        );
        let results = execute::execute_routes(
            &self.executor,
            &project,
            &routes,
            request.options,
            shutdown,
        )
        .await;
        Ok(results)
    }

    async fn resolve_project(&self, name: &str) -> Result<Project, RunnerError> {
        self.projects
            .get_by_name(name)
            .await
            .map_err(|err| {
                if err.is_not_found() {
                    RunnerError::ProjectNotFound {
                        name: name.to_owned(),
                    }
                } else {
                    RunnerError::from(err)
                }
            })
    }

    async fn resolve_routes(
        &self,
        project: &Project,
        route: Option<&str>,
    ) -> Result<Vec<Route>, RunnerError> {
        let Some(route_name) = route else {
            return Ok(self.routes.list_by_project(project.id).await?);
        };
        let resolved = self
            .routes
            .get_by_name(project.id, route_name)
            .await
            .map_err(|err| {
                if err.is_not_found() {
                    RunnerError::RouteNotFound {
                        project: project.name.clone(),
                        route: route_name.to_owned(),
                    }
                } else {
                    RunnerError::from(err)
                }
            })?;
        Ok(vec![resolved])
    }
}
