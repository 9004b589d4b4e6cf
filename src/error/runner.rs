use thiserror::Error;

use super::StoreError;

/// Resolution failures that abort a whole test run.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Project '{name}' not found.")]
    ProjectNotFound { name: String },
    #[error("Route '{route}' not found in project '{project}'.")]
    RouteNotFound { project: String, route: String },
    #[error("Failed to resolve routes: {source}")]
    Store {
        #[from]
        source: StoreError,
    },
}
