mod app;
mod config;
mod http;
mod runner;
mod store;
mod validation;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use http::{ExecError, HttpError};
pub use runner::RunnerError;
pub use store::{Entity, StoreError, StoreResult};
pub use validation::ValidationError;
