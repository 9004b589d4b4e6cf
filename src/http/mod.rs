//! Single-shot HTTP execution with a hard deadline.
mod executor;


use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::HttpMethod;
use crate::error::ExecError;

pub use executor::HttpExecutor;

/// A completed exchange: status line received and body fully read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub duration: Duration,
}

/// Coarse classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Timeout,
    Network,
    InvalidRequest,
}

impl FailureKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FailureKind::Timeout => "timeout",
            FailureKind::Network => "network",
            FailureKind::InvalidRequest => "invalid_request",
        }
    }
}

#[async_trait]
pub trait Executor: Send + Sync {
    /// Issues one request and waits at most `timeout` for the full response.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::Timeout` when the deadline passes before the body
    /// is read, `ExecError::Network` for transport failures and
    /// `ExecError::InvalidRequest` when no request can be built for `url`.
    async fn execute(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<Vec<u8>>,
        timeout: Duration,
    ) -> Result<ExecResponse, ExecError>;
}
