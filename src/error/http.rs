use std::time::Duration;

use thiserror::Error;

use crate::http::FailureKind;

/// Errors raised while preparing the HTTP client itself.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
}

/// Failure of a single request issued by an executor.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("Request timed out after {}ms.", timeout.as_millis())]
    Timeout { timeout: Duration },
    #[error("Request failed")]
    Network {
        #[source]
        source: reqwest::Error,
    },
    #[error("Invalid request for '{url}': {source}")]
    InvalidRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ExecError {
    /// Display text followed by every underlying cause, joined with `": "`.
    #[must_use]
    pub fn detail(&self) -> String {
        let mut detail = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            let text = cause.to_string();
            if !detail.contains(&text) {
                detail.push_str(": ");
                detail.push_str(&text);
            }
            source = cause.source();
        }
        detail
    }

    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            ExecError::Timeout { .. } => FailureKind::Timeout,
            ExecError::Network { .. } => FailureKind::Network,
            ExecError::InvalidRequest { .. } => FailureKind::InvalidRequest,
        }
    }
}
