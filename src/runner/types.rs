use std::num::NonZeroUsize;
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::domain::{HttpMethod, Route, RouteId};
use crate::http::FailureKind;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// What to run: a project, optionally narrowed to one route by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub project: String,
    pub route: Option<String>,
    pub options: RunOptions,
}

impl RunRequest {
    #[must_use]
    pub fn project(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            route: None,
            options: RunOptions::default(),
        }
    }

    #[must_use]
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    #[must_use]
    pub const fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Deadline for each request, counted from that request's dispatch.
    pub timeout: Duration,
    /// Maximum number of requests in flight at once.
    pub concurrency: NonZeroUsize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            concurrency: NonZeroUsize::MIN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RouteOutcome {
    Response {
        status: u16,
        #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
        duration: Duration,
    },
    Failed {
        kind: FailureKind,
        error: String,
    },
    /// The run was cancelled before this route was dispatched.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteResult {
    pub route_id: RouteId,
    pub route_name: String,
    pub method: HttpMethod,
    pub path: String,
    #[serde(flatten)]
    pub outcome: RouteOutcome,
}

impl RouteResult {
    #[must_use]
    pub fn new(route: &Route, outcome: RouteOutcome) -> Self {
        Self {
            route_id: route.id,
            route_name: route.name.clone(),
            method: route.method,
            path: route.path.clone(),
            outcome,
        }
    }

    #[must_use]
    pub fn cancelled(route: &Route) -> Self {
        Self::new(route, RouteOutcome::Cancelled)
    }

    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self.outcome {
            RouteOutcome::Response { status, .. } => Some(status),
            RouteOutcome::Failed { .. } | RouteOutcome::Cancelled => None,
        }
    }

    #[must_use]
    pub const fn duration(&self) -> Option<Duration> {
        match self.outcome {
            RouteOutcome::Response { duration, .. } => Some(duration),
            RouteOutcome::Failed { .. } | RouteOutcome::Cancelled => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            RouteOutcome::Failed { error, .. } => Some(error),
            RouteOutcome::Response { .. } | RouteOutcome::Cancelled => None,
        }
    }

    /// True when the route produced an HTTP response of any status.
    #[must_use]
    pub const fn responded(&self) -> bool {
        matches!(self.outcome, RouteOutcome::Response { .. })
    }
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}
