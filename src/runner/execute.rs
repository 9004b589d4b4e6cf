use std::time::Duration;

use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use super::types::{RouteOutcome, RouteResult, RunOptions};
use crate::domain::{Project, Route};
use crate::http::Executor;
use crate::shutdown::ShutdownReceiver;

/// Executes `routes` with at most `options.concurrency` requests in flight.
///
/// Each route owns a slot indexed by its position, so the returned order
/// matches `routes` regardless of completion order.
pub(super) async fn execute_routes<E>(
    executor: &E,
    project: &Project,
    routes: &[Route],
    options: RunOptions,
    mut shutdown: Option<ShutdownReceiver>,
) -> Vec<RouteResult>
where
    E: Executor + ?Sized,
{
    let mut slots: Vec<Option<RouteResult>> = routes.iter().map(|_| None).collect();
    let mut pending = routes.iter().enumerate();
    let mut in_flight = FuturesUnordered::new();
    let limit = options.concurrency.get();
    let mut cancelled = false;

    loop {
        while !cancelled && in_flight.len() < limit {
            let Some((index, route)) = pending.next() else {
                break;
            };
            in_flight.push(async move {
                let result = execute_route(executor, project, route, options.timeout).await;
                (index, result)
            });
        }
        if in_flight.is_empty() {
            break;
        }

        tokio::select! {
            completed = in_flight.next() => {
                if let Some((index, result)) = completed
                    && let Some(slot) = slots.get_mut(index)
                {
                    *slot = Some(result);
                }
            }
            () = wait_for_shutdown(&mut shutdown), if !cancelled => {
                warn!("Shutdown requested; no further routes will be dispatched");
                cancelled = true;
            }
        }
    }

    slots
        .into_iter()
        .zip(routes)
        .map(|(slot, route)| slot.unwrap_or_else(|| RouteResult::cancelled(route)))
        .collect()
}

async fn execute_route<E>(
    executor: &E,
    project: &Project,
    route: &Route,
    timeout: Duration,
) -> RouteResult
where
    E: Executor + ?Sized,
{
    let url = project.route_url(&route.path);
    debug!("Dispatching route '{}': {} {}", route.name, route.method, url);
    let outcome = match executor.execute(route.method, &url, None, timeout).await {
        Ok(response) => RouteOutcome::Response {
            status: response.status,
            duration: response.duration,
        },
        Err(err) => {
            let error = err.detail();
            warn!("Route '{}' failed: {}", route.name, error);
            RouteOutcome::Failed {
                kind: err.kind(),
                error,
            }
        }
    };
    RouteResult::new(route, outcome)
}

async fn wait_for_shutdown(shutdown: &mut Option<ShutdownReceiver>) {
    let Some(receiver) = shutdown.as_mut() else {
        return std::future::pending().await;
    };
    match receiver.recv().await {
        Ok(()) | Err(RecvError::Lagged(_)) => {}
        // Every sender is gone, so no shutdown can arrive any more.
        Err(RecvError::Closed) => std::future::pending().await,
    }
}
