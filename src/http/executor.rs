use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{ExecResponse, Executor};
use crate::domain::HttpMethod;
use crate::error::{ExecError, HttpError};

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("routecheck/", env!("CARGO_PKG_VERSION"));

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// [`Executor`] backed by `reqwest`.
///
/// Idle connections are never pooled, so each call opens its own connection
/// and nothing carries over between routes.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: Client,
}

impl HttpExecutor {
    /// Builds the underlying HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error when the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, HttpError> {
        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|err| HttpError::BuildClientFailed { source: err })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Executor for HttpExecutor {
    async fn execute(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<Vec<u8>>,
        timeout: Duration,
    ) -> Result<ExecResponse, ExecError> {
        let mut builder = self.client.request(method.into(), url);
        if let Some(payload) = body {
            builder = builder.body(payload);
        }
        let request = builder.build().map_err(|err| ExecError::InvalidRequest {
            url: url.to_owned(),
            source: err,
        })?;

        let start = Instant::now();
        let exchange = async {
            let response = self.client.execute(request).await?;
            let status = response.status().as_u16();
            let bytes = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, bytes.to_vec()))
        };

        match tokio::time::timeout(timeout, exchange).await {
            Ok(Ok((status, received))) => {
                let duration = start.elapsed();
                debug!(
                    "{} {} -> {} in {}ms",
                    method,
                    url,
                    status,
                    duration.as_millis()
                );
                Ok(ExecResponse {
                    status,
                    body: received,
                    duration,
                })
            }
            Ok(Err(err)) if err.is_timeout() => Err(ExecError::Timeout { timeout }),
            Ok(Err(err)) => Err(ExecError::Network { source: err }),
            Err(_elapsed) => Err(ExecError::Timeout { timeout }),
        }
    }
}
