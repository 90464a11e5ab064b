use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::analytics::error::{internal_error, network_error, AnalyticsResult};

/// Delivers one fully built collector URL. Implementations resolve once the request completed;
/// the dispatcher treats success and failure alike.
#[async_trait]
pub trait CollectorTransport: Send + Sync {
    async fn send(&self, url: &str) -> AnalyticsResult<()>;
}

/// Issues collector hits as plain HTTP GET requests.
#[derive(Clone, Debug)]
pub struct HttpCollectorTransport {
    client: Client,
}

impl HttpCollectorTransport {
    /// Transport without a request timeout: a hung request holds the queue until it resolves.
    pub fn new() -> AnalyticsResult<Self> {
        Self::with_timeout(None)
    }

    pub fn with_timeout(timeout: Option<Duration>) -> AnalyticsResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| internal_error(format!("failed to build HTTP client: {err}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CollectorTransport for HttpCollectorTransport {
    async fn send(&self, url: &str) -> AnalyticsResult<()> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| network_error(format!("failed to send collector request: {err}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(network_error(format!(
            "collector request failed with status {status}"
        )))
    }
}
