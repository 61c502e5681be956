use crate::config::ResolvedConfig;
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use std::time::Duration;

/// Network access used by the archive locator and fetcher.
///
/// Injected so the pipeline can run against an in-memory feed in tests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Header-only existence probe. `Ok(true)` only for a success status.
    async fn exists(&self, url: &str) -> AppResult<bool>;

    /// Downloads the full body of `url`. Non-success statuses are errors.
    async fn fetch(&self, url: &str) -> AppResult<Vec<u8>>;
}

/// `reqwest`-backed transport with separate probe and fetch timeouts.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    probe_timeout: Duration,
    fetch_timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &ResolvedConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::NetworkError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            probe_timeout: Duration::from_secs(config.probe_timeout_secs),
            fetch_timeout: Duration::from_secs(config.fetch_timeout_secs),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn exists(&self, url: &str) -> AppResult<bool> {
        // Redirects are followed by the default client policy
        let response = self
            .client
            .head(url)
            .timeout(self.probe_timeout)
            .send()
            .await?;
        Ok(response.status().is_success())
    }

    async fn fetch(&self, url: &str) -> AppResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .timeout(self.fetch_timeout)
            .send()
            .await
            .map_err(|e| AppError::NetworkError(format!("Failed to download {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::NetworkError(format!("Failed to read body of {url}: {e}")))?;
        Ok(body.to_vec())
    }
}
