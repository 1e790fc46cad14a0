//! Instance metadata client.
//!
//! Fetches the availability zone of the host from the cloud metadata service.
//! Every call performs exactly one GET; nothing is cached or retried. The
//! response body is read as text and its lines are joined without separators.

use std::fmt;
use std::time::Duration;

use crate::config::{MetadataConfig, GREETING_PREFIX, METADATA_USER_AGENT};

/// Error type for metadata requests
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    #[error("Metadata request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Metadata request failed: {0}")]
    Request(String),

    #[error("Metadata endpoint returned {0}")]
    Status(reqwest::StatusCode),

    #[error("Failed to read metadata response: {0}")]
    Body(String),
}

/// Availability zone as reported by the metadata service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvailabilityZone(pub String);

impl fmt::Display for AvailabilityZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// HTTP client bound to a single metadata URL.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct MetadataClient {
    http_client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl MetadataClient {
    /// Build a client with the connect and total timeouts from configuration.
    ///
    /// Environment proxies are ignored: the metadata address is link-local and
    /// only reachable directly.
    pub fn new(config: &MetadataConfig) -> Result<Self, MetadataError> {
        let timeout = Duration::from_millis(config.timeout_ms);

        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(timeout)
            .user_agent(METADATA_USER_AGENT)
            .no_proxy()
            .build()
            .map_err(|e| MetadataError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            url: config.url.clone(),
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the availability zone with a single GET.
    pub async fn fetch_availability_zone(&self) -> Result<AvailabilityZone, MetadataError> {
        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = %status, url = %self.url, "Metadata endpoint returned error status");
            return Err(MetadataError::Status(status));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                MetadataError::Timeout(self.timeout)
            } else {
                MetadataError::Body(e.to_string())
            }
        })?;

        Ok(AvailabilityZone(join_lines(&body)))
    }

    fn classify(&self, error: reqwest::Error) -> MetadataError {
        if error.is_timeout() {
            MetadataError::Timeout(self.timeout)
        } else {
            MetadataError::Request(error.to_string())
        }
    }
}

/// Concatenate the lines of `body` with no separator.
///
/// `\n`, `\r\n` and a lone `\r` all terminate a line.
pub fn join_lines(body: &str) -> String {
    body.split(['\r', '\n']).collect()
}

/// Build the `/hello` response text.
pub fn greeting(zone: &AvailabilityZone) -> String {
    format!("{}{}", GREETING_PREFIX, zone)
}
