//! Builder for configuring [`TrendClient`] instances

use std::sync::Arc;
use std::time::Duration;

use super::transport::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HttpTransport, TrendTransport};
use super::{RetryConfig, TrendClient};
use crate::Result;

/// Builder for configuring [`TrendClient`] instances.
pub struct TrendClientBuilder {
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    retry: RetryConfig,
    transport: Option<Arc<dyn TrendTransport>>,
}

impl Default for TrendClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrendClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryConfig::default(),
            transport: None,
        }
    }

    /// Base URL of the enrichment backend; `/enrich` is appended.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// API key sent as `x-api-key`.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Per-attempt request timeout (default: 10s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    /// Use a custom transport instead of HTTP. Base URL, key and timeout
    /// are then ignored.
    pub fn transport(mut self, transport: Arc<dyn TrendTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<TrendClient> {
        let transport: Arc<dyn TrendTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::with_base_url(
                self.base_url,
                self.timeout,
                self.api_key,
            )?),
        };
        Ok(TrendClient::new(transport, self.retry))
    }
}
