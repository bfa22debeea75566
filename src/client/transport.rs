//! Transport seam between the fetch client and the enrichment endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{Result, TrendPulseError};

/// Default base URL of the enrichment backend (local SAM endpoint).
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// Path of the enrichment route under the base URL.
pub const ENRICH_PATH: &str = "/enrich";

/// Per-attempt request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Header carrying the optional API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Longest error body kept in an [`TrendPulseError::Api`] message.
const MAX_ERROR_BODY: usize = 512;

/// One attempt at fetching the raw response envelope for a query.
///
/// Implementations perform a single request and classify failures:
/// [`TrendPulseError::Transport`] for network/timeout problems and
/// [`TrendPulseError::Api`] for non-2xx responses. Retrying is the caller's
/// job.
#[async_trait]
pub trait TrendTransport: Send + Sync {
    /// Name used in logs and metric labels.
    fn name(&self) -> &str;

    /// Return the raw response body for `query`.
    async fn fetch_envelope(&self, query: &str) -> Result<String>;
}

/// HTTP transport for `GET <base_url>/enrich?query=<query>`.
#[derive(Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpTransport {
    /// Create a transport for the default local endpoint.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, DEFAULT_TIMEOUT, None)
    }

    /// Create a transport for a custom base URL (also used with wiremock).
    pub fn with_base_url(
        base_url: impl Into<String>,
        timeout: Duration,
        api_key: Option<String>,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TrendPulseError::Configuration(format!("failed to build HTTP client: {e}")))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(TrendPulseError::Configuration("base URL is empty".into()));
        }

        Ok(Self {
            http,
            base_url,
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, ENRICH_PATH)
    }
}

#[async_trait]
impl TrendTransport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_envelope(&self, query: &str) -> Result<String> {
        let url = self.endpoint();
        debug!(url = %url, query, "requesting enrichment");

        let mut request = self.http.get(&url).query(&[("query", query)]);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TrendPulseError::Transport(format!("request to {url} timed out: {e}"))
            } else {
                TrendPulseError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let mut message = response.text().await.unwrap_or_default();
            if message.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| message.is_char_boundary(*i))
                    .unwrap_or(0);
                message.truncate(cut);
            }
            return Err(TrendPulseError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .text()
            .await
            .map_err(|e| TrendPulseError::Transport(e.to_string()))
    }
}
