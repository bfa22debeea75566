//! Fetch client for the enrichment endpoint.
//!
//! [`TrendClient`] wraps a [`TrendTransport`] with the retry policy and
//! envelope decoding, and drives the multi-query comparison.

mod builder;
pub mod envelope;
pub mod retry;
pub mod transport;

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

pub use builder::TrendClientBuilder;
pub use envelope::{parse_envelope, parse_payload};
pub use retry::RetryConfig;
pub use transport::{HttpTransport, TrendTransport};

use crate::config::Config;
use crate::insights::{self, TopTrends};
use crate::pipeline::{ComparisonOutcome, run_comparison};
use crate::telemetry;
use crate::types::QueryResult;
use crate::{Result, TrendPulseError};

/// Client for fetching and comparing trend data.
#[derive(Clone)]
pub struct TrendClient {
    transport: Arc<dyn TrendTransport>,
    retry: RetryConfig,
}

impl TrendClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> TrendClientBuilder {
        TrendClientBuilder::new()
    }

    pub fn new(transport: Arc<dyn TrendTransport>, retry: RetryConfig) -> Self {
        Self { transport, retry }
    }

    /// Build an HTTP client from loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = Self::builder()
            .base_url(config.endpoint.base_url.clone())
            .timeout(config.endpoint.timeout())
            .retry(config.retry.to_retry_config());
        if let Some(key) = config.api_key() {
            builder = builder.api_key(key);
        }
        builder.build()
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Fetch and decode the posts for one query.
    ///
    /// The query is sent and labelled exactly as given; only a query that
    /// is empty or all whitespace is rejected.
    ///
    /// Transport and non-2xx failures are retried per [`RetryConfig`]; when
    /// attempts run out the error is [`TrendPulseError::Fetch`]. Parse and
    /// schema failures are returned without retrying.
    pub async fn fetch_trends(&self, query: &str) -> Result<QueryResult> {
        if query.trim().is_empty() {
            return Err(TrendPulseError::InvalidInput("query must not be blank".into()));
        }

        let start = Instant::now();
        let result = fetch_and_decode(self, query).await;
        let elapsed = start.elapsed();

        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS).record(elapsed.as_secs_f64());
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::REQUESTS_TOTAL, "status" => status).increment(1);

        match &result {
            Ok(r) => info!(
                query,
                reddit = r.reddit.len(),
                hackernews = r.hackernews.len(),
                news = r.news.len(),
                duration_ms = elapsed.as_millis() as u64,
                "fetched trends"
            ),
            Err(e) => warn!(query, error = %e, "failed to fetch trends"),
        }
        result
    }

    /// Fetch every query in turn and aggregate them for the comparison view.
    ///
    /// Queries are validated (1 to 5, none blank). A query that fails is
    /// reported in [`ComparisonOutcome::failures`] and charted as empty.
    pub async fn compare<Q: AsRef<str>>(&self, queries: &[Q]) -> Result<ComparisonOutcome> {
        run_comparison(queries, move |query| async move { self.fetch_trends(&query).await }).await
    }

    /// Fetch one query and pick the first `limit` posts of each source.
    pub async fn top_trends(&self, query: &str, limit: usize) -> Result<TopTrends> {
        let result = self.fetch_trends(query).await?;
        Ok(insights::top_posts(&result, limit))
    }
}

async fn fetch_and_decode(client: &TrendClient, query: &str) -> Result<QueryResult> {
    let transport = client.transport.as_ref();
    let raw = retry::with_retry(&client.retry, transport.name(), query, || {
        transport.fetch_envelope(query)
    })
    .await?;
    parse_envelope(query, &raw)
}
