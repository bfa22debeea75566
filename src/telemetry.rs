//! Telemetry metric name constants.
//!
//! Centralised metric names for trendpulse operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! All metrics are prefixed with `trendpulse_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).

/// Total `fetch_trends` calls.
///
/// Labels: `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "trendpulse_requests_total";

/// Wall time of a `fetch_trends` call in seconds, retries included.
pub const REQUEST_DURATION_SECONDS: &str = "trendpulse_request_duration_seconds";

/// Total retry attempts (not counting the initial request).
///
/// Labels: `transport`.
pub const RETRIES_TOTAL: &str = "trendpulse_retries_total";

/// Queries replaced by an empty result during a comparison.
pub const DEGRADED_QUERIES_TOTAL: &str = "trendpulse_degraded_queries_total";
