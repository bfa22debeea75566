//! Tests for metrics integration.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use trendpulse::telemetry;
use trendpulse::{Result, RetryConfig, TrendClient, TrendPulseError, TrendTransport};

// ============================================================================
// Mock transports
// ============================================================================

fn ok_envelope() -> String {
    let body = serde_json::json!({"reddit": [], "hackernews": [], "news": []});
    serde_json::json!({ "body": body.to_string() }).to_string()
}

struct StaticTransport;

#[async_trait]
impl TrendTransport for StaticTransport {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_envelope(&self, _query: &str) -> Result<String> {
        Ok(ok_envelope())
    }
}

/// Fails the first `n` calls with a 503.
struct Flaky(AtomicU32);

#[async_trait]
impl TrendTransport for Flaky {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn fetch_envelope(&self, _query: &str) -> Result<String> {
        if self.0.load(Ordering::Relaxed) > 0 {
            self.0.fetch_sub(1, Ordering::Relaxed);
            return Err(TrendPulseError::Api {
                status: 503,
                message: "unavailable".into(),
            });
        }
        Ok(ok_envelope())
    }
}

/// Fails every query containing "bad".
struct FailsBad;

#[async_trait]
impl TrendTransport for FailsBad {
    fn name(&self) -> &str {
        "fails-bad"
    }

    async fn fetch_envelope(&self, query: &str) -> Result<String> {
        if query.contains("bad") {
            return Err(TrendPulseError::Transport("connection refused".into()));
        }
        Ok(ok_envelope())
    }
}

fn fast_retry() -> RetryConfig {
    RetryConfig::new().backoff_step(Duration::from_millis(1))
}

// ============================================================================
// Snapshot helpers
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Counter value for a metric with a specific label value.
fn counter_with_label(snapshot: &SnapshotVec, name: &str, label: &str, value: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| {
            key.kind() == MetricKind::Counter
                && key.key().name() == name
                && key
                    .key()
                    .labels()
                    .any(|l| l.key() == label && l.value() == value)
        })
        .map(|(_, _, _, v)| match v {
            DebugValue::Counter(c) => *c,
            _ => 0,
        })
        .sum()
}

fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn successful_fetch_records_metrics() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let client = TrendClient::new(Arc::new(StaticTransport), fast_retry());
                client.fetch_trends("rust").await
            })
        })
    });
    assert!(result.is_ok());

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(
        counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, "status", "ok"),
        1
    );
    assert!(
        has_histogram(&snapshot, telemetry::REQUEST_DURATION_SECONDS),
        "expected a duration histogram entry"
    );
    assert_eq!(counter_total(&snapshot, telemetry::RETRIES_TOTAL), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn retries_are_counted_per_transport() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let client = TrendClient::new(Arc::new(Flaky(AtomicU32::new(2))), fast_retry());
                client.fetch_trends("rust").await
            })
        })
    });
    assert!(result.is_ok());

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(
        counter_with_label(&snapshot, telemetry::RETRIES_TOTAL, "transport", "flaky"),
        2
    );
    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn failed_fetch_records_error_status() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let client = TrendClient::new(Arc::new(FailsBad), RetryConfig::disabled());
                client.fetch_trends("bad query").await
            })
        })
    });
    assert!(result.is_err());

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(
        counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, "status", "error"),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn degraded_comparison_queries_are_counted() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let outcome = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let client = TrendClient::new(Arc::new(FailsBad), RetryConfig::disabled());
                client.compare(&["good", "bad one", "bad two"]).await
            })
        })
    })
    .expect("comparison runs");
    assert_eq!(outcome.failures.len(), 2);

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::DEGRADED_QUERIES_TOTAL), 2);
    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL), 3);
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let client = TrendClient::new(Arc::new(StaticTransport), fast_retry());
    let _result = client.fetch_trends("rust").await.unwrap();
}
