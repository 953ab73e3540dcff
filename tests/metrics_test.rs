//! Tests for metrics emitted by the client and the response cache.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use medex_client::transport::Outcome;
use medex_client::{
    ApiClient, CacheMode, RequestDescriptor, Response, RetryConfig, Transport, TransportError,
    telemetry,
};
use serde_json::json;

// ============================================================================
// Mock transport
// ============================================================================

/// Times out `failures` times, then answers `{"ok": true}`.
struct FlakyTransport {
    failures: AtomicU32,
}

impl FlakyTransport {
    fn new(failures: u32) -> Arc<Self> {
        Arc::new(Self {
            failures: AtomicU32::new(failures),
        })
    }
}

#[async_trait]
impl Transport for FlakyTransport {
    async fn send(&self, _request: &RequestDescriptor) -> Outcome {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(TransportError::Timeout);
        }
        Ok(Response::ok(json!({"ok": true})))
    }
}

fn client(failures: u32) -> ApiClient {
    ApiClient::builder()
        .shared_transport(FlakyTransport::new(failures))
        .retry(RetryConfig::new().max_retries(3).delay(std::time::Duration::ZERO))
        .build()
        .unwrap()
}

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

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

/// Sum counter values for a metric name carrying the given label.
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
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Check if any histogram entries exist for a given metric name.
fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

// ============================================================================
// Tests
// ============================================================================

/// Runs async code within a local recorder scope on the multi-thread runtime.
///
/// `block_in_place` ensures the sync `with_local_recorder` closure stays
/// on the current thread while `block_on` drives the inner async work.
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn successful_request_records_metrics() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current()
                .block_on(async { client(0).realtime().events(None).await })
        })
    });
    assert!(result.is_ok());

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL), 1);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, "status", "ok"),
        1
    );
    assert_eq!(counter_total(&snapshot, telemetry::RETRIES_TOTAL), 0);
    assert!(
        has_histogram(&snapshot, telemetry::REQUEST_DURATION_SECONDS),
        "expected a duration histogram entry"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn retries_record_every_attempt() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current()
                .block_on(async { client(2).realtime().events(None).await })
        })
    });
    assert!(result.is_ok());

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL), 3);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, "status", "error"),
        2
    );
    assert_eq!(counter_total(&snapshot, telemetry::RETRIES_TOTAL), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn cache_lookups_record_hits_and_misses() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let client = client(0);
                client.jobs().list(1, 20, CacheMode::Use).await.unwrap();
                client.jobs().list(1, 20, CacheMode::Use).await.unwrap();
                client.jobs().list(1, 20, CacheMode::Use).await.unwrap();
                // Bypass never looks at the cache.
                client.jobs().list(1, 20, CacheMode::Bypass).await.unwrap();
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL), 2);
    assert_eq!(
        counter_with_label(
            &snapshot,
            telemetry::CACHE_HITS_TOTAL,
            "operation",
            "jobs-list"
        ),
        2
    );
    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL), 2);
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let client = client(1);
    client.admin().stats(CacheMode::Use).await.unwrap();
}
