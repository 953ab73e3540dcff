//! Timeout-only retry behaviour of the client, driven by a scripted transport.
//!
//! All tests run with paused tokio time so retry delays and request
//! deadlines elapse instantly.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use medex_client::transport::Outcome;
use medex_client::{
    ApiClient, CacheMode, MedexError, RequestDescriptor, Response, RetryConfig, Transport,
    TransportError,
};
use serde_json::json;

/// Transport that answers each attempt from a script keyed by call number.
struct Scripted {
    calls: AtomicU32,
    script: fn(u32) -> Outcome,
}

impl Scripted {
    fn new(script: fn(u32) -> Outcome) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
            script,
        })
    }

    fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for Scripted {
    async fn send(&self, _request: &RequestDescriptor) -> Outcome {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        (self.script)(n)
    }
}

/// Transport that never answers within the deadline.
struct Hanging {
    calls: AtomicU32,
}

#[async_trait]
impl Transport for Hanging {
    async fn send(&self, _request: &RequestDescriptor) -> Outcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Response::ok(json!({})))
    }
}

fn client_with(transport: Arc<dyn Transport>, retry: RetryConfig) -> ApiClient {
    ApiClient::builder()
        .shared_transport(transport)
        .retry(retry)
        .build()
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn always_timing_out_issues_max_retries_plus_one_calls() {
    let transport = Scripted::new(|_| Err(TransportError::Timeout));
    let client = client_with(transport.clone(), RetryConfig::new().max_retries(3));

    let err = client.jobs().status("job-1", CacheMode::Use).await.unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(transport.call_count(), 4);
    assert_eq!(err.path(), Some("/api/jobs/job-1/status"));
}

#[tokio::test(start_paused = true)]
async fn zero_retries_surfaces_first_timeout() {
    let transport = Scripted::new(|_| Err(TransportError::Timeout));
    let client = client_with(transport.clone(), RetryConfig::disabled());

    let err = client.admin().stats(CacheMode::Use).await.unwrap_err();

    assert!(matches!(err, MedexError::Timeout { .. }));
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn recovers_after_transient_timeouts() {
    let transport = Scripted::new(|n| {
        if n < 2 {
            Err(TransportError::Timeout)
        } else {
            Ok(Response::ok(json!({"status": "running"})))
        }
    });
    let client = client_with(transport.clone(), RetryConfig::new().max_retries(3));

    let status = client.jobs().status("job-1", CacheMode::Use).await.unwrap();

    assert_eq!(status["status"], "running");
    assert_eq!(transport.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn waits_fixed_delay_between_attempts() {
    let transport = Scripted::new(|_| Err(TransportError::Timeout));
    let client = client_with(
        transport.clone(),
        RetryConfig::new()
            .max_retries(2)
            .delay(Duration::from_millis(500)),
    );

    let start = tokio::time::Instant::now();
    let _ = client.realtime().queue(CacheMode::Use).await;

    assert_eq!(transport.call_count(), 3);
    let waited = start.elapsed();
    assert!(waited >= Duration::from_millis(1000), "waited {waited:?}");
    assert!(waited < Duration::from_millis(1100), "waited {waited:?}");
}

#[tokio::test(start_paused = true)]
async fn not_found_is_not_retried() {
    let transport = Scripted::new(|_| {
        Err(TransportError::Status {
            code: 404,
            body: json!({"detail": "Job not found"}),
        })
    });
    let client = client_with(transport.clone(), RetryConfig::new().max_retries(3));

    let err = client.jobs().get("missing", CacheMode::Use).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(transport.call_count(), 1);
    match err {
        MedexError::Status { message, .. } => assert_eq!(message, "Job not found"),
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn server_errors_are_not_retried() {
    let transport = Scripted::new(|_| {
        Err(TransportError::Status {
            code: 503,
            body: json!({"error": "worker pool exhausted"}),
        })
    });
    let client = client_with(transport.clone(), RetryConfig::new().max_retries(3));

    let err = client.jobs().create(json!({"adapter": "epic"})).await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn connection_failure_is_not_retried() {
    let transport =
        Scripted::new(|_| Err(TransportError::Connection("connection refused".to_string())));
    let client = client_with(transport.clone(), RetryConfig::new().max_retries(3));

    let err = client.adapters().list(CacheMode::Use).await.unwrap_err();

    assert!(matches!(err, MedexError::Connection { .. }));
    assert!(!err.is_timeout());
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn request_deadline_counts_as_timeout() {
    let transport = Arc::new(Hanging {
        calls: AtomicU32::new(0),
    });
    let client = ApiClient::builder()
        .shared_transport(transport.clone())
        .timeout(Duration::from_secs(5))
        .retry(RetryConfig::new().max_retries(1))
        .build()
        .unwrap();

    let err = client.realtime().snapshot(CacheMode::Use).await.unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn retry_counters_are_per_call() {
    // Every call times out once, then succeeds.
    let transport = Scripted::new(|n| {
        if n % 2 == 0 {
            Err(TransportError::Timeout)
        } else {
            Ok(Response::ok(json!({"ok": true})))
        }
    });
    let client = client_with(transport.clone(), RetryConfig::new().max_retries(1));

    for _ in 0..3 {
        client.realtime().events(None).await.unwrap();
    }
    assert_eq!(transport.call_count(), 6);
}

#[tokio::test(start_paused = true)]
async fn timed_out_reads_are_not_cached() {
    let transport = Scripted::new(|n| {
        if n == 0 {
            Err(TransportError::Timeout)
        } else {
            Ok(Response::ok(json!([{"name": "epic"}])))
        }
    });
    let client = client_with(transport.clone(), RetryConfig::disabled());

    assert!(client.adapters().list(CacheMode::Use).await.is_err());
    assert!(client.cache().is_empty());

    let adapters = client.adapters().list(CacheMode::Use).await.unwrap();
    assert_eq!(adapters[0]["name"], "epic");
    assert_eq!(transport.call_count(), 2);
}
