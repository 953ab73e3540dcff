//! Telemetry metric name constants.
//!
//! Centralised metric names for medex-client operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `medex_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `method`: HTTP method (e.g. "GET", "POST")
//! - `status`: outcome of one attempt: "ok" or "error"
//! - `operation`: cache key operation (e.g. "jobs-list", "jobs-active")

/// Total network attempts issued through the transport (retries included).
///
/// Labels: `method`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "medex_requests_total";

/// Duration of a single network attempt in seconds.
///
/// Labels: `method`.
pub const REQUEST_DURATION_SECONDS: &str = "medex_request_duration_seconds";

/// Total retry attempts (not counting the initial request).
///
/// Labels: `method`.
pub const RETRIES_TOTAL: &str = "medex_retries_total";

/// Total response cache hits.
///
/// Labels: `operation`.
pub const CACHE_HITS_TOTAL: &str = "medex_cache_hits_total";

/// Total response cache misses (expired entries included).
///
/// Labels: `operation`.
pub const CACHE_MISSES_TOTAL: &str = "medex_cache_misses_total";
