//! Time-boxed response cache for side-effect-free reads.
//!
//! [`ResponseCache`] maps a [`CacheKey`] to the body of the last successful
//! read for that key. An entry is valid while `now - stored_at < ttl`;
//! expired entries are never returned and are evicted on the lookup that
//! finds them (there is no background sweep).
//!
//! # Architecture
//!
//! The cache is owned by [`ApiClient`](crate::ApiClient), created once per
//! client and cleared when the client is built. Only the resource façades
//! read or write it. A read never refreshes an entry's age: this is a pure
//! TTL lookup, not an LRU.
//!
//! Storage is an unbounded `moka` map used for its concurrent access only;
//! expiry is decided here against the injected [`Clock`] so tests can move
//! time deterministically. Unbounded growth is accepted: entries are small
//! and the process is short-lived relative to memory pressure.
//!
//! Two calls racing on the same miss both reach the network and both store;
//! the entry reflects whichever completed last. Writes and expiry evictions
//! go through moka's per-key entry lock, and an eviction re-checks age under
//! that lock, so a lookup that saw a stale entry never removes a fresh one
//! stored in the meantime.

use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::ops::compute::Op;
use moka::sync::Cache;
use serde_json::Value;
use tracing::trace;

use super::{CacheKey, Clock, SystemClock};
use crate::telemetry;

/// A stored body and when it was stored.
#[derive(Clone, Debug)]
struct CacheEntry {
    value: Value,
    stored_at: Instant,
}

/// In-memory TTL cache for read responses.
pub struct ResponseCache {
    entries: Cache<String, CacheEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    /// Create a cache on the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create a cache on an injected clock.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Cache::builder().build(),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a live entry.
    ///
    /// Returns `None` on a miss. An expired entry is removed and reported
    /// as a miss. Emits cache hit/miss metrics labelled by operation.
    pub fn get(&self, key: &CacheKey) -> Option<Value> {
        let operation = key.operation();
        let found = self.entries.get(key.as_str()).and_then(|entry| {
            let age = self.clock.now().saturating_duration_since(entry.stored_at);
            if age < self.ttl {
                Some(entry.value)
            } else {
                self.evict_if_expired(key.as_str());
                trace!(key = %key, age_ms = age.as_millis() as u64, "evicted expired cache entry");
                None
            }
        });

        match found {
            Some(value) => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL, "operation" => operation)
                    .increment(1);
                trace!(key = %key, "cache hit");
                Some(value)
            }
            None => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "operation" => operation)
                    .increment(1);
                None
            }
        }
    }

    /// Store (or overwrite) the value for a key, stamped with the current time.
    pub fn put(&self, key: &CacheKey, value: Value) {
        let entry = CacheEntry {
            value,
            stored_at: self.clock.now(),
        };
        self.entries
            .entry(key.as_str().to_owned())
            .and_compute_with(|_| Op::Put(entry));
    }

    /// Remove the entry under `key` only if it is still expired.
    fn evict_if_expired(&self, key: &str) {
        let now = self.clock.now();
        self.entries
            .entry(key.to_owned())
            .and_compute_with(|current| match current {
                Some(entry)
                    if now.saturating_duration_since(entry.value().stored_at) >= self.ttl =>
                {
                    Op::Remove
                }
                _ => Op::Nop,
            });
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Number of stored entries, expired ones included until looked up.
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
