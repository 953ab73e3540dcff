//! Built-in pre-send interceptors.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use super::RequestInterceptor;
use crate::types::RequestDescriptor;

fn lowercase_keys(headers: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value.clone()))
        .collect()
}

/// Merges configured headers into every request.
///
/// Defaults override per-call headers of the same name, except a
/// bypass-class header (any name in the bypass set) the caller set
/// explicitly. On a bypass request the bypass headers are applied last and
/// a default never clobbers them; a caller's own value still wins.
#[derive(Debug, Clone)]
pub struct DefaultHeaders {
    defaults: BTreeMap<String, String>,
    bypass: BTreeMap<String, String>,
}

impl DefaultHeaders {
    pub fn new(defaults: &BTreeMap<String, String>, bypass: &BTreeMap<String, String>) -> Self {
        Self {
            defaults: lowercase_keys(defaults),
            bypass: lowercase_keys(bypass),
        }
    }
}

impl RequestInterceptor for DefaultHeaders {
    fn before_send(&self, mut request: RequestDescriptor) -> RequestDescriptor {
        let bypass = request.is_bypass();
        // Captured before merging: only the caller's own values are protected.
        let caller_set: BTreeSet<String> = self
            .bypass
            .keys()
            .filter(|name| request.headers.contains_key(*name))
            .cloned()
            .collect();

        for (name, value) in &self.defaults {
            if caller_set.contains(name) || (bypass && self.bypass.contains_key(name)) {
                continue;
            }
            request.headers.insert(name.clone(), value.clone());
        }
        if bypass {
            for (name, value) in &self.bypass {
                if !caller_set.contains(name) {
                    request.headers.insert(name.clone(), value.clone());
                }
            }
        }
        request
    }
}

/// Sets a uniquely valued query parameter so caches outside this process
/// (browser, proxy, CDN) cannot answer with a stale copy.
///
/// Active on every request when enabled, and on bypass requests always.
/// Setting the parameter replaces any earlier value.
#[derive(Debug)]
pub struct CacheBuster {
    param: String,
    always: bool,
    sequence: AtomicU64,
}

impl CacheBuster {
    pub fn new(param: impl Into<String>, always: bool) -> Self {
        Self {
            param: param.into(),
            always,
            sequence: AtomicU64::new(0),
        }
    }

    /// `<unix millis>.<sequence>`; the sequence keeps values unique within
    /// the same millisecond.
    fn next_value(&self) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("{millis}.{seq}")
    }
}

impl RequestInterceptor for CacheBuster {
    fn before_send(&self, mut request: RequestDescriptor) -> RequestDescriptor {
        if self.always || request.is_bypass() {
            let value = self.next_value();
            request.set_param(&self.param, value);
        }
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn interceptor() -> DefaultHeaders {
        DefaultHeaders::new(
            &headers(&[
                ("Accept", "application/json"),
                ("Cache-Control", "max-age=60"),
            ]),
            &headers(&[("Cache-Control", "no-cache"), ("Pragma", "no-cache")]),
        )
    }

    #[test]
    fn defaults_override_per_call_headers() {
        let request = RequestDescriptor::get("/x").header("accept", "text/html");
        let request = interceptor().before_send(request);
        assert_eq!(request.header_value("accept"), Some("application/json"));
        assert_eq!(request.header_value("cache-control"), Some("max-age=60"));
        assert_eq!(request.header_value("pragma"), None);
    }

    #[test]
    fn bypass_headers_win_over_defaults() {
        let request = RequestDescriptor::get("/x").bypass_cache();
        let request = interceptor().before_send(request);
        assert_eq!(request.header_value("cache-control"), Some("no-cache"));
        assert_eq!(request.header_value("pragma"), Some("no-cache"));
        assert_eq!(request.header_value("accept"), Some("application/json"));
    }

    #[test]
    fn caller_bypass_header_survives_defaults() {
        let request = RequestDescriptor::get("/x").header("Cache-Control", "no-store");
        let request = interceptor().before_send(request);
        assert_eq!(request.header_value("cache-control"), Some("no-store"));
        assert_eq!(request.header_value("accept"), Some("application/json"));
    }

    #[test]
    fn caller_bypass_header_survives_bypass_set() {
        let request = RequestDescriptor::get("/x")
            .header("cache-control", "no-store")
            .bypass_cache();
        let request = interceptor().before_send(request);
        assert_eq!(request.header_value("cache-control"), Some("no-store"));
        // Names the caller left alone still get the bypass values.
        assert_eq!(request.header_value("pragma"), Some("no-cache"));
    }

    #[test]
    fn buster_skips_normal_requests_when_off() {
        let buster = CacheBuster::new("_t", false);
        let request = buster.before_send(RequestDescriptor::get("/x"));
        assert!(request.param_value("_t").is_none());
    }

    #[test]
    fn buster_marks_bypass_requests() {
        let buster = CacheBuster::new("_t", false);
        let request = buster.before_send(RequestDescriptor::get("/x").bypass_cache());
        assert!(request.param_value("_t").is_some());
    }

    #[test]
    fn buster_values_are_unique() {
        let buster = CacheBuster::new("_t", true);
        let a = buster.before_send(RequestDescriptor::get("/x"));
        let b = buster.before_send(RequestDescriptor::get("/x"));
        assert_ne!(a.param_value("_t"), b.param_value("_t"));
    }

    #[test]
    fn buster_replaces_instead_of_appending() {
        let buster = CacheBuster::new("_t", true);
        let request = buster.before_send(RequestDescriptor::get("/x").param("page", 1));
        let request = buster.before_send(request);
        let count = request.params.iter().filter(|(k, _)| k == "_t").count();
        assert_eq!(count, 1);
        assert_eq!(request.param_value("page"), Some("1"));
    }
}
