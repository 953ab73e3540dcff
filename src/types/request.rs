//! Outbound request description

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::Method;
use serde_json::Value;

use crate::pipeline::RetryState;

/// Timeout used until the client stamps the configured one.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-call caching behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheMode {
    /// Read from the cache on cache-eligible operations, store fresh results.
    #[default]
    Use,
    /// Skip the cache lookup and the store, and defeat any external cache
    /// with bypass headers and a cache-busting query parameter.
    Bypass,
}

impl CacheMode {
    pub fn is_bypass(self) -> bool {
        self == CacheMode::Bypass
    }

    /// `Bypass` when `fresh` is true, `Use` otherwise.
    pub fn fresh(fresh: bool) -> Self {
        if fresh {
            CacheMode::Bypass
        } else {
            CacheMode::Use
        }
    }
}

/// Everything needed to perform one backend call.
///
/// Created per call and discarded once the call resolves. `timeout` and
/// `retry` are stamped by [`ApiClient`](crate::ApiClient) from the
/// process-wide configuration right before sending; the retry policy then
/// mutates `retry` in place on each re-attempt.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Absolute URL or path relative to the configured base URL.
    pub path: String,
    /// Query parameters, in order.
    pub params: Vec<(String, String)>,
    /// Header names are stored lower-case.
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
    pub timeout: Duration,
    pub cache_mode: CacheMode,
    pub retry: RetryState,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            headers: BTreeMap::new(),
            body: None,
            timeout: DEFAULT_TIMEOUT,
            cache_mode: CacheMode::Use,
            retry: RetryState::new(0),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    /// Set a query parameter, replacing every existing one with that name.
    pub fn set_param(&mut self, name: &str, value: impl ToString) {
        self.params.retain(|(existing, _)| existing != name);
        self.params.push((name.to_owned(), value.to_string()));
    }

    /// First value of a query parameter.
    pub fn param_value(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Header value, looked up case-insensitively.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn cache_mode(mut self, mode: CacheMode) -> Self {
        self.cache_mode = mode;
        self
    }

    /// Mark this call as a bypass request.
    pub fn bypass_cache(self) -> Self {
        self.cache_mode(CacheMode::Bypass)
    }

    pub fn is_bypass(&self) -> bool {
        self.cache_mode.is_bypass()
    }
}
