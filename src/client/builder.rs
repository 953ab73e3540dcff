//! Builder for configuring client instances

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::ApiClient;
use crate::Result;
use crate::cache::{Clock, ResponseCache, SystemClock};
use crate::config::ClientConfig;
use crate::pipeline::{Pipeline, RequestInterceptor, ResponseObserver, RetryConfig};
use crate::transport::{HttpTransport, Transport};

/// Builder for [`ApiClient`].
///
/// ```rust
/// # use medex_client::{ApiClient, RetryConfig};
/// # use std::time::Duration;
/// let client = ApiClient::builder()
///     .base_url("http://localhost:8000")
///     .cache_ttl(Duration::from_secs(10))
///     .retry(RetryConfig::new().max_retries(2))
///     .build()
///     .unwrap();
/// assert_eq!(client.config().retry.max_retries, 2);
/// ```
pub struct ApiClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    clock: Option<Arc<dyn Clock>>,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
    observers: Vec<Arc<dyn ResponseObserver>>,
}

impl ApiClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            transport: None,
            clock: None,
            interceptors: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Per-call deadline for every request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache_ttl = ttl;
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    /// Add the cache-busting parameter to every request.
    pub fn cache_busting(mut self, enabled: bool) -> Self {
        self.config.cache_busting = enabled;
        self
    }

    pub fn default_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.config = self.config.default_header(name, value);
        self
    }

    pub fn bypass_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.config = self.config.bypass_header(name, value);
        self
    }

    /// Use a custom transport instead of [`HttpTransport`].
    pub fn transport(self, transport: impl Transport + 'static) -> Self {
        self.shared_transport(Arc::new(transport))
    }

    /// Use a shared custom transport (keep a handle for inspection).
    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Time source for cache expiry (default: [`SystemClock`]).
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Append a pre-send interceptor; runs after the built-in ones.
    pub fn interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Append a post-receive observer; runs after diagnostic logging.
    pub fn observer(mut self, observer: impl ResponseObserver + 'static) -> Self {
        self.observers.push(Arc::new(observer));
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ApiClient> {
        self.config.validate()?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(self.config.base_url.clone())?),
        };

        let pipeline = self
            .interceptors
            .into_iter()
            .fold(Pipeline::new(&self.config), Pipeline::with_interceptor);
        let pipeline = self
            .observers
            .into_iter()
            .fold(pipeline, Pipeline::with_observer);

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let cache = ResponseCache::with_clock(self.config.cache_ttl, clock);
        cache.clear();

        debug!(
            base_url = %self.config.base_url,
            timeout_ms = self.config.timeout.as_millis() as u64,
            cache_ttl_ms = self.config.cache_ttl.as_millis() as u64,
            max_retries = self.config.retry.max_retries,
            "api client ready"
        );

        Ok(ApiClient::from_parts(self.config, transport, pipeline, cache))
    }
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
