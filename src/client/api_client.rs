//! ApiClient - the single entry point every feature module calls through

use std::sync::Arc;
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{CacheKey, ResponseCache};
use crate::config::ClientConfig;
use crate::pipeline::{Pipeline, RetryDecision};
use crate::resources::{Adapters, Admin, Jobs, LiveInspector, PortalInspector, Realtime};
use crate::telemetry;
use crate::transport::{Outcome, Transport, TransportError};
use crate::types::{RequestDescriptor, Response};
use crate::{MedexError, Result};

use super::ApiClientBuilder;

/// Backend client shared by every resource façade.
///
/// Cheap to clone; clones share the transport, pipeline and cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    pipeline: Pipeline,
    cache: ResponseCache,
}

impl ApiClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::new()
    }

    pub(crate) fn from_parts(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        pipeline: Pipeline,
        cache: ResponseCache,
    ) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                config,
                transport,
                pipeline,
                cache,
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.inner.cache
    }

    /// Drop every cached response, forcing the next reads to the network.
    pub fn clear_cache(&self) {
        debug!("clearing response cache");
        self.inner.cache.clear();
    }

    // ===== Resource façades =====

    pub fn jobs(&self) -> Jobs<'_> {
        Jobs::new(self)
    }

    pub fn adapters(&self) -> Adapters<'_> {
        Adapters::new(self)
    }

    pub fn admin(&self) -> Admin<'_> {
        Admin::new(self)
    }

    pub fn portal_inspector(&self) -> PortalInspector<'_> {
        PortalInspector::new(self)
    }

    pub fn live_inspector(&self) -> LiveInspector<'_> {
        LiveInspector::new(self)
    }

    pub fn realtime(&self) -> Realtime<'_> {
        Realtime::new(self)
    }

    // ===== Calls =====

    /// Send a request through the pipeline, retrying timeouts per policy.
    ///
    /// Never touches the response cache.
    pub async fn send(&self, request: RequestDescriptor) -> Result<Response> {
        let mut request = self.prepare(request);
        loop {
            let started = Instant::now();
            let outcome = self.attempt(&request).await;
            let elapsed = started.elapsed();

            let method = request.method.to_string();
            let status = if outcome.is_ok() { "ok" } else { "error" };
            metrics::counter!(telemetry::REQUESTS_TOTAL,
                "method" => method.clone(),
                "status" => status,
            )
            .increment(1);
            metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS, "method" => method.clone())
                .record(elapsed.as_secs_f64());

            match self
                .inner
                .pipeline
                .after_receive(&mut request, &outcome, elapsed)
            {
                RetryDecision::Retry { delay } => {
                    metrics::counter!(telemetry::RETRIES_TOTAL, "method" => method).increment(1);
                    warn!(
                        method = %request.method,
                        path = %request.path,
                        retry = request.retry.attempts + 1,
                        max_retries = request.retry.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "retrying after timeout"
                    );
                    tokio::time::sleep(delay).await;
                    self.inner
                        .pipeline
                        .retry_policy()
                        .resubmit(&mut request.retry);
                }
                RetryDecision::Resolve => {
                    return outcome.map_err(|err| {
                        MedexError::from_transport(err, &request.method, &request.path)
                    });
                }
            }
        }
    }

    /// [`send`](Self::send) and return only the body.
    pub async fn fetch(&self, request: RequestDescriptor) -> Result<Value> {
        Ok(self.send(request).await?.body)
    }

    /// Stamp process-wide settings and run the pre-send interceptors.
    fn prepare(&self, mut request: RequestDescriptor) -> RequestDescriptor {
        request.timeout = self.inner.config.timeout;
        request.retry = self.inner.pipeline.retry_policy().initial_state();
        self.inner.pipeline.before_send(request)
    }

    /// One network attempt raced against the request deadline.
    async fn attempt(&self, request: &RequestDescriptor) -> Outcome {
        match tokio::time::timeout(request.timeout, self.inner.transport.send(request)).await {
            Ok(outcome) => outcome,
            Err(_elapsed) => Err(TransportError::Timeout),
        }
    }

    // ===== Façade helpers =====

    /// Cache-eligible read returning the raw body.
    pub(crate) async fn cached(&self, key: CacheKey, request: RequestDescriptor) -> Result<Value> {
        self.cached_as(key, request).await
    }

    /// Cache-eligible read decoded into `T`.
    ///
    /// Hit → cached body, no network. Miss → fetch, decode, and store only
    /// once the body decodes. A bypass request neither reads nor writes the
    /// cache.
    pub(crate) async fn cached_as<T: DeserializeOwned>(
        &self,
        key: CacheKey,
        request: RequestDescriptor,
    ) -> Result<T> {
        let bypass = request.is_bypass();
        if !bypass {
            if let Some(value) = self.inner.cache.get(&key) {
                return Ok(serde_json::from_value(value)?);
            }
        }

        let value = self.fetch(request).await?;
        let decoded = serde_json::from_value(value.clone())?;
        if !bypass {
            self.inner.cache.put(&key, value);
        }
        Ok(decoded)
    }

    /// Fetch where `404 Not Found` means "absent" rather than failure.
    ///
    /// Every other failure propagates unchanged.
    pub(crate) async fn fetch_optional(&self, request: RequestDescriptor) -> Result<Option<Value>> {
        match self.fetch(request).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_not_found() => {
                debug!(path = err.path().unwrap_or_default(), "resource absent (404)");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
