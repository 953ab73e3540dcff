//! Request/response interceptor pipeline.
//!
//! Every call through [`ApiClient`](crate::ApiClient) passes through the
//! same [`Pipeline`], composed once when the client is built:
//!
//! 1. **Pre-send**: an ordered list of [`RequestInterceptor`]s, each a
//!    transform `descriptor -> descriptor`. Built-ins run first:
//!    [`DefaultHeaders`], then [`CacheBuster`]; caller-supplied
//!    interceptors follow in registration order.
//! 2. **Post-receive**: every completed attempt (success or failure) is
//!    shown to each [`ResponseObserver`] ([`DiagnosticLog`] first), then
//!    the [`RetryPolicy`] decides whether to resubmit.
//!
//! Interceptors may add headers or query parameters. They never change the
//! meaning of a successful result.

mod diagnostics;
mod interceptors;
pub mod retry;

pub use diagnostics::{DiagnosticLog, summarize_keys};
pub use interceptors::{CacheBuster, DefaultHeaders};
pub use retry::{RetryConfig, RetryDecision, RetryPhase, RetryPolicy, RetryState};

use std::sync::Arc;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::transport::Outcome;
use crate::types::RequestDescriptor;

/// Pre-send transform applied to every outbound request.
pub trait RequestInterceptor: Send + Sync {
    fn before_send(&self, request: RequestDescriptor) -> RequestDescriptor;
}

impl<F> RequestInterceptor for F
where
    F: Fn(RequestDescriptor) -> RequestDescriptor + Send + Sync,
{
    fn before_send(&self, request: RequestDescriptor) -> RequestDescriptor {
        self(request)
    }
}

/// Post-receive hook called once per completed attempt.
pub trait ResponseObserver: Send + Sync {
    fn after_receive(&self, request: &RequestDescriptor, outcome: &Outcome, elapsed: Duration);
}

impl<F> ResponseObserver for F
where
    F: Fn(&RequestDescriptor, &Outcome, Duration) + Send + Sync,
{
    fn after_receive(&self, request: &RequestDescriptor, outcome: &Outcome, elapsed: Duration) {
        self(request, outcome, elapsed)
    }
}

/// Ordered interceptors, observers and the retry policy.
pub struct Pipeline {
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
    observers: Vec<Arc<dyn ResponseObserver>>,
    retry: RetryPolicy,
}

impl Pipeline {
    /// Pipeline with the built-in stages for the given configuration.
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            interceptors: vec![
                Arc::new(DefaultHeaders::new(
                    &config.default_headers,
                    &config.bypass_headers,
                )),
                Arc::new(CacheBuster::new(
                    config.cache_bust_param.clone(),
                    config.cache_busting,
                )),
            ],
            observers: vec![Arc::new(DiagnosticLog)],
            retry: RetryPolicy::new(config.retry.clone()),
        }
    }

    /// Append a pre-send interceptor after the existing ones.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Append a post-receive observer after the existing ones.
    pub fn with_observer(mut self, observer: Arc<dyn ResponseObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Run every pre-send interceptor in order.
    pub fn before_send(&self, request: RequestDescriptor) -> RequestDescriptor {
        self.interceptors
            .iter()
            .fold(request, |request, interceptor| interceptor.before_send(request))
    }

    /// Show the attempt to every observer, then let the retry policy decide.
    pub fn after_receive(
        &self,
        request: &mut RequestDescriptor,
        outcome: &Outcome,
        elapsed: Duration,
    ) -> RetryDecision {
        for observer in &self.observers {
            observer.after_receive(request, outcome, elapsed);
        }
        self.retry.decide(&mut request.retry, outcome)
    }
}
