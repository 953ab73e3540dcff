//! Retry configuration and the per-request retry state machine.
//!
//! Only client-side timeouts are retried. A received error status or a
//! connection failure is not known to be transient and is surfaced on the
//! first occurrence.
//!
//! ```text
//!            timeout, attempts < max          wait(delay), attempts += 1
//!  Initial ─────────────────────────▶ Retrying ─────────────────────────▶ Initial
//!     │  timeout, attempts == max
//!     ├─────────────────────────────▶ Exhausted   (last timeout surfaced)
//!     │  success / any other failure
//!     └─────────────────────────────▶ Resolved
//! ```
//!
//! The state lives on the [`RequestDescriptor`](crate::types::RequestDescriptor),
//! so concurrent calls never share a counter.

use std::time::Duration;

use crate::transport::{Outcome, TransportError};

/// Configuration for retrying timed-out requests.
///
/// ```rust
/// # use medex_client::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_retries(5)
///     .delay(Duration::from_millis(200));
/// assert_eq!(config.max_retries, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retries after the initial request.
    /// 0 = no retry. Default: 3.
    pub max_retries: u32,
    /// Fixed pause before each retry. Default: 1s.
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config that disables retries (single attempt).
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Set the maximum number of retries.
    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Set the pause before each retry.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Where a request is in its retry lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPhase {
    /// About to be (re)sent.
    Initial,
    /// Timed out with retries left; waiting for the retry delay.
    Retrying,
    /// Timed out with no retries left.
    Exhausted,
    /// Finished with a success or a non-retryable failure.
    Resolved,
}

/// Retry bookkeeping carried on each request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    /// Retries performed so far.
    pub attempts: u32,
    pub max_retries: u32,
    pub phase: RetryPhase,
}

impl RetryState {
    pub fn new(max_retries: u32) -> Self {
        Self {
            attempts: 0,
            max_retries,
            phase: RetryPhase::Initial,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.max_retries.saturating_sub(self.attempts)
    }
}

/// What the client should do with a completed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait `delay`, then resubmit the same request.
    Retry { delay: Duration },
    /// Hand the outcome to the caller.
    Resolve,
}

/// Drives [`RetryState`] transitions.
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Fresh state for a new request.
    pub fn initial_state(&self) -> RetryState {
        RetryState::new(self.config.max_retries)
    }

    /// Transition on a completed attempt.
    pub fn decide(&self, state: &mut RetryState, outcome: &Outcome) -> RetryDecision {
        match outcome {
            Ok(_) => {
                state.phase = RetryPhase::Resolved;
                RetryDecision::Resolve
            }
            Err(err) => self.on_failure(state, err),
        }
    }

    fn on_failure(&self, state: &mut RetryState, err: &TransportError) -> RetryDecision {
        if !err.is_timeout() {
            state.phase = RetryPhase::Resolved;
            return RetryDecision::Resolve;
        }
        if state.attempts < state.max_retries {
            state.phase = RetryPhase::Retrying;
            RetryDecision::Retry {
                delay: self.config.delay,
            }
        } else {
            state.phase = RetryPhase::Exhausted;
            RetryDecision::Resolve
        }
    }

    /// `Retrying → Initial`: count the retry, ready to resend.
    pub fn resubmit(&self, state: &mut RetryState) {
        state.attempts += 1;
        state.phase = RetryPhase::Initial;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Response;
    use serde_json::Value;

    fn policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new(
            RetryConfig::new()
                .max_retries(max_retries)
                .delay(Duration::from_millis(5)),
        )
    }

    #[test]
    fn config_defaults() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.delay, Duration::from_secs(1));
        assert_eq!(RetryConfig::disabled().max_retries, 0);
    }

    #[test]
    fn timeout_retries_until_exhausted() {
        let policy = policy(2);
        let mut state = policy.initial_state();
        let timeout: Outcome = Err(TransportError::Timeout);

        for expected_attempts in 1..=2 {
            assert_eq!(
                policy.decide(&mut state, &timeout),
                RetryDecision::Retry {
                    delay: Duration::from_millis(5)
                }
            );
            assert_eq!(state.phase, RetryPhase::Retrying);
            policy.resubmit(&mut state);
            assert_eq!(state.attempts, expected_attempts);
            assert_eq!(state.phase, RetryPhase::Initial);
        }

        assert_eq!(policy.decide(&mut state, &timeout), RetryDecision::Resolve);
        assert_eq!(state.phase, RetryPhase::Exhausted);
        assert_eq!(state.remaining(), 0);
    }

    #[test]
    fn status_error_resolves_immediately() {
        let policy = policy(3);
        let mut state = policy.initial_state();
        let outcome: Outcome = Err(TransportError::Status {
            code: 503,
            body: Value::Null,
        });
        assert_eq!(policy.decide(&mut state, &outcome), RetryDecision::Resolve);
        assert_eq!(state.phase, RetryPhase::Resolved);
        assert_eq!(state.attempts, 0);
    }

    #[test]
    fn connection_error_resolves_immediately() {
        let policy = policy(3);
        let mut state = policy.initial_state();
        let outcome: Outcome = Err(TransportError::Connection("refused".into()));
        assert_eq!(policy.decide(&mut state, &outcome), RetryDecision::Resolve);
        assert_eq!(state.phase, RetryPhase::Resolved);
    }

    #[test]
    fn success_after_retry_resolves() {
        let policy = policy(3);
        let mut state = policy.initial_state();
        let _ = policy.decide(&mut state, &Err(TransportError::Timeout));
        policy.resubmit(&mut state);

        let ok: Outcome = Ok(Response::ok(Value::Null));
        assert_eq!(policy.decide(&mut state, &ok), RetryDecision::Resolve);
        assert_eq!(state.phase, RetryPhase::Resolved);
        assert_eq!(state.attempts, 1);
    }

    #[test]
    fn disabled_never_retries() {
        let policy = RetryPolicy::new(RetryConfig::disabled());
        let mut state = policy.initial_state();
        assert_eq!(
            policy.decide(&mut state, &Err(TransportError::Timeout)),
            RetryDecision::Resolve
        );
        assert_eq!(state.phase, RetryPhase::Exhausted);
    }
}
