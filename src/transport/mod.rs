//! Transport boundary: a single HTTP call, no policy.
//!
//! [`Transport`] is the seam between the client and the network. The
//! client decides everything else (headers, deadlines, retries, caching);
//! a transport only performs one call and classifies its failure.

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use serde_json::Value;

use crate::types::{RequestDescriptor, Response};

/// Typed failure raised by a [`Transport`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// No response arrived within the call's deadline.
    #[error("request timed out")]
    Timeout,

    /// The call never produced a response (refused, reset, DNS, TLS...).
    #[error("connection error: {0}")]
    Connection(String),

    /// The backend answered with a non-2xx status.
    #[error("HTTP status {code}")]
    Status { code: u16, body: Value },
}

impl TransportError {
    /// Whether this is a client-side timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout)
    }

    /// Status code, for [`TransportError::Status`].
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Outcome of one attempt, as seen by post-receive observers.
pub type Outcome = std::result::Result<Response, TransportError>;

/// Performs one HTTP call described by a [`RequestDescriptor`].
///
/// Implementations must not retry and must not cache. The descriptor's
/// `path` is either absolute (`http://...`) or relative to the
/// implementation's base URL.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RequestDescriptor) -> Outcome;
}
