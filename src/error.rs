//! medex-client error types

use reqwest::Method;
use serde_json::Value;

use crate::transport::TransportError;

/// Errors surfaced by [`ApiClient`](crate::ApiClient) and the resource façades.
///
/// Network failures keep their original kind and carry the method and path
/// of the request that produced them, so a UI can render a message without
/// reaching into transport internals.
#[derive(Debug, thiserror::Error)]
pub enum MedexError {
    // Network errors
    #[error("{method} {path} timed out")]
    Timeout { method: Method, path: String },

    #[error("{method} {path} connection failed: {message}")]
    Connection {
        method: Method,
        path: String,
        message: String,
    },

    #[error("{method} {path} returned HTTP {status}: {message}")]
    Status {
        status: u16,
        method: Method,
        path: String,
        message: String,
        /// Parsed error body as returned by the backend.
        body: Value,
    },

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl MedexError {
    /// Attach request context to a terminal transport failure.
    pub(crate) fn from_transport(err: TransportError, method: &Method, path: &str) -> Self {
        match err {
            TransportError::Timeout => MedexError::Timeout {
                method: method.clone(),
                path: path.to_owned(),
            },
            TransportError::Connection(message) => MedexError::Connection {
                method: method.clone(),
                path: path.to_owned(),
                message,
            },
            TransportError::Status { code, body } => MedexError::Status {
                status: code,
                method: method.clone(),
                path: path.to_owned(),
                message: error_message(code, &body),
                body,
            },
        }
    }

    /// HTTP status code, if the backend answered with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            MedexError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Path of the originating request, for network errors.
    pub fn path(&self) -> Option<&str> {
        match self {
            MedexError::Timeout { path, .. }
            | MedexError::Connection { path, .. }
            | MedexError::Status { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Method of the originating request, for network errors.
    pub fn method(&self) -> Option<&Method> {
        match self {
            MedexError::Timeout { method, .. }
            | MedexError::Connection { method, .. }
            | MedexError::Status { method, .. } => Some(method),
            _ => None,
        }
    }

    /// Whether the request ran out of time (after any retries).
    pub fn is_timeout(&self) -> bool {
        matches!(self, MedexError::Timeout { .. })
    }

    /// Whether the backend answered `404 Not Found`.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Pull a human-readable message out of a backend error body.
///
/// The backend reports failures as `{"detail": ...}`; `error` and `message`
/// fields are accepted too. A non-string field (such as a validation error
/// list) is rendered as JSON. Falls back to the bare status code.
fn error_message(code: u16, body: &Value) -> String {
    let field = ["detail", "error", "message"]
        .iter()
        .find_map(|name| match body.get(*name)? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        });
    match (field, body) {
        (Some(message), _) => message,
        (None, Value::String(text)) if !text.trim().is_empty() => text.trim().to_owned(),
        _ => format!("HTTP {code}"),
    }
}

/// Result type alias for medex-client operations
pub type Result<T> = std::result::Result<T, MedexError>;
