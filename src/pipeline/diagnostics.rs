//! Structured diagnostic logging of completed attempts.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use super::ResponseObserver;
use crate::transport::{Outcome, TransportError};
use crate::types::RequestDescriptor;

/// Number of top-level keys listed before truncating.
const MAX_LOGGED_KEYS: usize = 8;

/// Logs method, path, status and a summary of the payload's top-level keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagnosticLog;

impl ResponseObserver for DiagnosticLog {
    fn after_receive(&self, request: &RequestDescriptor, outcome: &Outcome, elapsed: Duration) {
        let elapsed_ms = elapsed.as_millis() as u64;
        let attempt = request.retry.attempts;
        match outcome {
            Ok(response) => debug!(
                method = %request.method,
                path = %request.path,
                status = response.status,
                attempt,
                elapsed_ms,
                keys = %summarize_keys(&response.body),
                "response received"
            ),
            Err(TransportError::Status { code, body }) => warn!(
                method = %request.method,
                path = %request.path,
                status = *code,
                attempt,
                elapsed_ms,
                keys = %summarize_keys(body),
                "error status received"
            ),
            Err(err) => warn!(
                method = %request.method,
                path = %request.path,
                attempt,
                elapsed_ms,
                error = %err,
                "request failed"
            ),
        }
    }
}

/// One-line summary of a payload's shape.
pub fn summarize_keys(body: &Value) -> String {
    match body {
        Value::Object(map) => {
            let mut summary = map
                .keys()
                .take(MAX_LOGGED_KEYS)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(",");
            if map.len() > MAX_LOGGED_KEYS {
                summary.push_str(&format!(",+{} more", map.len() - MAX_LOGGED_KEYS));
            }
            format!("{{{summary}}}")
        }
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Null => "empty".to_owned(),
        Value::String(_) => "text".to_owned(),
        Value::Bool(_) | Value::Number(_) => "scalar".to_owned(),
    }
}
