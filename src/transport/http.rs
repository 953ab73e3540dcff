//! `reqwest`-backed transport.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::{Outcome, Transport, TransportError};
use crate::types::{RequestDescriptor, Response};
use crate::{MedexError, Result};

/// HTTP transport over a shared `reqwest` connection pool.
///
/// Resolves relative paths against `base_url`, applies the descriptor's
/// timeout to the whole call and parses the body as JSON.
#[derive(Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| MedexError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a transport around an existing `reqwest` client.
    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn resolve(&self, path: &str) -> String {
        resolve_url(&self.base_url, path)
    }
}

/// Join a base URL and a path, leaving absolute URLs untouched.
fn resolve_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_owned();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Classify a `reqwest` failure into the transport taxonomy.
fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Connection(err.to_string())
    }
}

/// Parse a response body: empty → `Null`, JSON → value, anything else → string.
fn parse_body(text: String) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &RequestDescriptor) -> Outcome {
        let mut builder = self
            .http
            .request(request.method.clone(), self.resolve(&request.path))
            .timeout(request.timeout);

        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(classify)?;

        let status = response.status();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_owned(), v.to_owned()))
            })
            .collect();
        let body = parse_body(response.text().await.map_err(classify)?);

        if !status.is_success() {
            return Err(TransportError::Status {
                code: status.as_u16(),
                body,
            });
        }

        Ok(Response {
            status: status.as_u16(),
            headers,
            body,
        })
    }
}
