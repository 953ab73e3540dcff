//! Backend response

use std::collections::BTreeMap;

use serde_json::Value;

/// A successful (2xx) backend response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    /// Header names are lower-case.
    pub headers: BTreeMap<String, String>,
    /// Parsed JSON body; `Null` when empty, `String` when not JSON.
    pub body: Value,
}

impl Response {
    /// A `200 OK` response with the given body and no headers.
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            headers: BTreeMap::new(),
            body,
        }
    }
}
