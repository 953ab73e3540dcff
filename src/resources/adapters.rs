//! Portal adapters.

use serde_json::Value;

use super::segment;
use crate::cache::CacheKey;
use crate::types::{CacheMode, DependentJobs, RequestDescriptor};
use crate::{ApiClient, Result};

/// Adapter registry: listing, lookup, diagnostics and edits.
pub struct Adapters<'a> {
    client: &'a ApiClient,
}

impl<'a> Adapters<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, mode: CacheMode) -> Result<Value> {
        let request = RequestDescriptor::get("/api/adapters").cache_mode(mode);
        self.client
            .cached(CacheKey::new("adapters-list"), request)
            .await
    }

    pub async fn get(&self, name: &str, mode: CacheMode) -> Result<Value> {
        let name = segment("adapter name", name)?;
        let request = RequestDescriptor::get(format!("/api/adapters/{name}")).cache_mode(mode);
        self.client
            .cached(CacheKey::new("adapters-get").param("name", name), request)
            .await
    }

    /// Whether the adapter's source file is present on the backend.
    ///
    /// A `404` means "no file" and yields `false`; other failures propagate.
    /// A body without an `exists` flag counts as present.
    pub async fn file_exists(&self, name: &str) -> Result<bool> {
        let name = segment("adapter name", name)?;
        let request = RequestDescriptor::get(format!("/api/adapters/{name}/file"));
        Ok(match self.client.fetch_optional(request).await? {
            Some(body) => body.get("exists").and_then(Value::as_bool).unwrap_or(true),
            None => false,
        })
    }

    /// Jobs that still reference the adapter. A `404` yields an empty list.
    pub async fn dependent_jobs(&self, name: &str) -> Result<DependentJobs> {
        let name = segment("adapter name", name)?;
        let request = RequestDescriptor::get(format!("/api/adapters/{name}/dependent-jobs"));
        match self.client.fetch_optional(request).await? {
            Some(body) => Ok(serde_json::from_value(body)?),
            None => Ok(DependentJobs::default()),
        }
    }

    pub async fn create(&self, body: Value) -> Result<Value> {
        self.client
            .fetch(RequestDescriptor::post("/api/adapters").json(body))
            .await
    }

    pub async fn update(&self, name: &str, body: Value) -> Result<Value> {
        let name = segment("adapter name", name)?;
        self.client
            .fetch(RequestDescriptor::put(format!("/api/adapters/{name}")).json(body))
            .await
    }

    pub async fn delete(&self, name: &str) -> Result<Value> {
        let name = segment("adapter name", name)?;
        self.client
            .fetch(RequestDescriptor::delete(format!("/api/adapters/{name}")))
            .await
    }
}
