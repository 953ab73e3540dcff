//! Portal inspector: analyse a portal's pages before writing an adapter.

use serde_json::Value;

use super::segment;
use crate::cache::CacheKey;
use crate::types::{CacheMode, RequestDescriptor};
use crate::{ApiClient, Result};

pub struct PortalInspector<'a> {
    client: &'a ApiClient,
}

impl<'a> PortalInspector<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn portals(&self, mode: CacheMode) -> Result<Value> {
        let request = RequestDescriptor::get("/api/portal-inspector/portals").cache_mode(mode);
        self.client
            .cached(CacheKey::new("portal-inspector-portals"), request)
            .await
    }

    pub async fn session(&self, id: &str, mode: CacheMode) -> Result<Value> {
        let id = segment("session id", id)?;
        let request =
            RequestDescriptor::get(format!("/api/portal-inspector/sessions/{id}")).cache_mode(mode);
        self.client
            .cached(
                CacheKey::new("portal-inspector-session").param("id", id),
                request,
            )
            .await
    }

    /// Start an inspection; the response carries the new session id.
    pub async fn inspect(&self, body: Value) -> Result<Value> {
        self.client
            .fetch(RequestDescriptor::post("/api/portal-inspector/inspect").json(body))
            .await
    }

    pub async fn close_session(&self, id: &str) -> Result<Value> {
        let id = segment("session id", id)?;
        self.client
            .fetch(RequestDescriptor::delete(format!(
                "/api/portal-inspector/sessions/{id}"
            )))
            .await
    }
}
