//! Realtime dashboard feed.

use serde_json::Value;

use crate::cache::CacheKey;
use crate::types::{CacheMode, RequestDescriptor};
use crate::{ApiClient, Result};

pub struct Realtime<'a> {
    client: &'a ApiClient,
}

impl<'a> Realtime<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn snapshot(&self, mode: CacheMode) -> Result<Value> {
        let request = RequestDescriptor::get("/api/realtime/snapshot").cache_mode(mode);
        self.client
            .cached(CacheKey::new("realtime-snapshot"), request)
            .await
    }

    pub async fn queue(&self, mode: CacheMode) -> Result<Value> {
        let request = RequestDescriptor::get("/api/realtime/queue").cache_mode(mode);
        self.client
            .cached(CacheKey::new("realtime-queue"), request)
            .await
    }

    /// Events after sequence number `since` (all buffered events if `None`).
    ///
    /// Never cached: every poll must reach the backend.
    pub async fn events(&self, since: Option<u64>) -> Result<Value> {
        let mut request = RequestDescriptor::get("/api/realtime/events");
        if let Some(since) = since {
            request = request.param("since", since);
        }
        self.client.fetch(request).await
    }
}
