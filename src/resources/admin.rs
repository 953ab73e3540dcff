//! Administration endpoints.

use serde_json::Value;
use tracing::info;

use super::segment;
use crate::cache::CacheKey;
use crate::types::{CacheMode, RequestDescriptor};
use crate::{ApiClient, Result};

pub struct Admin<'a> {
    client: &'a ApiClient,
}

impl<'a> Admin<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn stats(&self, mode: CacheMode) -> Result<Value> {
        let request = RequestDescriptor::get("/api/admin/stats").cache_mode(mode);
        self.client
            .cached(CacheKey::new("admin-stats"), request)
            .await
    }

    pub async fn workers(&self, mode: CacheMode) -> Result<Value> {
        let request = RequestDescriptor::get("/api/admin/workers").cache_mode(mode);
        self.client
            .cached(CacheKey::new("admin-workers"), request)
            .await
    }

    pub async fn restart_worker(&self, id: &str) -> Result<Value> {
        let id = segment("worker id", id)?;
        self.client
            .fetch(RequestDescriptor::post(format!(
                "/api/admin/workers/{id}/restart"
            )))
            .await
    }

    /// Delete finished jobs on the backend.
    ///
    /// Every cached listing may now be stale, so the whole cache is cleared
    /// once the purge succeeds.
    pub async fn purge_finished_jobs(&self) -> Result<Value> {
        let body = self
            .client
            .fetch(RequestDescriptor::post("/api/admin/jobs/purge"))
            .await?;
        info!("finished jobs purged, clearing response cache");
        self.client.clear_cache();
        Ok(body)
    }
}
