//! Live inspector: watch and steer a running job's browser session.

use serde_json::Value;

use super::segment;
use crate::cache::CacheKey;
use crate::types::{CacheMode, RequestDescriptor};
use crate::{ApiClient, Result};

pub struct LiveInspector<'a> {
    client: &'a ApiClient,
}

impl<'a> LiveInspector<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn sessions(&self, mode: CacheMode) -> Result<Value> {
        let request = RequestDescriptor::get("/api/live-inspector/sessions").cache_mode(mode);
        self.client
            .cached(CacheKey::new("live-inspector-sessions"), request)
            .await
    }

    pub async fn state(&self, job_id: &str, mode: CacheMode) -> Result<Value> {
        let job_id = segment("job id", job_id)?;
        let request =
            RequestDescriptor::get(format!("/api/live-inspector/{job_id}/state")).cache_mode(mode);
        self.client
            .cached(
                CacheKey::new("live-inspector-state").param("job", job_id),
                request,
            )
            .await
    }

    /// Current screenshot. Always fetched fresh.
    pub async fn screenshot(&self, job_id: &str) -> Result<Value> {
        let job_id = segment("job id", job_id)?;
        self.client
            .fetch(
                RequestDescriptor::get(format!("/api/live-inspector/{job_id}/screenshot"))
                    .bypass_cache(),
            )
            .await
    }

    /// Forward a browser command (click, type, navigate, ...) to the job.
    pub async fn send_command(&self, job_id: &str, body: Value) -> Result<Value> {
        let job_id = segment("job id", job_id)?;
        self.client
            .fetch(RequestDescriptor::post(format!("/api/live-inspector/{job_id}/command")).json(body))
            .await
    }
}
