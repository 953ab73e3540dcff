//! Extraction jobs.

use futures_util::future::try_join_all;
use serde_json::Value;

use super::segment;
use crate::cache::CacheKey;
use crate::types::{ActiveJobs, CacheMode, RequestDescriptor};
use crate::{ApiClient, Result};

/// Job listing, status and lifecycle commands.
pub struct Jobs<'a> {
    client: &'a ApiClient,
}

impl<'a> Jobs<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// One page of jobs.
    pub async fn list(&self, page: u32, per_page: u32, mode: CacheMode) -> Result<Value> {
        let key = CacheKey::new("jobs-list")
            .param("page", page)
            .param("perPage", per_page);
        let request = RequestDescriptor::get("/api/jobs")
            .param("page", page)
            .param("per_page", per_page)
            .cache_mode(mode);
        self.client.cached(key, request).await
    }

    /// Jobs currently running, keyed by job id.
    pub async fn active(&self, mode: CacheMode) -> Result<ActiveJobs> {
        let request = RequestDescriptor::get("/api/jobs/active").cache_mode(mode);
        self.client
            .cached_as(CacheKey::new("jobs-active"), request)
            .await
    }

    pub async fn get(&self, id: &str, mode: CacheMode) -> Result<Value> {
        let id = segment("job id", id)?;
        let request = RequestDescriptor::get(format!("/api/jobs/{id}")).cache_mode(mode);
        self.client
            .cached(CacheKey::new("jobs-get").param("id", id), request)
            .await
    }

    pub async fn status(&self, id: &str, mode: CacheMode) -> Result<Value> {
        let id = segment("job id", id)?;
        let request = RequestDescriptor::get(format!("/api/jobs/{id}/status")).cache_mode(mode);
        self.client
            .cached(CacheKey::new("jobs-status").param("id", id), request)
            .await
    }

    /// Status of several jobs, fetched concurrently, in input order.
    ///
    /// Fails with the first error; each id is cached independently.
    pub async fn statuses<S: AsRef<str>>(&self, ids: &[S], mode: CacheMode) -> Result<Vec<Value>> {
        try_join_all(ids.iter().map(|id| self.status(id.as_ref(), mode))).await
    }

    /// Submit a new extraction job.
    pub async fn create(&self, body: Value) -> Result<Value> {
        self.client
            .fetch(RequestDescriptor::post("/api/jobs").json(body))
            .await
    }

    /// Tell a job waiting on a manual portal login that the login is done.
    pub async fn confirm_login(&self, id: &str) -> Result<Value> {
        self.command(id, "confirm-login").await
    }

    pub async fn retry(&self, id: &str) -> Result<Value> {
        self.command(id, "retry").await
    }

    pub async fn cancel(&self, id: &str) -> Result<Value> {
        self.command(id, "cancel").await
    }

    pub async fn delete(&self, id: &str) -> Result<Value> {
        let id = segment("job id", id)?;
        self.client
            .fetch(RequestDescriptor::delete(format!("/api/jobs/{id}")))
            .await
    }

    async fn command(&self, id: &str, action: &str) -> Result<Value> {
        let id = segment("job id", id)?;
        self.client
            .fetch(RequestDescriptor::post(format!("/api/jobs/{id}/{action}")))
            .await
    }
}
