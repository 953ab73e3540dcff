//! Resource façades, one per backend area.
//!
//! Façades are the only code that touches the response cache. Reads that are
//! safe to reuse go through the client's cached path under a deterministic
//! [`CacheKey`](crate::cache::CacheKey); mutations go straight through
//! [`ApiClient::fetch`](crate::ApiClient::fetch) and never read or populate
//! the cache.

mod adapters;
mod admin;
mod jobs;
mod live_inspector;
mod portal_inspector;
mod realtime;

pub use adapters::Adapters;
pub use admin::Admin;
pub use jobs::Jobs;
pub use live_inspector::LiveInspector;
pub use portal_inspector::PortalInspector;
pub use realtime::Realtime;

use crate::{MedexError, Result};

/// Validate a caller-supplied path segment (job id, adapter name, ...).
pub(crate) fn segment<'a>(kind: &str, value: &'a str) -> Result<&'a str> {
    if value.is_empty() {
        return Err(MedexError::InvalidInput(format!("{kind} must not be empty")));
    }
    if value.contains(['/', '?', '#']) {
        return Err(MedexError::InvalidInput(format!(
            "{kind} '{value}' is not a valid path segment"
        )));
    }
    Ok(value)
}
