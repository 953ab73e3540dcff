//! Cache key derivation.

use std::fmt::{self, Display, Write};

/// Deterministic cache key: operation name followed by ordered
/// `name=value` parameters, joined by `-`.
///
/// ```rust
/// # use medex_client::cache::CacheKey;
/// let key = CacheKey::new("jobs-list").param("page", 1).param("perPage", 20);
/// assert_eq!(key.as_str(), "jobs-list-page=1-perPage=20");
/// assert_eq!(key.operation(), "jobs-list");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    operation: &'static str,
    key: String,
}

impl CacheKey {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            key: operation.to_owned(),
        }
    }

    pub fn param(mut self, name: &str, value: impl Display) -> Self {
        // Writing to a String cannot fail.
        let _ = write!(self.key, "-{name}={value}");
        self
    }

    /// Operation name, used as the metrics label.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}
