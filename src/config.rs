//! Client configuration.
//!
//! [`ClientConfig`] is built once, handed to the client builder and never
//! mutated afterwards. It can be assembled in code or loaded from a TOML
//! file ([`FileConfig`]) with the following resolution order:
//!
//! 1. explicit path (CLI `--config`), which must exist
//! 2. `$MEDEX_CONFIG`
//! 3. `~/.medex/config.toml`
//! 4. built-in defaults
//!
//! `MEDEX_API_URL`, when set, overrides the base URL from any source.
//!
//! ```toml
//! base_url = "https://extract.example.org"
//! timeout_ms = 15000
//! cache_ttl_secs = 10
//! max_retries = 2
//! retry_delay_ms = 500
//! cache_busting = false
//!
//! [headers]
//! x-client = "dashboard"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::pipeline::RetryConfig;
use crate::{MedexError, Result};

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "MEDEX_CONFIG";

/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV_VAR: &str = "MEDEX_API_URL";

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_CACHE_BUST_PARAM: &str = "_t";

/// Process-wide client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL. Default: `http://localhost:8000`.
    pub base_url: String,
    /// Per-call deadline. Default: 30s.
    pub timeout: Duration,
    /// Response cache time-to-live. Default: 30s.
    pub cache_ttl: Duration,
    /// Retry policy for timed-out calls.
    pub retry: RetryConfig,
    /// Headers applied to every call.
    pub default_headers: BTreeMap<String, String>,
    /// Headers applied to bypass calls; they win over `default_headers`.
    pub bypass_headers: BTreeMap<String, String>,
    /// Add the cache-busting parameter to every call, not only bypass calls.
    pub cache_busting: bool,
    /// Name of the cache-busting query parameter. Default: `_t`.
    pub cache_bust_param: String,
}

fn header_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

fn default_headers() -> BTreeMap<String, String> {
    header_map(&[
        ("accept", "application/json"),
        ("content-type", "application/json"),
    ])
}

fn default_bypass_headers() -> BTreeMap<String, String> {
    header_map(&[
        ("cache-control", "no-cache, no-store, must-revalidate"),
        ("pragma", "no-cache"),
        ("expires", "0"),
    ])
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            cache_ttl: Duration::from_secs(30),
            retry: RetryConfig::default(),
            default_headers: default_headers(),
            bypass_headers: default_bypass_headers(),
            cache_busting: false,
            cache_bust_param: DEFAULT_CACHE_BUST_PARAM.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn default_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.default_headers
            .insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn bypass_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.bypass_headers
            .insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn cache_busting(mut self, enabled: bool) -> Self {
        self.cache_busting = enabled;
        self
    }

    pub fn cache_bust_param(mut self, name: impl Into<String>) -> Self {
        self.cache_bust_param = name.into();
        self
    }

    /// Load from the standard locations, then apply `MEDEX_API_URL`.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let config = FileConfig::load(explicit_path)?.into_client_config();
        Ok(config.with_base_url_override(std::env::var(BASE_URL_ENV_VAR).ok()))
    }

    /// Replace the base URL when an override is present and non-empty.
    pub fn with_base_url_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url;
        }
        self
    }

    /// Reject configurations the client cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(MedexError::Configuration(format!(
                "base URL must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(MedexError::Configuration(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        if self.cache_bust_param.trim().is_empty() {
            return Err(MedexError::Configuration(
                "cache-busting parameter name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// On-disk configuration. Every field is optional; missing fields keep
/// the [`ClientConfig`] defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub cache_ttl_secs: Option<u64>,
    #[serde(default)]
    pub max_retries: Option<u32>,
    #[serde(default)]
    pub retry_delay_ms: Option<u64>,
    #[serde(default)]
    pub cache_busting: Option<bool>,
    #[serde(default)]
    pub cache_bust_param: Option<String>,
    /// Added to (or replacing same-named) default headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Replaces the default bypass header set when present.
    #[serde(default)]
    pub bypass_headers: Option<BTreeMap<String, String>>,
}

impl FileConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| MedexError::Configuration(format!("Failed to parse config: {e}")))
    }

    /// Load from the standard locations; defaults when no file is found.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MedexError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            MedexError::Configuration(msg) => {
                MedexError::Configuration(format!("{msg} (in {path:?})"))
            }
            other => other,
        })
    }

    /// Resolve the config file path, if any.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(MedexError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from) {
            if path.exists() {
                return Ok(Some(path));
            }
            return Err(MedexError::Configuration(format!(
                "Config file from {CONFIG_ENV_VAR} not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".medex").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        Ok(None)
    }

    /// Apply the file's settings on top of the defaults.
    pub fn into_client_config(self) -> ClientConfig {
        let mut config = ClientConfig::default();
        if let Some(url) = self.base_url {
            config.base_url = url;
        }
        if let Some(ms) = self.timeout_ms {
            config.timeout = Duration::from_millis(ms);
        }
        if let Some(secs) = self.cache_ttl_secs {
            config.cache_ttl = Duration::from_secs(secs);
        }
        if let Some(n) = self.max_retries {
            config.retry.max_retries = n;
        }
        if let Some(ms) = self.retry_delay_ms {
            config.retry.delay = Duration::from_millis(ms);
        }
        if let Some(enabled) = self.cache_busting {
            config.cache_busting = enabled;
        }
        if let Some(param) = self.cache_bust_param {
            config.cache_bust_param = param;
        }
        for (name, value) in self.headers {
            config = config.default_header(&name, value);
        }
        if let Some(bypass) = self.bypass_headers {
            config.bypass_headers = bypass
                .into_iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), value))
                .collect();
        }
        config
    }
}
