//! medex-client - API access layer for the medical data extraction dashboard
//!
//! Every call to the extraction backend goes through one [`ApiClient`]:
//! a pre-send interceptor pipeline (default headers, cache busting), a
//! timeout-only retry policy, and a process-lifetime TTL cache used by the
//! resource façades for side-effect-free reads.
//!
//! # Example
//!
//! ```rust,no_run
//! use medex_client::{ApiClient, CacheMode};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> medex_client::Result<()> {
//!     let client = ApiClient::builder()
//!         .base_url("http://localhost:8000")
//!         .cache_ttl(Duration::from_secs(10))
//!         .build()?;
//!
//!     let active = client.jobs().active(CacheMode::Use).await?;
//!     println!("{} active jobs", active.count());
//!
//!     // Force a fresh read past every cache.
//!     let page = client.jobs().list(1, 20, CacheMode::Bypass).await?;
//!     println!("{page}");
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod resources;
pub mod telemetry;
pub mod transport;
pub mod types;

// Re-export main types at crate root
pub use client::{ApiClient, ApiClientBuilder};
pub use config::{ClientConfig, FileConfig};
pub use error::{MedexError, Result};
pub use pipeline::{RequestInterceptor, ResponseObserver, RetryConfig};
pub use transport::{HttpTransport, Transport, TransportError};
pub use types::{ActiveJobs, CacheMode, DependentJobs, JobSummary, RequestDescriptor, Response};

pub use reqwest::Method;
