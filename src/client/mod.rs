//! The API client and its builder.
//!
//! [`ApiClient`] composes transport, pipeline, retry policy and response
//! cache. Feature code reaches the backend only through its resource
//! façades ([`ApiClient::jobs`], [`ApiClient::adapters`], ...).

mod api_client;
mod builder;

pub use api_client::ApiClient;
pub use builder::ApiClientBuilder;
