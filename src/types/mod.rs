//! Public types for the medex client API.

mod job;
mod request;
mod response;

pub use job::{ActiveJobs, DependentJobs, JobSummary};
pub use request::{CacheMode, RequestDescriptor};
pub use response::Response;
