//! Caching subsystem.
//!
//! - [`ResponseCache`]: process-lifetime TTL cache for side-effect-free
//!   reads, consulted only by the resource façades. See [`response`] module
//!   docs for expiry and concurrency notes.
//! - [`CacheKey`]: deterministic key derived from operation name and
//!   ordered parameters.
//! - [`Clock`]: injected time source; [`ManualClock`] makes expiry
//!   testable without sleeping.

mod clock;
mod key;
pub mod response;

pub use clock::{Clock, ManualClock, SystemClock};
pub use key::CacheKey;
pub use response::ResponseCache;
