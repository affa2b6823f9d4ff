//! Authentication support.
//!
//! Sign-in itself is delegated to the hosting backend; this module only
//! provides the failed-attempt limiter that guards it.

mod rate_limiter;

pub use rate_limiter::{RateLimitPolicy, RateLimiter};
