//! Pre-configured rate limiters for public APIs
//!
//! Reference: https://api.stackexchange.com/docs/throttle

use crate::TokenBucket;

/// Burst allowance for Stack Exchange API calls
pub const STACK_EXCHANGE_BURST: u32 = 30;

/// Sustained Stack Exchange request rate (requests per second)
pub const STACK_EXCHANGE_RATE: f64 = 1.0;

/// Stack Exchange API limits
///
/// The API throttles clients sending more than 30 requests per second from a
/// single IP. We allow that as a burst and then settle at one request per
/// second.
pub fn stack_exchange() -> TokenBucket {
    TokenBucket::new(STACK_EXCHANGE_BURST, STACK_EXCHANGE_RATE)
}
