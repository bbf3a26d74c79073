use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

use crate::error::Result;

/// Core trait for rate limiting implementations
///
/// Implementations must be safe to share between concurrent callers: the
/// token count is the single point of truth for every caller holding the
/// same limiter.
pub trait RateLimiter: Send + Sync {
    /// Try to acquire `weight` tokens without blocking
    fn try_acquire(&self, weight: u32) -> Result<()>;

    /// Try to acquire a single token without blocking
    fn try_acquire_one(&self) -> Result<()> {
        self.try_acquire(1)
    }

    /// Wait until `weight` tokens are available, then take them
    ///
    /// Fails with [`RateLimitError::Cancelled`](crate::RateLimitError::Cancelled)
    /// if `cancel` fires first, in which case no token is consumed.
    fn acquire<'a>(&'a self, weight: u32, cancel: &'a CancellationToken) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

    /// Wait for a single token
    fn acquire_one<'a>(&'a self, cancel: &'a CancellationToken) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        self.acquire(1, cancel)
    }

    /// Get the number of currently available tokens
    fn available(&self) -> u32;

    /// Get the maximum capacity
    fn capacity(&self) -> u32;

    /// Reset the rate limiter to a full bucket
    fn reset(&self);
}
