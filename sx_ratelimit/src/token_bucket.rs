use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::RateLimitError;
use crate::error::Result;
use crate::limiter::RateLimiter;
use crate::time::TimeSource;

/// Token bucket rate limiter using lock-free atomic operations
///
/// The bucket starts full. Every acquisition takes tokens out, and tokens flow
/// back in continuously at `rate` per second up to `capacity`. This allows an
/// instantaneous burst of `capacity` calls followed by a sustained rate of
/// `rate` calls per second.
pub struct TokenBucket {
    /// Current number of available tokens (scaled by TOKEN_SCALE)
    tokens: AtomicU64,

    /// Last refill timestamp in nanoseconds
    last_refill: AtomicU64,

    /// Maximum number of tokens (capacity)
    capacity: u32,

    /// Refill rate in tokens per second, as configured
    rate: f64,

    /// Scaled tokens generated per nanosecond (scaled by RATE_SCALE)
    rate_per_nano: u64,

    /// Time source for consistent time measurements
    time_source: TimeSource,
}

// Scaling factors for fixed-point arithmetic to maintain precision
const TOKEN_SCALE: u64 = 1000;
const RATE_SCALE: u64 = 1_000_000_000;

// Floor for a single sleep while waiting on the bucket, avoids spinning under contention
const MIN_WAIT: Duration = Duration::from_millis(1);

impl TokenBucket {
    /// Create a new token bucket
    ///
    /// # Panics
    /// Panics if capacity is zero or the rate is not a positive finite number.
    /// Use [`TokenBucket::builder`] for fallible construction.
    pub fn new(capacity: u32, rate: f64) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");
        assert!(rate.is_finite() && rate > 0.0, "Rate must be greater than 0");

        let time_source = TimeSource::new();
        let now = time_source.now_nanos();

        // rate_per_nano = (rate * RATE_SCALE * TOKEN_SCALE) / 1_000_000_000
        // so that (elapsed * rate_per_nano) / RATE_SCALE is in TOKEN_SCALE units
        let rate_per_nano = Self::scaled_rate(rate).max(1);

        Self {
            tokens: AtomicU64::new(capacity as u64 * TOKEN_SCALE),
            last_refill: AtomicU64::new(now),
            capacity,
            rate,
            rate_per_nano,
            time_source,
        }
    }

    /// Create a builder for configuring a token bucket
    pub fn builder() -> TokenBucketBuilder {
        TokenBucketBuilder::new()
    }

    /// Configured refill rate in tokens per second
    pub fn rate_per_second(&self) -> f64 {
        self.rate
    }

    #[inline]
    fn scaled_rate(rate: f64) -> u64 {
        ((rate * RATE_SCALE as f64 * TOKEN_SCALE as f64) / 1_000_000_000.0) as u64
    }

    /// Add the tokens earned since the last refill, capped at capacity
    #[inline(always)]
    fn refill(&self) {
        let now = self.time_source.now_nanos();
        let last = self.last_refill.load(Ordering::Relaxed);

        let elapsed = now.saturating_sub(last);
        if elapsed == 0 {
            return;
        }

        let tokens_to_add_scaled = (elapsed as u128 * self.rate_per_nano as u128 / RATE_SCALE as u128).min(u64::MAX as u128) as u64;
        if tokens_to_add_scaled == 0 {
            return;
        }

        // Advance only by the time converted into tokens; the remainder carries over to the next refill
        let consumed = (tokens_to_add_scaled as u128 * RATE_SCALE as u128).div_ceil(self.rate_per_nano as u128).min(elapsed as u128) as u64;

        // Whoever moves the timestamp owns the right to add tokens
        if self.last_refill.compare_exchange(last, last + consumed, Ordering::Release, Ordering::Relaxed).is_ok() {
            let capacity_scaled = self.capacity as u64 * TOKEN_SCALE;

            loop {
                let current = self.tokens.load(Ordering::Acquire);
                let new_tokens = current.saturating_add(tokens_to_add_scaled).min(capacity_scaled);

                if current == new_tokens {
                    break;
                }

                match self.tokens.compare_exchange_weak(current, new_tokens, Ordering::Release, Ordering::Relaxed) {
                    Ok(_) => break,
                    Err(_) => continue,
                }
            }
        }
    }

    /// Estimated time until `required_scaled` tokens are in the bucket
    fn wait_hint(&self, required_scaled: u64) -> Duration {
        let current = self.tokens.load(Ordering::Acquire);
        let deficit = required_scaled.saturating_sub(current);

        let nanos = (deficit as u128 * RATE_SCALE as u128).div_ceil(self.rate_per_nano as u128);
        Duration::from_nanos(nanos.min(u64::MAX as u128) as u64).max(MIN_WAIT)
    }
}

impl RateLimiter for TokenBucket {
    #[inline]
    fn try_acquire(&self, weight: u32) -> Result<()> {
        if weight == 0 {
            return Ok(());
        }

        self.refill();

        let required_tokens = weight as u64 * TOKEN_SCALE;

        loop {
            let current = self.tokens.load(Ordering::Acquire);

            if current < required_tokens {
                return Err(RateLimitError::Exceeded);
            }

            match self.tokens.compare_exchange_weak(current, current - required_tokens, Ordering::Release, Ordering::Relaxed) {
                Ok(_) => return Ok(()),
                Err(_) => continue,
            }
        }
    }

    fn acquire<'a>(&'a self, weight: u32, cancel: &'a CancellationToken) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            if weight > self.capacity {
                return Err(RateLimitError::InvalidConfig("weight exceeds bucket capacity"));
            }

            loop {
                if cancel.is_cancelled() {
                    return Err(RateLimitError::Cancelled);
                }

                match self.try_acquire(weight) {
                    Ok(()) => return Ok(()),
                    Err(_) => {
                        let wait = self.wait_hint(weight as u64 * TOKEN_SCALE);

                        tokio::select! {
                            biased;
                            _ = cancel.cancelled() => return Err(RateLimitError::Cancelled),
                            _ = tokio::time::sleep(wait) => {}
                        }
                    }
                }
            }
        })
    }

    fn available(&self) -> u32 {
        self.refill();
        (self.tokens.load(Ordering::Relaxed) / TOKEN_SCALE) as u32
    }

    fn capacity(&self) -> u32 {
        self.capacity
    }

    fn reset(&self) {
        let now = self.time_source.now_nanos();
        self.tokens.store(self.capacity as u64 * TOKEN_SCALE, Ordering::Release);
        self.last_refill.store(now, Ordering::Release);
    }
}

/// Builder for configuring a token bucket
pub struct TokenBucketBuilder {
    capacity: Option<u32>,
    rate: Option<f64>,
}

impl TokenBucketBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self { capacity: None, rate: None }
    }

    /// Set the bucket capacity (max burst)
    pub fn capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Set the refill rate in tokens per second
    pub fn rate_per_second(mut self, rate: f64) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Set one token every `interval`
    pub fn every(mut self, interval: Duration) -> Self {
        self.rate = Some(1.0 / interval.as_secs_f64());
        self
    }

    /// Build the token bucket, validating the configuration
    pub fn build(self) -> Result<TokenBucket> {
        let capacity = self.capacity.ok_or(RateLimitError::InvalidConfig("capacity must be set"))?;
        let rate = self.rate.ok_or(RateLimitError::InvalidConfig("rate must be set"))?;

        if capacity == 0 {
            return Err(RateLimitError::InvalidConfig("capacity must be greater than 0"));
        }
        if !rate.is_finite() || rate <= 0.0 {
            return Err(RateLimitError::InvalidConfig("rate must be a positive number"));
        }
        if TokenBucket::scaled_rate(rate) == 0 {
            return Err(RateLimitError::InvalidConfig("rate is too small to represent"));
        }

        Ok(TokenBucket::new(capacity, rate))
    }
}

impl Default for TokenBucketBuilder {
    fn default() -> Self {
        Self::new()
    }
}
