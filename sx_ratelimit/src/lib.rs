pub mod error;
pub mod limiter;
pub mod presets;
mod time;
pub mod token_bucket;

pub use error::RateLimitError;
pub use error::Result;
pub use limiter::RateLimiter;
pub use token_bucket::TokenBucket;
pub use token_bucket::TokenBucketBuilder;
pub use tokio_util::sync::CancellationToken;
