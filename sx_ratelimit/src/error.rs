use std::fmt;

/// Result type for rate limiting operations
pub type Result<T> = std::result::Result<T, RateLimitError>;

/// Errors that can occur during rate limiting operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitError {
    /// No tokens available right now
    Exceeded,

    /// The wait for a token was cancelled before one became available
    Cancelled,

    /// Invalid configuration
    InvalidConfig(&'static str),
}

impl fmt::Display for RateLimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateLimitError::Exceeded => write!(f, "Rate limit exceeded"),
            RateLimitError::Cancelled => write!(f, "Rate limit wait cancelled"),
            RateLimitError::InvalidConfig(msg) => write!(f, "Invalid rate limiter configuration: {}", msg),
        }
    }
}

impl std::error::Error for RateLimitError {}
