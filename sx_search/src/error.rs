use sx_http::HttpError;
use sx_ratelimit::RateLimitError;
use thiserror::Error;

/// Terminal failure of a search run; no partial ranking accompanies it
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Rate limit wait cancelled before a call slot became available")]
    RateLimitCancelled,

    #[error("Rate limiter error: {0}")]
    RateLimiter(RateLimitError),

    #[error("Transport error on page {page}: {source}")]
    Transport { page: u32, source: HttpError },

    #[error("Decode error on page {page}: {source}")]
    Decode { page: u32, source: HttpError },
}

impl SearchError {
    /// Classify a fetch failure for `page`
    pub fn from_fetch(page: u32, source: HttpError) -> Self {
        if source.is_decode() {
            SearchError::Decode { page, source }
        } else {
            SearchError::Transport { page, source }
        }
    }
}

impl From<RateLimitError> for SearchError {
    fn from(err: RateLimitError) -> Self {
        match err {
            RateLimitError::Cancelled => SearchError::RateLimitCancelled,
            other => SearchError::RateLimiter(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
