use thiserror::Error;

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error: HTTP {status} - {name} ({id}): {message}")]
    ApiError { status: u16, id: i64, name: String, message: String },

    #[error("Unexpected HTTP status {0}")]
    UnexpectedStatus(u16),

    #[error("Failed to read response body: {0}")]
    BodyRead(#[source] reqwest::Error),

    #[error("Failed to decompress response body: {0}")]
    Decompress(#[source] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

impl HttpError {
    /// True when the response arrived but its body could not be turned into a page
    pub fn is_decode(&self) -> bool {
        matches!(self, HttpError::Decompress(_) | HttpError::JsonError(_))
    }
}

pub type Result<T> = std::result::Result<T, HttpError>;
