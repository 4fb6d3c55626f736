//! Error types for HubSeek
//!
//! Every failure the directory client can produce, plus the few local
//! failures of the terminal front-end.

use thiserror::Error;

/// Main error type for HubSeek operations
#[derive(Error, Debug)]
pub enum HubSeekError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Directory API returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Directory API rate limit exceeded (HTTP {status})")]
    RateLimited { status: u16, reset_at: Option<u64> },

    #[error("Malformed directory response: {0}")]
    Decode(String),

    #[error("Invalid API endpoint '{0}'")]
    InvalidEndpoint(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("Could not open browser: {0}")]
    Browser(String),

    #[error("Request abandoned")]
    Cancelled,
}

/// Result type alias for HubSeek operations
pub type Result<T> = std::result::Result<T, HubSeekError>;

impl HubSeekError {
    /// Build the error for a non-success response.
    ///
    /// GitHub signals an exhausted quota with 403 or 429 and
    /// `x-ratelimit-remaining: 0`; a bare 429 is always a rate limit.
    pub fn from_status(
        status: u16,
        remaining: Option<&str>,
        reset_at: Option<&str>,
        body: &str,
    ) -> Self {
        let exhausted = remaining.map(str::trim) == Some("0");
        if status == 429 || (status == 403 && exhausted) {
            return HubSeekError::RateLimited {
                status,
                reset_at: reset_at.and_then(|r| r.trim().parse().ok()),
            };
        }

        HubSeekError::Status {
            status,
            message: extract_message(body),
        }
    }

    /// Check if this error came from the API's rate limiter
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, HubSeekError::RateLimited { .. })
    }
}

/// Pull the `message` field out of a GitHub error body, falling back to the raw text.
fn extract_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: String,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.message,
        Err(_) => body.trim().chars().take(200).collect(),
    }
}
