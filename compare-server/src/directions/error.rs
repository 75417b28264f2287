//! Directions client error types.

use crate::domain::RouteError;

/// Errors from the directions HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum DirectionsError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: String, message: String },

    /// The API key was rejected
    #[error("request denied: {0}")]
    Unauthorized(String),

    /// Rate limited by the API
    #[error("rate limited by directions API")]
    RateLimited,

    /// Failed to read mock data
    #[error("mock data error: {0}")]
    Mock(String),
}

impl From<DirectionsError> for RouteError {
    fn from(err: DirectionsError) -> Self {
        match err {
            DirectionsError::Http(e) if e.is_timeout() => RouteError::UpstreamTimeout,
            DirectionsError::Json { message, .. } => RouteError::MalformedRoute(message),
            other => RouteError::Upstream(other.to_string()),
        }
    }
}
