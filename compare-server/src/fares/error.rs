//! Fare lookup error types.

/// Errors from the fare lookup service.
#[derive(Debug, thiserror::Error)]
pub enum FareError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The response had no connection
    #[error("no connection in response")]
    NoConnection,

    /// The first connection carried no usable fare
    #[error("no usable fare in response")]
    NoFare,
}

impl FareError {
    /// Whether the lookup failed because it ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FareError::Http(e) if e.is_timeout())
    }
}
