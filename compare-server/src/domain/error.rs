//! Route-level error taxonomy.
//!
//! Every variant here is recoverable: the comparison substitutes an
//! "unavailable" slot for the affected mode and carries on with the other.

/// Why a trip for one travel mode could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// The provider returned an empty result set.
    #[error("no route found")]
    NoRouteFound,

    /// The provider returned a route with required fields missing.
    #[error("malformed route: {0}")]
    MalformedRoute(String),

    /// The upstream call did not answer within the configured timeout.
    #[error("upstream timed out")]
    UpstreamTimeout,

    /// The upstream call failed for any other reason.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// No credential is configured for a required upstream.
    #[error("not configured: {0}")]
    ConfigurationMissing(&'static str),
}

impl RouteError {
    /// Shorthand for a malformed-route error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        RouteError::MalformedRoute(reason.into())
    }
}
