//! Directions provider client and route normalisation.
//!
//! The provider answers "how do I get from A to B by this mode, leaving
//! at this time" with a nested legs/steps graph. This module fetches
//! that graph and converts it into a canonical `Trip` at the boundary.

mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use client::{DirectionsClient, DirectionsConfig};
pub use convert::{normalize, normalize_route, strip_html};
pub use error::DirectionsError;
pub use mock::MockDirectionsClient;
pub use types::{DirectionsResponse, LegDto, RouteDto, StepDto, TransitDetailsDto};

use crate::compare::{RouteProvider, RouteQuery};
use crate::domain::{RouteError, Trip};

/// Where routes come from for this deployment.
#[derive(Debug, Clone)]
pub enum DirectionsSource {
    /// The live provider API.
    Live(DirectionsClient),
    /// Saved responses on disk.
    Mock(MockDirectionsClient),
    /// No credential configured; every fetch fails with
    /// `ConfigurationMissing`.
    Unconfigured,
}

impl DirectionsSource {
    /// Whether routes can be fetched at all.
    pub fn is_configured(&self) -> bool {
        !matches!(self, DirectionsSource::Unconfigured)
    }
}

impl RouteProvider for DirectionsSource {
    async fn fetch_route(&self, query: &RouteQuery) -> Result<Trip, RouteError> {
        match self {
            DirectionsSource::Live(client) => client.fetch_route(query).await,
            DirectionsSource::Mock(mock) => mock.fetch_route(query).await,
            DirectionsSource::Unconfigured => {
                Err(RouteError::ConfigurationMissing("GOOGLE_MAPS_API_KEY"))
            }
        }
    }
}
