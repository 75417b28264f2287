//! File-backed directions provider for running without API access.
//!
//! Loads one saved directions response per travel mode and serves it
//! for any origin and destination.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::compare::{RouteProvider, RouteQuery};
use crate::domain::{RouteError, TravelMode, Trip};

use super::client::parse_response;
use super::convert::normalize;
use super::error::DirectionsError;
use super::types::DirectionsResponse;

/// Mock directions client that serves responses from JSON files.
#[derive(Debug, Clone)]
pub struct MockDirectionsClient {
    /// Saved responses, keyed by mode.
    responses: Arc<HashMap<TravelMode, DirectionsResponse>>,
}

impl MockDirectionsClient {
    /// Load mock responses from a directory.
    ///
    /// Expects files named after the provider mode (`driving.json`,
    /// `transit.json`). A missing file means that mode has no route.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, DirectionsError> {
        let data_dir = data_dir.as_ref();
        let mut responses = HashMap::new();

        for mode in [TravelMode::Auto, TravelMode::Transit] {
            let path = data_dir.join(format!("{}.json", mode.provider_name()));
            if !path.is_file() {
                continue;
            }

            let json = std::fs::read_to_string(&path)
                .map_err(|e| DirectionsError::Mock(format!("failed to read {path:?}: {e}")))?;
            let response = parse_response(&json)?;
            responses.insert(mode, response);
        }

        if responses.is_empty() {
            return Err(DirectionsError::Mock(format!(
                "no mock direction files found in {data_dir:?}"
            )));
        }

        Ok(Self {
            responses: Arc::new(responses),
        })
    }

    /// Modes for which a response was loaded.
    pub fn modes(&self) -> Vec<TravelMode> {
        let mut modes: Vec<_> = self.responses.keys().copied().collect();
        modes.sort_by_key(|m| m.provider_name());
        modes
    }
}

impl RouteProvider for MockDirectionsClient {
    async fn fetch_route(&self, query: &RouteQuery) -> Result<Trip, RouteError> {
        debug!(mode = %query.mode, "serving mock directions");
        let response = self
            .responses
            .get(&query.mode)
            .ok_or(RouteError::NoRouteFound)?;
        normalize(response, query.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRIVING: &str = include_str!("../../testdata/directions/driving.json");

    fn query(mode: TravelMode) -> RouteQuery {
        RouteQuery {
            origin: "Zürich".into(),
            destination: "Bern".into(),
            mode,
            departure_epoch: 1_710_486_000,
            language: "de".into(),
        }
    }

    #[tokio::test]
    async fn serves_loaded_mode() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("driving.json"), DRIVING).unwrap();

        let mock = MockDirectionsClient::new(dir.path()).unwrap();
        assert_eq!(mock.modes(), vec![TravelMode::Auto]);

        let trip = mock.fetch_route(&query(TravelMode::Auto)).await.unwrap();
        assert_eq!(trip.mode(), TravelMode::Auto);
        assert!(!trip.steps().is_empty());
    }

    #[tokio::test]
    async fn missing_mode_is_no_route() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("driving.json"), DRIVING).unwrap();

        let mock = MockDirectionsClient::new(dir.path()).unwrap();
        let err = mock.fetch_route(&query(TravelMode::Transit)).await.unwrap_err();
        assert_eq!(err, RouteError::NoRouteFound);
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            MockDirectionsClient::new(dir.path()),
            Err(DirectionsError::Mock(_))
        ));
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("transit.json"), "{").unwrap();
        assert!(matches!(
            MockDirectionsClient::new(dir.path()),
            Err(DirectionsError::Json { .. })
        ));
    }
}
