//! Directions HTTP client.

use std::time::Duration;

use tracing::debug;

use crate::domain::{RouteError, Trip};

use super::convert::normalize;
use super::error::DirectionsError;
use super::types::DirectionsResponse;
use crate::compare::{RouteProvider, RouteQuery};

/// Default base URL for the directions API.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 8;

/// Configuration for the directions client.
#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// Endpoint URL (defaults to the production API)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DirectionsConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Directions API client.
#[derive(Debug, Clone)]
pub struct DirectionsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl DirectionsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: DirectionsConfig) -> Result<Self, DirectionsError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
        })
    }

    /// Fetch the raw directions response for a query.
    ///
    /// `ZERO_RESULTS` and `NOT_FOUND` are not errors here; they come back
    /// as a response with no routes, which normalisation reports as
    /// `NoRouteFound`.
    pub async fn get_directions(
        &self,
        query: &RouteQuery,
    ) -> Result<DirectionsResponse, DirectionsError> {
        let departure_time = query.departure_epoch.to_string();
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("origin", query.origin.as_str()),
                ("destination", query.destination.as_str()),
                ("mode", query.mode.provider_name()),
                ("departure_time", departure_time.as_str()),
                ("language", query.language.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectionsError::Api {
                status: status.as_u16().to_string(),
                message: body,
            });
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}

/// Parse a response body and map provider status codes to errors.
pub(crate) fn parse_response(body: &str) -> Result<DirectionsResponse, DirectionsError> {
    let parsed: DirectionsResponse =
        serde_json::from_str(body).map_err(|e| DirectionsError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })?;

    match parsed.status.as_str() {
        "OK" | "ZERO_RESULTS" | "NOT_FOUND" => Ok(parsed),
        "REQUEST_DENIED" => Err(DirectionsError::Unauthorized(
            parsed.error_message.unwrap_or_default(),
        )),
        "OVER_QUERY_LIMIT" => Err(DirectionsError::RateLimited),
        _ => Err(DirectionsError::Api {
            message: parsed.error_message.clone().unwrap_or_default(),
            status: parsed.status,
        }),
    }
}

impl RouteProvider for DirectionsClient {
    async fn fetch_route(&self, query: &RouteQuery) -> Result<Trip, RouteError> {
        debug!(mode = %query.mode, origin = %query.origin, destination = %query.destination, "fetching directions");
        let response = self.get_directions(query).await?;
        normalize(&response, query.mode)
    }
}
