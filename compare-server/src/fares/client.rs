//! Timetable fare lookup client.

use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use super::error::FareError;
use crate::compare::FareLookup;

/// Default base URL for the connections API.
const DEFAULT_BASE_URL: &str = "https://transport.opendata.ch/v1/connections";

/// Connections response; only the fare of the first connection matters.
#[derive(Debug, Deserialize)]
pub struct ConnectionsResponse {
    #[serde(default)]
    pub connections: Vec<ConnectionDto>,
}

/// A single connection.
#[derive(Debug, Deserialize)]
pub struct ConnectionDto {
    /// Number or numeric string, depending on the backend.
    pub fare: Option<serde_json::Value>,
}

/// Configuration for the fare client.
#[derive(Debug, Clone)]
pub struct FareClientConfig {
    /// Endpoint URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl FareClientConfig {
    /// Create a config with the default endpoint.
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Client for the connections API.
#[derive(Debug, Clone)]
pub struct FareClient {
    http: reqwest::Client,
    base_url: String,
}

impl FareClient {
    /// Create a new fare client.
    pub fn new(config: FareClientConfig) -> Result<Self, FareError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Look up the fare of the first connection departing at `date`/`time`.
    pub async fn fetch_fare(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<f64, FareError> {
        let date = date.format("%Y-%m-%d").to_string();
        let time = time.format("%H:%M").to_string();

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("from", origin),
                ("to", destination),
                ("date", date.as_str()),
                ("time", time.as_str()),
                ("limit", "1"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FareError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        parse_fare(&body)
    }
}

/// Extract the first connection's fare from a response body.
pub(crate) fn parse_fare(body: &str) -> Result<f64, FareError> {
    let response: ConnectionsResponse =
        serde_json::from_str(body).map_err(|e| FareError::Json {
            message: e.to_string(),
        })?;

    let first = response
        .connections
        .into_iter()
        .next()
        .ok_or(FareError::NoConnection)?;

    let fare: f64 = match first.fare {
        Some(serde_json::Value::Number(n)) => n.as_f64().ok_or(FareError::NoFare)?,
        Some(serde_json::Value::String(s)) => s.trim().parse().map_err(|_| FareError::NoFare)?,
        _ => return Err(FareError::NoFare),
    };

    if fare.is_finite() && fare >= 0.0 {
        Ok(fare)
    } else {
        Err(FareError::NoFare)
    }
}

impl FareLookup for FareClient {
    async fn lookup_fare(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<f64, FareError> {
        self.fetch_fare(origin, destination, date, time).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = FareClientConfig::new(8);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 8);
    }

    #[test]
    fn numeric_fare() {
        let body = r#"{"connections": [{"fare": 52.0}, {"fare": 10.0}]}"#;
        assert_eq!(parse_fare(body).unwrap(), 52.0);
    }

    #[test]
    fn string_fare() {
        let body = r#"{"connections": [{"fare": " 17.40 "}]}"#;
        assert_eq!(parse_fare(body).unwrap(), 17.40);
    }

    #[test]
    fn missing_fare() {
        let body = r#"{"connections": [{"from": {}}]}"#;
        assert!(matches!(parse_fare(body), Err(FareError::NoFare)));

        let body = r#"{"connections": [{"fare": null}]}"#;
        assert!(matches!(parse_fare(body), Err(FareError::NoFare)));
    }

    #[test]
    fn no_connections() {
        assert!(matches!(
            parse_fare(r#"{"connections": []}"#),
            Err(FareError::NoConnection)
        ));
        assert!(matches!(parse_fare("{}"), Err(FareError::NoConnection)));
    }

    #[test]
    fn negative_fare_is_unusable() {
        let body = r#"{"connections": [{"fare": -3}]}"#;
        assert!(matches!(parse_fare(body), Err(FareError::NoFare)));
    }

    #[test]
    fn invalid_json() {
        assert!(matches!(parse_fare("<html>"), Err(FareError::Json { .. })));
    }
}
