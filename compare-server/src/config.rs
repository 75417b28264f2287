//! Deployment configuration.
//!
//! Read once from the environment at startup and passed explicitly into
//! the application state.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::compare::FareSource;
use crate::costs::CostParams;

/// Environment variable holding the maps platform key.
pub const API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_TIMEOUT_SECS: u64 = 8;
const DEFAULT_FARE: f64 = 30.0;

/// Error returned when an environment variable has an unusable value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value {value:?} for {name}: {reason}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
    pub reason: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Key for directions and static maps; `None` means both are unavailable.
    pub api_key: Option<String>,

    /// Address the server listens on.
    pub bind_addr: SocketAddr,

    /// Directory served under `/static`.
    pub static_dir: String,

    /// Serve directions from saved JSON files in this directory.
    pub mock_dir: Option<PathBuf>,

    /// Where transit ticket prices come from.
    pub fare_source: FareSource,

    /// Timeout for every upstream call.
    pub upstream_timeout_secs: u64,

    /// Ticket price used when the fare lookup fails.
    pub default_fare: f64,

    /// Values the request form is pre-filled with.
    pub cost_defaults: CostParams,

    /// Language of route instructions.
    pub language: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            static_dir: DEFAULT_STATIC_DIR.to_string(),
            mock_dir: None,
            fare_source: FareSource::Linear,
            upstream_timeout_secs: DEFAULT_TIMEOUT_SECS,
            default_fare: DEFAULT_FARE,
            cost_defaults: default_cost_params(),
            language: "de".to_string(),
        }
    }
}

/// Form defaults: 0.75 CHF/km, 30 CHF/h, 2.80 CHF base fare, 0.31 CHF/km fare.
pub fn default_cost_params() -> CostParams {
    CostParams {
        per_km_rate: 0.75,
        hourly_wage: 30.0,
        base_fare: 2.80,
        per_km_fare: 0.31,
    }
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`; unset and blank values
    /// take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_value = get("COMPARE_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_value
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError {
                name: "COMPARE_BIND_ADDR",
                value: bind_value.clone(),
                reason: e.to_string(),
            })?;

        let fare_source = match get("COMPARE_FARE_SOURCE") {
            None => FareSource::Linear,
            Some(value) => parse_fare_source(&value).ok_or_else(|| ConfigError {
                name: "COMPARE_FARE_SOURCE",
                value,
                reason: "expected \"linear\" or \"lookup\"".to_string(),
            })?,
        };

        let upstream_timeout_secs = match get("COMPARE_UPSTREAM_TIMEOUT_SECS") {
            None => DEFAULT_TIMEOUT_SECS,
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError {
                        name: "COMPARE_UPSTREAM_TIMEOUT_SECS",
                        value,
                        reason: "expected a positive number of seconds".to_string(),
                    });
                }
            },
        };

        let default_fare = match get("COMPARE_DEFAULT_FARE") {
            None => DEFAULT_FARE,
            Some(value) => match value.trim().parse::<f64>() {
                Ok(fare) if fare.is_finite() && fare >= 0.0 => fare,
                _ => {
                    return Err(ConfigError {
                        name: "COMPARE_DEFAULT_FARE",
                        value,
                        reason: "expected a non-negative amount".to_string(),
                    });
                }
            },
        };

        Ok(Self {
            api_key: get(API_KEY_VAR),
            bind_addr,
            static_dir: get("COMPARE_STATIC_DIR")
                .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
            mock_dir: get("COMPARE_MOCK_DIR").map(PathBuf::from),
            fare_source,
            upstream_timeout_secs,
            default_fare,
            ..Self::default()
        })
    }
}

fn parse_fare_source(value: &str) -> Option<FareSource> {
    match value.trim().to_ascii_lowercase().as_str() {
        "linear" => Some(FareSource::Linear),
        "lookup" => Some(FareSource::Lookup),
        _ => None,
    }
}
