//! Data transfer objects for web requests and responses.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::compare::{Comparison, ComparisonRequest, FareQuote, FareSource};
use crate::config::AppConfig;
use crate::costs::{CostParams, InvalidCostParams};
use crate::domain::{Coordinate, CostBreakdown, Step, TransferEvent, TripSlot};

/// Query of a comparison request.
///
/// Numeric fields are strings because an empty form field arrives as
/// an empty string; blank values take the deployment defaults.
#[derive(Debug, Default, Deserialize)]
pub struct CompareQuery {
    /// Start address or place name
    pub origin: Option<String>,

    /// Destination address or place name
    pub destination: Option<String>,

    /// Travel date as YYYY-MM-DD (defaults to today)
    pub date: Option<String>,

    /// Departure time as HH:MM (defaults to now)
    pub time: Option<String>,

    /// CHF per hour of travel time
    pub hourly_wage: Option<String>,

    /// Car compensation in CHF per km
    pub per_km_rate: Option<String>,

    /// Transit flat fee in CHF
    pub base_fare: Option<String>,

    /// Transit fee in CHF per km
    pub per_km_fare: Option<String>,

    /// "linear" or "lookup" (defaults to the deployment setting)
    pub fare_source: Option<String>,
}

/// Why a comparison query was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("missing {0}")]
    Missing(&'static str),

    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid time {0:?}, expected HH:MM")]
    InvalidTime(String),

    #[error("invalid number {value:?} for {field}")]
    InvalidNumber { field: &'static str, value: String },

    #[error(transparent)]
    InvalidCost(#[from] InvalidCostParams),

    #[error("invalid fare source {0:?}, expected \"linear\" or \"lookup\"")]
    InvalidFareSource(String),
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Parse an amount, accepting a decimal comma.
fn amount(field: &'static str, value: &Option<String>, default: f64) -> Result<f64, QueryError> {
    let Some(raw) = non_blank(value) else {
        return Ok(default);
    };
    raw.replace(',', ".")
        .parse()
        .map_err(|_| QueryError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

impl CompareQuery {
    /// Validate the query into a comparison request.
    ///
    /// `now` supplies the date and time when the query leaves them out.
    pub fn into_request(
        self,
        config: &AppConfig,
        now: NaiveDateTime,
    ) -> Result<ComparisonRequest, QueryError> {
        let origin = non_blank(&self.origin)
            .ok_or(QueryError::Missing("origin"))?
            .to_string();
        let destination = non_blank(&self.destination)
            .ok_or(QueryError::Missing("destination"))?
            .to_string();

        let date = match non_blank(&self.date) {
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| QueryError::InvalidDate(raw.to_string()))?,
            None => now.date(),
        };
        let time = match non_blank(&self.time) {
            Some(raw) => NaiveTime::parse_from_str(raw, "%H:%M")
                .map_err(|_| QueryError::InvalidTime(raw.to_string()))?,
            None => now.time(),
        };

        let defaults = &config.cost_defaults;
        let params = CostParams::new(
            amount("per_km_rate", &self.per_km_rate, defaults.per_km_rate)?,
            amount("hourly_wage", &self.hourly_wage, defaults.hourly_wage)?,
            amount("base_fare", &self.base_fare, defaults.base_fare)?,
            amount("per_km_fare", &self.per_km_fare, defaults.per_km_fare)?,
        )?;

        let fare_source = match non_blank(&self.fare_source) {
            None => config.fare_source,
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "linear" => FareSource::Linear,
                "lookup" => FareSource::Lookup,
                _ => return Err(QueryError::InvalidFareSource(raw.to_string())),
            },
        };

        Ok(ComparisonRequest {
            origin,
            destination,
            date,
            time,
            params,
            fare_source,
            default_fare: config.default_fare,
            language: config.language.clone(),
        })
    }
}

/// Response of a comparison.
#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub origin: String,
    pub destination: String,

    /// Travel date as YYYY-MM-DD
    pub date: String,

    /// Departure time as HH:MM
    pub time: String,

    pub auto: TripResult,
    pub transit: TripResult,

    /// Transit itinerary, empty without transit steps
    pub transfers: Vec<TransferEvent>,

    /// Present when the ticket price came from the fare lookup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fare: Option<FareResult>,
}

/// One mode of a comparison.
#[derive(Debug, Serialize)]
pub struct TripResult {
    /// Whether a route was found
    pub available: bool,

    /// Why the route is unavailable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,

    /// Duration in whole minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_mins: Option<i64>,

    /// First point of the route
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Coordinate>,

    /// Last point of the route
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Coordinate>,

    /// Encoded polyline of the route
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoded_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub costs: Option<CostsResult>,

    pub steps: Vec<Step>,
}

/// Cost breakdown of one mode.
#[derive(Debug, Serialize)]
pub struct CostsResult {
    pub components: Vec<CostComponentResult>,

    /// Sum of the components in CHF
    pub total: f64,
}

/// One named cost component.
#[derive(Debug, Serialize)]
pub struct CostComponentResult {
    /// Machine-readable key, e.g. "wage_opportunity_cost"
    pub key: &'static str,

    /// Display label
    pub label: &'static str,

    /// Amount in CHF
    pub amount: f64,
}

/// Outcome of the fare lookup.
#[derive(Debug, Serialize)]
pub struct FareResult {
    /// Ticket price in CHF
    pub price: f64,

    /// Whether the default price was substituted
    pub is_default: bool,

    /// Why the lookup failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl CompareResponse {
    /// Create from a domain Comparison.
    pub fn from_comparison(comparison: &Comparison) -> Self {
        let request = &comparison.request;
        Self {
            origin: request.origin.clone(),
            destination: request.destination.clone(),
            date: request.date.format("%Y-%m-%d").to_string(),
            time: request.time.format("%H:%M").to_string(),
            auto: TripResult::from_slot(&comparison.auto, comparison.auto_costs.as_ref()),
            transit: TripResult::from_slot(&comparison.transit, comparison.transit_costs.as_ref()),
            transfers: comparison.transfers.clone(),
            fare: comparison.fare_quote.as_ref().map(FareResult::from_quote),
        }
    }
}

impl TripResult {
    /// Create from a trip slot and its costs.
    pub fn from_slot(slot: &TripSlot, costs: Option<&CostBreakdown>) -> Self {
        match slot {
            TripSlot::Available(trip) => Self {
                available: true,
                reason: None,
                distance_km: Some(trip.distance_km()),
                duration_mins: Some(trip.duration_minutes()),
                start: Some(trip.start()),
                end: Some(trip.end()),
                encoded_path: Some(trip.encoded_path().to_string()),
                costs: costs.map(CostsResult::from_breakdown),
                steps: trip.steps().to_vec(),
            },
            TripSlot::Unavailable { reason, .. } => Self {
                available: false,
                reason: Some(reason.to_string()),
                distance_km: None,
                duration_mins: None,
                start: None,
                end: None,
                encoded_path: None,
                costs: None,
                steps: Vec::new(),
            },
        }
    }
}

impl CostsResult {
    /// Create from a domain CostBreakdown.
    pub fn from_breakdown(costs: &CostBreakdown) -> Self {
        Self {
            components: costs
                .components()
                .iter()
                .map(|&(component, amount)| CostComponentResult {
                    key: component.key(),
                    label: component.label(),
                    amount,
                })
                .collect(),
            total: costs.total(),
        }
    }
}

impl FareResult {
    /// Create from a fare quote.
    pub fn from_quote(quote: &FareQuote) -> Self {
        Self {
            price: quote.price(),
            is_default: quote.is_default(),
            reason: match quote {
                FareQuote::Quoted(_) => None,
                FareQuote::Defaulted { reason, .. } => Some(reason.clone()),
            },
        }
    }
}
