//! Directions API response DTOs.
//!
//! These types map directly to the provider's JSON. Nearly everything is
//! `Option` because the provider omits fields rather than sending null,
//! and which fields are present depends on the travel mode.

use serde::Deserialize;

/// Top-level directions response.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    /// "OK", "ZERO_RESULTS", "NOT_FOUND", "REQUEST_DENIED", ...
    pub status: String,

    /// Alternative routes. Only the first is used.
    #[serde(default)]
    pub routes: Vec<RouteDto>,

    /// Human-readable detail for non-OK statuses.
    pub error_message: Option<String>,
}

/// One route alternative.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteDto {
    /// Short description, e.g. "A1".
    pub summary: Option<String>,

    /// One leg per waypoint interval; exactly one without waypoints.
    #[serde(default)]
    pub legs: Vec<LegDto>,

    /// Simplified geometry of the whole route.
    pub overview_polyline: Option<PolylineDto>,

    /// Provider warnings to show with the route.
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Encoded polyline wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct PolylineDto {
    pub points: String,
}

/// A leg between two waypoints.
#[derive(Debug, Clone, Deserialize)]
pub struct LegDto {
    /// Distance in metres (`value`) plus display text.
    pub distance: Option<TextValue>,

    /// Duration in seconds (`value`) plus display text.
    pub duration: Option<TextValue>,

    pub start_location: Option<LatLng>,
    pub end_location: Option<LatLng>,
    pub start_address: Option<String>,
    pub end_address: Option<String>,

    #[serde(default)]
    pub steps: Vec<StepDto>,
}

/// A numeric value with its provider-formatted text.
#[derive(Debug, Clone, Deserialize)]
pub struct TextValue {
    pub value: Option<f64>,
    pub text: Option<String>,
}

/// Latitude/longitude object.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// One step within a leg.
#[derive(Debug, Clone, Deserialize)]
pub struct StepDto {
    /// "DRIVING", "WALKING", "TRANSIT", ...
    pub travel_mode: Option<String>,

    /// Instruction with inline HTML markup.
    pub html_instructions: Option<String>,

    pub distance: Option<TextValue>,
    pub duration: Option<TextValue>,

    /// Only present for transit steps.
    pub transit_details: Option<TransitDetailsDto>,
}

/// Transit details of a step.
#[derive(Debug, Clone, Deserialize)]
pub struct TransitDetailsDto {
    pub departure_stop: Option<StopDto>,
    pub arrival_stop: Option<StopDto>,
    pub departure_time: Option<TimeDto>,
    pub arrival_time: Option<TimeDto>,
    pub line: Option<LineDto>,
    pub headsign: Option<String>,
    pub num_stops: Option<u32>,
}

/// A transit stop.
#[derive(Debug, Clone, Deserialize)]
pub struct StopDto {
    pub name: Option<String>,
    pub location: Option<LatLng>,
}

/// A transit time with its local display text.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeDto {
    /// Local time text, e.g. "14:05".
    pub text: Option<String>,
    /// Seconds since epoch.
    pub value: Option<i64>,
    pub time_zone: Option<String>,
}

/// Transit line.
#[derive(Debug, Clone, Deserialize)]
pub struct LineDto {
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub vehicle: Option<VehicleDto>,
}

/// Vehicle type of a transit line.
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleDto {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub vehicle_type: Option<String>,
}
