//! Canonical trip model.
//!
//! Provider-shaped data is converted into these types once, at the
//! boundary. Everything downstream (itinerary, costs, report) only sees
//! `Trip` and `Step`.

use std::fmt;

use serde::Serialize;

use super::{Coordinate, RouteError};

/// Travel mode of a whole trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelMode {
    Auto,
    Transit,
}

impl TravelMode {
    /// Mode name understood by the directions provider.
    pub fn provider_name(self) -> &'static str {
        match self {
            TravelMode::Auto => "driving",
            TravelMode::Transit => "transit",
        }
    }

    /// Short label used in headings and tables.
    pub fn label(self) -> &'static str {
        match self {
            TravelMode::Auto => "Auto",
            TravelMode::Transit => "ÖV",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.provider_name())
    }
}

/// Movement type of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepMode {
    Walk,
    Drive,
    Transit,
}

/// A named transit stop.
///
/// Providers don't guarantee stable stop IDs, so identity is the
/// name plus location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    pub name: String,
    pub location: Coordinate,
}

impl Stop {
    pub fn new(name: impl Into<String>, location: Coordinate) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}

/// Transit-specific part of a `TRANSIT` step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitDetails {
    /// Short line identifier if the provider has one, else the full name.
    pub line_name: String,
    pub departure_stop: Stop,
    /// Provider-formatted local time, e.g. "14:05".
    pub departure_time: String,
    pub arrival_stop: Stop,
    pub arrival_time: String,
    /// Direction shown on the vehicle.
    pub headsign: Option<String>,
    pub num_stops: Option<u32>,
}

/// One atomic movement within a trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub mode: StepMode,
    /// Plain-text instruction.
    pub instruction: String,
    /// Present for well-formed `Transit` steps, `None` otherwise.
    ///
    /// A `Transit` step whose provider data lacked required transit
    /// fields also carries `None`; the itinerary extractor rejects it.
    pub transit: Option<TransitDetails>,
}

impl Step {
    /// A walking or driving step.
    pub fn plain(mode: StepMode, instruction: impl Into<String>) -> Self {
        Self {
            mode,
            instruction: instruction.into(),
            transit: None,
        }
    }

    /// A transit step with its details.
    pub fn transit(instruction: impl Into<String>, details: TransitDetails) -> Self {
        Self {
            mode: StepMode::Transit,
            instruction: instruction.into(),
            transit: Some(details),
        }
    }

    pub fn is_transit(&self) -> bool {
        self.mode == StepMode::Transit
    }
}

/// One complete journey for one travel mode.
///
/// # Invariants
///
/// - `distance_km` and `duration_h` are finite and non-negative
/// - `steps` is non-empty
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    mode: TravelMode,
    distance_km: f64,
    duration_h: f64,
    start: Coordinate,
    end: Coordinate,
    encoded_path: String,
    steps: Vec<Step>,
}

impl Trip {
    /// Builds a trip, checking the invariants.
    pub fn new(
        mode: TravelMode,
        distance_km: f64,
        duration_h: f64,
        start: Coordinate,
        end: Coordinate,
        encoded_path: impl Into<String>,
        steps: Vec<Step>,
    ) -> Result<Self, RouteError> {
        if !distance_km.is_finite() || distance_km < 0.0 {
            return Err(RouteError::malformed("distance must be non-negative"));
        }
        if !duration_h.is_finite() || duration_h < 0.0 {
            return Err(RouteError::malformed("duration must be non-negative"));
        }
        if steps.is_empty() {
            return Err(RouteError::malformed("route has no steps"));
        }

        Ok(Self {
            mode,
            distance_km,
            duration_h,
            start,
            end,
            encoded_path: encoded_path.into(),
            steps,
        })
    }

    pub fn mode(&self) -> TravelMode {
        self.mode
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_h(&self) -> f64 {
        self.duration_h
    }

    /// Duration rounded to whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.duration_h * 60.0).round() as i64
    }

    pub fn start(&self) -> Coordinate {
        self.start
    }

    pub fn end(&self) -> Coordinate {
        self.end
    }

    /// Opaque encoded polyline of the whole route.
    pub fn encoded_path(&self) -> &str {
        &self.encoded_path
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

/// Outcome of fetching and normalising the route for one mode.
///
/// A failed mode becomes `Unavailable` so it never blocks display of
/// the other one.
#[derive(Debug, Clone)]
pub enum TripSlot {
    Available(Trip),
    Unavailable { mode: TravelMode, reason: RouteError },
}

impl TripSlot {
    /// Wraps a normalisation result for `mode`.
    pub fn from_result(mode: TravelMode, result: Result<Trip, RouteError>) -> Self {
        match result {
            Ok(trip) => TripSlot::Available(trip),
            Err(reason) => TripSlot::Unavailable { mode, reason },
        }
    }

    pub fn mode(&self) -> TravelMode {
        match self {
            TripSlot::Available(trip) => trip.mode(),
            TripSlot::Unavailable { mode, .. } => *mode,
        }
    }

    pub fn trip(&self) -> Option<&Trip> {
        match self {
            TripSlot::Available(trip) => Some(trip),
            TripSlot::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, TripSlot::Available(_))
    }
}
