//! Domain types for the trip comparison.
//!
//! These are the canonical, provider-independent types. Values are
//! created per comparison request and never shared across requests.

mod coordinate;
mod cost;
mod error;
mod polyline;
mod transfer;
mod trip;

pub use coordinate::Coordinate;
pub use cost::{CostBreakdown, CostComponent};
pub use error::RouteError;
pub use polyline::{InvalidPolyline, decode_polyline};
pub use transfer::{TransferEvent, TransferKind};
pub use trip::{Step, StepMode, Stop, TransitDetails, TravelMode, Trip, TripSlot};
