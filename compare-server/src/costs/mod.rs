//! Cost model engine.
//!
//! Pure functions from distance, duration and caller-supplied parameters
//! to a `CostBreakdown`. The value of travel time is counted for both
//! modes so the totals compare door-to-door cost, not just fuel versus
//! ticket.

mod model;
mod params;

pub use model::{auto_costs, transit_costs};
pub use params::{CostParams, InvalidCostParams, TicketPrice};
