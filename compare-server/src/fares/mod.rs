//! Transit fare lookup.
//!
//! An alternative to the linear fare model: ask a timetable service for
//! the price of the first connection. The lookup is best-effort; callers
//! degrade to a configured default price.

mod client;
mod error;

pub use client::{FareClient, FareClientConfig};
pub use error::FareError;
