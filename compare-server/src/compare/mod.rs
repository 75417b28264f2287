//! Comparison orchestration.
//!
//! One request fetches the auto and transit routes, normalises them,
//! prices them and extracts the transit itinerary. Upstream services sit
//! behind traits so the orchestration can be tested without network
//! access.

mod departure;
mod service;

#[cfg(test)]
mod compare_tests;

use std::future::Future;

use chrono::{NaiveDate, NaiveTime};

use crate::domain::{RouteError, TravelMode, Trip};
use crate::fares::FareError;
use crate::staticmap::StaticMapError;

pub use departure::{InvalidDeparture, departure_epoch, departure_epoch_in};
pub use service::{
    Comparison, ComparisonRequest, FareQuote, FareSource, MapImages, compare, fetch_map_images,
    quote_fare,
};

/// Parameters of one directions fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteQuery {
    pub origin: String,
    pub destination: String,
    pub mode: TravelMode,
    /// Departure in epoch seconds.
    pub departure_epoch: i64,
    /// Language of instructions, e.g. "de".
    pub language: String,
}

/// Source of routes.
///
/// This abstraction allows the comparison to be tested with mock data.
pub trait RouteProvider {
    /// Fetch and normalise the first route for a query.
    fn fetch_route(
        &self,
        query: &RouteQuery,
    ) -> impl Future<Output = Result<Trip, RouteError>> + Send;
}

/// Source of transit ticket prices.
pub trait FareLookup {
    /// Price of the first connection departing at `date`/`time`.
    fn lookup_fare(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> impl Future<Output = Result<f64, FareError>> + Send;
}

/// Source of raster route maps for the document surface.
pub trait MapRenderer {
    /// Raster image bytes of a route between two labelled endpoints.
    fn render_map(
        &self,
        encoded_path: &str,
        origin_label: &str,
        destination_label: &str,
    ) -> impl Future<Output = Result<Vec<u8>, StaticMapError>> + Send;
}
