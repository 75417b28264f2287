//! The comparison request pipeline.

use chrono::{NaiveDate, NaiveTime};
use futures::future::join;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::costs::{CostParams, TicketPrice, auto_costs, transit_costs};
use crate::domain::{CostBreakdown, RouteError, TransferEvent, TravelMode, Trip, TripSlot};
use crate::itinerary::transfers_or_empty;

use super::departure::{InvalidDeparture, departure_epoch};
use super::{FareLookup, MapRenderer, RouteProvider, RouteQuery};

/// Which transit ticket price to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FareSource {
    /// Linear model from base fare and per-km fare.
    #[default]
    Linear,
    /// Ask the fare lookup service, falling back to a default price.
    Lookup,
}

/// Everything one comparison needs from the caller.
#[derive(Debug, Clone)]
pub struct ComparisonRequest {
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub params: CostParams,
    pub fare_source: FareSource,
    /// Ticket price substituted when the fare lookup fails.
    pub default_fare: f64,
    pub language: String,
}

impl ComparisonRequest {
    fn route_query(&self, mode: TravelMode, departure_epoch: i64) -> RouteQuery {
        RouteQuery {
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            mode,
            departure_epoch,
            language: self.language.clone(),
        }
    }
}

/// Ticket price obtained from the fare lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum FareQuote {
    /// The service returned a usable fare.
    Quoted(f64),
    /// The lookup failed; the default price was substituted.
    Defaulted { price: f64, reason: String },
}

impl FareQuote {
    pub fn price(&self) -> f64 {
        match self {
            FareQuote::Quoted(price) | FareQuote::Defaulted { price, .. } => *price,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, FareQuote::Defaulted { .. })
    }
}

/// Result of one comparison request.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub request: ComparisonRequest,
    pub auto: TripSlot,
    pub transit: TripSlot,
    /// Present when the auto trip is available.
    pub auto_costs: Option<CostBreakdown>,
    /// Present when the transit trip is available.
    pub transit_costs: Option<CostBreakdown>,
    /// Present when the ticket price came from the fare lookup.
    pub fare_quote: Option<FareQuote>,
    pub transfers: Vec<TransferEvent>,
}

/// Run one comparison.
///
/// Both routes are fetched concurrently. A failed mode becomes
/// `TripSlot::Unavailable` and never affects the other; the only hard
/// error is a departure time that doesn't exist locally.
pub async fn compare<P: RouteProvider, F: FareLookup>(
    provider: &P,
    fares: &F,
    request: ComparisonRequest,
) -> Result<Comparison, InvalidDeparture> {
    let epoch = departure_epoch(request.date, request.time)?;

    let auto_query = request.route_query(TravelMode::Auto, epoch);
    let transit_query = request.route_query(TravelMode::Transit, epoch);

    let (auto, transit) = tokio::join!(
        provider.fetch_route(&auto_query),
        provider.fetch_route(&transit_query)
    );

    let auto = to_slot(TravelMode::Auto, auto);
    let transit = to_slot(TravelMode::Transit, transit);

    let auto_costs = auto
        .trip()
        .map(|t| auto_costs(t.distance_km(), t.duration_h(), &request.params));

    let (transit_costs, fare_quote) = match transit.trip() {
        Some(trip) => {
            let (ticket, quote) = match request.fare_source {
                FareSource::Linear => (TicketPrice::Linear, None),
                FareSource::Lookup => {
                    let quote = quote_fare(fares, &request).await;
                    (TicketPrice::Quoted(quote.price()), Some(quote))
                }
            };
            let costs = transit_costs(
                trip.distance_km(),
                trip.duration_h(),
                &request.params,
                ticket,
            );
            (Some(costs), quote)
        }
        None => (None, None),
    };

    let transfers = transfers_or_empty(transit.trip());

    info!(
        origin = %request.origin,
        destination = %request.destination,
        auto = auto.is_available(),
        transit = transit.is_available(),
        "comparison complete"
    );

    Ok(Comparison {
        request,
        auto,
        transit,
        auto_costs,
        transit_costs,
        fare_quote,
        transfers,
    })
}

fn to_slot(mode: TravelMode, result: Result<Trip, RouteError>) -> TripSlot {
    if let Err(e) = &result {
        warn!(%mode, error = %e, "route unavailable");
    }
    TripSlot::from_result(mode, result)
}

/// Look up the transit fare, substituting the default on any failure.
pub async fn quote_fare<F: FareLookup>(fares: &F, request: &ComparisonRequest) -> FareQuote {
    match fares
        .lookup_fare(
            &request.origin,
            &request.destination,
            request.date,
            request.time,
        )
        .await
    {
        Ok(price) => FareQuote::Quoted(price),
        Err(e) => {
            warn!(
                error = %e,
                timeout = e.is_timeout(),
                default = request.default_fare,
                "fare lookup failed, using default price"
            );
            FareQuote::Defaulted {
                price: request.default_fare,
                reason: e.to_string(),
            }
        }
    }
}

/// Raster maps for the document surface, one per available trip.
#[derive(Debug, Clone, Default)]
pub struct MapImages {
    pub auto: Option<Vec<u8>>,
    pub transit: Option<Vec<u8>>,
}

/// Fetch both route maps concurrently; a failed map is left out.
pub async fn fetch_map_images<M: MapRenderer>(renderer: &M, comparison: &Comparison) -> MapImages {
    let origin = comparison.request.origin.as_str();
    let destination = comparison.request.destination.as_str();

    let fetch = |slot: &TripSlot| {
        let path = slot.trip().map(|t| t.encoded_path().to_string());
        let mode = slot.mode();
        async move {
            let path = path?;
            match renderer.render_map(&path, origin, destination).await {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    warn!(%mode, error = %e, "omitting static map");
                    None
                }
            }
        }
    };

    let (auto, transit) = join(fetch(&comparison.auto), fetch(&comparison.transit)).await;
    MapImages { auto, transit }
}
