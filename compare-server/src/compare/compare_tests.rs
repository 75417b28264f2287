//! Tests for the comparison pipeline with mock upstreams.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveTime};

use super::*;
use crate::costs::CostParams;
use crate::directions::{DirectionsResponse, normalize};
use crate::domain::{CostComponent, RouteError, TransferKind, TravelMode, Trip};
use crate::fares::FareError;
use crate::staticmap::StaticMapError;

const DRIVING: &str = include_str!("../../testdata/directions/driving.json");
const TRANSIT: &str = include_str!("../../testdata/directions/transit.json");

fn fixture(json: &str, mode: TravelMode) -> Trip {
    let response: DirectionsResponse = serde_json::from_str(json).unwrap();
    normalize(&response, mode).unwrap()
}

fn request(fare_source: FareSource) -> ComparisonRequest {
    ComparisonRequest {
        origin: "Zürich, Stauffacher".into(),
        destination: "Bern".into(),
        date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        time: NaiveTime::from_hms_opt(7, 45, 0).unwrap(),
        params: CostParams::new(0.75, 30.0, 2.80, 0.31).unwrap(),
        fare_source,
        default_fare: 30.0,
        language: "de".into(),
    }
}

/// Mock route provider for testing.
struct MockProvider {
    routes: HashMap<TravelMode, Result<Trip, RouteError>>,
    queries: Mutex<Vec<RouteQuery>>,
}

impl MockProvider {
    fn new() -> Self {
        Self {
            routes: HashMap::new(),
            queries: Mutex::new(Vec::new()),
        }
    }

    fn with(mut self, mode: TravelMode, result: Result<Trip, RouteError>) -> Self {
        self.routes.insert(mode, result);
        self
    }

    fn both_available() -> Self {
        Self::new()
            .with(TravelMode::Auto, Ok(fixture(DRIVING, TravelMode::Auto)))
            .with(TravelMode::Transit, Ok(fixture(TRANSIT, TravelMode::Transit)))
    }
}

impl RouteProvider for MockProvider {
    async fn fetch_route(&self, query: &RouteQuery) -> Result<Trip, RouteError> {
        self.queries.lock().unwrap().push(query.clone());
        self.routes
            .get(&query.mode)
            .cloned()
            .unwrap_or(Err(RouteError::NoRouteFound))
    }
}

/// Mock fare lookup returning a fixed price or failing.
struct MockFares {
    price: Option<f64>,
    calls: Mutex<usize>,
}

impl MockFares {
    fn quoting(price: f64) -> Self {
        Self {
            price: Some(price),
            calls: Mutex::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            price: None,
            calls: Mutex::new(0),
        }
    }

    fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl FareLookup for MockFares {
    async fn lookup_fare(
        &self,
        _origin: &str,
        _destination: &str,
        _date: NaiveDate,
        _time: NaiveTime,
    ) -> Result<f64, FareError> {
        *self.calls.lock().unwrap() += 1;
        self.price.ok_or(FareError::NoFare)
    }
}

/// Mock map renderer that fails for one path.
struct MockMaps {
    failing_path: String,
}

impl MapRenderer for MockMaps {
    async fn render_map(
        &self,
        encoded_path: &str,
        _origin_label: &str,
        _destination_label: &str,
    ) -> Result<Vec<u8>, StaticMapError> {
        if encoded_path == self.failing_path {
            Err(StaticMapError::NotAnImage("text/html".into()))
        } else {
            Ok(encoded_path.as_bytes().to_vec())
        }
    }
}

#[tokio::test]
async fn both_modes_available() {
    let provider = MockProvider::both_available();
    let fares = MockFares::failing();

    let result = compare(&provider, &fares, request(FareSource::Linear))
        .await
        .unwrap();

    assert!(result.auto.is_available());
    assert!(result.transit.is_available());

    let auto = result.auto_costs.as_ref().unwrap();
    assert!((auto.get(CostComponent::Compensation).unwrap() - 93.975).abs() < 1e-9);
    assert!((auto.get(CostComponent::WageOpportunityCost).unwrap() - 37.5).abs() < 1e-9);

    let transit = result.transit_costs.as_ref().unwrap();
    let ticket = transit.get(CostComponent::Ticket).unwrap();
    assert!((ticket - (2.80 + 127.4 * 0.31)).abs() < 1e-9);

    assert!(result.fare_quote.is_none());
    assert_eq!(fares.call_count(), 0);

    let kinds: Vec<_> = result.transfers.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![TransferKind::Start, TransferKind::Transfer, TransferKind::End]
    );
    assert_eq!(result.transfers[0].stop_name, "Zürich, Stauffacher");
    assert_eq!(result.transfers[2].stop_name, "Bern");
}

#[tokio::test]
async fn both_modes_are_queried_with_same_departure() {
    let provider = MockProvider::both_available();
    compare(&provider, &MockFares::failing(), request(FareSource::Linear))
        .await
        .unwrap();

    let queries = provider.queries.lock().unwrap();
    assert_eq!(queries.len(), 2);

    let modes: Vec<_> = queries.iter().map(|q| q.mode).collect();
    assert!(modes.contains(&TravelMode::Auto));
    assert!(modes.contains(&TravelMode::Transit));
    assert_eq!(queries[0].departure_epoch, queries[1].departure_epoch);
    assert!(queries.iter().all(|q| q.language == "de"));
}

#[tokio::test]
async fn one_failed_mode_does_not_block_the_other() {
    let provider = MockProvider::new()
        .with(TravelMode::Auto, Err(RouteError::UpstreamTimeout))
        .with(TravelMode::Transit, Ok(fixture(TRANSIT, TravelMode::Transit)));

    let result = compare(&provider, &MockFares::failing(), request(FareSource::Linear))
        .await
        .unwrap();

    assert!(!result.auto.is_available());
    assert!(result.auto_costs.is_none());
    assert!(result.transit.is_available());
    assert!(result.transit_costs.is_some());
    assert_eq!(result.transfers.len(), 3);
}

#[tokio::test]
async fn both_unavailable() {
    let provider = MockProvider::new();

    let result = compare(&provider, &MockFares::quoting(10.0), request(FareSource::Lookup))
        .await
        .unwrap();

    assert!(!result.auto.is_available());
    assert!(!result.transit.is_available());
    assert!(result.auto_costs.is_none());
    assert!(result.transit_costs.is_none());
    assert!(result.fare_quote.is_none());
    assert!(result.transfers.is_empty());
}

#[tokio::test]
async fn fare_lookup_is_used_verbatim() {
    let provider = MockProvider::both_available();
    let fares = MockFares::quoting(52.0);

    let result = compare(&provider, &fares, request(FareSource::Lookup))
        .await
        .unwrap();

    assert_eq!(result.fare_quote, Some(FareQuote::Quoted(52.0)));
    let transit = result.transit_costs.unwrap();
    assert_eq!(transit.get(CostComponent::Ticket), Some(52.0));
    assert_eq!(fares.call_count(), 1);
}

#[tokio::test]
async fn fare_lookup_failure_degrades_to_default() {
    let provider = MockProvider::both_available();

    let result = compare(&provider, &MockFares::failing(), request(FareSource::Lookup))
        .await
        .unwrap();

    let quote = result.fare_quote.unwrap();
    assert!(quote.is_default());
    assert_eq!(quote.price(), 30.0);
    assert_eq!(
        result.transit_costs.unwrap().get(CostComponent::Ticket),
        Some(30.0)
    );
}

#[tokio::test]
async fn map_failure_omits_only_that_map() {
    let provider = MockProvider::both_available();
    let result = compare(&provider, &MockFares::failing(), request(FareSource::Linear))
        .await
        .unwrap();

    let transit_path = result.transit.trip().unwrap().encoded_path().to_string();
    let maps = MockMaps {
        failing_path: transit_path,
    };

    let images = fetch_map_images(&maps, &result).await;
    assert!(images.auto.is_some());
    assert!(images.transit.is_none());
}

#[tokio::test]
async fn no_map_requested_for_unavailable_trip() {
    let provider = MockProvider::new().with(TravelMode::Auto, Ok(fixture(DRIVING, TravelMode::Auto)));
    let result = compare(&provider, &MockFares::failing(), request(FareSource::Linear))
        .await
        .unwrap();

    let maps = MockMaps {
        failing_path: String::new(),
    };
    let images = fetch_map_images(&maps, &result).await;
    assert!(images.auto.is_some());
    assert!(images.transit.is_none());
}
