//! Conversion from directions DTOs to the canonical trip model.
//!
//! This is the only place that understands the provider's nested
//! legs/steps layout. Policy: only the first route alternative is used.

use tracing::debug;

use crate::domain::{
    Coordinate, RouteError, Step, StepMode, Stop, TransitDetails, TravelMode, Trip,
};

use super::types::{DirectionsResponse, LatLng, LegDto, RouteDto, StepDto, TransitDetailsDto};

/// Normalise a directions response into a `Trip` for `mode`.
///
/// Uses `routes[0]`. Fails with `NoRouteFound` when the provider
/// returned no routes, and with `MalformedRoute` when distance,
/// duration, legs or steps are missing.
pub fn normalize(response: &DirectionsResponse, mode: TravelMode) -> Result<Trip, RouteError> {
    let route = response.routes.first().ok_or(RouteError::NoRouteFound)?;
    normalize_route(route, mode)
}

/// Normalise a single route alternative.
///
/// Distances and durations are summed over all legs; steps are
/// concatenated in leg order.
pub fn normalize_route(route: &RouteDto, mode: TravelMode) -> Result<Trip, RouteError> {
    let first_leg = route
        .legs
        .first()
        .ok_or_else(|| RouteError::malformed("route has no legs"))?;
    let last_leg = route.legs.last().unwrap_or(first_leg);

    let mut distance_m = 0.0;
    let mut duration_s = 0.0;
    let mut steps = Vec::new();

    for leg in &route.legs {
        distance_m += leg_value(leg.distance.as_ref().and_then(|d| d.value), "distance")?;
        duration_s += leg_value(leg.duration.as_ref().and_then(|d| d.value), "duration")?;

        for step in &leg.steps {
            steps.push(convert_step(step)?);
        }
    }

    let start = leg_location(first_leg, |l| l.start_location, "start_location")?;
    let end = leg_location(last_leg, |l| l.end_location, "end_location")?;

    let encoded_path = route
        .overview_polyline
        .as_ref()
        .map(|p| p.points.clone())
        .unwrap_or_default();

    Trip::new(
        mode,
        distance_m / 1000.0,
        duration_s / 3600.0,
        start,
        end,
        encoded_path,
        steps,
    )
}

fn leg_value(value: Option<f64>, field: &'static str) -> Result<f64, RouteError> {
    value.ok_or_else(|| RouteError::malformed(format!("leg is missing {field}")))
}

fn leg_location(
    leg: &LegDto,
    get: impl Fn(&LegDto) -> Option<LatLng>,
    field: &'static str,
) -> Result<Coordinate, RouteError> {
    get(leg)
        .map(to_coordinate)
        .ok_or_else(|| RouteError::malformed(format!("leg is missing {field}")))
}

fn to_coordinate(ll: LatLng) -> Coordinate {
    Coordinate::new(ll.lat, ll.lng)
}

/// Convert one provider step.
fn convert_step(step: &StepDto) -> Result<Step, RouteError> {
    let mode = match step.travel_mode.as_deref() {
        Some("DRIVING") => StepMode::Drive,
        Some("WALKING") => StepMode::Walk,
        Some("TRANSIT") => StepMode::Transit,
        Some(other) => {
            return Err(RouteError::malformed(format!("unknown travel mode {other}")));
        }
        None => return Err(RouteError::malformed("step is missing travel_mode")),
    };

    let instruction = strip_html(step.html_instructions.as_deref().unwrap_or(""));

    let transit = match mode {
        StepMode::Transit => {
            let details = step.transit_details.as_ref().and_then(convert_transit);
            if details.is_none() {
                debug!(instruction = %instruction, "transit step without usable transit details");
            }
            details
        }
        StepMode::Walk | StepMode::Drive => None,
    };

    Ok(Step {
        mode,
        instruction,
        transit,
    })
}

/// Convert transit details, returning `None` if any required field is absent.
fn convert_transit(dto: &TransitDetailsDto) -> Option<TransitDetails> {
    let line = dto.line.as_ref()?;
    let line_name = line
        .short_name
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(line.name.as_deref().filter(|s| !s.is_empty()))?
        .to_string();

    let departure_stop = dto.departure_stop.as_ref()?;
    let arrival_stop = dto.arrival_stop.as_ref()?;

    Some(TransitDetails {
        line_name,
        departure_stop: Stop::new(
            departure_stop.name.clone()?,
            to_coordinate(departure_stop.location?),
        ),
        departure_time: dto.departure_time.as_ref()?.text.clone()?,
        arrival_stop: Stop::new(
            arrival_stop.name.clone()?,
            to_coordinate(arrival_stop.location?),
        ),
        arrival_time: dto.arrival_time.as_ref()?.text.clone()?,
        headsign: dto.headsign.clone(),
        num_stops: dto.num_stops,
    })
}

/// Convert an HTML instruction to plain text.
///
/// Tags are dropped and act as word separators, a handful of common
/// entities are decoded, and whitespace is collapsed.
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                text.push(' ');
            }
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    let decoded = decode_entities(&text);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> DirectionsResponse {
        serde_json::from_str(json).unwrap()
    }

    const DRIVING: &str = r#"{
        "status": "OK",
        "routes": [{
            "summary": "A1",
            "overview_polyline": {"points": "_p~iF~ps|U_ulLnnqC"},
            "legs": [{
                "distance": {"value": 125300, "text": "125 km"},
                "duration": {"value": 4500, "text": "1 Std. 15 Min."},
                "start_location": {"lat": 47.3779, "lng": 8.5403},
                "end_location": {"lat": 46.9480, "lng": 7.4474},
                "steps": [
                    {"travel_mode": "DRIVING", "html_instructions": "Auf <b>Bahnhofstrasse</b> nach Süden"},
                    {"travel_mode": "DRIVING", "html_instructions": "Weiter auf <b>A1</b><div style=\"font-size:0.9em\">Mautstrasse</div>"}
                ]
            }]
        }, {
            "summary": "A2",
            "legs": []
        }]
    }"#;

    #[test]
    fn normalizes_first_route() {
        let trip = normalize(&parse(DRIVING), TravelMode::Auto).unwrap();

        assert_eq!(trip.mode(), TravelMode::Auto);
        assert!((trip.distance_km() - 125.3).abs() < 1e-9);
        assert!((trip.duration_h() - 1.25).abs() < 1e-9);
        assert_eq!(trip.start(), Coordinate::new(47.3779, 8.5403));
        assert_eq!(trip.end(), Coordinate::new(46.9480, 7.4474));
        assert_eq!(trip.encoded_path(), "_p~iF~ps|U_ulLnnqC");
        assert_eq!(trip.steps().len(), 2);
        assert_eq!(trip.steps()[0].instruction, "Auf Bahnhofstrasse nach Süden");
        assert_eq!(trip.steps()[1].instruction, "Weiter auf A1 Mautstrasse");
        assert_eq!(trip.steps()[0].mode, StepMode::Drive);
    }

    #[test]
    fn empty_routes_is_no_route_found() {
        let response = parse(r#"{"status": "ZERO_RESULTS", "routes": []}"#);
        assert_eq!(
            normalize(&response, TravelMode::Transit).unwrap_err(),
            RouteError::NoRouteFound
        );
    }

    #[test]
    fn missing_legs_is_malformed() {
        let response = parse(r#"{"status": "OK", "routes": [{"legs": []}]}"#);
        let err = normalize(&response, TravelMode::Auto).unwrap_err();
        assert_eq!(err, RouteError::malformed("route has no legs"));
    }

    #[test]
    fn missing_distance_is_malformed() {
        let response = parse(
            r#"{"status": "OK", "routes": [{"legs": [{
                "duration": {"value": 60},
                "start_location": {"lat": 1.0, "lng": 2.0},
                "end_location": {"lat": 1.0, "lng": 2.0},
                "steps": [{"travel_mode": "DRIVING", "html_instructions": "Go"}]
            }]}]}"#,
        );
        let err = normalize(&response, TravelMode::Auto).unwrap_err();
        assert_eq!(err, RouteError::malformed("leg is missing distance"));
    }

    #[test]
    fn unknown_step_mode_is_malformed() {
        let response = parse(
            r#"{"status": "OK", "routes": [{"legs": [{
                "distance": {"value": 1000},
                "duration": {"value": 60},
                "start_location": {"lat": 1.0, "lng": 2.0},
                "end_location": {"lat": 1.0, "lng": 2.0},
                "steps": [{"travel_mode": "TELEPORT"}]
            }]}]}"#,
        );
        assert!(matches!(
            normalize(&response, TravelMode::Auto),
            Err(RouteError::MalformedRoute(_))
        ));
    }

    #[test]
    fn legs_are_summed() {
        let response = parse(
            r#"{"status": "OK", "routes": [{"legs": [
                {
                    "distance": {"value": 1000}, "duration": {"value": 600},
                    "start_location": {"lat": 1.0, "lng": 1.0},
                    "end_location": {"lat": 2.0, "lng": 2.0},
                    "steps": [{"travel_mode": "DRIVING", "html_instructions": "A"}]
                },
                {
                    "distance": {"value": 2500}, "duration": {"value": 1200},
                    "start_location": {"lat": 2.0, "lng": 2.0},
                    "end_location": {"lat": 3.0, "lng": 3.0},
                    "steps": [{"travel_mode": "DRIVING", "html_instructions": "B"}]
                }
            ]}]}"#,
        );
        let trip = normalize(&response, TravelMode::Auto).unwrap();
        assert!((trip.distance_km() - 3.5).abs() < 1e-9);
        assert!((trip.duration_h() - 0.5).abs() < 1e-9);
        assert_eq!(trip.end(), Coordinate::new(3.0, 3.0));
        assert_eq!(trip.steps().len(), 2);
    }

    #[test]
    fn transit_line_prefers_short_name() {
        let response = parse(
            r#"{"status": "OK", "routes": [{"legs": [{
                "distance": {"value": 1000}, "duration": {"value": 60},
                "start_location": {"lat": 1.0, "lng": 2.0},
                "end_location": {"lat": 1.0, "lng": 2.0},
                "steps": [
                    {"travel_mode": "TRANSIT", "html_instructions": "Tram",
                     "transit_details": {
                        "departure_stop": {"name": "A", "location": {"lat": 1.0, "lng": 2.0}},
                        "arrival_stop": {"name": "B", "location": {"lat": 1.1, "lng": 2.1}},
                        "departure_time": {"text": "10:00"},
                        "arrival_time": {"text": "10:10"},
                        "line": {"name": "Tramlinie 4", "short_name": "4"}
                     }},
                    {"travel_mode": "TRANSIT", "html_instructions": "Bus",
                     "transit_details": {
                        "departure_stop": {"name": "B", "location": {"lat": 1.1, "lng": 2.1}},
                        "arrival_stop": {"name": "C", "location": {"lat": 1.2, "lng": 2.2}},
                        "departure_time": {"text": "10:15"},
                        "arrival_time": {"text": "10:30"},
                        "line": {"name": "Regionalbus"}
                     }}
                ]
            }]}]}"#,
        );
        let trip = normalize(&response, TravelMode::Transit).unwrap();
        let lines: Vec<_> = trip
            .steps()
            .iter()
            .filter_map(|s| s.transit.as_ref())
            .map(|t| t.line_name.clone())
            .collect();
        assert_eq!(lines, vec!["4", "Regionalbus"]);
    }

    #[test]
    fn incomplete_transit_details_are_dropped() {
        let response = parse(
            r#"{"status": "OK", "routes": [{"legs": [{
                "distance": {"value": 1000}, "duration": {"value": 60},
                "start_location": {"lat": 1.0, "lng": 2.0},
                "end_location": {"lat": 1.0, "lng": 2.0},
                "steps": [
                    {"travel_mode": "TRANSIT", "html_instructions": "Zug",
                     "transit_details": {
                        "departure_stop": {"name": "A", "location": {"lat": 1.0, "lng": 2.0}},
                        "departure_time": {"text": "10:00"},
                        "line": {"short_name": "S3"}
                     }}
                ]
            }]}]}"#,
        );
        let trip = normalize(&response, TravelMode::Transit).unwrap();
        assert!(trip.steps()[0].is_transit());
        assert!(trip.steps()[0].transit.is_none());
    }

    #[test]
    fn strip_html_handles_entities_and_tags() {
        assert_eq!(
            strip_html("Links abbiegen auf <b>Zürcher&nbsp;Str.</b> &amp; weiter"),
            "Links abbiegen auf Zürcher Str. & weiter"
        );
        assert_eq!(strip_html(""), "");
        assert_eq!(strip_html("<div>Ziel</div>"), "Ziel");
    }
}
