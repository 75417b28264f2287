//! Transfer itinerary extraction.
//!
//! Turns the transit steps of a trip into the short list a traveller
//! actually reads: where they board, where they change, where they
//! arrive.

use tracing::warn;

use crate::domain::{TransferEvent, TransferKind, TransitDetails, Trip};

/// Error returned when a trip's transit data is inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItineraryError {
    /// A step is tagged transit but lacks its transit fields.
    #[error("malformed route: transit step {index} has no transit details")]
    MalformedRoute { index: usize },
}

/// Extract the transfer itinerary of a trip.
///
/// Returns an empty list for `None` or for a trip without transit steps.
/// Otherwise returns one `Start` event for the first transit departure,
/// one `Transfer` event per line change and one `End` event for the
/// last transit arrival.
///
/// A `Transfer` pairs the stop where the previous line was left with the
/// arrival time of the line being boarded.
///
/// Fails on the first transit step without details rather than
/// returning a partial itinerary.
pub fn extract_transfers(trip: Option<&Trip>) -> Result<Vec<TransferEvent>, ItineraryError> {
    let Some(trip) = trip else {
        return Ok(Vec::new());
    };

    let transit = trip
        .steps()
        .iter()
        .enumerate()
        .filter(|(_, step)| step.is_transit())
        .map(|(index, step)| {
            step.transit
                .as_ref()
                .ok_or(ItineraryError::MalformedRoute { index })
        })
        .collect::<Result<Vec<&TransitDetails>, _>>()?;

    let (Some(first), Some(last)) = (transit.first(), transit.last()) else {
        return Ok(Vec::new());
    };

    let mut events = vec![TransferEvent::new(
        TransferKind::Start,
        &first.departure_stop.name,
        &first.departure_time,
    )];

    let mut previous: Option<&TransitDetails> = None;
    for &details in &transit {
        if let Some(prev) = previous {
            if prev.line_name != details.line_name {
                events.push(TransferEvent::new(
                    TransferKind::Transfer,
                    &prev.arrival_stop.name,
                    &details.arrival_time,
                ));
            }
        }
        previous = Some(details);
    }

    events.push(TransferEvent::new(
        TransferKind::End,
        &last.arrival_stop.name,
        &last.arrival_time,
    ));

    Ok(events)
}

/// Like [`extract_transfers`], but logs a failure and yields an empty list.
pub fn transfers_or_empty(trip: Option<&Trip>) -> Vec<TransferEvent> {
    extract_transfers(trip).unwrap_or_else(|e| {
        warn!(error = %e, "dropping transfer itinerary");
        Vec::new()
    })
}
