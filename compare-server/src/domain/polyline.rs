//! Encoded polyline decoding.
//!
//! Routes carry their geometry as an encoded polyline string (five
//! decimal places of precision). The interactive map needs the actual
//! coordinates.

use super::Coordinate;

const PRECISION: f64 = 1e5;

/// Largest absolute latitude and longitude in encoded units.
const MAX_LAT: i64 = 90 * 100_000;
const MAX_LNG: i64 = 180 * 100_000;

/// Error returned when a polyline string is truncated, contains
/// characters outside the encoding alphabet or leaves the coordinate
/// range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid polyline at byte {position}")]
pub struct InvalidPolyline {
    position: usize,
}

/// Decodes an encoded polyline into coordinates.
///
/// # Examples
///
/// ```
/// use compare_server::domain::decode_polyline;
///
/// let points = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
/// assert_eq!(points.len(), 3);
/// assert!((points[0].lat - 38.5).abs() < 1e-9);
/// assert!((points[0].lng + 120.2).abs() < 1e-9);
/// ```
pub fn decode_polyline(encoded: &str) -> Result<Vec<Coordinate>, InvalidPolyline> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut pos = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while pos < bytes.len() {
        let start = pos;
        lat = accumulate(lat, next_value(bytes, &mut pos)?, MAX_LAT)
            .ok_or(InvalidPolyline { position: start })?;
        lng = accumulate(lng, next_value(bytes, &mut pos)?, MAX_LNG)
            .ok_or(InvalidPolyline { position: start })?;
        points.push(Coordinate::new(lat as f64 / PRECISION, lng as f64 / PRECISION));
    }

    Ok(points)
}

fn accumulate(current: i64, delta: i64, limit: i64) -> Option<i64> {
    current
        .checked_add(delta)
        .filter(|value| value.abs() <= limit)
}

// Values are 32-bit, so at most seven chunks.
fn next_value(bytes: &[u8], pos: &mut usize) -> Result<i64, InvalidPolyline> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let byte = *bytes.get(*pos).ok_or(InvalidPolyline { position: *pos })?;
        if !(63..=126).contains(&byte) || shift > 30 {
            return Err(InvalidPolyline { position: *pos });
        }
        *pos += 1;

        let chunk = i64::from(byte - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk < 0x20 {
            break;
        }
    }

    Ok(if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Coordinate, lat: f64, lng: f64) {
        assert!((actual.lat - lat).abs() < 1e-9, "lat {} != {}", actual.lat, lat);
        assert!((actual.lng - lng).abs() < 1e-9, "lng {} != {}", actual.lng, lng);
    }

    #[test]
    fn decodes_reference_polyline() {
        let points = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
        assert_eq!(points.len(), 3);
        assert_close(points[0], 38.5, -120.2);
        assert_close(points[1], 40.7, -120.95);
        assert_close(points[2], 43.252, -126.453);
    }

    #[test]
    fn empty_string_is_empty_path() {
        assert!(decode_polyline("").unwrap().is_empty());
    }

    #[test]
    fn truncated_input_is_rejected() {
        // Latitude only, longitude missing.
        assert!(decode_polyline("_p~iF").is_err());
    }

    #[test]
    fn invalid_character_is_rejected() {
        assert!(decode_polyline("_p~iF ps|U").is_err());
    }

    #[test]
    fn oversized_values_are_rejected() {
        let huge = "~".repeat(12) + "F";
        let encoded = format!("{huge}{huge}").repeat(3);
        assert_eq!(
            decode_polyline(&encoded),
            Err(InvalidPolyline { position: 7 })
        );
    }

    #[test]
    fn drifting_out_of_range_is_rejected() {
        // Each point moves 50 degrees north; the second leaves the globe.
        let step = "_sdpH?";
        let points = decode_polyline(step).unwrap();
        assert_close(points[0], 50.0, 0.0);

        let err = decode_polyline(&step.repeat(2)).unwrap_err();
        assert_eq!(err, InvalidPolyline { position: step.len() });
    }
}
