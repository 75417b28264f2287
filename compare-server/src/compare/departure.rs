//! Departure timestamp conversion.

use chrono::{Local, LocalResult, NaiveDate, NaiveTime, TimeZone};

/// Error returned for a departure that does not exist in local time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("departure {date} {time} does not exist in local time")]
pub struct InvalidDeparture {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// Convert a date and time to epoch seconds in the server's local zone.
///
/// The inputs are read as local wall-clock time, not UTC. An ambiguous
/// time (clocks going back) resolves to the earlier instant; a time
/// skipped by a clock change is an error.
pub fn departure_epoch(date: NaiveDate, time: NaiveTime) -> Result<i64, InvalidDeparture> {
    departure_epoch_in(&Local, date, time)
}

/// [`departure_epoch`] for an explicit time zone.
pub fn departure_epoch_in<Tz: TimeZone>(
    tz: &Tz,
    date: NaiveDate,
    time: NaiveTime,
) -> Result<i64, InvalidDeparture> {
    match tz.from_local_datetime(&date.and_time(time)) {
        LocalResult::Single(dt) => Ok(dt.timestamp()),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.timestamp()),
        LocalResult::None => Err(InvalidDeparture { date, time }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn utc_conversion() {
        let epoch = departure_epoch_in(&Utc, date(2024, 3, 15), time(8, 0)).unwrap();
        assert_eq!(epoch, 1_710_489_600);
    }

    #[test]
    fn local_wall_clock_is_not_utc_normalised() {
        let cet = FixedOffset::east_opt(3600).unwrap();
        let local = departure_epoch_in(&cet, date(2024, 3, 15), time(8, 0)).unwrap();
        let utc = departure_epoch_in(&Utc, date(2024, 3, 15), time(8, 0)).unwrap();
        assert_eq!(utc - local, 3600);
    }

    #[test]
    fn server_local_zone_gives_a_timestamp() {
        // Noon is never inside a DST gap.
        assert!(departure_epoch(date(2024, 6, 1), time(12, 0)).is_ok());
    }
}
