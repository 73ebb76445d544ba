//! Date/time-string normalization and timezone conversion.
//!
//! The voice agent sends loosely-formatted date and time strings; this
//! module normalizes them against a fixed set of literal formats (no
//! natural-language parsing) and owns the single wall-clock/UTC conversion
//! used everywhere in the system.

use chrono::offset::LocalResult;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{SlotError, SlotResult};

/// Literal date formats accepted from callers, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Literal 24-hour time formats accepted from callers, tried in order.
const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

/// Parses a calendar date from one of the accepted literal formats.
///
/// # Errors
///
/// Returns [`SlotError::InvalidDate`] when no format matches.
pub fn parse_date(input: &str) -> SlotResult<NaiveDate> {
    let trimmed = input.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| SlotError::invalid_date(input))
}

/// Parses a 24-hour wall-clock time; seconds default to `:00`.
///
/// # Errors
///
/// Returns [`SlotError::InvalidTime`] when no format matches.
pub fn parse_time(input: &str) -> SlotResult<NaiveTime> {
    let trimmed = input.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| SlotError::invalid_time(input))
}

/// Converts a wall-clock date and time in `tz` to an absolute UTC instant.
///
/// Ambiguous local times (DST fall-back) resolve to the earlier instant.
///
/// # Errors
///
/// Returns [`SlotError::InvalidTime`] when the wall-clock time does not
/// exist in `tz` on that date (DST gap).
pub fn local_to_utc(date: NaiveDate, time: NaiveTime, tz: Tz) -> SlotResult<DateTime<Utc>> {
    let naive = NaiveDateTime::new(date, time);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earlier, _) => Ok(earlier.with_timezone(&Utc)),
        LocalResult::None => Err(SlotError::invalid_time(format!(
            "{naive} does not exist in {tz}"
        ))),
    }
}

/// Converts an absolute UTC instant to wall-clock time in `tz`.
pub fn utc_to_local(instant: DateTime<Utc>, tz: Tz) -> DateTime<Tz> {
    instant.with_timezone(&tz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use chrono_tz::Europe::Madrid;

    mod dates {
        use super::*;

        #[test]
        fn accepts_iso_format() {
            let date = parse_date("2025-06-20").unwrap();
            assert_eq!((date.year(), date.month(), date.day()), (2025, 6, 20));
        }

        #[test]
        fn accepts_day_first_formats() {
            assert_eq!(parse_date("20/06/2025").unwrap(), parse_date("2025-06-20").unwrap());
            assert_eq!(parse_date("20-06-2025").unwrap(), parse_date("2025-06-20").unwrap());
        }

        #[test]
        fn trims_surrounding_whitespace() {
            assert!(parse_date("  2025-06-20 ").is_ok());
        }

        #[test]
        fn rejects_unrecognized_input() {
            for input in ["tomorrow", "2025/06/20", "2025-13-01", "2025-02-30", ""] {
                let err = parse_date(input).unwrap_err();
                assert!(matches!(err, SlotError::InvalidDate { .. }), "{input}");
            }
        }
    }

    mod times {
        use super::*;

        #[test]
        fn accepts_hour_minute() {
            let time = parse_time("15:30").unwrap();
            assert_eq!((time.hour(), time.minute(), time.second()), (15, 30, 0));
        }

        #[test]
        fn accepts_explicit_seconds() {
            let time = parse_time("15:30:45").unwrap();
            assert_eq!(time.second(), 45);
        }

        #[test]
        fn rejects_unrecognized_input() {
            for input in ["3pm", "25:00", "15", "15:60", ""] {
                let err = parse_time(input).unwrap_err();
                assert!(matches!(err, SlotError::InvalidTime { .. }), "{input}");
            }
        }
    }

    mod conversion {
        use super::*;

        fn date(y: i32, mo: u32, d: u32) -> NaiveDate {
            NaiveDate::from_ymd_opt(y, mo, d).unwrap()
        }

        fn time(h: u32, mi: u32) -> NaiveTime {
            NaiveTime::from_hms_opt(h, mi, 0).unwrap()
        }

        #[test]
        fn local_to_utc_applies_summer_offset() {
            let instant = local_to_utc(date(2025, 6, 20), time(15, 30), Madrid).unwrap();
            assert_eq!(instant.to_rfc3339(), "2025-06-20T13:30:00+00:00");
        }

        #[test]
        fn roundtrip_preserves_wall_clock() {
            let instant = local_to_utc(date(2025, 1, 20), time(9, 0), Madrid).unwrap();
            let local = utc_to_local(instant, Madrid);
            assert_eq!(local.time(), time(9, 0));
            assert_eq!(local.date_naive(), date(2025, 1, 20));
        }

        #[test]
        fn dst_gap_is_invalid_time() {
            // 02:30 does not exist on the spring-forward date in Madrid.
            let err = local_to_utc(date(2025, 3, 30), time(2, 30), Madrid).unwrap_err();
            assert!(matches!(err, SlotError::InvalidTime { .. }));
        }

        #[test]
        fn dst_fold_resolves_to_earlier_instant() {
            // 02:30 occurs twice on the fall-back date; the earlier instant
            // carries the summer offset (+02:00).
            let instant = local_to_utc(date(2025, 10, 26), time(2, 30), Madrid).unwrap();
            assert_eq!(instant.to_rfc3339(), "2025-10-26T00:30:00+00:00");
        }
    }
}
