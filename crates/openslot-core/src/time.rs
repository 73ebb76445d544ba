//! Time types for appointment scheduling.
//!
//! This module provides [`TimeSlot`] for representing half-open time
//! intervals `[start, end)`, and [`WorkingWindow`] for the daily span during
//! which slots may be offered.
//!
//! All instants are absolute points in time stored as UTC; timezones are
//! applied only at the formatting and configuration boundaries.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::normalize::local_to_utc;

/// A half-open time interval `[start, end)`.
///
/// Used both for candidate appointment slots and for busy intervals reported
/// by the calendar backend. The end boundary is exclusive, so back-to-back
/// intervals do not conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Start of the interval (inclusive).
    pub start: DateTime<Utc>,
    /// End of the interval (exclusive).
    pub end: DateTime<Utc>,
}

impl TimeSlot {
    /// Creates a new time slot.
    ///
    /// # Panics
    ///
    /// Panics if `start` is not before `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        assert!(start < end, "TimeSlot start must be < end");
        Self { start, end }
    }

    /// Returns the duration of this slot.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Checks whether two intervals overlap.
    ///
    /// Half-open semantics: touching endpoints do not overlap, so a slot
    /// ending at 09:30 never conflicts with a busy interval starting at
    /// 09:30. This predicate is the sole overlap test in the system.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// The daily span during which slots may be offered.
///
/// Derived from a calendar date and configured open/close wall-clock times
/// in a named timezone; both boundaries are absolute instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingWindow {
    /// Opening instant (inclusive).
    pub day_start: DateTime<Utc>,
    /// Closing instant (exclusive).
    pub day_end: DateTime<Utc>,
}

impl WorkingWindow {
    /// Creates a working window from explicit instants.
    ///
    /// # Panics
    ///
    /// Panics if `day_start` is not before `day_end`.
    pub fn new(day_start: DateTime<Utc>, day_end: DateTime<Utc>) -> Self {
        assert!(day_start < day_end, "WorkingWindow start must be < end");
        Self { day_start, day_end }
    }

    /// Computes the working window for `date` between `open` and `close`
    /// wall-clock times in `tz`.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::InvalidTime`] when a boundary does not exist in
    /// `tz` on that date (DST gap), and [`SlotError::InvalidInput`] when the
    /// resolved window would be empty or inverted.
    pub fn for_date(date: NaiveDate, open: NaiveTime, close: NaiveTime, tz: Tz) -> SlotResult<Self> {
        let day_start = local_to_utc(date, open, tz)?;
        let day_end = local_to_utc(date, close, tz)?;
        if day_start >= day_end {
            return Err(SlotError::invalid_input(format!(
                "working window {open}..{close} on {date} is empty"
            )));
        }
        Ok(Self { day_start, day_end })
    }

    /// Returns the length of the window.
    pub fn duration(&self) -> Duration {
        self.day_end - self.day_start
    }
}
