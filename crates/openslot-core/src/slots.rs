//! Candidate slot generation and busy-set filtering.
//!
//! [`generate_slots`] walks a working window in fixed-size steps;
//! [`filter_busy`] rejects candidates that overlap reported busy intervals.
//! Together they are the whole availability computation — the service layer
//! only supplies the window and the busy set.

use chrono::Duration;

use crate::error::{SlotError, SlotResult};
use crate::time::{TimeSlot, WorkingWindow};

/// Generates candidate slots of `duration_minutes` within `window`.
///
/// Slots are emitted starting at the window opening, each beginning where
/// the previous one ends. The last slot must fit entirely inside the window;
/// there is no partial trailing slot. A duration longer than the window
/// yields an empty sequence, not an error.
///
/// # Errors
///
/// Returns [`SlotError::InvalidDuration`] when `duration_minutes <= 0`.
pub fn generate_slots(window: &WorkingWindow, duration_minutes: i64) -> SlotResult<Vec<TimeSlot>> {
    if duration_minutes <= 0 {
        return Err(SlotError::invalid_duration(duration_minutes));
    }

    let step = Duration::minutes(duration_minutes);
    let mut slots = Vec::new();
    let mut start = window.day_start;
    while start + step <= window.day_end {
        slots.push(TimeSlot::new(start, start + step));
        start += step;
    }
    Ok(slots)
}

/// Retains the candidates that overlap none of the busy intervals.
///
/// Busy order is irrelevant and duplicates are harmless. The scan is
/// O(candidates x busy); both sets are bounded by a single working day at
/// realistic granularities.
pub fn filter_busy(candidates: Vec<TimeSlot>, busy: &[TimeSlot]) -> Vec<TimeSlot> {
    candidates
        .into_iter()
        .filter(|slot| !busy.iter().any(|b| slot.overlaps(b)))
        .collect()
}

/// Generates candidates for `window` and removes those conflicting with
/// `busy`, preserving chronological order.
pub fn free_slots(
    window: &WorkingWindow,
    duration_minutes: i64,
    busy: &[TimeSlot],
) -> SlotResult<Vec<TimeSlot>> {
    Ok(filter_busy(generate_slots(window, duration_minutes)?, busy))
}
