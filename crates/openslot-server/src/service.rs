//! Availability service: the per-request orchestration.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use openslot_core::{
    BookingRequest, SlotError, TimeSlot, WorkingWindow, free_slots, utc_to_local,
};
use openslot_providers::{
    BusyQuery, CalendarProvider, CreatedEvent, EventAttendee, EventDraft,
};

use crate::config::ServerConfig;
use crate::error::ServiceError;

/// Orchestrates availability lookups and bookings against the calendar
/// collaborator.
///
/// Holds no mutable state: every call recomputes from scratch, so repeated
/// calls with identical inputs and an unchanged busy set are idempotent.
/// There is no mutual exclusion between concurrent availability and booking
/// calls; two simultaneous bookings for the same slot can both succeed
/// unless the backend enforces exclusivity.
pub struct AvailabilityService {
    config: ServerConfig,
    provider: Arc<dyn CalendarProvider>,
}

impl AvailabilityService {
    /// Creates a service over the given provider.
    pub fn new(config: ServerConfig, provider: Arc<dyn CalendarProvider>) -> Self {
        Self { config, provider }
    }

    /// Returns the configuration the service was built with.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Computes the open slots of `duration_minutes` on `date`.
    ///
    /// Validation happens before the single outbound busy query; the result
    /// is chronologically ordered and overlaps none of the reported busy
    /// intervals.
    ///
    /// # Errors
    ///
    /// Validation failures ([`SlotError`]) and collaborator failures are
    /// both surfaced as [`ServiceError`]; collaborator detail is unchanged.
    pub async fn get_availability(
        &self,
        date: NaiveDate,
        duration_minutes: i64,
    ) -> Result<Vec<TimeSlot>, ServiceError> {
        if duration_minutes <= 0 {
            return Err(SlotError::invalid_duration(duration_minutes).into());
        }

        let window = WorkingWindow::for_date(
            date,
            self.config.work_start,
            self.config.work_end,
            self.config.timezone,
        )?;

        let busy = self
            .provider
            .query_busy(BusyQuery::new(
                window,
                self.config.timezone.name(),
                &self.config.calendar_id,
            ))
            .await?;

        let slots = free_slots(&window, duration_minutes, &busy)?;
        debug!(
            %date,
            duration_minutes,
            busy = busy.len(),
            free = slots.len(),
            "computed availability"
        );
        Ok(slots)
    }

    /// Books an appointment by inserting one event on the calendar.
    ///
    /// Validates the request before the single outbound write. Does not
    /// check for conflicts; callers are expected to have consulted
    /// [`get_availability`](Self::get_availability) first.
    pub async fn book_appointment(
        &self,
        request: BookingRequest,
    ) -> Result<CreatedEvent, ServiceError> {
        request.validate()?;

        let tz = self.config.timezone;
        let start_local = utc_to_local(request.start, tz).naive_local();
        let end_local = utc_to_local(request.end, tz).naive_local();

        let summary = format!("{} – {}", self.config.summary_prefix, request.name);
        let mut draft = EventDraft::new(summary, start_local, end_local, tz.name());
        if let Some(description) = &request.description {
            draft = draft.with_description(description);
        }
        if let Some(phone) = &request.phone {
            draft = draft.with_attendee(EventAttendee {
                display_name: request.name.clone(),
                email: format!("{phone}@example.invalid"),
            });
        }

        let event = self
            .provider
            .insert_event(self.config.calendar_id.clone(), draft)
            .await?;

        info!(event_id = %event.id, start = %event.start, "booked appointment");
        Ok(event)
    }
}
