//! Booking request validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};

/// A request to book an appointment.
///
/// Constructed per request and handed to the availability service, which
/// validates it before performing the single outbound event insertion. The
/// calendar backend is the system of record; nothing is persisted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    /// Full name of the person booking.
    pub name: String,
    /// Contact phone number, if provided.
    pub phone: Option<String>,
    /// Appointment start instant.
    pub start: DateTime<Utc>,
    /// Appointment end instant.
    pub end: DateTime<Utc>,
    /// Free-form description for the calendar event.
    pub description: Option<String>,
}

impl BookingRequest {
    /// Creates a booking request with the required fields.
    pub fn new(name: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            phone: None,
            start,
            end,
            description: None,
        }
    }

    /// Builder method to set the phone number.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validates required fields and interval ordering.
    ///
    /// Runs before any outbound call, so an invalid booking has no side
    /// effects.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::InvalidInput`] when `name` is blank or
    /// `end <= start`.
    pub fn validate(&self) -> SlotResult<()> {
        if self.name.trim().is_empty() {
            return Err(SlotError::invalid_input("name is required"));
        }
        if self.end <= self.start {
            return Err(SlotError::invalid_input("end must be after start"));
        }
        Ok(())
    }
}
