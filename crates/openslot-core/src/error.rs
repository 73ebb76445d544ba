//! Validation error types.
//!
//! Every variant here is raised synchronously, before any outbound call to
//! the calendar backend is attempted. Collaborator failures are a separate
//! type owned by the provider layer.

use thiserror::Error;

/// Result type for core validation and slot computation.
pub type SlotResult<T> = Result<T, SlotError>;

/// Errors raised by validation and slot computation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SlotError {
    /// The date argument is not a recognized calendar date.
    #[error("invalid date: {input:?}")]
    InvalidDate { input: String },

    /// The time argument is not a recognized 24-hour wall-clock time, or
    /// names a wall-clock time that does not exist in the target timezone.
    #[error("invalid time: {input:?}")]
    InvalidTime { input: String },

    /// The requested slot duration is non-positive.
    #[error("invalid duration: {minutes} minutes")]
    InvalidDuration { minutes: i64 },

    /// A booking request is missing required fields or has `end <= start`.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl SlotError {
    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        Self::InvalidDate {
            input: input.into(),
        }
    }

    /// Creates an invalid time error.
    pub fn invalid_time(input: impl Into<String>) -> Self {
        Self::InvalidTime {
            input: input.into(),
        }
    }

    /// Creates an invalid duration error.
    pub fn invalid_duration(minutes: i64) -> Self {
        Self::InvalidDuration { minutes }
    }

    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Returns a stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDate { .. } => "invalid_date",
            Self::InvalidTime { .. } => "invalid_time",
            Self::InvalidDuration { .. } => "invalid_duration",
            Self::InvalidInput { .. } => "invalid_input",
        }
    }
}
