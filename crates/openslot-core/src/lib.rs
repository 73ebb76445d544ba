//! Core types: intervals, working windows, slot computation, normalization

pub mod booking;
pub mod error;
pub mod normalize;
pub mod slots;
pub mod time;
pub mod tracing;

pub use booking::BookingRequest;
pub use error::{SlotError, SlotResult};
pub use normalize::{local_to_utc, parse_date, parse_time, utc_to_local};
pub use slots::{filter_busy, free_slots, generate_slots};
pub use time::{TimeSlot, WorkingWindow};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
