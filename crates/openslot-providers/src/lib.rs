//! CalendarProvider trait and implementations (Google Calendar)

mod error;
pub mod google;
mod provider;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use google::{GoogleCalendarClient, GoogleConfig, GoogleCredentials, GoogleProvider};
pub use provider::{
    BoxFuture, BusyQuery, CalendarProvider, CreatedEvent, ErrorProvider, EventAttendee,
    EventDraft, StaticProvider,
};
