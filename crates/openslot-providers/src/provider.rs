//! CalendarProvider trait definition.
//!
//! The trait is the narrow contract this system has with its calendar
//! backend: query committed busy intervals for a time range, and insert an
//! event. Everything else the backend can do is out of scope.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use openslot_core::{TimeSlot, WorkingWindow, local_to_utc};

use crate::error::{ProviderError, ProviderErrorCode, ProviderResult};

/// A boxed future for async trait methods.
///
/// Async functions in traits do not mix well with dynamic dispatch; boxed
/// futures keep the trait object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Parameters for a busy-interval query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusyQuery {
    /// The time range to inspect.
    pub window: WorkingWindow,
    /// IANA timezone identifier forwarded to the backend.
    pub time_zone: String,
    /// The calendar to inspect.
    pub calendar_id: String,
}

impl BusyQuery {
    /// Creates a new busy query.
    pub fn new(
        window: WorkingWindow,
        time_zone: impl Into<String>,
        calendar_id: impl Into<String>,
    ) -> Self {
        Self {
            window,
            time_zone: time_zone.into(),
            calendar_id: calendar_id.into(),
        }
    }
}

/// An attendee attached to a drafted event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttendee {
    /// Display name shown on the event.
    pub display_name: String,
    /// Attendee email address.
    pub email: String,
}

/// A draft calendar event for insertion.
///
/// Start and end are local wall-clock times paired with an IANA timezone
/// name; the backend resolves the offset. A UTC-offset string is never sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    /// Event title.
    pub summary: String,
    /// Free-form event body.
    pub description: Option<String>,
    /// Local wall-clock start.
    pub start: NaiveDateTime,
    /// Local wall-clock end.
    pub end: NaiveDateTime,
    /// IANA timezone the wall-clock times are expressed in.
    pub time_zone: String,
    /// Optional attendee derived from the booking contact.
    pub attendee: Option<EventAttendee>,
}

impl EventDraft {
    /// Creates a draft with the required fields.
    pub fn new(
        summary: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        time_zone: impl Into<String>,
    ) -> Self {
        Self {
            summary: summary.into(),
            description: None,
            start,
            end,
            time_zone: time_zone.into(),
            attendee: None,
        }
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to attach an attendee.
    pub fn with_attendee(mut self, attendee: EventAttendee) -> Self {
        self.attendee = Some(attendee);
        self
    }
}

/// Descriptor of an event created on the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEvent {
    /// Backend identifier of the event.
    pub id: String,
    /// Link to view the event in the calendar UI, if provided.
    pub html_link: Option<String>,
    /// Backend status (e.g. "confirmed").
    pub status: Option<String>,
    /// Echoed start instant.
    pub start: DateTime<Utc>,
    /// Echoed end instant.
    pub end: DateTime<Utc>,
}

/// The contract with the calendar backend.
///
/// Implementations must be `Send + Sync`; the service holds one behind an
/// `Arc` and issues independent calls per request with no ordering guarantee
/// between them. Timeouts and retries are the implementation's concern.
pub trait CalendarProvider: Send + Sync {
    /// Returns the name of this provider (e.g. "google").
    fn name(&self) -> &str;

    /// Queries committed busy intervals within `query.window`.
    ///
    /// An empty result is a valid "nothing busy" response, not an error.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on network, authentication, or backend
    /// failures. The caller propagates these unchanged.
    fn query_busy(&self, query: BusyQuery) -> BoxFuture<'_, ProviderResult<Vec<TimeSlot>>>;

    /// Inserts `draft` into `calendar_id` and returns the created event.
    ///
    /// Performs exactly one write; no conflict checking happens here.
    fn insert_event(
        &self,
        calendar_id: String,
        draft: EventDraft,
    ) -> BoxFuture<'_, ProviderResult<CreatedEvent>>;

    /// Returns true if the provider currently holds usable credentials.
    fn is_authenticated(&self) -> bool;
}

/// A provider backed by a fixed busy set.
///
/// Queries return the configured intervals regardless of calendar id;
/// inserted events are recorded in memory instead of reaching a backend.
#[derive(Debug)]
pub struct StaticProvider {
    busy: Vec<TimeSlot>,
    inserted: Mutex<Vec<(String, EventDraft)>>,
    next_id: AtomicU64,
}

impl Default for StaticProvider {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl StaticProvider {
    /// Creates a provider reporting the given busy intervals.
    pub fn new(busy: Vec<TimeSlot>) -> Self {
        Self {
            busy,
            inserted: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Returns the events inserted so far, with their target calendar ids.
    pub fn inserted(&self) -> Vec<(String, EventDraft)> {
        self.inserted.lock().unwrap().clone()
    }
}

impl CalendarProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn query_busy(&self, _query: BusyQuery) -> BoxFuture<'_, ProviderResult<Vec<TimeSlot>>> {
        let busy = self.busy.clone();
        Box::pin(async move { Ok(busy) })
    }

    fn insert_event(
        &self,
        calendar_id: String,
        draft: EventDraft,
    ) -> BoxFuture<'_, ProviderResult<CreatedEvent>> {
        Box::pin(async move {
            let tz: chrono_tz::Tz = draft
                .time_zone
                .parse()
                .map_err(|_| ProviderError::bad_request(format!(
                    "unknown time zone: {}",
                    draft.time_zone
                )))?;
            let start = local_to_utc(draft.start.date(), draft.start.time(), tz)
                .map_err(|e| ProviderError::bad_request(e.to_string()))?;
            let end = local_to_utc(draft.end.date(), draft.end.time(), tz)
                .map_err(|e| ProviderError::bad_request(e.to_string()))?;

            let id = format!("evt-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
            self.inserted.lock().unwrap().push((calendar_id, draft));

            Ok(CreatedEvent {
                id,
                html_link: None,
                status: Some("confirmed".to_string()),
                start,
                end,
            })
        })
    }

    fn is_authenticated(&self) -> bool {
        true
    }
}

/// A provider that fails every operation with a fixed error.
///
/// Stands in when a real provider cannot be constructed, and exercises the
/// collaborator-failure paths in tests.
#[derive(Debug)]
pub struct ErrorProvider {
    name: String,
    code: ProviderErrorCode,
    message: String,
}

impl ErrorProvider {
    /// Creates a provider that always fails with `code` and `message`.
    pub fn new(
        name: impl Into<String>,
        code: ProviderErrorCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            code,
            message: message.into(),
        }
    }

    fn error(&self) -> ProviderError {
        ProviderError::new(self.code, self.message.clone()).with_provider(&self.name)
    }
}

impl CalendarProvider for ErrorProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn query_busy(&self, _query: BusyQuery) -> BoxFuture<'_, ProviderResult<Vec<TimeSlot>>> {
        let error = self.error();
        Box::pin(async move { Err(error) })
    }

    fn insert_event(
        &self,
        _calendar_id: String,
        _draft: EventDraft,
    ) -> BoxFuture<'_, ProviderResult<CreatedEvent>> {
        let error = self.error();
        Box::pin(async move { Err(error) })
    }

    fn is_authenticated(&self) -> bool {
        false
    }
}
