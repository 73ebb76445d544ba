//! HTTP routes for the appointment API.
//!
//! The voice agent sends loosely-formatted JSON bodies; the handlers
//! normalize them, call the availability service, and return machine-usable
//! JSON. Legacy capitalized keys (`Date`, `Time`, `FullName`) from the
//! original agent configuration are accepted as aliases.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Duration;
use serde::Deserialize;

use openslot_core::{BookingRequest, SlotError, TimeSlot, local_to_utc, parse_date, parse_time};
use openslot_providers::CreatedEvent;

use crate::error::ServiceError;
use crate::service::AvailabilityService;

/// Builds the API router.
pub fn router(service: Arc<AvailabilityService>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/getAvailability", post(get_availability))
        .route("/bookingTime", post(book_appointment))
        .with_state(service)
}

/// Body of `POST /getAvailability`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AvailabilityBody {
    /// The day to inspect; any accepted literal date format.
    #[serde(alias = "Date")]
    date: String,
    /// Slot length override; defaults to the configured granularity.
    #[serde(default)]
    duration_minutes: Option<i64>,
}

/// Body of `POST /bookingTime`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookingBody {
    #[serde(alias = "Date")]
    date: String,
    /// Appointment start, 24-hour wall-clock in the configured timezone.
    #[serde(alias = "Time")]
    time: String,
    #[serde(alias = "FullName")]
    full_name: String,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    description: Option<String>,
    /// Appointment length override; defaults to the configured granularity.
    #[serde(default)]
    duration_minutes: Option<i64>,
}

async fn index() -> &'static str {
    concat!(
        "openslot appointment API\n",
        "\n",
        "POST /getAvailability  - list open slots for a day\n",
        "POST /bookingTime      - book an appointment\n",
    )
}

async fn get_availability(
    State(service): State<Arc<AvailabilityService>>,
    Json(body): Json<AvailabilityBody>,
) -> Result<Json<Vec<TimeSlot>>, ServiceError> {
    let date = parse_date(&body.date)?;
    let duration = body
        .duration_minutes
        .unwrap_or(service.config().slot_minutes);

    let slots = service.get_availability(date, duration).await?;
    Ok(Json(slots))
}

async fn book_appointment(
    State(service): State<Arc<AvailabilityService>>,
    Json(body): Json<BookingBody>,
) -> Result<Json<CreatedEvent>, ServiceError> {
    let config = service.config();
    let date = parse_date(&body.date)?;
    let time = parse_time(&body.time)?;

    let minutes = body.duration_minutes.unwrap_or(config.slot_minutes);
    if minutes <= 0 {
        return Err(SlotError::invalid_duration(minutes).into());
    }

    let start = local_to_utc(date, time, config.timezone)?;
    let end = start + Duration::minutes(minutes);

    let mut request = BookingRequest::new(body.full_name, start, end);
    if let Some(phone) = body.phone {
        request = request.with_phone(phone);
    }
    if let Some(description) = body.description {
        request = request.with_description(description);
    }

    let event = service.book_appointment(request).await?;
    Ok(Json(event))
}
