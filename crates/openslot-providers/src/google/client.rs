//! Google Calendar API client.
//!
//! A low-level HTTP client for the two Calendar API v3 calls this system
//! needs: `freebusy.query` and `events.insert`. Handles request building,
//! status mapping, and response decoding.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use openslot_core::TimeSlot;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{CreatedEvent, EventDraft};

/// Base URL for Google Calendar API v3.
const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Wall-clock format sent alongside a timeZone field.
const WALL_CLOCK_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Google Calendar API client.
#[derive(Debug)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl GoogleCalendarClient {
    /// Creates a new client with the given access token.
    pub fn new(access_token: impl Into<String>, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");

        Self {
            http_client,
            access_token: access_token.into(),
            base_url: CALENDAR_API_BASE.to_string(),
        }
    }

    /// Overrides the API base URL (for tests against a local server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Queries committed busy intervals on a calendar.
    ///
    /// An absent calendar entry or empty busy list is a valid "nothing
    /// busy" response. Busy entries missing a boundary, with an unparseable
    /// timestamp, or with an inverted range are skipped with a warning
    /// rather than failing the query.
    pub async fn query_busy(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
        time_zone: &str,
    ) -> ProviderResult<Vec<TimeSlot>> {
        let url = format!("{}/freeBusy", self.base_url);
        let request = FreeBusyRequest {
            time_min,
            time_max,
            time_zone: time_zone.to_string(),
            items: vec![FreeBusyItem {
                id: calendar_id.to_string(),
            }],
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let body = check_status(response).await?;

        let parsed: FreeBusyResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse freebusy response: {}", e))
        })?;

        let calendar = match parsed.calendars.get(calendar_id) {
            Some(calendar) => calendar,
            None => return Ok(Vec::new()),
        };

        if let Some(errors) = &calendar.errors {
            if let Some(error) = errors.first() {
                return Err(match error.reason.as_deref() {
                    Some("notFound") => {
                        ProviderError::not_found(format!("calendar not found: {}", calendar_id))
                    }
                    reason => ProviderError::server(format!(
                        "freebusy query failed for {}: {}",
                        calendar_id,
                        reason.unwrap_or("unknown reason")
                    )),
                });
            }
        }

        let mut busy = Vec::new();
        for period in &calendar.busy {
            if let Some(slot) = convert_busy_period(period, calendar_id) {
                busy.push(slot);
            }
        }

        debug!(
            calendar_id,
            busy = busy.len(),
            "fetched busy intervals"
        );
        Ok(busy)
    }

    /// Inserts an event into a calendar and returns its descriptor.
    pub async fn insert_event(
        &self,
        calendar_id: &str,
        draft: &EventDraft,
    ) -> ProviderResult<CreatedEvent> {
        let url = format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id)
        );

        let request = ApiEventWrite {
            summary: draft.summary.clone(),
            description: draft.description.clone().unwrap_or_default(),
            start: ApiEventTime {
                date_time: Some(draft.start.format(WALL_CLOCK_FORMAT).to_string()),
                time_zone: Some(draft.time_zone.clone()),
            },
            end: ApiEventTime {
                date_time: Some(draft.end.format(WALL_CLOCK_FORMAT).to_string()),
                time_zone: Some(draft.time_zone.clone()),
            },
            attendees: draft.attendee.as_ref().map(|a| {
                vec![ApiAttendee {
                    display_name: Some(a.display_name.clone()),
                    email: a.email.clone(),
                }]
            }),
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let body = check_status(response).await?;

        let parsed: ApiEventResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse event response: {}", e))
        })?;

        convert_created_event(parsed)
    }
}

/// Maps reqwest transport failures to network errors.
fn map_transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::network("request timeout")
    } else if e.is_connect() {
        ProviderError::network(format!("connection failed: {}", e))
    } else {
        ProviderError::network(format!("request failed: {}", e))
    }
}

/// Maps non-success statuses to provider errors; returns the body otherwise.
async fn check_status(response: reqwest::Response) -> ProviderResult<String> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());
        return Err(ProviderError::rate_limited(format!(
            "rate limit exceeded{}",
            retry_after
                .map(|s| format!(", retry after {} seconds", s))
                .unwrap_or_default()
        )));
    }

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(ProviderError::authentication(
            "access token expired or invalid",
        ));
    }

    if status == reqwest::StatusCode::FORBIDDEN {
        return Err(ProviderError::authorization("access denied to calendar"));
    }

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ProviderError::not_found("calendar not found"));
    }

    if status == reqwest::StatusCode::BAD_REQUEST {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::bad_request(format!(
            "API rejected request: {}",
            body
        )));
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::server(format!(
            "API error ({}): {}",
            status, body
        )));
    }

    response
        .text()
        .await
        .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))
}

/// Converts a busy period to a slot, skipping malformed entries.
///
/// Absence of a boundary means the entry cannot be relied on for conflict
/// detection; it is dropped rather than failing the whole query, and the
/// drop is logged so under-reported busy time stays observable.
fn convert_busy_period(period: &ApiBusyPeriod, calendar_id: &str) -> Option<TimeSlot> {
    let (start_raw, end_raw) = match (&period.start, &period.end) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            warn!(calendar_id, "dropping busy entry missing a boundary");
            return None;
        }
    };

    let start = DateTime::parse_from_rfc3339(start_raw)
        .map_err(|e| warn!(calendar_id, "dropping busy entry with bad start: {}", e))
        .ok()?
        .with_timezone(&Utc);
    let end = DateTime::parse_from_rfc3339(end_raw)
        .map_err(|e| warn!(calendar_id, "dropping busy entry with bad end: {}", e))
        .ok()?
        .with_timezone(&Utc);

    if start >= end {
        warn!(calendar_id, %start, %end, "dropping busy entry with inverted range");
        return None;
    }

    Some(TimeSlot::new(start, end))
}

/// Converts an API event response into a created-event descriptor.
fn convert_created_event(event: ApiEventResponse) -> ProviderResult<CreatedEvent> {
    let id = event
        .id
        .ok_or_else(|| ProviderError::invalid_response("event response missing id"))?;

    let start = parse_event_instant(&event.start, "start")?;
    let end = parse_event_instant(&event.end, "end")?;

    Ok(CreatedEvent {
        id,
        html_link: event.html_link,
        status: event.status,
        start,
        end,
    })
}

fn parse_event_instant(time: &ApiEventTime, field: &str) -> ProviderResult<DateTime<Utc>> {
    let raw = time.date_time.as_deref().ok_or_else(|| {
        ProviderError::invalid_response(format!("event response missing {} dateTime", field))
    })?;
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            ProviderError::invalid_response(format!("unparseable event {}: {}", field, e))
        })
}

/// Request body for the freebusy endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FreeBusyRequest {
    time_min: DateTime<Utc>,
    time_max: DateTime<Utc>,
    time_zone: String,
    items: Vec<FreeBusyItem>,
}

#[derive(Debug, Serialize)]
struct FreeBusyItem {
    id: String,
}

/// Response from the freebusy endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FreeBusyResponse {
    #[serde(default)]
    calendars: HashMap<String, CalendarBusyInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarBusyInfo {
    #[serde(default)]
    busy: Vec<ApiBusyPeriod>,
    errors: Option<Vec<ApiQueryError>>,
}

/// A busy period as reported by the API; boundaries may be absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiBusyPeriod {
    start: Option<String>,
    end: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiQueryError {
    #[allow(dead_code)]
    domain: Option<String>,
    reason: Option<String>,
}

/// Request body for the events endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventWrite {
    summary: String,
    description: String,
    start: ApiEventTime,
    end: ApiEventTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    attendees: Option<Vec<ApiAttendee>>,
}

/// Event time: wall-clock dateTime plus timeZone identifier.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventTime {
    date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_zone: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiAttendee {
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    email: String,
}

/// A created event from the events endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventResponse {
    id: Option<String>,
    status: Option<String>,
    html_link: Option<String>,
    start: ApiEventTime,
    end: ApiEventTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use chrono::{NaiveDate, TimeZone};
    use httpmock::prelude::*;

    fn utc(h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 20, h, mi, 0).unwrap()
    }

    fn client_for(server: &MockServer) -> GoogleCalendarClient {
        GoogleCalendarClient::new("test-token", Duration::from_secs(5))
            .with_base_url(server.base_url())
    }

    mod decoding {
        use super::*;

        #[test]
        fn busy_period_with_both_boundaries() {
            let period = ApiBusyPeriod {
                start: Some("2025-06-20T09:00:00+02:00".to_string()),
                end: Some("2025-06-20T10:00:00+02:00".to_string()),
            };
            let slot = convert_busy_period(&period, "primary").unwrap();
            assert_eq!(slot, TimeSlot::new(utc(7, 0), utc(8, 0)));
        }

        #[test]
        fn malformed_busy_periods_are_dropped() {
            let missing_end = ApiBusyPeriod {
                start: Some("2025-06-20T09:00:00Z".to_string()),
                end: None,
            };
            assert!(convert_busy_period(&missing_end, "primary").is_none());

            let missing_start = ApiBusyPeriod {
                start: None,
                end: Some("2025-06-20T10:00:00Z".to_string()),
            };
            assert!(convert_busy_period(&missing_start, "primary").is_none());

            let garbage = ApiBusyPeriod {
                start: Some("yesterday".to_string()),
                end: Some("2025-06-20T10:00:00Z".to_string()),
            };
            assert!(convert_busy_period(&garbage, "primary").is_none());

            let inverted = ApiBusyPeriod {
                start: Some("2025-06-20T10:00:00Z".to_string()),
                end: Some("2025-06-20T09:00:00Z".to_string()),
            };
            assert!(convert_busy_period(&inverted, "primary").is_none());
        }

        #[test]
        fn freebusy_response_shape() {
            let json = r#"{
                "kind": "calendar#freeBusy",
                "calendars": {
                    "primary": {
                        "busy": [
                            {"start": "2025-06-20T09:00:00Z", "end": "2025-06-20T10:00:00Z"}
                        ]
                    }
                }
            }"#;

            let parsed: FreeBusyResponse = serde_json::from_str(json).unwrap();
            assert_eq!(parsed.calendars["primary"].busy.len(), 1);
        }

        #[test]
        fn event_write_body_uses_wall_clock_and_time_zone() {
            let draft = EventDraft::new(
                "Cita – Ana",
                NaiveDate::from_ymd_opt(2025, 6, 20)
                    .unwrap()
                    .and_hms_opt(10, 0, 0)
                    .unwrap(),
                NaiveDate::from_ymd_opt(2025, 6, 20)
                    .unwrap()
                    .and_hms_opt(10, 30, 0)
                    .unwrap(),
                "Europe/Madrid",
            );

            let body = ApiEventWrite {
                summary: draft.summary.clone(),
                description: String::new(),
                start: ApiEventTime {
                    date_time: Some(draft.start.format(WALL_CLOCK_FORMAT).to_string()),
                    time_zone: Some(draft.time_zone.clone()),
                },
                end: ApiEventTime {
                    date_time: Some(draft.end.format(WALL_CLOCK_FORMAT).to_string()),
                    time_zone: Some(draft.time_zone.clone()),
                },
                attendees: None,
            };

            let json = serde_json::to_value(&body).unwrap();
            // Wall-clock time carries no UTC offset; the timezone rides separately.
            assert_eq!(json["start"]["dateTime"], "2025-06-20T10:00:00");
            assert_eq!(json["start"]["timeZone"], "Europe/Madrid");
        }
    }

    mod http {
        use super::*;

        #[tokio::test]
        async fn query_busy_parses_intervals() {
            let server = MockServer::start_async().await;
            let mock = server
                .mock_async(|when, then| {
                    when.method(POST)
                        .path("/freeBusy")
                        .header("authorization", "Bearer test-token")
                        .json_body_partial(r#"{"timeZone": "Europe/Madrid", "items": [{"id": "primary"}]}"#);
                    then.status(200)
                        .header("content-type", "application/json")
                        .body(
                            r#"{
                                "calendars": {
                                    "primary": {
                                        "busy": [
                                            {"start": "2025-06-20T07:00:00Z", "end": "2025-06-20T08:00:00Z"},
                                            {"start": "2025-06-20T07:30:00Z"},
                                            {"end": "2025-06-20T09:00:00Z"}
                                        ]
                                    }
                                }
                            }"#,
                        );
                })
                .await;

            let busy = client_for(&server)
                .query_busy("primary", utc(7, 0), utc(16, 0), "Europe/Madrid")
                .await
                .unwrap();

            mock.assert_async().await;
            // The two entries missing a boundary are dropped silently.
            assert_eq!(busy, vec![TimeSlot::new(utc(7, 0), utc(8, 0))]);
        }

        #[tokio::test]
        async fn query_busy_with_no_data_is_empty() {
            let server = MockServer::start_async().await;
            server
                .mock_async(|when, then| {
                    when.method(POST).path("/freeBusy");
                    then.status(200)
                        .header("content-type", "application/json")
                        .body(r#"{"calendars": {}}"#);
                })
                .await;

            let busy = client_for(&server)
                .query_busy("primary", utc(7, 0), utc(16, 0), "UTC")
                .await
                .unwrap();
            assert!(busy.is_empty());
        }

        #[tokio::test]
        async fn query_busy_reports_calendar_not_found() {
            let server = MockServer::start_async().await;
            server
                .mock_async(|when, then| {
                    when.method(POST).path("/freeBusy");
                    then.status(200)
                        .header("content-type", "application/json")
                        .body(
                            r#"{
                                "calendars": {
                                    "nope": {
                                        "busy": [],
                                        "errors": [{"domain": "global", "reason": "notFound"}]
                                    }
                                }
                            }"#,
                        );
                })
                .await;

            let err = client_for(&server)
                .query_busy("nope", utc(7, 0), utc(16, 0), "UTC")
                .await
                .unwrap_err();
            assert_eq!(err.code(), ProviderErrorCode::NotFound);
        }

        #[tokio::test]
        async fn expired_token_is_authentication_error() {
            let server = MockServer::start_async().await;
            server
                .mock_async(|when, then| {
                    when.method(POST).path("/freeBusy");
                    then.status(401).body("Invalid Credentials");
                })
                .await;

            let err = client_for(&server)
                .query_busy("primary", utc(7, 0), utc(16, 0), "UTC")
                .await
                .unwrap_err();
            assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed);
        }

        #[tokio::test]
        async fn rate_limit_carries_retry_after() {
            let server = MockServer::start_async().await;
            server
                .mock_async(|when, then| {
                    when.method(POST).path("/freeBusy");
                    then.status(429).header("Retry-After", "7").body("slow down");
                })
                .await;

            let err = client_for(&server)
                .query_busy("primary", utc(7, 0), utc(16, 0), "UTC")
                .await
                .unwrap_err();
            assert_eq!(err.code(), ProviderErrorCode::RateLimited);
            assert!(err.message().contains("7 seconds"));
            assert!(err.is_retryable());
        }

        #[tokio::test]
        async fn insert_event_roundtrip() {
            let server = MockServer::start_async().await;
            let mock = server
                .mock_async(|when, then| {
                    when.method(POST)
                        .path("/calendars/primary/events")
                        .header("authorization", "Bearer test-token")
                        .json_body_partial(
                            r#"{
                                "summary": "Cita – Ana",
                                "start": {"dateTime": "2025-06-20T10:00:00", "timeZone": "Europe/Madrid"}
                            }"#,
                        );
                    then.status(200)
                        .header("content-type", "application/json")
                        .body(
                            r#"{
                                "id": "evt-abc123",
                                "status": "confirmed",
                                "htmlLink": "https://calendar.google.com/event?eid=abc123",
                                "start": {"dateTime": "2025-06-20T10:00:00+02:00", "timeZone": "Europe/Madrid"},
                                "end": {"dateTime": "2025-06-20T10:30:00+02:00", "timeZone": "Europe/Madrid"}
                            }"#,
                        );
                })
                .await;

            let draft = EventDraft::new(
                "Cita – Ana",
                NaiveDate::from_ymd_opt(2025, 6, 20)
                    .unwrap()
                    .and_hms_opt(10, 0, 0)
                    .unwrap(),
                NaiveDate::from_ymd_opt(2025, 6, 20)
                    .unwrap()
                    .and_hms_opt(10, 30, 0)
                    .unwrap(),
                "Europe/Madrid",
            );

            let event = client_for(&server)
                .insert_event("primary", &draft)
                .await
                .unwrap();

            mock.assert_async().await;
            assert_eq!(event.id, "evt-abc123");
            assert_eq!(event.status.as_deref(), Some("confirmed"));
            assert_eq!(event.start, utc(8, 0));
            assert_eq!(event.end, utc(8, 30));
        }

        #[tokio::test]
        async fn insert_event_missing_id_is_invalid_response() {
            let server = MockServer::start_async().await;
            server
                .mock_async(|when, then| {
                    when.method(POST).path("/calendars/primary/events");
                    then.status(200)
                        .header("content-type", "application/json")
                        .body(r#"{"status": "confirmed", "start": {}, "end": {}}"#);
                })
                .await;

            let draft = EventDraft::new(
                "Cita",
                NaiveDate::from_ymd_opt(2025, 6, 20)
                    .unwrap()
                    .and_hms_opt(10, 0, 0)
                    .unwrap(),
                NaiveDate::from_ymd_opt(2025, 6, 20)
                    .unwrap()
                    .and_hms_opt(10, 30, 0)
                    .unwrap(),
                "Europe/Madrid",
            );

            let err = client_for(&server)
                .insert_event("primary", &draft)
                .await
                .unwrap_err();
            assert_eq!(err.code(), ProviderErrorCode::InvalidResponse);
        }
    }
}
