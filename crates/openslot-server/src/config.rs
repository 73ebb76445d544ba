//! Server configuration.
//!
//! The explicit configuration structure the availability service is built
//! with. The binary entrypoint populates it from flags and environment; the
//! service and core never touch the process environment themselves.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use chrono::NaiveTime;
use chrono_tz::Tz;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,

    /// Calendar queried for busy time and written on booking.
    pub calendar_id: String,

    /// Timezone the working window and bookings are expressed in.
    pub timezone: Tz,

    /// Daily opening wall-clock time.
    pub work_start: NaiveTime,

    /// Daily closing wall-clock time.
    pub work_end: NaiveTime,

    /// Default slot granularity in minutes.
    pub slot_minutes: i64,

    /// Prefix for booked-event summaries ("<prefix> – <name>").
    pub summary_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 3000),
            calendar_id: "primary".to_string(),
            timezone: chrono_tz::Europe::Madrid,
            work_start: NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"),
            work_end: NaiveTime::from_hms_opt(18, 0, 0).expect("valid time"),
            slot_minutes: 30,
            summary_prefix: "Cita".to_string(),
        }
    }
}

impl ServerConfig {
    /// Builder: set the bind address.
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Builder: set the calendar id.
    pub fn with_calendar_id(mut self, id: impl Into<String>) -> Self {
        self.calendar_id = id.into();
        self
    }

    /// Builder: set the timezone.
    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.timezone = tz;
        self
    }

    /// Builder: set the working window.
    pub fn with_working_hours(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.work_start = start;
        self.work_end = end;
        self
    }

    /// Builder: set the default slot granularity.
    pub fn with_slot_minutes(mut self, minutes: i64) -> Self {
        self.slot_minutes = minutes;
        self
    }

    /// Builder: set the event summary prefix.
    pub fn with_summary_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.summary_prefix = prefix.into();
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.calendar_id.trim().is_empty() {
            return Err("calendar_id must not be empty".to_string());
        }
        if self.work_start >= self.work_end {
            return Err(format!(
                "working window {}..{} is empty",
                self.work_start, self.work_end
            ));
        }
        if self.slot_minutes <= 0 {
            return Err(format!(
                "slot granularity must be positive, got {}",
                self.slot_minutes
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.calendar_id, "primary");
        assert_eq!(config.timezone, chrono_tz::Europe::Madrid);
        assert_eq!(config.slot_minutes, 30);
        assert_eq!(config.bind_addr.port(), 3000);
    }

    #[test]
    fn builders() {
        let config = ServerConfig::default()
            .with_calendar_id("bookings@example.com")
            .with_timezone(chrono_tz::America::New_York)
            .with_working_hours(
                NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            )
            .with_slot_minutes(45)
            .with_summary_prefix("Appointment");

        assert_eq!(config.calendar_id, "bookings@example.com");
        assert_eq!(config.timezone, chrono_tz::America::New_York);
        assert_eq!(config.slot_minutes, 45);
        assert_eq!(config.summary_prefix, "Appointment");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation_failures() {
        let config = ServerConfig::default().with_calendar_id("  ");
        assert!(config.validate().is_err());

        let config = ServerConfig::default().with_working_hours(
            NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        );
        assert!(config.validate().is_err());

        let config = ServerConfig::default().with_slot_minutes(0);
        assert!(config.validate().is_err());
    }
}
