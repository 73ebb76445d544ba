//! openslot server binary.
//!
//! Turns flags and environment into the explicit [`ServerConfig`], builds
//! the Google provider, and serves the API.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use openslot_core::{TracingConfig, TracingOutputFormat, init_tracing, parse_time};
use openslot_providers::{GoogleConfig, GoogleCredentials, GoogleProvider};
use openslot_server::{AvailabilityService, ServerConfig, routes};

#[derive(Parser, Debug)]
#[command(
    name = "openslot",
    version,
    about = "Appointment availability and booking API"
)]
struct Cli {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Address to bind to.
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Calendar queried for busy time and written on booking.
    #[arg(long, env = "PRIMARY_CALENDAR_ID", default_value = "primary")]
    calendar_id: String,

    /// IANA timezone for the working window and bookings.
    #[arg(long, env = "OPENSLOT_TIMEZONE", default_value = "Europe/Madrid")]
    timezone: String,

    /// Daily opening time (24-hour).
    #[arg(long, default_value = "09:00")]
    work_start: String,

    /// Daily closing time (24-hour).
    #[arg(long, default_value = "18:00")]
    work_end: String,

    /// Default slot granularity in minutes.
    #[arg(long, env = "OPENSLOT_SLOT_MINUTES", default_value_t = 30)]
    slot_minutes: i64,

    /// Prefix for booked-event summaries.
    #[arg(long, default_value = "Cita")]
    summary_prefix: String,

    /// Google OAuth credentials as inline JSON.
    #[arg(long, env = "GOOGLE_CREDENTIALS", hide_env_values = true)]
    credentials: Option<String>,

    /// Path to a Google OAuth credentials JSON file.
    #[arg(long, env = "GOOGLE_CREDENTIALS_FILE", conflicts_with = "credentials")]
    credentials_file: Option<PathBuf>,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl From<LogFormat> for TracingOutputFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Compact => Self::Compact,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Json => Self::Json,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_tracing(TracingConfig::default().with_format(cli.log_format.into()))?;

    let timezone: chrono_tz::Tz = cli
        .timezone
        .parse()
        .map_err(|_| format!("unknown timezone: {}", cli.timezone))?;

    let config = ServerConfig::default()
        .with_bind_addr(SocketAddr::new(cli.host, cli.port))
        .with_calendar_id(cli.calendar_id)
        .with_timezone(timezone)
        .with_working_hours(parse_time(&cli.work_start)?, parse_time(&cli.work_end)?)
        .with_slot_minutes(cli.slot_minutes)
        .with_summary_prefix(cli.summary_prefix);
    config.validate()?;

    let credentials = match (&cli.credentials, &cli.credentials_file) {
        (Some(json), _) => GoogleCredentials::from_json(json)?,
        (None, Some(path)) => GoogleCredentials::from_file(path)?,
        (None, None) => {
            return Err(
                "Google credentials are required: set GOOGLE_CREDENTIALS or --credentials-file"
                    .into(),
            );
        }
    };
    let provider = GoogleProvider::new(GoogleConfig::new(credentials))?;

    let service = Arc::new(AvailabilityService::new(config.clone(), Arc::new(provider)));
    let app = routes::router(service);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, calendar = %config.calendar_id, "openslot API listening");
    axum::serve(listener, app).await?;

    Ok(())
}
