//! HTTP surface for openslot.
//!
//! This crate wires the availability computation to the outside world:
//! - [`AvailabilityService`] orchestrates the per-request flow (validate,
//!   fetch busy intervals, generate and filter slots; validate, insert
//!   event).
//! - [`routes`] exposes the two HTTP operations the voice agent calls.
//! - [`ServerConfig`] is the explicit configuration structure the service is
//!   constructed with; nothing reads the process environment outside the
//!   binary entrypoint.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use openslot_providers::StaticProvider;
//! use openslot_server::{AvailabilityService, ServerConfig, routes};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::default();
//!     let provider = Arc::new(StaticProvider::default());
//!     let service = Arc::new(AvailabilityService::new(config.clone(), provider));
//!
//!     let app = routes::router(service);
//!     let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

mod config;
mod error;
pub mod routes;
mod service;

pub use config::ServerConfig;
pub use error::ServiceError;
pub use service::AvailabilityService;
