//! Google Calendar provider implementation.
//!
//! This module provides a [`GoogleProvider`] backed by the Google Calendar
//! API v3: the freebusy endpoint for committed time and the events endpoint
//! for insertions.
//!
//! # Authentication
//!
//! The provider is configured with an OAuth client id/secret and a
//! long-lived refresh token (obtained out of band); it exchanges the refresh
//! token for short-lived access tokens as needed. There is no interactive
//! flow here.
//!
//! # Example
//!
//! ```ignore
//! use openslot_providers::google::{GoogleConfig, GoogleCredentials, GoogleProvider};
//!
//! let credentials = GoogleCredentials::new(
//!     "your-client-id.apps.googleusercontent.com",
//!     "your-client-secret",
//!     "your-refresh-token",
//! );
//! let provider = GoogleProvider::new(GoogleConfig::new(credentials))?;
//!
//! let busy = provider.query_busy(query).await?;
//! ```

mod auth;
mod client;
mod config;
mod provider;

pub use auth::TokenInfo;
pub use client::GoogleCalendarClient;
pub use config::{GoogleConfig, GoogleCredentials};
pub use provider::GoogleProvider;
