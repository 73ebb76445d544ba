//! Google Calendar provider implementation.
//!
//! Implements the [`CalendarProvider`] trait on top of the API client,
//! refreshing the access token before each call when needed.

use std::sync::RwLock;

use tokio::sync::RwLock as TokioRwLock;

use openslot_core::TimeSlot;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{BoxFuture, BusyQuery, CalendarProvider, CreatedEvent, EventDraft};

use super::auth::{self, GOOGLE_TOKEN_URL, TokenInfo};
use super::client::GoogleCalendarClient;
use super::config::GoogleConfig;

/// Google Calendar provider.
#[derive(Debug)]
pub struct GoogleProvider {
    config: GoogleConfig,
    /// Client for the token endpoint; the API client carries its own.
    auth_http: reqwest::Client,
    token: RwLock<Option<TokenInfo>>,
    /// API client wrapped in a tokio RwLock for async access; rebuilt on
    /// every token refresh.
    api_client: TokioRwLock<Option<GoogleCalendarClient>>,
}

impl GoogleProvider {
    /// Creates a new Google provider with the given configuration.
    ///
    /// No network call happens here; the first operation triggers the
    /// initial token refresh.
    pub fn new(config: GoogleConfig) -> ProviderResult<Self> {
        config.validate().map_err(ProviderError::configuration)?;

        let auth_http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                ProviderError::configuration(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            config,
            auth_http,
            token: RwLock::new(None),
            api_client: TokioRwLock::new(None),
        })
    }

    /// Ensures a valid API client exists, refreshing the token if needed.
    async fn ensure_client(&self) -> ProviderResult<()> {
        let has_valid_token = self
            .token
            .read()
            .unwrap()
            .as_ref()
            .is_some_and(|t| !t.is_expired());
        if has_valid_token && self.api_client.read().await.is_some() {
            return Ok(());
        }

        let token =
            auth::refresh_access_token(&self.auth_http, &self.config.credentials, GOOGLE_TOKEN_URL)
                .await
                .map_err(|e| e.with_provider("google"))?;

        *self.api_client.write().await = Some(GoogleCalendarClient::new(
            &token.access_token,
            self.config.timeout,
        ));
        *self.token.write().unwrap() = Some(token);
        Ok(())
    }
}

impl CalendarProvider for GoogleProvider {
    fn name(&self) -> &str {
        "google"
    }

    fn query_busy(&self, query: BusyQuery) -> BoxFuture<'_, ProviderResult<Vec<TimeSlot>>> {
        Box::pin(async move {
            self.ensure_client().await?;
            let client = self.api_client.read().await;
            let client = client
                .as_ref()
                .ok_or_else(|| ProviderError::internal("API client missing after refresh"))?;
            client
                .query_busy(
                    &query.calendar_id,
                    query.window.day_start,
                    query.window.day_end,
                    &query.time_zone,
                )
                .await
                .map_err(|e| e.with_provider("google"))
        })
    }

    fn insert_event(
        &self,
        calendar_id: String,
        draft: EventDraft,
    ) -> BoxFuture<'_, ProviderResult<CreatedEvent>> {
        Box::pin(async move {
            self.ensure_client().await?;
            let client = self.api_client.read().await;
            let client = client
                .as_ref()
                .ok_or_else(|| ProviderError::internal("API client missing after refresh"))?;
            client
                .insert_event(&calendar_id, &draft)
                .await
                .map_err(|e| e.with_provider("google"))
        })
    }

    fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap()
            .as_ref()
            .is_some_and(|t| !t.is_expired())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use super::super::config::GoogleCredentials;

    fn test_config() -> GoogleConfig {
        GoogleConfig::new(GoogleCredentials::new(
            "test-client.apps.googleusercontent.com",
            "test-secret",
            "test-refresh",
        ))
    }

    #[test]
    fn provider_creation() {
        let provider = GoogleProvider::new(test_config()).unwrap();
        assert_eq!(provider.name(), "google");
    }

    #[test]
    fn provider_rejects_invalid_config() {
        let config = GoogleConfig::new(GoogleCredentials::new("bad-id", "secret", "refresh"));
        let err = GoogleProvider::new(config).unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::ConfigurationError);
    }

    #[test]
    fn provider_not_authenticated_initially() {
        let provider = GoogleProvider::new(test_config()).unwrap();
        assert!(!provider.is_authenticated());
    }
}
