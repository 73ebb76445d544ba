//! Access-token management for the Google Calendar API.
//!
//! Exchanges the configured refresh token for short-lived access tokens at
//! the OAuth token endpoint. Tokens live in memory only; there is no
//! interactive authorization flow here.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::info;

use crate::error::{ProviderError, ProviderResult};

use super::config::GoogleCredentials;

/// Google's OAuth token endpoint.
pub(super) const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// An access token and its expiry.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    /// The access token for API requests.
    pub access_token: String,

    /// When the access token expires.
    pub expires_at: Option<DateTime<Utc>>,

    /// When the token was obtained.
    pub last_refresh: DateTime<Utc>,
}

impl TokenInfo {
    /// Creates a token info from a token-endpoint response.
    ///
    /// Expiry is shortened by a one-minute buffer so tokens are refreshed
    /// before they actually lapse.
    pub fn new(access_token: impl Into<String>, expires_in_secs: Option<i64>) -> Self {
        let expires_at = expires_in_secs
            .map(|secs| Utc::now() + Duration::seconds(secs) - Duration::seconds(60));

        Self {
            access_token: access_token.into(),
            expires_at,
            last_refresh: Utc::now(),
        }
    }

    /// Returns true if the access token is expired or about to expire.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() >= expires_at,
            None => false,
        }
    }
}

/// Response from the OAuth token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}

/// Exchanges the refresh token for a new access token.
///
/// # Errors
///
/// A rejected refresh token (4xx from the endpoint) is an authentication
/// error; transport failures are network errors.
pub(super) async fn refresh_access_token(
    http_client: &reqwest::Client,
    credentials: &GoogleCredentials,
    endpoint: &str,
) -> ProviderResult<TokenInfo> {
    let params = [
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.as_str()),
        ("refresh_token", credentials.refresh_token.as_str()),
        ("grant_type", "refresh_token"),
    ];

    let response = http_client
        .post(endpoint)
        .form(&params)
        .send()
        .await
        .map_err(|e| ProviderError::network(format!("token refresh request failed: {}", e)))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

    if status.is_client_error() {
        return Err(ProviderError::authentication(format!(
            "refresh token rejected ({}): {}",
            status, body
        )));
    }
    if !status.is_success() {
        return Err(ProviderError::server(format!(
            "token refresh failed ({}): {}",
            status, body
        )));
    }

    let token_response: TokenResponse = serde_json::from_str(&body)
        .map_err(|e| ProviderError::invalid_response(format!("invalid token response: {}", e)))?;

    info!("refreshed Google access token");
    Ok(TokenInfo::new(
        token_response.access_token,
        token_response.expires_in,
    ))
}
