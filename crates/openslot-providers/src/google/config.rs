//! Google Calendar provider configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// OAuth 2.0 credentials for Google API access.
///
/// Users must provide their own OAuth client id and secret, plus a refresh
/// token granted for the calendar scope; interactive authorization is out of
/// scope for this system.
#[derive(Debug, Clone)]
pub struct GoogleCredentials {
    /// The OAuth 2.0 client ID from Google Cloud Console.
    pub client_id: String,
    /// The OAuth 2.0 client secret from Google Cloud Console.
    pub client_secret: String,
    /// The long-lived refresh token used to mint access tokens.
    pub refresh_token: String,
}

/// Structure of a Google credentials JSON file.
///
/// Supports the Cloud Console format with an "installed" or "web" section,
/// and a flat format with the fields at the root level.
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    installed: Option<NestedCredentials>,
    web: Option<NestedCredentials>,
    client_id: Option<String>,
    client_secret: Option<String>,
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NestedCredentials {
    client_id: String,
    client_secret: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

impl GoogleCredentials {
    /// Creates new credentials.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Loads credentials from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("failed to read credentials file: {}", e))?;
        Self::from_json(&content)
    }

    /// Parses credentials from a JSON string.
    ///
    /// Supports two formats:
    /// 1. Cloud Console format: `{"installed": {"client_id": ...}}` (or
    ///    `"web"`), with `refresh_token` either nested or at the root.
    /// 2. Flat format: all three fields at the root level.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let file: CredentialsFile = serde_json::from_str(json)
            .map_err(|e| format!("failed to parse credentials JSON: {}", e))?;

        if let Some(nested) = file.installed.or(file.web) {
            let refresh_token = nested
                .refresh_token
                .or(file.refresh_token)
                .ok_or("credentials are missing a refresh_token")?;
            return Ok(Self::new(
                nested.client_id,
                nested.client_secret,
                refresh_token,
            ));
        }

        match (file.client_id, file.client_secret, file.refresh_token) {
            (Some(id), Some(secret), Some(refresh)) => Ok(Self::new(id, secret, refresh)),
            (Some(_), Some(_), None) => Err("credentials are missing a refresh_token".to_string()),
            _ => Err(
                "credentials file must contain an 'installed'/'web' section or \
                 'client_id'/'client_secret'/'refresh_token' at root level"
                    .to_string(),
            ),
        }
    }

    /// Validates that the credentials appear to be correctly formatted.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.client_id.is_empty() {
            return Err("client_id is required");
        }
        if !self.client_id.ends_with(".apps.googleusercontent.com") {
            return Err("client_id should end with .apps.googleusercontent.com");
        }
        if self.client_secret.is_empty() {
            return Err("client_secret is required");
        }
        if self.refresh_token.is_empty() {
            return Err("refresh_token is required");
        }
        Ok(())
    }
}

/// Configuration for the Google Calendar provider.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// OAuth credentials for API access.
    pub credentials: GoogleCredentials,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string for API requests.
    pub user_agent: String,
}

impl GoogleConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates a new configuration with the given credentials.
    pub fn new(credentials: GoogleCredentials) -> Self {
        Self {
            credentials,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("openslot/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.credentials
            .validate()
            .map_err(|e| format!("invalid credentials: {}", e))
    }
}
