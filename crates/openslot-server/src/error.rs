//! Service error type and its HTTP mapping.
//!
//! Validation failures map to 4xx; collaborator failures map to 5xx with
//! the category deciding between gateway, auth/config, and rate-limit
//! statuses. The collaborator's own code and message are carried through
//! unchanged.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use openslot_core::SlotError;
use openslot_providers::{ProviderError, ProviderErrorCode};

/// An error from the availability service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A request failed validation before any outbound call.
    #[error(transparent)]
    Validation(#[from] SlotError),

    /// The calendar collaborator failed; propagated unchanged.
    #[error(transparent)]
    Collaborator(#[from] ProviderError),
}

impl ServiceError {
    /// Returns the HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Collaborator(e) => match e.code() {
                ProviderErrorCode::AuthenticationFailed
                | ProviderErrorCode::AuthorizationFailed
                | ProviderErrorCode::ConfigurationError
                | ProviderErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
                ProviderErrorCode::RateLimited => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::BAD_GATEWAY,
            },
        }
    }

    /// Returns the machine-readable error code for the response body.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.code(),
            Self::Collaborator(e) => e.code().as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.error_code(), "{}", self);
        } else {
            warn!(code = self.error_code(), "{}", self);
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
