//! Error types for the claims server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use claims_store::StoreError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Result type alias for server operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Message returned for every 500 response.
pub const SERVER_ERROR_MESSAGE: &str = "Server error.";

/// Message returned when a claim id matches nothing.
pub const NOT_FOUND_MESSAGE: &str = "Claim not found.";

/// Message returned when a request body lacks a required field.
pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields.";

/// Errors that can occur in the claims server.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failed to bind to the specified address.
    #[error("failed to bind to {0}: {1}")]
    BindFailed(std::net::SocketAddr, std::io::Error),

    /// Invalid request body or parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No claim with the requested id.
    #[error("claim not found: {0}")]
    NotFound(String),

    /// Server configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Storage or other internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// The message shown to API clients. Internal details stay in the logs.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidRequest(message) => message.clone(),
            Self::NotFound(_) => NOT_FOUND_MESSAGE.to_string(),
            Self::BindFailed(_, _) | Self::InvalidConfig(_) | Self::Internal(_) => {
                SERVER_ERROR_MESSAGE.to_string()
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(_) => Self::InvalidRequest(err.to_string()),
            StoreError::NotFound(id) => Self::NotFound(id.to_string()),
            StoreError::InvalidConfig(message) => Self::InvalidConfig(message),
            StoreError::Io(_) | StoreError::Serialization(_) => Self::Internal(err.to_string()),
        }
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            Self::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            Self::BindFailed(_, _) | Self::InvalidConfig(_) | Self::Internal(_) => {
                error!(error = %self, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        let body = ErrorResponse {
            error: error_type,
            message: self.public_message(),
        };

        let json = serde_json::to_string(&body).unwrap_or_else(|_| {
            r#"{"error":"internal_error","message":"Server error."}"#.to_string()
        });

        (status, [("content-type", "application/json")], json).into_response()
    }
}
