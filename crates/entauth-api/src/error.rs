//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from entauth-gateway, entauth-core, etc. to HTTP
//! status codes and the response envelope.
//!
//! Every error response carries a fresh 8-character error id that also
//! appears in the server log line, so an operator can find the detail a
//! caller reports. Internal details never reach the client unless the
//! development disclosure middleware is installed.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Caller-facing message for any rejected bearer token.
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token";

/// Envelope for every JSON response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: ErrorDetail) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Inner error detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. `"VAL-400"`, `"SYS-500"`).
    pub code: String,
    /// Human-readable, caller-safe message.
    pub message: String,
    /// Correlates the response with the server log line.
    pub error_id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Internal detail, present only in development.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Attached to error responses so middleware can rebuild the body.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub status: StatusCode,
    pub detail: ErrorDetail,
    /// The full internal error text.
    pub internal: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// No route matched (404).
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Request body could not be parsed or failed field validation (400).
    #[error("validation error: {0}")]
    Validation(String),

    /// Authentication failure: missing, malformed, forged, or expired token (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A required collaborator is not configured (503).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "404"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VAL-400"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SYS-503"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "SYS-500"),
        }
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }

    fn caller_message(&self, error_id: &str) -> String {
        match self {
            Self::NotFound(path) => format!("Resource not found: {path}"),
            Self::Validation(msg) | Self::Unauthorized(msg) | Self::ServiceUnavailable(msg) => {
                msg.clone()
            }
            Self::Internal(_) => format!(
                "An unexpected error occurred. Please contact support with Error ID: {error_id}"
            ),
        }
    }
}

/// Short random id for correlating an error response with its log line.
pub fn new_error_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let error_id = new_error_id();
        let internal = self.to_string();

        if status.is_server_error() {
            tracing::error!(error_id = %error_id, error = %internal, "request failed");
        } else {
            tracing::warn!(error_id = %error_id, code, error = %internal, "request rejected");
        }

        let detail = ErrorDetail {
            code: code.to_string(),
            message: self.caller_message(&error_id),
            error_id,
            timestamp: chrono::Utc::now().timestamp_millis(),
            detail: None,
        };

        let mut response = (status, Json(ApiResponse::<()>::failure(detail.clone()))).into_response();
        response.extensions_mut().insert(ErrorContext {
            status,
            detail,
            internal,
        });
        response
    }
}

/// Gateway failures: caller input problems are 400, everything else is 500.
impl From<entauth_gateway::ExchangeError> for AppError {
    fn from(err: entauth_gateway::ExchangeError) -> Self {
        match err {
            entauth_gateway::ExchangeError::InvalidRequest(e) => Self::Validation(e.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<entauth_core::ValidationError> for AppError {
    fn from(err: entauth_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<entauth_core::DirectoryError> for AppError {
    fn from(err: entauth_core::DirectoryError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Every token failure gets the same caller message; the specific reason
/// is only logged.
impl From<entauth_crypto::TokenError> for AppError {
    fn from(_: entauth_crypto::TokenError) -> Self {
        Self::Unauthorized(INVALID_TOKEN_MESSAGE.to_string())
    }
}
