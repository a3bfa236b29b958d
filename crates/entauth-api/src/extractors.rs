//! # Custom Extractors & Validation
//!
//! Provides the [`Validate`] trait for request DTOs and helpers to
//! extract + validate JSON bodies in handlers.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use entauth_gateway::EnterpriseAuthRequest;

use crate::error::AppError;

/// Trait for request types that can validate their business rules
/// beyond what serde deserialization checks.
pub trait Validate {
    /// Validate business rules. Returns an error message on failure.
    fn validate(&self) -> Result<(), String>;
}

impl Validate for EnterpriseAuthRequest {
    fn validate(&self) -> Result<(), String> {
        EnterpriseAuthRequest::validate(self).map_err(|e| e.to_string())
    }
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::Validation`].
///
/// Handlers take the body as `Result<Json<T>, JsonRejection>` so a malformed
/// body produces the standard error envelope instead of axum's plain-text
/// rejection:
/// ```ignore
/// async fn handler(body: Result<Json<T>, JsonRejection>) -> Result<..., AppError> {
///     let req = extract_json(body)?;
/// }
/// ```
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::Validation(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}
