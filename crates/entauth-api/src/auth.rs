//! # Authentication Middleware
//!
//! Bearer token middleware. Every route except the health probes runs
//! behind it.
//!
//! ## Token Format
//!
//! ```text
//! Authorization: Bearer <base64url(header)>.<base64url(payload)>.<base64url(sig)>
//! ```
//!
//! Tokens are validated by the shared [`TokenCodec`]. On success the
//! caller's identity claims are injected into the request extensions;
//! handlers extract them via [`Authenticated`].

use std::sync::Arc;

use axum::extract::Request;
use axum::http::header;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use entauth_core::CallerIdentity;
use entauth_crypto::TokenCodec;

use crate::error::AppError;

/// The authenticated caller, as injected by [`auth_middleware`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated(pub CallerIdentity);

/// Axum `FromRequestParts` implementation for `Authenticated`.
///
/// Extracts the identity that the auth middleware injected into extensions.
/// Returns 401 if no identity is present (middleware didn't run or failed).
#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .map(Authenticated)
            .ok_or_else(|| AppError::Unauthorized("no caller identity in request context".into()))
    }
}

/// Extract and validate the Bearer token from the Authorization header.
///
/// Expects an `Arc<TokenCodec>` in the request extensions (installed by
/// [`app`](crate::app)). A missing codec is a wiring error and fails closed.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let Some(codec) = request.extensions().get::<Arc<TokenCodec>>().cloned() else {
        tracing::error!("token codec missing from request extensions");
        return AppError::Internal("authentication is not configured".into()).into_response();
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match codec.validate_header(auth_header) {
        Ok(claims) => {
            request.extensions_mut().insert(claims.caller_identity());
            next.run(request).await
        }
        Err(err) => {
            tracing::warn!(reason = %err, "authentication failed");
            AppError::from(err).into_response()
        }
    }
}
