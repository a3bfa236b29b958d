//! # Request Context
//!
//! Wraps the rest of the request in a span carrying the method, path and
//! the authenticated caller's `userId` / `regionUid`. Must run inside the
//! auth middleware so the identity is already in the extensions.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use entauth_core::CallerIdentity;
use tracing::Instrument;

pub async fn request_context(request: Request, next: Next) -> Response {
    let (user_id, region_uid) = request
        .extensions()
        .get::<CallerIdentity>()
        .map(|c| {
            (
                c.user_id_or_unknown().to_string(),
                c.region_uid_or_unknown().to_string(),
            )
        })
        .unwrap_or_else(|| ("unknown".to_string(), "unknown".to_string()));

    let span = tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        user_id = %user_id,
        region_uid = %region_uid,
    );
    next.run(request).instrument(span).await
}
