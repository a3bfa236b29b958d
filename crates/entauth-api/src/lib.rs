//! # entauth-api: Enterprise Verification HTTP Service
//!
//! Axum service in front of the 3060 enterprise verification gateway.
//!
//! ## API Surface
//!
//! | Route                     | Module                          | Auth |
//! |---------------------------|---------------------------------|------|
//! | `GET /health/liveness`    | this module                     | no   |
//! | `GET /health/readiness`   | this module                     | no   |
//! | `GET /test`               | this module                     | yes  |
//! | `POST /v1/enterprise-auth`| [`routes::enterprise_auth`]     | yes  |
//! | `GET /v1/banks`           | [`routes::banks`]               | yes  |
//!
//! Any other path is an authenticated 404 with the standard error envelope.
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → AuthMiddleware → RequestContext → [ErrorDisclosure, dev only] → Handler
//! ```

pub mod auth;
pub mod bootstrap;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::http::Uri;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;

use crate::error::AppError;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) are mounted outside the auth middleware
/// so they remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    let disclose = state.config.environment.is_development();
    let tokens = state.tokens.clone();

    let mut api = Router::new()
        .route("/test", get(test_endpoint))
        .merge(routes::enterprise_auth::router())
        .merge(routes::banks::router())
        .fallback(not_found);

    if disclose {
        tracing::warn!("APP_ENV=dev: internal error details are returned to callers");
        api = api.layer(from_fn(middleware::error_disclosure::disclose_errors));
    }

    let api = api
        .layer(from_fn(middleware::request_context::request_context))
        .layer(from_fn(auth::auth_middleware))
        .layer(middleware::tracing_layer::layer())
        .layer(axum::Extension(tokens))
        .with_state(state);

    // Unauthenticated health probes.
    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}

/// Authenticated smoke-test endpoint.
async fn test_endpoint() -> &'static str {
    "Test response"
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
