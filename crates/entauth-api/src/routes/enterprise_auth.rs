//! # Enterprise Verification
//!
//! `POST /v1/enterprise-auth` runs one verification exchange with the 3060
//! gateway on behalf of the authenticated caller.
//!
//! A gateway business failure (any `respCode` other than `00000000`) is
//! still a 200 response: the outcome's `isTransactionSuccess` is false and
//! it echoes the caller's fields. Only validation problems (400), a
//! disabled gateway (503), and exchange failures (500) use error statuses.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use entauth_gateway::{EnterpriseAuthClient, EnterpriseAuthOutcome, EnterpriseAuthRequest};

use crate::auth::Authenticated;
use crate::error::{ApiResponse, AppError};
use crate::extractors::extract_validated_json;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/enterprise-auth", post(verify_enterprise))
}

/// Helper: extract the gateway client from AppState or return 503.
fn require_gateway(state: &AppState) -> Result<&EnterpriseAuthClient, AppError> {
    state.gateway.as_deref().ok_or_else(|| {
        AppError::service_unavailable(
            "Enterprise verification gateway not configured. Set UNIONPAY_3060_API and MERCHANT_NO.",
        )
    })
}

async fn verify_enterprise(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    body: Result<Json<EnterpriseAuthRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<EnterpriseAuthOutcome>>, AppError> {
    let request = extract_validated_json(body)?;
    let gateway = require_gateway(&state)?;

    let outcome = gateway.verify_enterprise(&request, &caller).await?;
    Ok(Json(ApiResponse::success(outcome)))
}
