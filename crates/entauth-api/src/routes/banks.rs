//! # Bank Directory
//!
//! `GET /v1/banks` returns the bank code → bank name map from the JSON file
//! at `BANK_JSON_PATH`. The file is re-read when its modification time
//! changes, so operators can update it without a restart.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::{ApiResponse, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/banks", get(list_banks))
}

async fn list_banks(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<BTreeMap<String, String>>>, AppError> {
    let banks = state.banks.clone();
    // The snapshot may hit the filesystem.
    let snapshot = tokio::task::spawn_blocking(move || banks.snapshot())
        .await
        .map_err(|e| AppError::Internal(format!("bank directory task failed: {e}")))??;

    tracing::debug!(entries = snapshot.len(), "serving bank directory");
    Ok(Json(ApiResponse::success(snapshot.entries().clone())))
}
