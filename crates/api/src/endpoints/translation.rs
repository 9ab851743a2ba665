//! Translation proxy endpoint.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde_json::{Value, json};
use studydeck_common::error::AppResult;
use studydeck_core::services::translation::{TranslateInput, TranslateResponse};

use crate::{response::ApiResponse, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(translate))
        .route("/health", get(health))
}

/// POST /translate — translate text into a supported language.
async fn translate(
    State(state): State<AppState>,
    Json(input): Json<TranslateInput>,
) -> AppResult<ApiResponse<TranslateResponse>> {
    let response = state.translation_service.translate(input).await?;
    Ok(ApiResponse::ok(response))
}

/// GET /translate/health
async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "service": "translation"}))
}
