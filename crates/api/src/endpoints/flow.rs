//! Flow endpoints: study plan generation and usage analytics.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde_json::{Value, json};
use studydeck_common::error::AppResult;
use studydeck_core::services::flow::{AnalyticsResponse, FlowResponse, GenerateFlowInput};

use crate::{response::ApiResponse, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate-flow", post(generate_flow))
        .route("/analytics/{user_id}", get(analytics))
        .route("/health", get(health))
}

/// POST /flow/generate-flow — personalized study plan.
async fn generate_flow(
    State(state): State<AppState>,
    Json(input): Json<GenerateFlowInput>,
) -> AppResult<ApiResponse<FlowResponse>> {
    let response = state.flow_service.generate_flow(input).await?;
    Ok(ApiResponse::ok(response))
}

/// GET /flow/analytics/{user_id} — 30-day activity timeline and metrics.
async fn analytics(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<AnalyticsResponse>> {
    let response = state.flow_service.analytics(&user_id).await?;
    Ok(ApiResponse::ok(response))
}

/// GET /flow/health
async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "service": "flow"}))
}
