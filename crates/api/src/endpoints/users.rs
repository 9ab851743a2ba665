//! User endpoints: registration and lookup.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde_json::{Value, json};
use studydeck_common::error::AppResult;
use studydeck_core::services::user::{CreateUserInput, UserResponse};

use crate::{response::ApiResponse, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/{id}", get(get_user))
        .route("/health", get(health))
}

/// POST /users — register a user record.
async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let response = state.user_service.create(input).await?;
    Ok(ApiResponse::ok(response))
}

/// GET /users/{id}
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let response = state.user_service.get(&id).await?;
    Ok(ApiResponse::ok(response))
}

/// GET /users/health
async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "service": "users"}))
}
