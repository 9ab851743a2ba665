//! Study board endpoints: generation, persistence, reactions, listings.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};
use studydeck_common::error::AppResult;
use studydeck_core::services::study_board::{
    GenerateBoardInput, GeneratedBoardResponse, PublicBoardsResponse, ReactionInput,
    ReactionResponse, RemoveReactionInput, RenameBoardInput, SaveBoardInput, StudyBoardResponse,
};

use crate::{response::ApiResponse, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/save", post(save))
        .route("/public", get(list_public))
        .route(
            "/{id}/like-dislike",
            post(toggle_reaction).delete(remove_reaction),
        )
        .route("/user/{user_id}", get(list_user_boards))
        .route("/group/{group_id}", get(list_group_boards))
        .route("/board/{id}", get(get_board))
        .route("/{id}/name", put(rename))
        .route("/{id}", delete(delete_board))
        .route("/health", get(health))
}

/// POST /studyboard/create — generate content without persisting.
async fn create(
    State(state): State<AppState>,
    Json(input): Json<GenerateBoardInput>,
) -> AppResult<ApiResponse<GeneratedBoardResponse>> {
    let response = state.study_board_service.generate(input).await?;
    Ok(ApiResponse::ok(response))
}

/// POST /studyboard/save — persist a board, sharing to a group when scoped.
async fn save(
    State(state): State<AppState>,
    Json(input): Json<SaveBoardInput>,
) -> AppResult<ApiResponse<StudyBoardResponse>> {
    let response = state.study_board_service.save(input).await?;
    Ok(ApiResponse::ok(response))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublicBoardsQuery {
    page: Option<u64>,
    limit: Option<u64>,
    sort_by: Option<String>,
}

/// GET /studyboard/public — paginated public listing.
async fn list_public(
    State(state): State<AppState>,
    Query(query): Query<PublicBoardsQuery>,
) -> AppResult<ApiResponse<PublicBoardsResponse>> {
    let response = state
        .study_board_service
        .list_public(query.page, query.limit, query.sort_by.as_deref())
        .await?;
    Ok(ApiResponse::ok(response))
}

/// POST /studyboard/{id}/like-dislike — toggle a reaction.
async fn toggle_reaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ReactionInput>,
) -> AppResult<ApiResponse<ReactionResponse>> {
    let response = state.study_board_service.toggle_reaction(&id, input).await?;
    Ok(ApiResponse::ok(response))
}

/// DELETE /studyboard/{id}/like-dislike — clear a user's reaction.
async fn remove_reaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<RemoveReactionInput>,
) -> AppResult<ApiResponse<ReactionResponse>> {
    let response = state.study_board_service.remove_reaction(&id, input).await?;
    Ok(ApiResponse::ok(response))
}

/// GET /studyboard/user/{user_id} — a user's boards, newest first.
async fn list_user_boards(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<Vec<StudyBoardResponse>>> {
    let response = state.study_board_service.list_user_boards(&user_id).await?;
    Ok(ApiResponse::ok(response))
}

/// GET /studyboard/group/{group_id} — boards shared with a group.
async fn list_group_boards(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> AppResult<ApiResponse<Vec<StudyBoardResponse>>> {
    let response = state
        .study_board_service
        .list_group_boards(&group_id)
        .await?;
    Ok(ApiResponse::ok(response))
}

/// GET /studyboard/board/{id} — a single board with content.
async fn get_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<StudyBoardResponse>> {
    let response = state.study_board_service.get_board(&id).await?;
    Ok(ApiResponse::ok(response))
}

/// PUT /studyboard/{id}/name — rename a board.
async fn rename(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<RenameBoardInput>,
) -> AppResult<ApiResponse<StudyBoardResponse>> {
    let response = state.study_board_service.rename(&id, input).await?;
    Ok(ApiResponse::ok(response))
}

/// DELETE /studyboard/{id} — hard-delete a board.
async fn delete_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Value>> {
    state.study_board_service.delete(&id).await?;
    Ok(ApiResponse::ok(json!({"deleted": true})))
}

/// GET /studyboard/health
async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "service": "studyboard"}))
}
