//! Study group endpoints: lifecycle, membership, chat.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use studydeck_common::error::AppResult;
use studydeck_core::services::group::{
    AddMemberInput, CreateGroupInput, GroupDetailResponse, GroupResponse, JoinGroupInput,
    MemberResponse, MessageResponse, PostMessageInput,
};

use crate::{response::ApiResponse, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/join", post(join))
        .route("/member/{user_id}", get(list_for_user))
        .route("/{group_id}", get(get_detail).delete(delete_group))
        .route("/{group_id}/members", post(add_member))
        .route("/{group_id}/members/{member_id}", delete(remove_member))
        .route(
            "/{group_id}/messages",
            get(list_messages).post(post_message),
        )
        .route("/health", get(health))
}

/// POST /groups/create
async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateGroupInput>,
) -> AppResult<ApiResponse<GroupResponse>> {
    let response = state.group_service.create(input).await?;
    Ok(ApiResponse::ok(response))
}

/// POST /groups/join — join by invite code.
async fn join(
    State(state): State<AppState>,
    Json(input): Json<JoinGroupInput>,
) -> AppResult<ApiResponse<GroupResponse>> {
    let response = state.group_service.join(input).await?;
    Ok(ApiResponse::ok(response))
}

/// GET /groups/{group_id} — group detail with members.
async fn get_detail(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> AppResult<ApiResponse<GroupDetailResponse>> {
    let response = state.group_service.get_detail(&group_id).await?;
    Ok(ApiResponse::ok(response))
}

/// GET /groups/member/{user_id} — groups a user belongs to.
async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<Vec<GroupResponse>>> {
    let response = state.group_service.list_for_user(&user_id).await?;
    Ok(ApiResponse::ok(response))
}

/// POST /groups/{group_id}/members — add a member directly.
async fn add_member(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Json(input): Json<AddMemberInput>,
) -> AppResult<ApiResponse<MemberResponse>> {
    let response = state.group_service.add_member(&group_id, input).await?;
    Ok(ApiResponse::ok(response))
}

/// DELETE /groups/{group_id}/members/{member_id}
async fn remove_member(
    State(state): State<AppState>,
    Path((group_id, member_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<Value>> {
    state
        .group_service
        .remove_member(&group_id, &member_id)
        .await?;
    Ok(ApiResponse::ok(json!({"removed": true})))
}

#[derive(Debug, Deserialize)]
struct MessagesQuery {
    limit: Option<u64>,
    #[serde(default)]
    pinned: bool,
}

/// GET /groups/{group_id}/messages — newest first; `?pinned=true` restricts
/// to pinned board announcements.
async fn list_messages(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Query(query): Query<MessagesQuery>,
) -> AppResult<ApiResponse<Vec<MessageResponse>>> {
    let response = state
        .group_service
        .list_messages(&group_id, query.limit, query.pinned)
        .await?;
    Ok(ApiResponse::ok(response))
}

/// POST /groups/{group_id}/messages — post a chat message.
async fn post_message(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Json(input): Json<PostMessageInput>,
) -> AppResult<ApiResponse<MessageResponse>> {
    let response = state.group_service.post_message(&group_id, input).await?;
    Ok(ApiResponse::ok(response))
}

/// DELETE /groups/{group_id} — delete a group and cascade its data.
async fn delete_group(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> AppResult<ApiResponse<Value>> {
    state.group_service.delete(&group_id).await?;
    Ok(ApiResponse::ok(json!({"deleted": true})))
}

/// GET /groups/health
async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "service": "groups"}))
}
