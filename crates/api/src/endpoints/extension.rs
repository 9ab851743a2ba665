//! Browser-extension endpoints: summaries, transcripts, history, video chat.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde_json::{Value, json};
use studydeck_common::error::AppResult;
use studydeck_core::services::chat::{
    ChatHistoryResponse, ChatReplyResponse, OpenSessionInput, SendMessageInput,
    SessionListResponse, SessionResponse,
};
use studydeck_core::services::extension::{
    ExtensionInput, SummarizeResponse, TranscriptResponse, VideoSummaryResponse,
};

use crate::{response::ApiResponse, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summarize", post(summarize))
        .route("/transcript", post(transcript))
        .route("/history/{user_id}", get(history))
        .route("/summary/{id}", get(summary))
        .route("/chat/session", post(open_chat_session))
        .route(
            "/chat/session/{session_id}",
            get(chat_history).delete(delete_chat_session),
        )
        .route("/chat/session/{session_id}/message", post(send_chat_message))
        .route("/chat/user/{user_id}/sessions", get(list_chat_sessions))
        .route("/health", get(health))
}

/// POST /api/extension/summarize
async fn summarize(
    State(state): State<AppState>,
    Json(input): Json<ExtensionInput>,
) -> AppResult<ApiResponse<SummarizeResponse>> {
    let response = state.extension_service.summarize(input).await?;
    Ok(ApiResponse::ok(response))
}

/// POST /api/extension/transcript
async fn transcript(
    State(state): State<AppState>,
    Json(input): Json<ExtensionInput>,
) -> AppResult<ApiResponse<TranscriptResponse>> {
    let response = state.extension_service.transcript(input).await?;
    Ok(ApiResponse::ok(response))
}

/// GET /api/extension/history/{user_id}
async fn history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<Vec<VideoSummaryResponse>>> {
    let response = state.extension_service.history(&user_id).await?;
    Ok(ApiResponse::ok(response))
}

/// GET /api/extension/summary/{id}
async fn summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<VideoSummaryResponse>> {
    let response = state.extension_service.summary(&id).await?;
    Ok(ApiResponse::ok(response))
}

/// POST /api/extension/chat/session
async fn open_chat_session(
    State(state): State<AppState>,
    Json(input): Json<OpenSessionInput>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let response = state.chat_service.open_session(input).await?;
    Ok(ApiResponse::ok(response))
}

/// GET /api/extension/chat/session/{session_id}
async fn chat_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> AppResult<ApiResponse<ChatHistoryResponse>> {
    let response = state.chat_service.history(&session_id).await?;
    Ok(ApiResponse::ok(response))
}

/// POST /api/extension/chat/session/{session_id}/message
async fn send_chat_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(input): Json<SendMessageInput>,
) -> AppResult<ApiResponse<ChatReplyResponse>> {
    let response = state.chat_service.send_message(&session_id, input).await?;
    Ok(ApiResponse::ok(response))
}

/// GET /api/extension/chat/user/{user_id}/sessions
async fn list_chat_sessions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<SessionListResponse>> {
    let response = state.chat_service.list_sessions(&user_id).await?;
    Ok(ApiResponse::ok(response))
}

/// DELETE /api/extension/chat/session/{session_id}
async fn delete_chat_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> AppResult<ApiResponse<Value>> {
    state.chat_service.delete_session(&session_id).await?;
    Ok(ApiResponse::ok(json!({"deleted": true})))
}

/// GET /api/extension/health
async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "service": "extension"}))
}
