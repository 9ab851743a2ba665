//! Integration tests for the HTTP API.
//!
//! These use a mock database connection, so they exercise routing,
//! extraction, and validation paths that reject a request before any
//! query runs.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::{Value, json};
use studydeck_api::{AppState, SseBroadcaster, router};
use studydeck_core::services::{
    ai::GeminiClient,
    chat::VideoChatService,
    event_publisher::{EventPublisherService, NoOpEventPublisher},
    extension::ExtensionService,
    flow::FlowService,
    group::GroupService,
    study_board::StudyBoardService,
    translation::TranslationService,
    user::UserService,
    youtube::YoutubeClient,
};
use studydeck_db::entities::{study_board, video_summary};
use studydeck_db::repositories::{
    ChatRepository, GroupRepository, StudyBoardRepository, UserRepository,
    VideoSummaryRepository,
};
use tower::ServiceExt;

fn test_app(db: DatabaseConnection) -> Router {
    let db = Arc::new(db);

    let board_repo = StudyBoardRepository::new(db.clone());
    let group_repo = GroupRepository::new(db.clone());
    let user_repo = UserRepository::new(db.clone());
    let summary_repo = VideoSummaryRepository::new(db.clone());
    let chat_repo = ChatRepository::new(db);

    let youtube = YoutubeClient::new(None);
    let ai = GeminiClient::new(None, "gemini-2.0-flash".to_string());
    let events: EventPublisherService = Arc::new(NoOpEventPublisher);

    let state = AppState {
        user_service: UserService::new(user_repo.clone()),
        study_board_service: StudyBoardService::new(
            board_repo.clone(),
            group_repo.clone(),
            user_repo.clone(),
            youtube.clone(),
            ai.clone(),
            events.clone(),
        ),
        group_service: GroupService::new(group_repo.clone(), user_repo, events),
        flow_service: FlowService::new(board_repo, group_repo, ai.clone()),
        translation_service: TranslationService::new("http://localhost:5000".to_string(), 5),
        extension_service: ExtensionService::new(
            youtube.clone(),
            ai.clone(),
            summary_repo.clone(),
        ),
        chat_service: VideoChatService::new(chat_repo, summary_repo, youtube, ai),
        sse_broadcaster: SseBroadcaster::new(),
    };

    router().with_state(state)
}

fn create_test_app() -> Router {
    test_app(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
}

fn board_fixture(visibility: &str) -> study_board::Model {
    study_board::Model {
        id: "b1".to_string(),
        user_id: "u1".to_string(),
        youtube_video_id: "dQw4w9WgXcQ".to_string(),
        video_title: "Linear Algebra".to_string(),
        video_channel: "Maths".to_string(),
        video_duration: "12:34".to_string(),
        video_url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
        study_board_name: "Linear Algebra".to_string(),
        visibility: visibility.to_string(),
        study_group_id: None,
        likes: json!([]),
        dislikes: json!([]),
        like_count: 0,
        dislike_count: 0,
        content: json!({}),
        created_at: chrono::Utc::now().fixed_offset(),
        updated_at: None,
    }
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn test_health_endpoints() {
    for uri in [
        "/studyboard/health",
        "/flow/health",
        "/translate/health",
        "/groups/health",
        "/users/health",
        "/api/extension/health",
    ] {
        let app = create_test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK, "health check {uri}");

        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
    }
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/nope")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_save_board_group_visibility_requires_group_id() {
    let app = create_test_app();
    let response = app
        .oneshot(post_json(
            "/studyboard/save",
            json!({
                "youtubeUrl": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
                "userId": "u1",
                "studyBoardName": "Linear Algebra",
                "visibility": "studygroup",
                "content": {
                    "tldr": "x",
                    "detailedSummary": "x",
                    "summary": ["x"],
                    "flashcards": [],
                    "quiz": []
                }
            }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_save_board_rejects_unknown_visibility() {
    let app = create_test_app();
    let response = app
        .oneshot(post_json(
            "/studyboard/save",
            json!({
                "youtubeUrl": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
                "userId": "u1",
                "studyBoardName": "Linear Algebra",
                "visibility": "friends",
                "content": {}
            }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_public_listing_rejects_unknown_sort() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/studyboard/public?sortBy=banana")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_translate_rejects_unsupported_language() {
    let app = create_test_app();
    let response = app
        .oneshot(post_json(
            "/translate",
            json!({"text": "hello", "targetLang": "de"}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_translate_rejects_empty_text() {
    let app = create_test_app();
    let response = app
        .oneshot(post_json(
            "/translate",
            json!({"text": "   ", "targetLang": "en"}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Bad request: Text is required");
}

#[tokio::test]
async fn test_reaction_on_private_board_is_forbidden() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![board_fixture("private")]])
        .into_connection();
    let app = test_app(db);

    let response = app
        .oneshot(post_json(
            "/studyboard/b1/like-dislike",
            json!({"userId": "u2", "action": "like"}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_remove_reaction_on_group_board_is_forbidden() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![board_fixture("studygroup")]])
        .into_connection();
    let app = test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/studyboard/b1/like-dislike")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"userId": "u2"}).to_string()))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_extension_summarize_requires_url() {
    let app = create_test_app();
    let response = app
        .oneshot(post_json("/api/extension/summarize", json!({})))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_extension_rejects_non_video_url() {
    let app = create_test_app();
    let response = app
        .oneshot(post_json(
            "/api/extension/transcript",
            json!({"url": "https://example.com/not-a-video"}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_summary_history_lists_saved_summaries() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<video_summary::Model>::new()])
        .into_connection();
    let app = test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/extension/history/u1")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_chat_session_rejects_non_video_url() {
    let app = create_test_app();
    let response = app
        .oneshot(post_json(
            "/api/extension/chat/session",
            json!({"userId": "u1", "videoUrl": "https://example.com/not-a-video"}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_message_requires_content() {
    let app = create_test_app();
    let response = app
        .oneshot(post_json(
            "/api/extension/chat/session/s1/message",
            json!({"message": "   "}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_flow_generation_requires_goal() {
    let app = create_test_app();
    let response = app
        .oneshot(post_json(
            "/flow/generate-flow",
            json!({"userId": "u1", "goal": "   "}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_group_creation_requires_name() {
    let app = create_test_app();
    let response = app
        .oneshot(post_json(
            "/groups/create",
            json!({"name": "", "ownerId": "u1"}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_user_registration_rejects_invalid_email() {
    let app = create_test_app();
    let response = app
        .oneshot(post_json(
            "/users",
            json!({"username": "alice", "email": "not-an-email"}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sse_stream_connects() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/streaming/sse/group/g1")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("text/event-stream"));
}
