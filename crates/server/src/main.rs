//! Studydeck server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use studydeck_api::{AppState, SseBroadcaster, SseEventPublisher, router as api_router};
use studydeck_common::Config;
use studydeck_core::services::{
    ai::GeminiClient,
    chat::VideoChatService,
    event_publisher::EventPublisherService,
    extension::ExtensionService,
    flow::FlowService,
    group::GroupService,
    study_board::StudyBoardService,
    translation::TranslationService,
    user::UserService,
    youtube::YoutubeClient,
};
use studydeck_db::repositories::{
    ChatRepository, GroupRepository, StudyBoardRepository, UserRepository,
    VideoSummaryRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studydeck=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting studydeck server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = studydeck_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    studydeck_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let board_repo = StudyBoardRepository::new(Arc::clone(&db));
    let group_repo = GroupRepository::new(Arc::clone(&db));
    let user_repo = UserRepository::new(Arc::clone(&db));
    let summary_repo = VideoSummaryRepository::new(Arc::clone(&db));
    let chat_repo = ChatRepository::new(Arc::clone(&db));

    // External clients
    let youtube = YoutubeClient::new(config.youtube.api_key.clone());
    let ai = GeminiClient::new(config.ai.api_key.clone(), config.ai.model.clone());
    if !ai.is_configured() {
        tracing::warn!("No AI API key configured; generation endpoints will be unavailable");
    }

    // Realtime streaming
    let sse_broadcaster = SseBroadcaster::new();
    let _cleanup_task = sse_broadcaster.spawn_cleanup(std::time::Duration::from_secs(300));
    let events: EventPublisherService =
        Arc::new(SseEventPublisher::new(sse_broadcaster.clone()));

    // Initialize services
    let user_service = UserService::new(user_repo.clone());
    let study_board_service = StudyBoardService::new(
        board_repo.clone(),
        group_repo.clone(),
        user_repo.clone(),
        youtube.clone(),
        ai.clone(),
        events.clone(),
    );
    let group_service = GroupService::new(group_repo.clone(), user_repo, events);
    let flow_service = FlowService::new(board_repo, group_repo, ai.clone());
    let translation_service = TranslationService::new(
        config.translation.url.clone(),
        config.translation.timeout_seconds,
    );
    let extension_service = ExtensionService::new(youtube.clone(), ai.clone(), summary_repo.clone());
    let chat_service = VideoChatService::new(chat_repo, summary_repo, youtube, ai);

    // Create app state
    let state = AppState {
        user_service,
        study_board_service,
        group_service,
        flow_service,
        translation_service,
        extension_service,
        chat_service,
        sse_broadcaster,
    };

    // Build router
    let app = api_router()
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
