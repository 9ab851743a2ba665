//! API endpoint modules.

use axum::Router;

use crate::state::AppState;

pub mod extension;
pub mod flow;
pub mod groups;
pub mod studyboard;
pub mod translation;
pub mod users;

/// Build the complete API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/api/extension", extension::router())
        .nest("/studyboard", studyboard::router())
        .nest("/flow", flow::router())
        .nest("/translate", translation::router())
        .nest("/groups", groups::router())
        .nest("/users", users::router())
        .nest("/streaming/sse", crate::sse::router())
}
