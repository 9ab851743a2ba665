//! HTTP API layer for studydeck.
//!
//! This crate provides the REST API and real-time streaming:
//!
//! - **Endpoints**: study boards, flow plans, translation, groups, and the
//!   browser-extension surface
//! - **Streaming**: Server-Sent Events per study group
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod response;
pub mod sse;
pub mod state;

pub use endpoints::router;
pub use sse::{SseBroadcaster, SseEvent, SseEventPublisher};
pub use state::AppState;
