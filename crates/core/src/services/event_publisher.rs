//! Event publisher service.
//!
//! Provides an abstraction for publishing real-time group events.
//! The actual implementation is provided by the API layer (SSE broadcast).

use async_trait::async_trait;
use std::sync::Arc;
use studydeck_common::AppResult;

/// Trait for publishing real-time events.
///
/// This allows the core services to publish events without directly
/// depending on the streaming implementation.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a board shared event.
    async fn publish_board_shared(
        &self,
        group_id: &str,
        board_id: &str,
        board_name: &str,
        user_id: &str,
    ) -> AppResult<()>;

    /// Publish a message posted event.
    async fn publish_message_posted(
        &self,
        group_id: &str,
        message_id: &str,
        user_id: &str,
        content: &str,
        is_pinned: bool,
    ) -> AppResult<()>;

    /// Publish a member joined event.
    async fn publish_member_joined(&self, group_id: &str, user_id: &str) -> AppResult<()>;
}

/// A no-op implementation of `EventPublisher` for testing or when real-time
/// events are disabled.
#[derive(Clone, Default)]
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish_board_shared(
        &self,
        _group_id: &str,
        _board_id: &str,
        _board_name: &str,
        _user_id: &str,
    ) -> AppResult<()> {
        Ok(())
    }

    async fn publish_message_posted(
        &self,
        _group_id: &str,
        _message_id: &str,
        _user_id: &str,
        _content: &str,
        _is_pinned: bool,
    ) -> AppResult<()> {
        Ok(())
    }

    async fn publish_member_joined(&self, _group_id: &str, _user_id: &str) -> AppResult<()> {
        Ok(())
    }
}

/// Wrapper for boxed `EventPublisher` trait object.
pub type EventPublisherService = Arc<dyn EventPublisher>;
