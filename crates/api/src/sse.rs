//! Server-Sent Events streaming for study groups.
//!
//! Each study group gets its own broadcast channel. Clients subscribe with
//! `GET /streaming/sse/group/{group_id}` and receive realtime events when
//! boards are shared, messages are posted, or members join.

use std::{collections::HashMap, convert::Infallible, sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::{
    Router,
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use futures::stream::Stream;
use serde::Serialize;
use studydeck_common::error::AppResult;
use studydeck_core::services::event_publisher::EventPublisher;
use tokio::sync::{RwLock, broadcast};
use tokio_stream::{StreamExt, wrappers::BroadcastStream};

use crate::state::AppState;

const CHANNEL_CAPACITY: usize = 256;
const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// Events delivered over a group's SSE stream.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SseEvent {
    /// Sent once when a client connects.
    #[serde(rename_all = "camelCase")]
    Connected { group_id: String },
    /// A study board was shared into the group.
    #[serde(rename_all = "camelCase")]
    BoardShared {
        group_id: String,
        board_id: String,
        board_name: String,
        user_id: String,
    },
    /// A chat message was posted in the group.
    #[serde(rename_all = "camelCase")]
    MessagePosted {
        group_id: String,
        message_id: String,
        user_id: String,
        content: String,
        is_pinned: bool,
    },
    /// A user joined the group.
    #[serde(rename_all = "camelCase")]
    MemberJoined { group_id: String, user_id: String },
}

/// In-process broadcaster with one channel per study group.
///
/// Channels are created lazily on first subscribe or publish and cleaned up
/// when the last receiver drops.
#[derive(Clone, Default)]
pub struct SseBroadcaster {
    group_channels: Arc<RwLock<HashMap<String, broadcast::Sender<SseEvent>>>>,
}

impl SseBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the broadcast channel for a group.
    pub async fn group_channel(&self, group_id: &str) -> broadcast::Sender<SseEvent> {
        {
            let channels = self.group_channels.read().await;
            if let Some(tx) = channels.get(group_id) {
                return tx.clone();
            }
        }

        let mut channels = self.group_channels.write().await;
        channels
            .entry(group_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }

    /// Broadcast an event to all subscribers of a group.
    ///
    /// Returns the number of receivers the event was delivered to.
    pub async fn broadcast_to_group(&self, group_id: &str, event: SseEvent) -> usize {
        let channels = self.group_channels.read().await;
        match channels.get(group_id) {
            // send() only fails when there are no receivers
            Some(tx) => tx.send(event).unwrap_or(0),
            None => 0,
        }
    }

    /// Drop channels that no longer have any subscribers.
    pub async fn cleanup(&self) {
        let mut channels = self.group_channels.write().await;
        channels.retain(|_, tx| tx.receiver_count() > 0);
    }

    /// Run [`Self::cleanup`] on a fixed period so the channel map does not
    /// grow with every group id ever subscribed to.
    pub fn spawn_cleanup(&self, period: Duration) -> tokio::task::JoinHandle<()> {
        let broadcaster = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // the first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                broadcaster.cleanup().await;
            }
        })
    }

    #[cfg(test)]
    async fn channel_count(&self) -> usize {
        self.group_channels.read().await.len()
    }
}

/// Publishes service-layer stream events into the SSE broadcaster.
#[derive(Clone)]
pub struct SseEventPublisher {
    broadcaster: SseBroadcaster,
}

impl SseEventPublisher {
    pub const fn new(broadcaster: SseBroadcaster) -> Self {
        Self { broadcaster }
    }
}

impl SseEventPublisher {
    async fn deliver(&self, group_id: &str, event: SseEvent) -> AppResult<()> {
        let delivered = self.broadcaster.broadcast_to_group(group_id, event).await;
        tracing::debug!(group_id = %group_id, receivers = delivered, "published stream event");
        Ok(())
    }
}

#[async_trait]
impl EventPublisher for SseEventPublisher {
    async fn publish_board_shared(
        &self,
        group_id: &str,
        board_id: &str,
        board_name: &str,
        user_id: &str,
    ) -> AppResult<()> {
        self.deliver(
            group_id,
            SseEvent::BoardShared {
                group_id: group_id.to_string(),
                board_id: board_id.to_string(),
                board_name: board_name.to_string(),
                user_id: user_id.to_string(),
            },
        )
        .await
    }

    async fn publish_message_posted(
        &self,
        group_id: &str,
        message_id: &str,
        user_id: &str,
        content: &str,
        is_pinned: bool,
    ) -> AppResult<()> {
        self.deliver(
            group_id,
            SseEvent::MessagePosted {
                group_id: group_id.to_string(),
                message_id: message_id.to_string(),
                user_id: user_id.to_string(),
                content: content.to_string(),
                is_pinned,
            },
        )
        .await
    }

    async fn publish_member_joined(&self, group_id: &str, user_id: &str) -> AppResult<()> {
        self.deliver(
            group_id,
            SseEvent::MemberJoined {
                group_id: group_id.to_string(),
                user_id: user_id.to_string(),
            },
        )
        .await
    }
}

/// Streaming routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/group/{group_id}", get(group_stream))
}

async fn group_stream(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let tx = state.sse_broadcaster.group_channel(&group_id).await;
    let rx = tx.subscribe();

    tracing::debug!(group_id = %group_id, "sse client connected");

    let connected = SseEvent::Connected {
        group_id: group_id.clone(),
    };
    let initial = futures::stream::once(async move { to_sse_event(&connected) });

    let events = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(event) => Some(to_sse_event(&event)),
        // Lagged receivers skip missed events and keep streaming
        Err(_) => None,
    });

    Sse::new(initial.chain(events)).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL))
}

fn to_sse_event(event: &SseEvent) -> Result<Event, Infallible> {
    match Event::default().json_data(event) {
        Ok(e) => Ok(e),
        Err(err) => {
            tracing::warn!(error = %err, "failed to serialize sse event");
            Ok(Event::default().data("{}"))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_broadcast_reaches_subscriber() {
        let broadcaster = SseBroadcaster::new();
        let tx = broadcaster.group_channel("g1").await;
        let mut rx = tx.subscribe();

        let delivered = broadcaster
            .broadcast_to_group(
                "g1",
                SseEvent::MemberJoined {
                    group_id: "g1".to_string(),
                    user_id: "u1".to_string(),
                },
            )
            .await;
        assert_eq!(delivered, 1);

        let event = rx.recv().await.unwrap();
        match event {
            SseEvent::MemberJoined { group_id, user_id } => {
                assert_eq!(group_id, "g1");
                assert_eq!(user_id, "u1");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_broadcast_without_subscribers() {
        let broadcaster = SseBroadcaster::new();
        let delivered = broadcaster
            .broadcast_to_group(
                "missing",
                SseEvent::MemberJoined {
                    group_id: "missing".to_string(),
                    user_id: "u1".to_string(),
                },
            )
            .await;
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_cleanup_removes_idle_channels() {
        let broadcaster = SseBroadcaster::new();
        let tx = broadcaster.group_channel("g1").await;
        let rx = tx.subscribe();
        assert_eq!(broadcaster.channel_count().await, 1);

        drop(rx);
        drop(tx);
        broadcaster.cleanup().await;
        assert_eq!(broadcaster.channel_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_task_prunes_idle_channels() {
        let broadcaster = SseBroadcaster::new();
        let tx = broadcaster.group_channel("g1").await;
        drop(tx.subscribe());
        drop(tx);
        assert_eq!(broadcaster.channel_count().await, 1);

        let handle = broadcaster.spawn_cleanup(Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(120)).await;

        assert_eq!(broadcaster.channel_count().await, 0);
        handle.abort();
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = SseEvent::BoardShared {
            group_id: "g1".to_string(),
            board_id: "b1".to_string(),
            board_name: "Calculus".to_string(),
            user_id: "u1".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "boardShared");
        assert_eq!(json["boardId"], "b1");
    }
}
