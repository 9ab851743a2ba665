//! Video chat repository: sessions and their messages.

use std::sync::Arc;

use crate::entities::{ChatMessage, ChatSession, chat_message, chat_session};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use studydeck_common::{AppError, AppResult};

/// Maximum number of sessions returned for a single user listing.
pub const SESSION_LIST_LIMIT: u64 = 50;

/// Chat repository for database operations.
#[derive(Clone)]
pub struct ChatRepository {
    db: Arc<DatabaseConnection>,
}

impl ChatRepository {
    /// Create a new chat repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a session by ID.
    pub async fn find_session_by_id(&self, id: &str) -> AppResult<Option<chat_session::Model>> {
        ChatSession::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a session by ID, returning an error if not found.
    pub async fn get_session_by_id(&self, id: &str) -> AppResult<chat_session::Model> {
        self.find_session_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Chat session: {id}")))
    }

    /// Find the session a user has for a video, if any.
    pub async fn find_session_by_user_and_video(
        &self,
        user_id: &str,
        video_id: &str,
    ) -> AppResult<Option<chat_session::Model>> {
        ChatSession::find()
            .filter(chat_session::Column::UserId.eq(user_id))
            .filter(chat_session::Column::VideoId.eq(video_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user's sessions, most recently active first.
    pub async fn find_sessions_by_user_id(
        &self,
        user_id: &str,
    ) -> AppResult<Vec<chat_session::Model>> {
        ChatSession::find()
            .filter(chat_session::Column::UserId.eq(user_id))
            .order_by_desc(chat_session::Column::LastActiveAt)
            .limit(SESSION_LIST_LIMIT)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new session.
    pub async fn create_session(
        &self,
        model: chat_session::ActiveModel,
    ) -> AppResult<chat_session::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a session.
    pub async fn update_session(
        &self,
        model: chat_session::ActiveModel,
    ) -> AppResult<chat_session::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a session; its messages cascade.
    pub async fn delete_session(&self, id: &str) -> AppResult<()> {
        ChatSession::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Find a session's messages, oldest first.
    pub async fn find_messages(&self, session_id: &str) -> AppResult<Vec<chat_message::Model>> {
        ChatMessage::find()
            .filter(chat_message::Column::SessionId.eq(session_id))
            .order_by_asc(chat_message::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count messages in a session.
    pub async fn count_messages(&self, session_id: &str) -> AppResult<u64> {
        ChatMessage::find()
            .filter(chat_message::Column::SessionId.eq(session_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Append a message to a session.
    pub async fn create_message(
        &self,
        model: chat_message::ActiveModel,
    ) -> AppResult<chat_message::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
