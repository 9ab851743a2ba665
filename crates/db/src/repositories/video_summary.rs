//! Video summary repository.

use std::sync::Arc;

use crate::entities::{VideoSummary, video_summary};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use studydeck_common::{AppError, AppResult};

/// Maximum number of summaries returned for a single user listing.
pub const SUMMARY_LIST_LIMIT: u64 = 50;

/// Video summary repository for database operations.
#[derive(Clone)]
pub struct VideoSummaryRepository {
    db: Arc<DatabaseConnection>,
}

impl VideoSummaryRepository {
    /// Create a new video summary repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a summary by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<video_summary::Model>> {
        VideoSummary::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a summary by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<video_summary::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Video summary: {id}")))
    }

    /// Find the summary a user has for a video, if any.
    pub async fn find_by_user_and_video(
        &self,
        user_id: &str,
        video_id: &str,
    ) -> AppResult<Option<video_summary::Model>> {
        VideoSummary::find()
            .filter(video_summary::Column::UserId.eq(user_id))
            .filter(video_summary::Column::VideoId.eq(video_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user's summaries, newest first.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Vec<video_summary::Model>> {
        VideoSummary::find()
            .filter(video_summary::Column::UserId.eq(user_id))
            .order_by_desc(video_summary::Column::CreatedAt)
            .limit(SUMMARY_LIST_LIMIT)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new summary.
    pub async fn create(
        &self,
        model: video_summary::ActiveModel,
    ) -> AppResult<video_summary::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an existing summary.
    pub async fn update(
        &self,
        model: video_summary::ActiveModel,
    ) -> AppResult<video_summary::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
