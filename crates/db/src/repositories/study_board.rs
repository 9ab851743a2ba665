//! Study board repository.

use std::str::FromStr;
use std::sync::Arc;

use crate::entities::{StudyBoard, study_board};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use studydeck_common::{AppError, AppResult};

/// Maximum number of boards returned for a single user listing.
pub const USER_BOARD_LIST_LIMIT: u64 = 50;

/// Sort order for the public board listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublicBoardSort {
    /// Newest first.
    #[default]
    Recent,
    /// Most liked first, newest breaking ties.
    MostLiked,
}

impl FromStr for PublicBoardSort {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recent" => Ok(Self::Recent),
            "most_liked" => Ok(Self::MostLiked),
            other => Err(AppError::BadRequest(format!(
                "Unknown sort order: {other}"
            ))),
        }
    }
}

/// Study board repository for database operations.
#[derive(Clone)]
pub struct StudyBoardRepository {
    db: Arc<DatabaseConnection>,
}

impl StudyBoardRepository {
    /// Create a new study board repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a study board by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<study_board::Model>> {
        StudyBoard::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a study board by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<study_board::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::BoardNotFound(id.to_string()))
    }

    /// Find all study boards owned by a user, newest first.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Vec<study_board::Model>> {
        StudyBoard::find()
            .filter(study_board::Column::UserId.eq(user_id))
            .order_by_desc(study_board::Column::CreatedAt)
            .limit(USER_BOARD_LIST_LIMIT)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find boards shared with a study group, newest first.
    pub async fn find_by_group_id(&self, group_id: &str) -> AppResult<Vec<study_board::Model>> {
        StudyBoard::find()
            .filter(study_board::Column::Visibility.eq("studygroup"))
            .filter(study_board::Column::StudyGroupId.eq(group_id))
            .order_by_desc(study_board::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find public boards with pagination.
    pub async fn find_public(
        &self,
        sort: PublicBoardSort,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<study_board::Model>> {
        let query = StudyBoard::find().filter(study_board::Column::Visibility.eq("public"));

        let query = match sort {
            PublicBoardSort::Recent => query.order_by_desc(study_board::Column::CreatedAt),
            PublicBoardSort::MostLiked => query
                .order_by_desc(study_board::Column::LikeCount)
                .order_by_desc(study_board::Column::CreatedAt),
        };

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count public boards.
    pub async fn count_public(&self) -> AppResult<u64> {
        StudyBoard::find()
            .filter(study_board::Column::Visibility.eq("public"))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all boards owned by a user.
    pub async fn count_by_user_id(&self, user_id: &str) -> AppResult<u64> {
        StudyBoard::find()
            .filter(study_board::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new study board.
    pub async fn create(&self, model: study_board::ActiveModel) -> AppResult<study_board::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a study board.
    pub async fn update(&self, model: study_board::ActiveModel) -> AppResult<study_board::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a study board.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        StudyBoard::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_parsing() {
        assert_eq!(
            "most_liked".parse::<PublicBoardSort>().ok(),
            Some(PublicBoardSort::MostLiked)
        );
        assert_eq!(
            "recent".parse::<PublicBoardSort>().ok(),
            Some(PublicBoardSort::Recent)
        );
        assert!("popular".parse::<PublicBoardSort>().is_err());
    }

    #[test]
    fn test_sort_default_is_recent() {
        assert_eq!(PublicBoardSort::default(), PublicBoardSort::Recent);
    }
}
