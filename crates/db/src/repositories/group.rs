//! Study group repository.

use std::sync::Arc;

use crate::entities::{
    GroupMember, GroupMessage, StudyGroup, group_member, group_message, study_group,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use studydeck_common::{AppError, AppResult};

/// Default number of chat messages per page.
pub const MESSAGE_PAGE_SIZE: u64 = 50;

/// Study group repository for database operations.
#[derive(Clone)]
pub struct GroupRepository {
    db: Arc<DatabaseConnection>,
}

impl GroupRepository {
    /// Create a new group repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    // ==================== Group Operations ====================

    /// Find a study group by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<study_group::Model>> {
        StudyGroup::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a study group by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<study_group::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::GroupNotFound(id.to_string()))
    }

    /// Find a study group by invite code.
    pub async fn find_by_invite_code(&self, code: &str) -> AppResult<Option<study_group::Model>> {
        StudyGroup::find()
            .filter(study_group::Column::InviteCode.eq(code))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new study group.
    pub async fn create(&self, model: study_group::ActiveModel) -> AppResult<study_group::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a study group. Members and messages cascade.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        StudyGroup::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ==================== Membership Operations ====================

    /// Check whether a user is a member of a group.
    pub async fn is_member(&self, group_id: &str, user_id: &str) -> AppResult<bool> {
        let count = GroupMember::find()
            .filter(group_member::Column::GroupId.eq(group_id))
            .filter(group_member::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Add a member to a group.
    pub async fn add_member(
        &self,
        model: group_member::ActiveModel,
    ) -> AppResult<group_member::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Remove a member from a group.
    pub async fn remove_member(&self, group_id: &str, user_id: &str) -> AppResult<()> {
        GroupMember::delete_many()
            .filter(group_member::Column::GroupId.eq(group_id))
            .filter(group_member::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List members of a group, oldest first.
    pub async fn find_members(&self, group_id: &str) -> AppResult<Vec<group_member::Model>> {
        GroupMember::find()
            .filter(group_member::Column::GroupId.eq(group_id))
            .order_by_asc(group_member::Column::JoinedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find all groups a user belongs to.
    pub async fn find_groups_for_user(&self, user_id: &str) -> AppResult<Vec<study_group::Model>> {
        let memberships = GroupMember::find()
            .filter(group_member::Column::UserId.eq(user_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let group_ids: Vec<String> = memberships.into_iter().map(|m| m.group_id).collect();
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }

        StudyGroup::find()
            .filter(study_group::Column::Id.is_in(group_ids))
            .order_by_desc(study_group::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ==================== Message Operations ====================

    /// Create a chat message.
    pub async fn create_message(
        &self,
        model: group_message::ActiveModel,
    ) -> AppResult<group_message::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List messages in a group, newest first.
    pub async fn find_messages(
        &self,
        group_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<group_message::Model>> {
        GroupMessage::find()
            .filter(group_message::Column::GroupId.eq(group_id))
            .order_by_desc(group_message::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List pinned messages in a group, newest first.
    pub async fn find_pinned_messages(
        &self,
        group_id: &str,
    ) -> AppResult<Vec<group_message::Model>> {
        GroupMessage::find()
            .filter(group_message::Column::GroupId.eq(group_id))
            .filter(group_message::Column::IsPinned.eq(true))
            .order_by_desc(group_message::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count chat messages authored by a user across all groups.
    pub async fn count_messages_by_user(&self, user_id: &str) -> AppResult<u64> {
        GroupMessage::find()
            .filter(group_message::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
