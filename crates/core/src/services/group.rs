//! Study group service: creation, invite codes, membership, chat.

use sea_orm::Set;
use serde::{Deserialize, Serialize};
use studydeck_common::{AppError, AppResult, IdGenerator};
use studydeck_db::entities::{group_member, group_message, study_group};
use studydeck_db::repositories::{GroupRepository, UserRepository, group::MESSAGE_PAGE_SIZE};
use tracing::warn;

use super::event_publisher::EventPublisherService;

/// Attempts to mint a unique invite code before giving up.
const INVITE_CODE_ATTEMPTS: usize = 5;

/// Input for creating a study group.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupInput {
    pub name: String,
    pub owner_id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_private: bool,
}

/// Input for joining a group by invite code.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinGroupInput {
    pub invite_code: String,
    pub user_id: String,
}

/// Input for adding a member directly.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberInput {
    pub user_id: String,
}

/// Input for posting a chat message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageInput {
    pub user_id: String,
    pub content: String,
}

/// A study group.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: String,
    pub invite_code: String,
    pub is_private: bool,
    pub created_at: String,
}

impl From<study_group::Model> for GroupResponse {
    fn from(g: study_group::Model) -> Self {
        Self {
            id: g.id,
            name: g.name,
            description: g.description,
            owner_id: g.owner_id,
            invite_code: g.invite_code,
            is_private: g.is_private,
            created_at: g.created_at.to_rfc3339(),
        }
    }
}

/// A group membership.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub user_id: String,
    pub role: String,
    pub joined_at: String,
}

impl From<group_member::Model> for MemberResponse {
    fn from(m: group_member::Model) -> Self {
        Self {
            user_id: m.user_id,
            role: m.role,
            joined_at: m.joined_at.to_rfc3339(),
        }
    }
}

/// Group detail with member list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDetailResponse {
    #[serde(flatten)]
    pub group: GroupResponse,
    pub members: Vec<MemberResponse>,
}

/// A chat message.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: String,
    pub group_id: String,
    pub user_id: String,
    pub content: String,
    pub is_pinned: bool,
    pub created_at: String,
}

impl From<group_message::Model> for MessageResponse {
    fn from(m: group_message::Model) -> Self {
        Self {
            id: m.id,
            group_id: m.group_id,
            user_id: m.user_id,
            content: m.content,
            is_pinned: m.is_pinned,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

/// Service for managing study groups.
#[derive(Clone)]
pub struct GroupService {
    group_repo: GroupRepository,
    user_repo: UserRepository,
    events: EventPublisherService,
    id_gen: IdGenerator,
}

impl GroupService {
    /// Create a new group service.
    #[must_use]
    pub fn new(
        group_repo: GroupRepository,
        user_repo: UserRepository,
        events: EventPublisherService,
    ) -> Self {
        Self {
            group_repo,
            user_repo,
            events,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a study group. The owner is added as its first member.
    pub async fn create(&self, input: CreateGroupInput) -> AppResult<GroupResponse> {
        let name = input.name.trim();
        if name.is_empty() || name.len() > 128 {
            return Err(AppError::Validation(
                "Group name must be between 1 and 128 characters".to_string(),
            ));
        }

        self.user_repo.get_by_id(&input.owner_id).await?;

        let invite_code = self.mint_invite_code().await?;
        let now = chrono::Utc::now();
        let group_id = self.id_gen.generate();

        let group = self
            .group_repo
            .create(study_group::ActiveModel {
                id: Set(group_id.clone()),
                name: Set(name.to_string()),
                description: Set(input.description),
                owner_id: Set(input.owner_id.clone()),
                invite_code: Set(invite_code),
                is_private: Set(input.is_private),
                created_at: Set(now.into()),
                updated_at: Set(None),
            })
            .await?;

        self.group_repo
            .add_member(group_member::ActiveModel {
                id: Set(self.id_gen.generate()),
                group_id: Set(group_id),
                user_id: Set(input.owner_id),
                role: Set("owner".to_string()),
                joined_at: Set(now.into()),
            })
            .await?;

        Ok(group.into())
    }

    /// Join a group by invite code.
    pub async fn join(&self, input: JoinGroupInput) -> AppResult<GroupResponse> {
        let code = input.invite_code.trim().to_uppercase();
        let group = self
            .group_repo
            .find_by_invite_code(&code)
            .await?
            .ok_or_else(|| AppError::GroupNotFound(format!("invite code {code}")))?;

        self.user_repo.get_by_id(&input.user_id).await?;

        if self.group_repo.is_member(&group.id, &input.user_id).await? {
            return Err(AppError::Conflict(
                "Already a member of this group".to_string(),
            ));
        }

        self.group_repo
            .add_member(group_member::ActiveModel {
                id: Set(self.id_gen.generate()),
                group_id: Set(group.id.clone()),
                user_id: Set(input.user_id.clone()),
                role: Set("member".to_string()),
                joined_at: Set(chrono::Utc::now().into()),
            })
            .await?;

        if let Err(err) = self
            .events
            .publish_member_joined(&group.id, &input.user_id)
            .await
        {
            warn!(group_id = %group.id, error = %err, "Failed to publish member joined event");
        }

        Ok(group.into())
    }

    /// Get a group with its member list.
    pub async fn get_detail(&self, group_id: &str) -> AppResult<GroupDetailResponse> {
        let group = self.group_repo.get_by_id(group_id).await?;
        let members = self.group_repo.find_members(group_id).await?;

        Ok(GroupDetailResponse {
            group: group.into(),
            members: members.into_iter().map(Into::into).collect(),
        })
    }

    /// List groups a user belongs to.
    pub async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<GroupResponse>> {
        let groups = self.group_repo.find_groups_for_user(user_id).await?;
        Ok(groups.into_iter().map(Into::into).collect())
    }

    /// Add a member directly to a group.
    pub async fn add_member(&self, group_id: &str, input: AddMemberInput) -> AppResult<MemberResponse> {
        self.group_repo.get_by_id(group_id).await?;
        self.user_repo.get_by_id(&input.user_id).await?;

        if self.group_repo.is_member(group_id, &input.user_id).await? {
            return Err(AppError::Conflict(
                "Already a member of this group".to_string(),
            ));
        }

        let member = self
            .group_repo
            .add_member(group_member::ActiveModel {
                id: Set(self.id_gen.generate()),
                group_id: Set(group_id.to_string()),
                user_id: Set(input.user_id),
                role: Set("member".to_string()),
                joined_at: Set(chrono::Utc::now().into()),
            })
            .await?;

        Ok(member.into())
    }

    /// Remove a member from a group. The owner cannot be removed.
    pub async fn remove_member(&self, group_id: &str, member_id: &str) -> AppResult<()> {
        let group = self.group_repo.get_by_id(group_id).await?;
        if group.owner_id == member_id {
            return Err(AppError::Forbidden(
                "The group owner cannot be removed".to_string(),
            ));
        }

        if !self.group_repo.is_member(group_id, member_id).await? {
            return Err(AppError::NotFound(format!(
                "Member {member_id} in group {group_id}"
            )));
        }

        self.group_repo.remove_member(group_id, member_id).await
    }

    /// List chat messages, newest first. `pinned_only` restricts the listing
    /// to pinned board announcements.
    pub async fn list_messages(
        &self,
        group_id: &str,
        limit: Option<u64>,
        pinned_only: bool,
    ) -> AppResult<Vec<MessageResponse>> {
        self.group_repo.get_by_id(group_id).await?;
        let messages = if pinned_only {
            self.group_repo.find_pinned_messages(group_id).await?
        } else {
            let limit = limit.unwrap_or(MESSAGE_PAGE_SIZE).clamp(1, 200);
            self.group_repo.find_messages(group_id, limit, 0).await?
        };
        Ok(messages.into_iter().map(Into::into).collect())
    }

    /// Post a chat message to a group.
    pub async fn post_message(
        &self,
        group_id: &str,
        input: PostMessageInput,
    ) -> AppResult<MessageResponse> {
        let content = input.content.trim();
        if content.is_empty() {
            return Err(AppError::Validation(
                "Message content must not be empty".to_string(),
            ));
        }

        self.group_repo.get_by_id(group_id).await?;
        if !self.group_repo.is_member(group_id, &input.user_id).await? {
            return Err(AppError::Forbidden(
                "Only group members can post messages".to_string(),
            ));
        }

        let message = self
            .group_repo
            .create_message(group_message::ActiveModel {
                id: Set(self.id_gen.generate()),
                group_id: Set(group_id.to_string()),
                user_id: Set(input.user_id.clone()),
                content: Set(content.to_string()),
                is_pinned: Set(false),
                created_at: Set(chrono::Utc::now().into()),
            })
            .await?;

        if let Err(err) = self
            .events
            .publish_message_posted(group_id, &message.id, &input.user_id, content, false)
            .await
        {
            warn!(group_id, error = %err, "Failed to publish message posted event");
        }

        Ok(message.into())
    }

    /// Delete a group. Members, messages, and board links cascade.
    pub async fn delete(&self, group_id: &str) -> AppResult<()> {
        self.group_repo.get_by_id(group_id).await?;
        self.group_repo.delete(group_id).await
    }

    /// Mint an invite code that is not already in use.
    async fn mint_invite_code(&self) -> AppResult<String> {
        for _ in 0..INVITE_CODE_ATTEMPTS {
            let code = self.id_gen.generate_invite_code();
            if self.group_repo.find_by_invite_code(&code).await?.is_none() {
                return Ok(code);
            }
        }
        Err(AppError::Internal(
            "Could not allocate a unique invite code".to_string(),
        ))
    }
}
