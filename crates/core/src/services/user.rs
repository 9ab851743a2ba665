//! User service: registration and lookup.
//!
//! Identity lives with the client's auth provider; this service only keeps
//! the local user records that boards, groups, and messages reference.

use sea_orm::Set;
use serde::{Deserialize, Serialize};
use studydeck_common::{AppError, AppResult, IdGenerator};
use studydeck_db::entities::user;
use studydeck_db::repositories::UserRepository;
use validator::Validate;

/// Input for registering a user.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// A user record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            display_name: u.display_name,
            avatar_url: u.avatar_url,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// Service for managing users.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a user. Usernames are unique.
    pub async fn create(&self, input: CreateUserInput) -> AppResult<UserResponse> {
        input.validate()?;

        if self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Username {} is already taken",
                input.username
            )));
        }

        let user = self
            .user_repo
            .create(user::ActiveModel {
                id: Set(self.id_gen.generate()),
                username: Set(input.username),
                email: Set(input.email),
                display_name: Set(input.display_name),
                avatar_url: Set(input.avatar_url),
                created_at: Set(chrono::Utc::now().into()),
                updated_at: Set(None),
            })
            .await?;

        Ok(user.into())
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<UserResponse> {
        Ok(self.user_repo.get_by_id(id).await?.into())
    }
}
