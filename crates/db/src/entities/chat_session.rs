//! Chat session entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An AI chat session about one video - one per user and video.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "chat_session")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owner user ID.
    #[sea_orm(indexed)]
    pub user_id: String,

    /// Source YouTube video ID (11 characters).
    pub video_id: String,

    /// Video title at session creation time.
    pub video_title: String,

    /// Channel name at session creation time.
    pub video_channel: String,

    /// Canonical watch URL.
    pub video_url: String,

    /// Display name derived from the video title.
    pub session_name: String,

    /// When the session last saw activity; sessions list newest-active first.
    pub last_active_at: DateTimeWithTimeZone,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(has_many = "super::chat_message::Entity")]
    Messages,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::chat_message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
