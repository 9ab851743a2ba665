//! Study board entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Study board entity - AI-generated study material for a YouTube video.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "study_board")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owner user ID.
    #[sea_orm(indexed)]
    pub user_id: String,

    /// Source YouTube video ID (11 characters).
    pub youtube_video_id: String,

    /// Video title as fetched at creation time.
    pub video_title: String,

    /// Channel name as fetched at creation time.
    pub video_channel: String,

    /// Human-readable duration, e.g. "12:34" or "1:05:09".
    pub video_duration: String,

    /// Canonical watch URL.
    pub video_url: String,

    /// User-chosen board name.
    pub study_board_name: String,

    /// Visibility: "private", "public", or "studygroup".
    #[sea_orm(default_value = "private")]
    pub visibility: String,

    /// Group the board is shared with, when visibility is "studygroup".
    #[sea_orm(nullable)]
    pub study_group_id: Option<String>,

    /// User IDs who liked this board.
    #[sea_orm(column_type = "JsonBinary")]
    pub likes: Json,

    /// User IDs who disliked this board.
    #[sea_orm(column_type = "JsonBinary")]
    pub dislikes: Json,

    /// Number of likes (always equals the length of `likes`).
    #[sea_orm(default_value = 0)]
    pub like_count: i32,

    /// Number of dislikes (always equals the length of `dislikes`).
    #[sea_orm(default_value = 0)]
    pub dislike_count: i32,

    /// Generated study content: tldr, detailedSummary, summary,
    /// flashcards, quiz.
    #[sea_orm(column_type = "JsonBinary")]
    pub content: Json,

    /// When the board was created.
    pub created_at: DateTimeWithTimeZone,

    /// When the board was last updated.
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
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
    #[sea_orm(
        belongs_to = "super::study_group::Entity",
        from = "Column::StudyGroupId",
        to = "super::study_group::Column::Id",
        on_delete = "SetNull"
    )]
    StudyGroup,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::study_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudyGroup.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
