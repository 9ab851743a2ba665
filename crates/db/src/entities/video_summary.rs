//! Video summary entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A saved extension summary - one per user and video.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "video_summary")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// User the summary was generated for.
    #[sea_orm(indexed)]
    pub user_id: String,

    /// Source YouTube video ID (11 characters).
    pub video_id: String,

    /// Video title as fetched at generation time.
    pub title: String,

    /// Channel name as fetched at generation time.
    pub channel: String,

    /// Human-readable duration.
    pub duration: String,

    /// Canonical watch URL.
    pub url: String,

    /// 1-2 sentence summary.
    #[sea_orm(column_type = "Text")]
    pub brief_summary: String,

    /// Multi-paragraph summary.
    #[sea_orm(column_type = "Text")]
    pub detailed_summary: String,

    /// Bullet point strings.
    #[sea_orm(column_type = "JsonBinary")]
    pub bullet_points: Json,

    pub created_at: DateTimeWithTimeZone,

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
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
