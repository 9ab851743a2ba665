//! Create `video_summary` table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VideoSummary::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VideoSummary::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VideoSummary::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VideoSummary::VideoId)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VideoSummary::Title)
                            .string_len(512)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VideoSummary::Channel)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VideoSummary::Duration)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VideoSummary::Url)
                            .string_len(512)
                            .not_null(),
                    )
                    .col(ColumnDef::new(VideoSummary::BriefSummary).text().not_null())
                    .col(
                        ColumnDef::new(VideoSummary::DetailedSummary)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VideoSummary::BulletPoints)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VideoSummary::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(VideoSummary::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_video_summary_user")
                            .from(VideoSummary::Table, VideoSummary::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One summary per user and video
        manager
            .create_index(
                Index::create()
                    .name("idx_video_summary_user_video")
                    .table(VideoSummary::Table)
                    .col(VideoSummary::UserId)
                    .col(VideoSummary::VideoId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_video_summary_created_at")
                    .table(VideoSummary::Table)
                    .col(VideoSummary::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VideoSummary::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum VideoSummary {
    Table,
    Id,
    UserId,
    VideoId,
    Title,
    Channel,
    Duration,
    Url,
    BriefSummary,
    DetailedSummary,
    BulletPoints,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
