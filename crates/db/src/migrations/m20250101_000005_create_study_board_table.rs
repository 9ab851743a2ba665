//! Create `study_board` table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StudyBoard::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudyBoard::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StudyBoard::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudyBoard::YoutubeVideoId)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudyBoard::VideoTitle)
                            .string_len(512)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudyBoard::VideoChannel)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudyBoard::VideoDuration)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudyBoard::VideoUrl)
                            .string_len(512)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudyBoard::StudyBoardName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudyBoard::Visibility)
                            .string_len(20)
                            .not_null()
                            .default("private"),
                    )
                    .col(ColumnDef::new(StudyBoard::StudyGroupId).string_len(32))
                    .col(ColumnDef::new(StudyBoard::Likes).json_binary().not_null())
                    .col(
                        ColumnDef::new(StudyBoard::Dislikes)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudyBoard::LikeCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(StudyBoard::DislikeCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(StudyBoard::Content)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudyBoard::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(StudyBoard::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_study_board_user")
                            .from(StudyBoard::Table, StudyBoard::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_study_board_group")
                            .from(StudyBoard::Table, StudyBoard::StudyGroupId)
                            .to(StudyGroup::Table, StudyGroup::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_study_board_user_id")
                    .table(StudyBoard::Table)
                    .col(StudyBoard::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_study_board_group_id")
                    .table(StudyBoard::Table)
                    .col(StudyBoard::StudyGroupId)
                    .to_owned(),
            )
            .await?;

        // Public listing sorts by visibility + like_count / created_at
        manager
            .create_index(
                Index::create()
                    .name("idx_study_board_visibility")
                    .table(StudyBoard::Table)
                    .col(StudyBoard::Visibility)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_study_board_like_count")
                    .table(StudyBoard::Table)
                    .col(StudyBoard::LikeCount)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_study_board_created_at")
                    .table(StudyBoard::Table)
                    .col(StudyBoard::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StudyBoard::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum StudyBoard {
    Table,
    Id,
    UserId,
    YoutubeVideoId,
    VideoTitle,
    VideoChannel,
    VideoDuration,
    VideoUrl,
    StudyBoardName,
    Visibility,
    StudyGroupId,
    Likes,
    Dislikes,
    LikeCount,
    DislikeCount,
    Content,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum StudyGroup {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
