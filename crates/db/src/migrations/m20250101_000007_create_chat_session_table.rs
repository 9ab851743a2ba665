//! Create `chat_session` table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChatSession::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChatSession::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ChatSession::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChatSession::VideoId)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChatSession::VideoTitle)
                            .string_len(512)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChatSession::VideoChannel)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChatSession::VideoUrl)
                            .string_len(512)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChatSession::SessionName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChatSession::LastActiveAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ChatSession::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chat_session_user")
                            .from(ChatSession::Table, ChatSession::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One session per user and video
        manager
            .create_index(
                Index::create()
                    .name("idx_chat_session_user_video")
                    .table(ChatSession::Table)
                    .col(ChatSession::UserId)
                    .col(ChatSession::VideoId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_chat_session_last_active_at")
                    .table(ChatSession::Table)
                    .col(ChatSession::UserId)
                    .col(ChatSession::LastActiveAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChatSession::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ChatSession {
    Table,
    Id,
    UserId,
    VideoId,
    VideoTitle,
    VideoChannel,
    VideoUrl,
    SessionName,
    LastActiveAt,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
