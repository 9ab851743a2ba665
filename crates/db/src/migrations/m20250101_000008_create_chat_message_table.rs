//! Create `chat_message` table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChatMessage::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChatMessage::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ChatMessage::SessionId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ChatMessage::Role).string_len(16).not_null())
                    .col(ColumnDef::new(ChatMessage::Content).text().not_null())
                    .col(
                        ColumnDef::new(ChatMessage::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chat_message_session")
                            .from(ChatMessage::Table, ChatMessage::SessionId)
                            .to(ChatSession::Table, ChatSession::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_chat_message_session_id")
                    .table(ChatMessage::Table)
                    .col(ChatMessage::SessionId)
                    .col(ChatMessage::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChatMessage::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ChatMessage {
    Table,
    Id,
    SessionId,
    Role,
    Content,
    CreatedAt,
}

#[derive(Iden)]
enum ChatSession {
    Table,
    Id,
}
