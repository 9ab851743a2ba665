//! Create `group_message` table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GroupMessage::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GroupMessage::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GroupMessage::GroupId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GroupMessage::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(GroupMessage::Content).text().not_null())
                    .col(
                        ColumnDef::new(GroupMessage::IsPinned)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(GroupMessage::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_message_group")
                            .from(GroupMessage::Table, GroupMessage::GroupId)
                            .to(StudyGroup::Table, StudyGroup::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_message_user")
                            .from(GroupMessage::Table, GroupMessage::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_group_message_group_id")
                    .table(GroupMessage::Table)
                    .col(GroupMessage::GroupId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_group_message_created_at")
                    .table(GroupMessage::Table)
                    .col(GroupMessage::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_group_message_is_pinned")
                    .table(GroupMessage::Table)
                    .col(GroupMessage::IsPinned)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GroupMessage::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum GroupMessage {
    Table,
    Id,
    GroupId,
    UserId,
    Content,
    IsPinned,
    CreatedAt,
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
