//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_user_table;
mod m20250101_000002_create_study_group_table;
mod m20250101_000003_create_group_member_table;
mod m20250101_000004_create_group_message_table;
mod m20250101_000005_create_study_board_table;
mod m20250101_000006_create_video_summary_table;
mod m20250101_000007_create_chat_session_table;
mod m20250101_000008_create_chat_message_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_user_table::Migration),
            Box::new(m20250101_000002_create_study_group_table::Migration),
            Box::new(m20250101_000003_create_group_member_table::Migration),
            Box::new(m20250101_000004_create_group_message_table::Migration),
            Box::new(m20250101_000005_create_study_board_table::Migration),
            Box::new(m20250101_000006_create_video_summary_table::Migration),
            Box::new(m20250101_000007_create_chat_session_table::Migration),
            Box::new(m20250101_000008_create_chat_message_table::Migration),
        ]
    }
}
