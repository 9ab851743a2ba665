//! Repository integration tests against a real Postgres instance.
//!
//! These are ignored by default; run them with a test database available:
//!
//! ```text
//! TEST_DB_HOST=localhost cargo test -p studydeck-db -- --ignored
//! ```

#![allow(clippy::unwrap_used)]

use sea_orm::Set;
use serde_json::json;
use std::sync::Arc;
use studydeck_common::IdGenerator;
use studydeck_db::entities::{
    chat_message, chat_session, group_member, study_board, study_group, user, video_summary,
};
use studydeck_db::repositories::{
    ChatRepository, GroupRepository, PublicBoardSort, StudyBoardRepository, UserRepository,
    VideoSummaryRepository,
};
use studydeck_db::test_utils::TestDatabase;

fn user_model(id_gen: &IdGenerator, username: &str) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(id_gen.generate()),
        username: Set(username.to_string()),
        email: Set(format!("{username}@example.com")),
        display_name: Set(None),
        avatar_url: Set(None),
        created_at: Set(chrono::Utc::now().into()),
        updated_at: Set(None),
    }
}

fn board_model(id_gen: &IdGenerator, user_id: &str, visibility: &str) -> study_board::ActiveModel {
    study_board::ActiveModel {
        id: Set(id_gen.generate()),
        user_id: Set(user_id.to_string()),
        youtube_video_id: Set("dQw4w9WgXcQ".to_string()),
        video_title: Set("Intro to Calculus".to_string()),
        video_channel: Set("Example Channel".to_string()),
        video_duration: Set("12:34".to_string()),
        video_url: Set("https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string()),
        study_board_name: Set("Calculus notes".to_string()),
        visibility: Set(visibility.to_string()),
        study_group_id: Set(None),
        likes: Set(json!([])),
        dislikes: Set(json!([])),
        like_count: Set(0),
        dislike_count: Set(0),
        content: Set(json!({"tldr": "x"})),
        created_at: Set(chrono::Utc::now().into()),
        updated_at: Set(None),
    }
}

#[tokio::test]
#[ignore = "requires a Postgres test database"]
async fn test_board_crud_roundtrip() {
    let db = TestDatabase::create_unique().await.unwrap();
    studydeck_db::migrate(db.connection()).await.unwrap();

    let conn = Arc::new(db.connection().clone());
    let users = UserRepository::new(conn.clone());
    let boards = StudyBoardRepository::new(conn);
    let id_gen = IdGenerator::new();

    let owner = users.create(user_model(&id_gen, "alice")).await.unwrap();

    let board = boards
        .create(board_model(&id_gen, &owner.id, "public"))
        .await
        .unwrap();
    assert_eq!(boards.get_by_id(&board.id).await.unwrap().id, board.id);
    assert_eq!(boards.count_public().await.unwrap(), 1);
    assert_eq!(boards.count_by_user_id(&owner.id).await.unwrap(), 1);

    boards.delete(&board.id).await.unwrap();
    assert!(boards.find_by_id(&board.id).await.unwrap().is_none());

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a Postgres test database"]
async fn test_public_listing_orders_by_like_count() {
    let db = TestDatabase::create_unique().await.unwrap();
    studydeck_db::migrate(db.connection()).await.unwrap();

    let conn = Arc::new(db.connection().clone());
    let users = UserRepository::new(conn.clone());
    let boards = StudyBoardRepository::new(conn);
    let id_gen = IdGenerator::new();

    let owner = users.create(user_model(&id_gen, "bob")).await.unwrap();

    let mut low = board_model(&id_gen, &owner.id, "public");
    low.like_count = Set(1);
    let low = boards.create(low).await.unwrap();

    let mut high = board_model(&id_gen, &owner.id, "public");
    high.like_count = Set(5);
    let high = boards.create(high).await.unwrap();

    let listed = boards
        .find_public(PublicBoardSort::MostLiked, 10, 0)
        .await
        .unwrap();
    assert_eq!(listed[0].id, high.id);
    assert_eq!(listed[1].id, low.id);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a Postgres test database"]
async fn test_group_membership_and_messages() {
    let db = TestDatabase::create_unique().await.unwrap();
    studydeck_db::migrate(db.connection()).await.unwrap();

    let conn = Arc::new(db.connection().clone());
    let users = UserRepository::new(conn.clone());
    let groups = GroupRepository::new(conn);
    let id_gen = IdGenerator::new();

    let owner = users.create(user_model(&id_gen, "carol")).await.unwrap();

    let group = groups
        .create(study_group::ActiveModel {
            id: Set(id_gen.generate()),
            name: Set("Physics club".to_string()),
            description: Set(None),
            owner_id: Set(owner.id.clone()),
            invite_code: Set(id_gen.generate_invite_code()),
            is_private: Set(false),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        })
        .await
        .unwrap();

    assert!(!groups.is_member(&group.id, &owner.id).await.unwrap());
    groups
        .add_member(group_member::ActiveModel {
            id: Set(id_gen.generate()),
            group_id: Set(group.id.clone()),
            user_id: Set(owner.id.clone()),
            role: Set("owner".to_string()),
            joined_at: Set(chrono::Utc::now().into()),
        })
        .await
        .unwrap();
    assert!(groups.is_member(&group.id, &owner.id).await.unwrap());

    let found = groups
        .find_by_invite_code(&group.invite_code)
        .await
        .unwrap();
    assert_eq!(found.map(|g| g.id), Some(group.id.clone()));

    let for_user = groups.find_groups_for_user(&owner.id).await.unwrap();
    assert_eq!(for_user.len(), 1);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a Postgres test database"]
async fn test_summary_history_and_chat_roundtrip() {
    let db = TestDatabase::create_unique().await.unwrap();
    studydeck_db::migrate(db.connection()).await.unwrap();

    let conn = Arc::new(db.connection().clone());
    let users = UserRepository::new(conn.clone());
    let summaries = VideoSummaryRepository::new(conn.clone());
    let chats = ChatRepository::new(conn);
    let id_gen = IdGenerator::new();

    let owner = users.create(user_model(&id_gen, "dave")).await.unwrap();
    let now = chrono::Utc::now();

    let summary = summaries
        .create(video_summary::ActiveModel {
            id: Set(id_gen.generate()),
            user_id: Set(owner.id.clone()),
            video_id: Set("dQw4w9WgXcQ".to_string()),
            title: Set("Intro to Calculus".to_string()),
            channel: Set("Example Channel".to_string()),
            duration: Set("12:34".to_string()),
            url: Set("https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string()),
            brief_summary: Set("Short version".to_string()),
            detailed_summary: Set("Long version".to_string()),
            bullet_points: Set(json!(["a", "b"])),
            created_at: Set(now.into()),
            updated_at: Set(None),
        })
        .await
        .unwrap();

    let found = summaries
        .find_by_user_and_video(&owner.id, "dQw4w9WgXcQ")
        .await
        .unwrap();
    assert_eq!(found.map(|s| s.id), Some(summary.id.clone()));
    assert_eq!(summaries.find_by_user_id(&owner.id).await.unwrap().len(), 1);

    let session = chats
        .create_session(chat_session::ActiveModel {
            id: Set(id_gen.generate()),
            user_id: Set(owner.id.clone()),
            video_id: Set("dQw4w9WgXcQ".to_string()),
            video_title: Set("Intro to Calculus".to_string()),
            video_channel: Set("Example Channel".to_string()),
            video_url: Set("https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string()),
            session_name: Set("Chat about Intro to Calculus".to_string()),
            last_active_at: Set(now.into()),
            created_at: Set(now.into()),
        })
        .await
        .unwrap();

    for (role, content) in [("user", "What is a limit?"), ("assistant", "A limit is...")] {
        chats
            .create_message(chat_message::ActiveModel {
                id: Set(id_gen.generate()),
                session_id: Set(session.id.clone()),
                role: Set(role.to_string()),
                content: Set(content.to_string()),
                created_at: Set(chrono::Utc::now().into()),
            })
            .await
            .unwrap();
    }

    assert_eq!(chats.count_messages(&session.id).await.unwrap(), 2);
    let messages = chats.find_messages(&session.id).await.unwrap();
    assert_eq!(messages[0].role, "user");
    assert_eq!(messages[1].role, "assistant");

    // Deleting the session cascades to its messages
    chats.delete_session(&session.id).await.unwrap();
    assert!(chats.find_session_by_id(&session.id).await.unwrap().is_none());
    assert_eq!(chats.count_messages(&session.id).await.unwrap(), 0);

    db.drop_database().await.unwrap();
}
