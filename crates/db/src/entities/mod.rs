//! Database entities.

pub mod chat_message;
pub mod chat_session;
pub mod group_member;
pub mod group_message;
pub mod study_board;
pub mod study_group;
pub mod user;
pub mod video_summary;

pub use chat_message::Entity as ChatMessage;
pub use chat_session::Entity as ChatSession;
pub use group_member::Entity as GroupMember;
pub use group_message::Entity as GroupMessage;
pub use study_board::Entity as StudyBoard;
pub use study_group::Entity as StudyGroup;
pub use user::Entity as User;
pub use video_summary::Entity as VideoSummary;
