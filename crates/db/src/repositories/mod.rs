//! Database repositories.

pub mod chat;
pub mod group;
pub mod study_board;
pub mod user;
pub mod video_summary;

pub use chat::ChatRepository;
pub use group::GroupRepository;
pub use study_board::{PublicBoardSort, StudyBoardRepository};
pub use user::UserRepository;
pub use video_summary::VideoSummaryRepository;
