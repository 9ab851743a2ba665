//! Shared application state.

use studydeck_core::services::{
    chat::VideoChatService, extension::ExtensionService, flow::FlowService, group::GroupService,
    study_board::StudyBoardService, translation::TranslationService, user::UserService,
};

use crate::sse::SseBroadcaster;

/// State shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub study_board_service: StudyBoardService,
    pub group_service: GroupService,
    pub flow_service: FlowService,
    pub translation_service: TranslationService,
    pub extension_service: ExtensionService,
    pub chat_service: VideoChatService,
    pub sse_broadcaster: SseBroadcaster,
}
