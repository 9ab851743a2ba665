//! Study board service: generation, persistence, reactions, sharing.

use sea_orm::Set;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::str::FromStr;
use studydeck_common::{AppError, AppResult, IdGenerator};
use studydeck_db::entities::{group_message, study_board};
use studydeck_db::repositories::{
    GroupRepository, PublicBoardSort, StudyBoardRepository, UserRepository,
};
use tracing::warn;

use super::ai::{BOARD_MAX_OUTPUT_TOKENS, GeminiClient, validate_board_content};
use super::event_publisher::EventPublisherService;
use super::youtube::{YoutubeClient, YoutubeError, extract_video_id};

/// Maximum transcript length forwarded to the model, in characters.
const MAX_PROMPT_TRANSCRIPT_CHARS: usize = 30_000;

/// Default and maximum page sizes for the public listing.
const DEFAULT_PUBLIC_PAGE_SIZE: u64 = 12;
const MAX_PUBLIC_PAGE_SIZE: u64 = 50;

/// Board visibility scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Private,
    Public,
    StudyGroup,
}

impl Visibility {
    /// Database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Public => "public",
            Self::StudyGroup => "studygroup",
        }
    }
}

impl FromStr for Visibility {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Self::Private),
            "public" => Ok(Self::Public),
            "studygroup" => Ok(Self::StudyGroup),
            other => Err(AppError::Validation(format!(
                "Unknown visibility: {other}"
            ))),
        }
    }
}

/// A like or dislike toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionAction {
    Like,
    Dislike,
}

/// Move a user between the like and dislike sets.
///
/// Repeating the user's current reaction removes it; switching moves them
/// between the sets. Returns the user's reaction after the toggle.
pub fn apply_reaction(
    likes: &mut Vec<String>,
    dislikes: &mut Vec<String>,
    user_id: &str,
    action: ReactionAction,
) -> Option<ReactionAction> {
    let in_likes = likes.iter().any(|u| u == user_id);
    let in_dislikes = dislikes.iter().any(|u| u == user_id);

    match action {
        ReactionAction::Like => {
            if in_likes {
                likes.retain(|u| u != user_id);
                None
            } else {
                if in_dislikes {
                    dislikes.retain(|u| u != user_id);
                }
                likes.push(user_id.to_string());
                Some(ReactionAction::Like)
            }
        }
        ReactionAction::Dislike => {
            if in_dislikes {
                dislikes.retain(|u| u != user_id);
                None
            } else {
                if in_likes {
                    likes.retain(|u| u != user_id);
                }
                dislikes.push(user_id.to_string());
                Some(ReactionAction::Dislike)
            }
        }
    }
}

/// Input for generating ephemeral study content.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBoardInput {
    pub youtube_url: String,
}

/// Input for persisting a study board.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBoardInput {
    pub youtube_url: String,
    pub user_id: String,
    pub study_board_name: String,
    pub visibility: String,
    #[serde(default)]
    pub study_group_id: Option<String>,
    pub content: Value,
}

/// Input for toggling a reaction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionInput {
    pub user_id: String,
    pub action: ReactionAction,
}

/// Input for removing a reaction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveReactionInput {
    pub user_id: String,
}

/// Input for renaming a board.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameBoardInput {
    pub study_board_name: String,
}

/// Video details attached to generated content.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    pub video_id: String,
    pub title: String,
    pub channel: String,
    pub duration: String,
    pub url: String,
}

/// Generated, not-yet-persisted study content.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedBoardResponse {
    pub video: VideoDetails,
    pub content: Value,
}

/// A persisted study board.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyBoardResponse {
    pub id: String,
    pub user_id: String,
    pub youtube_video_id: String,
    pub video_title: String,
    pub video_channel: String,
    pub video_duration: String,
    pub video_url: String,
    pub study_board_name: String,
    pub visibility: String,
    pub study_group_id: Option<String>,
    pub likes: Vec<String>,
    pub dislikes: Vec<String>,
    pub like_count: i32,
    pub dislike_count: i32,
    pub content: Value,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<study_board::Model> for StudyBoardResponse {
    fn from(b: study_board::Model) -> Self {
        Self {
            id: b.id,
            user_id: b.user_id,
            youtube_video_id: b.youtube_video_id,
            video_title: b.video_title,
            video_channel: b.video_channel,
            video_duration: b.video_duration,
            video_url: b.video_url,
            study_board_name: b.study_board_name,
            visibility: b.visibility,
            study_group_id: b.study_group_id,
            likes: serde_json::from_value(b.likes).unwrap_or_default(),
            dislikes: serde_json::from_value(b.dislikes).unwrap_or_default(),
            like_count: b.like_count,
            dislike_count: b.dislike_count,
            content: b.content,
            created_at: b.created_at.to_rfc3339(),
            updated_at: b.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Paginated public board listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicBoardsResponse {
    pub boards: Vec<StudyBoardResponse>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

/// Reaction counts after a toggle.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionResponse {
    pub like_count: i32,
    pub dislike_count: i32,
    pub user_reaction: Option<ReactionAction>,
}

/// Service for managing study boards.
#[derive(Clone)]
pub struct StudyBoardService {
    board_repo: StudyBoardRepository,
    group_repo: GroupRepository,
    user_repo: UserRepository,
    youtube: YoutubeClient,
    ai: GeminiClient,
    events: EventPublisherService,
    id_gen: IdGenerator,
}

impl StudyBoardService {
    /// Create a new study board service.
    #[must_use]
    pub fn new(
        board_repo: StudyBoardRepository,
        group_repo: GroupRepository,
        user_repo: UserRepository,
        youtube: YoutubeClient,
        ai: GeminiClient,
        events: EventPublisherService,
    ) -> Self {
        Self {
            board_repo,
            group_repo,
            user_repo,
            youtube,
            ai,
            events,
            id_gen: IdGenerator::new(),
        }
    }

    /// Generate ephemeral study content for a video. Nothing is persisted.
    pub async fn generate(&self, input: GenerateBoardInput) -> AppResult<GeneratedBoardResponse> {
        let video_id =
            extract_video_id(&input.youtube_url).ok_or(YoutubeError::InvalidUrl)?;

        let (metadata, transcript) = tokio::join!(
            self.youtube.fetch_metadata(&video_id),
            self.youtube.fetch_transcript(&video_id),
        );
        let transcript = transcript?;

        let prompt = build_board_prompt(&metadata.title, &transcript);
        let content = self
            .ai
            .generate_json(&prompt, BOARD_MAX_OUTPUT_TOKENS)
            .await?;
        validate_board_content(&content)?;

        Ok(GeneratedBoardResponse {
            video: VideoDetails {
                url: format!("https://www.youtube.com/watch?v={video_id}"),
                video_id,
                title: metadata.title,
                channel: metadata.channel,
                duration: metadata.duration,
            },
            content,
        })
    }

    /// Persist a study board.
    ///
    /// Sharing to a group (pinned message + realtime event) is best-effort
    /// and never fails the save.
    pub async fn save(&self, input: SaveBoardInput) -> AppResult<StudyBoardResponse> {
        let visibility: Visibility = input.visibility.parse()?;

        let name = input.study_board_name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "Study board name must not be empty".to_string(),
            ));
        }

        let group_id = match visibility {
            Visibility::StudyGroup => {
                let group_id = input.study_group_id.as_deref().ok_or_else(|| {
                    AppError::Validation(
                        "studyGroupId is required for studygroup visibility".to_string(),
                    )
                })?;
                Some(group_id.to_string())
            }
            Visibility::Private | Visibility::Public => None,
        };

        validate_board_content(&input.content)?;

        let video_id =
            extract_video_id(&input.youtube_url).ok_or(YoutubeError::InvalidUrl)?;

        // Owner must exist; boards reference users by foreign key.
        self.user_repo.get_by_id(&input.user_id).await?;
        if let Some(group_id) = group_id.as_deref() {
            self.group_repo.get_by_id(group_id).await?;
        }

        let metadata = self.youtube.fetch_metadata(&video_id).await;

        let now = chrono::Utc::now();
        let id = self.id_gen.generate();

        let model = study_board::ActiveModel {
            id: Set(id),
            user_id: Set(input.user_id.clone()),
            youtube_video_id: Set(video_id.clone()),
            video_title: Set(metadata.title),
            video_channel: Set(metadata.channel),
            video_duration: Set(metadata.duration),
            video_url: Set(format!("https://www.youtube.com/watch?v={video_id}")),
            study_board_name: Set(name.to_string()),
            visibility: Set(visibility.as_str().to_string()),
            study_group_id: Set(group_id.clone()),
            likes: Set(json!([])),
            dislikes: Set(json!([])),
            like_count: Set(0),
            dislike_count: Set(0),
            content: Set(input.content),
            created_at: Set(now.into()),
            updated_at: Set(None),
        };

        let board = self.board_repo.create(model).await?;

        if let Some(group_id) = group_id {
            self.share_to_group(&group_id, &board).await;
        }

        Ok(board.into())
    }

    /// Announce a saved board in its group chat and notify live listeners.
    ///
    /// Failures are logged and swallowed: the board is already saved.
    async fn share_to_group(&self, group_id: &str, board: &study_board::Model) {
        let message = group_message::ActiveModel {
            id: Set(self.id_gen.generate()),
            group_id: Set(group_id.to_string()),
            user_id: Set(board.user_id.clone()),
            content: Set(format!(
                "Shared a study board: {}",
                board.study_board_name
            )),
            is_pinned: Set(true),
            created_at: Set(chrono::Utc::now().into()),
        };

        if let Err(err) = self.group_repo.create_message(message).await {
            warn!(group_id, board_id = %board.id, error = %err, "Failed to pin shared board message");
        }

        if let Err(err) = self
            .events
            .publish_board_shared(group_id, &board.id, &board.study_board_name, &board.user_id)
            .await
        {
            warn!(group_id, board_id = %board.id, error = %err, "Failed to publish board shared event");
        }
    }

    /// Get a single board with content.
    pub async fn get_board(&self, id: &str) -> AppResult<StudyBoardResponse> {
        Ok(self.board_repo.get_by_id(id).await?.into())
    }

    /// List a user's boards, newest first.
    pub async fn list_user_boards(&self, user_id: &str) -> AppResult<Vec<StudyBoardResponse>> {
        let boards = self.board_repo.find_by_user_id(user_id).await?;
        Ok(boards.into_iter().map(Into::into).collect())
    }

    /// List boards shared with a group.
    pub async fn list_group_boards(&self, group_id: &str) -> AppResult<Vec<StudyBoardResponse>> {
        self.group_repo.get_by_id(group_id).await?;
        let boards = self.board_repo.find_by_group_id(group_id).await?;
        Ok(boards.into_iter().map(Into::into).collect())
    }

    /// List public boards with pagination.
    pub async fn list_public(
        &self,
        page: Option<u64>,
        limit: Option<u64>,
        sort_by: Option<&str>,
    ) -> AppResult<PublicBoardsResponse> {
        let page = page.unwrap_or(1).max(1);
        let limit = limit
            .unwrap_or(DEFAULT_PUBLIC_PAGE_SIZE)
            .clamp(1, MAX_PUBLIC_PAGE_SIZE);
        let sort = match sort_by {
            Some(s) => s.parse::<PublicBoardSort>()?,
            None => PublicBoardSort::default(),
        };

        let offset = (page - 1) * limit;
        let boards = self.board_repo.find_public(sort, limit, offset).await?;
        let total = self.board_repo.count_public().await?;

        Ok(PublicBoardsResponse {
            boards: boards.into_iter().map(Into::into).collect(),
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit),
        })
    }

    /// Toggle a like or dislike on a public board.
    pub async fn toggle_reaction(
        &self,
        board_id: &str,
        input: ReactionInput,
    ) -> AppResult<ReactionResponse> {
        let board = self.board_repo.get_by_id(board_id).await?;
        if board.visibility != Visibility::Public.as_str() {
            return Err(AppError::Forbidden(
                "Reactions are only allowed on public study boards".to_string(),
            ));
        }

        let mut likes: Vec<String> = serde_json::from_value(board.likes.clone()).unwrap_or_default();
        let mut dislikes: Vec<String> =
            serde_json::from_value(board.dislikes.clone()).unwrap_or_default();

        let user_reaction = apply_reaction(&mut likes, &mut dislikes, &input.user_id, input.action);

        let like_count = likes.len() as i32;
        let dislike_count = dislikes.len() as i32;

        let mut active: study_board::ActiveModel = board.into();
        active.likes = Set(json!(likes));
        active.dislikes = Set(json!(dislikes));
        active.like_count = Set(like_count);
        active.dislike_count = Set(dislike_count);
        active.updated_at = Set(Some(chrono::Utc::now().into()));
        self.board_repo.update(active).await?;

        Ok(ReactionResponse {
            like_count,
            dislike_count,
            user_reaction,
        })
    }

    /// Remove any reaction a user has on a public board.
    pub async fn remove_reaction(
        &self,
        board_id: &str,
        input: RemoveReactionInput,
    ) -> AppResult<ReactionResponse> {
        let board = self.board_repo.get_by_id(board_id).await?;
        if board.visibility != Visibility::Public.as_str() {
            return Err(AppError::Forbidden(
                "Reactions are only allowed on public study boards".to_string(),
            ));
        }

        let mut likes: Vec<String> = serde_json::from_value(board.likes.clone()).unwrap_or_default();
        let mut dislikes: Vec<String> =
            serde_json::from_value(board.dislikes.clone()).unwrap_or_default();

        likes.retain(|u| u != &input.user_id);
        dislikes.retain(|u| u != &input.user_id);

        let like_count = likes.len() as i32;
        let dislike_count = dislikes.len() as i32;

        let mut active: study_board::ActiveModel = board.into();
        active.likes = Set(json!(likes));
        active.dislikes = Set(json!(dislikes));
        active.like_count = Set(like_count);
        active.dislike_count = Set(dislike_count);
        active.updated_at = Set(Some(chrono::Utc::now().into()));
        self.board_repo.update(active).await?;

        Ok(ReactionResponse {
            like_count,
            dislike_count,
            user_reaction: None,
        })
    }

    /// Rename a board. The name is trimmed and must be non-empty.
    pub async fn rename(
        &self,
        board_id: &str,
        input: RenameBoardInput,
    ) -> AppResult<StudyBoardResponse> {
        let name = input.study_board_name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "Study board name must not be empty".to_string(),
            ));
        }

        let board = self.board_repo.get_by_id(board_id).await?;
        let mut active: study_board::ActiveModel = board.into();
        active.study_board_name = Set(name.to_string());
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        Ok(self.board_repo.update(active).await?.into())
    }

    /// Hard-delete a board.
    pub async fn delete(&self, board_id: &str) -> AppResult<()> {
        self.board_repo.get_by_id(board_id).await?;
        self.board_repo.delete(board_id).await
    }
}

/// Build the generation prompt for study-board content.
fn build_board_prompt(title: &str, transcript: &str) -> String {
    let transcript = match transcript.char_indices().nth(MAX_PROMPT_TRANSCRIPT_CHARS) {
        Some((idx, _)) => &transcript[..idx],
        None => transcript,
    };

    format!(
        r#"You are a study assistant. Based on the following YouTube video transcript, produce study material as a single JSON object with exactly these fields:
- "tldr": one-sentence summary
- "detailedSummary": a thorough multi-paragraph summary
- "summary": an array of 5-8 bullet point strings
- "flashcards": an array of 8-12 objects with "question" and "answer" strings
- "quiz": an array of 5-8 objects with "question" and "options", where "options" is an array of 4 objects with "text" and "isCorrect" (exactly one true per question)

Respond with JSON only, no extra commentary.

Video title: {title}

Transcript:
{transcript}"#
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_parsing() {
        assert_eq!("private".parse::<Visibility>().unwrap(), Visibility::Private);
        assert_eq!("public".parse::<Visibility>().unwrap(), Visibility::Public);
        assert_eq!(
            "studygroup".parse::<Visibility>().unwrap(),
            Visibility::StudyGroup
        );
        assert!("friends".parse::<Visibility>().is_err());
    }

    #[test]
    fn test_apply_reaction_adds_like() {
        let mut likes = vec![];
        let mut dislikes = vec![];
        let result = apply_reaction(&mut likes, &mut dislikes, "u1", ReactionAction::Like);
        assert_eq!(result, Some(ReactionAction::Like));
        assert_eq!(likes, vec!["u1".to_string()]);
        assert!(dislikes.is_empty());
    }

    #[test]
    fn test_apply_reaction_toggles_off() {
        let mut likes = vec!["u1".to_string()];
        let mut dislikes = vec![];
        let result = apply_reaction(&mut likes, &mut dislikes, "u1", ReactionAction::Like);
        assert_eq!(result, None);
        assert!(likes.is_empty());
    }

    #[test]
    fn test_apply_reaction_moves_between_sets() {
        let mut likes = vec![];
        let mut dislikes = vec!["u1".to_string()];
        let result = apply_reaction(&mut likes, &mut dislikes, "u1", ReactionAction::Like);
        assert_eq!(result, Some(ReactionAction::Like));
        assert_eq!(likes, vec!["u1".to_string()]);
        assert!(dislikes.is_empty());
    }

    #[test]
    fn test_apply_reaction_preserves_other_users() {
        let mut likes = vec!["u2".to_string()];
        let mut dislikes = vec!["u3".to_string()];
        apply_reaction(&mut likes, &mut dislikes, "u1", ReactionAction::Dislike);
        assert_eq!(likes, vec!["u2".to_string()]);
        assert_eq!(dislikes, vec!["u3".to_string(), "u1".to_string()]);
    }

    #[test]
    fn test_board_prompt_truncates_transcript() {
        let transcript = "a".repeat(MAX_PROMPT_TRANSCRIPT_CHARS + 100);
        let prompt = build_board_prompt("Title", &transcript);
        assert!(prompt.len() < transcript.len() + 1000);
    }
}
