//! Per-video AI chat: one session per user and video, with the transcript
//! and any saved summary folded into the prompt.

use sea_orm::Set;
use serde::{Deserialize, Serialize};
use studydeck_common::{AppError, AppResult, IdGenerator};
use studydeck_db::entities::{chat_message, chat_session};
use studydeck_db::repositories::{ChatRepository, VideoSummaryRepository};
use tracing::warn;

use super::ai::{CHAT_MAX_OUTPUT_TOKENS, GeminiClient};
use super::youtube::{YoutubeClient, YoutubeError, extract_video_id};

/// How many prior messages are replayed into the prompt.
const CHAT_CONTEXT_MESSAGES: usize = 10;

/// Maximum transcript length forwarded to the model, in characters.
const MAX_PROMPT_TRANSCRIPT_CHARS: usize = 8_000;

/// How much of the video title survives into the session name.
const SESSION_NAME_TITLE_CHARS: usize = 30;

const ROLE_USER: &str = "user";
const ROLE_ASSISTANT: &str = "assistant";

/// Input for opening (or resuming) a chat session.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSessionInput {
    pub user_id: String,
    pub video_url: String,
    #[serde(default)]
    pub video_title: Option<String>,
    #[serde(default)]
    pub video_channel: Option<String>,
}

/// Input for sending a chat message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageInput {
    pub message: String,
}

/// Summary of a chat session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
    pub video_id: String,
    pub video_title: String,
    pub video_channel: String,
    pub session_name: String,
    pub message_count: u64,
    pub last_active_at: String,
    pub created_at: String,
}

/// One message as shown to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageResponse {
    pub id: String,
    pub message: String,
    pub sender: String,
    pub timestamp: String,
}

impl From<chat_message::Model> for ChatMessageResponse {
    fn from(m: chat_message::Model) -> Self {
        Self {
            id: m.id,
            message: m.content,
            sender: if m.role == ROLE_USER {
                "user".to_string()
            } else {
                "ai".to_string()
            },
            timestamp: m.created_at.to_rfc3339(),
        }
    }
}

/// A session with its full message history.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistoryResponse {
    pub session: SessionResponse,
    pub messages: Vec<ChatMessageResponse>,
}

/// A user's sessions, most recently active first.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionListResponse {
    pub count: usize,
    pub sessions: Vec<SessionResponse>,
}

/// The model's reply to a chat message.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReplyResponse {
    pub ai_response: String,
    pub timestamp: String,
}

/// Service for per-video AI chat.
#[derive(Clone)]
pub struct VideoChatService {
    chat_repo: ChatRepository,
    summary_repo: VideoSummaryRepository,
    youtube: YoutubeClient,
    ai: GeminiClient,
    id_gen: IdGenerator,
}

impl VideoChatService {
    /// Create a new video chat service.
    #[must_use]
    pub fn new(
        chat_repo: ChatRepository,
        summary_repo: VideoSummaryRepository,
        youtube: YoutubeClient,
        ai: GeminiClient,
    ) -> Self {
        Self {
            chat_repo,
            summary_repo,
            youtube,
            ai,
            id_gen: IdGenerator::new(),
        }
    }

    /// Open the user's session for a video, creating it on first use.
    pub async fn open_session(&self, input: OpenSessionInput) -> AppResult<SessionResponse> {
        if input.user_id.trim().is_empty() {
            return Err(AppError::Validation("A userId is required".to_string()));
        }
        let video_id = extract_video_id(&input.video_url).ok_or(YoutubeError::InvalidUrl)?;

        let session = match self
            .chat_repo
            .find_session_by_user_and_video(&input.user_id, &video_id)
            .await?
        {
            Some(existing) => {
                let mut active: chat_session::ActiveModel = existing.into();
                active.last_active_at = Set(chrono::Utc::now().into());
                self.chat_repo.update_session(active).await?
            }
            None => {
                let title = input
                    .video_title
                    .unwrap_or_else(|| "YouTube Video".to_string());
                let channel = input
                    .video_channel
                    .unwrap_or_else(|| "Unknown Channel".to_string());
                let now = chrono::Utc::now();
                self.chat_repo
                    .create_session(chat_session::ActiveModel {
                        id: Set(self.id_gen.generate()),
                        user_id: Set(input.user_id),
                        video_id: Set(video_id),
                        session_name: Set(session_name(&title)),
                        video_title: Set(title),
                        video_channel: Set(channel),
                        video_url: Set(input.video_url),
                        last_active_at: Set(now.into()),
                        created_at: Set(now.into()),
                    })
                    .await?
            }
        };

        self.session_response(session).await
    }

    /// Get a session with its full message history.
    pub async fn history(&self, session_id: &str) -> AppResult<ChatHistoryResponse> {
        let session = self.chat_repo.get_session_by_id(session_id).await?;
        let messages = self.chat_repo.find_messages(session_id).await?;

        Ok(ChatHistoryResponse {
            session: SessionResponse {
                session_id: session.id.clone(),
                video_id: session.video_id.clone(),
                video_title: session.video_title.clone(),
                video_channel: session.video_channel.clone(),
                session_name: session.session_name.clone(),
                message_count: messages.len() as u64,
                last_active_at: session.last_active_at.to_rfc3339(),
                created_at: session.created_at.to_rfc3339(),
            },
            messages: messages.into_iter().map(Into::into).collect(),
        })
    }

    /// Send a message and get the model's reply.
    ///
    /// The saved summary and a fresh transcript are folded into the prompt
    /// when available; fetching either is best-effort.
    pub async fn send_message(
        &self,
        session_id: &str,
        input: SendMessageInput,
    ) -> AppResult<ChatReplyResponse> {
        let message = input.message.trim();
        if message.is_empty() {
            return Err(AppError::Validation("A message is required".to_string()));
        }

        let session = self.chat_repo.get_session_by_id(session_id).await?;

        let summary = match self
            .summary_repo
            .find_by_user_and_video(&session.user_id, &session.video_id)
            .await
        {
            Ok(found) => found.map(|s| s.brief_summary),
            Err(err) => {
                warn!(session_id, error = %err, "Failed to load saved summary for chat");
                None
            }
        };

        let transcript = match self.youtube.fetch_transcript(&session.video_id).await {
            Ok(t) => Some(t),
            Err(err) => {
                warn!(session_id, error = %err, "Failed to fetch transcript for chat");
                None
            }
        };

        let history = self.chat_repo.find_messages(session_id).await?;
        let prompt = build_chat_prompt(
            &session.video_title,
            &session.video_channel,
            summary.as_deref(),
            transcript.as_deref(),
            &history,
            message,
        );

        let reply = self.ai.generate_text(&prompt, CHAT_MAX_OUTPUT_TOKENS).await?;
        let reply = reply.trim().to_string();

        let now = chrono::Utc::now();
        self.chat_repo
            .create_message(chat_message::ActiveModel {
                id: Set(self.id_gen.generate()),
                session_id: Set(session.id.clone()),
                role: Set(ROLE_USER.to_string()),
                content: Set(message.to_string()),
                created_at: Set(now.into()),
            })
            .await?;
        self.chat_repo
            .create_message(chat_message::ActiveModel {
                id: Set(self.id_gen.generate()),
                session_id: Set(session.id.clone()),
                role: Set(ROLE_ASSISTANT.to_string()),
                content: Set(reply.clone()),
                created_at: Set(now.into()),
            })
            .await?;

        let mut active: chat_session::ActiveModel = session.into();
        active.last_active_at = Set(now.into());
        self.chat_repo.update_session(active).await?;

        Ok(ChatReplyResponse {
            ai_response: reply,
            timestamp: now.to_rfc3339(),
        })
    }

    /// List a user's sessions, most recently active first.
    pub async fn list_sessions(&self, user_id: &str) -> AppResult<SessionListResponse> {
        let sessions = self.chat_repo.find_sessions_by_user_id(user_id).await?;

        let mut responses = Vec::with_capacity(sessions.len());
        for session in sessions {
            responses.push(self.session_response(session).await?);
        }

        Ok(SessionListResponse {
            count: responses.len(),
            sessions: responses,
        })
    }

    /// Delete a session and its messages.
    pub async fn delete_session(&self, session_id: &str) -> AppResult<()> {
        self.chat_repo.get_session_by_id(session_id).await?;
        self.chat_repo.delete_session(session_id).await
    }

    async fn session_response(&self, session: chat_session::Model) -> AppResult<SessionResponse> {
        let message_count = self.chat_repo.count_messages(&session.id).await?;
        Ok(SessionResponse {
            session_id: session.id,
            video_id: session.video_id,
            video_title: session.video_title,
            video_channel: session.video_channel,
            session_name: session.session_name,
            message_count,
            last_active_at: session.last_active_at.to_rfc3339(),
            created_at: session.created_at.to_rfc3339(),
        })
    }
}

/// Derive a session display name from the video title.
fn session_name(title: &str) -> String {
    match title.char_indices().nth(SESSION_NAME_TITLE_CHARS) {
        Some((idx, _)) => format!("Chat about {}...", &title[..idx]),
        None => format!("Chat about {title}"),
    }
}

/// Build the chat prompt: video context, saved summary, transcript excerpt,
/// and the last few turns of the conversation.
fn build_chat_prompt(
    title: &str,
    channel: &str,
    summary: Option<&str>,
    transcript: Option<&str>,
    history: &[chat_message::Model],
    message: &str,
) -> String {
    let mut prompt = format!(
        "You are an AI assistant helping users understand and discuss a YouTube video.\n\n\
         Video Information:\nTitle: {title}\nChannel: {channel}\n\n"
    );

    if let Some(summary) = summary {
        prompt.push_str(&format!("Video Summary: {summary}\n\n"));
    }

    if let Some(transcript) = transcript {
        let excerpt = match transcript.char_indices().nth(MAX_PROMPT_TRANSCRIPT_CHARS) {
            Some((idx, _)) => &transcript[..idx],
            None => transcript,
        };
        prompt.push_str(&format!("Video Transcript: {excerpt}\n\n"));
    }

    if !history.is_empty() {
        prompt.push_str("Chat History:\n");
        let start = history.len().saturating_sub(CHAT_CONTEXT_MESSAGES);
        for turn in &history[start..] {
            prompt.push_str(&format!("{}: {}\n", turn.role, turn.content));
        }
        prompt.push('\n');
    }

    prompt.push_str(&format!(
        "User's current question: {message}\n\n\
         Please provide a helpful, informative response about the video content. \
         If the user asks about specific topics, use the transcript and summary to \
         provide accurate information. Be conversational and engaging."
    ));

    prompt
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn turn(role: &str, content: &str) -> chat_message::Model {
        chat_message::Model {
            id: format!("m-{content}"),
            session_id: "s1".to_string(),
            role: role.to_string(),
            content: content.to_string(),
            created_at: chrono::Utc::now().fixed_offset(),
        }
    }

    #[test]
    fn test_session_name_truncates_long_titles() {
        let long = "A very long lecture title that keeps going and going";
        let name = session_name(long);
        assert!(name.starts_with("Chat about A very long lecture"));
        assert!(name.ends_with("..."));

        assert_eq!(session_name("Short"), "Chat about Short");
    }

    #[test]
    fn test_chat_prompt_keeps_only_recent_turns() {
        let history: Vec<_> = (0..15)
            .map(|i| turn(ROLE_USER, &format!("question {i}")))
            .collect();
        let prompt = build_chat_prompt("T", "C", None, None, &history, "latest");

        assert!(!prompt.contains("question 4"));
        assert!(prompt.contains("question 5"));
        assert!(prompt.contains("question 14"));
        assert!(prompt.contains("User's current question: latest"));
    }

    #[test]
    fn test_chat_prompt_includes_summary_and_transcript() {
        let prompt = build_chat_prompt(
            "Title",
            "Channel",
            Some("the gist"),
            Some("spoken words"),
            &[],
            "hi",
        );
        assert!(prompt.contains("Video Summary: the gist"));
        assert!(prompt.contains("Video Transcript: spoken words"));
        assert!(!prompt.contains("Chat History"));
    }

    #[test]
    fn test_chat_prompt_truncates_transcript() {
        let transcript = "a".repeat(MAX_PROMPT_TRANSCRIPT_CHARS + 500);
        let prompt = build_chat_prompt("T", "C", None, Some(&transcript), &[], "hi");
        assert!(prompt.len() < transcript.len() + 1000);
    }

    #[test]
    fn test_message_response_maps_roles_to_senders() {
        let from_user = ChatMessageResponse::from(turn(ROLE_USER, "q"));
        assert_eq!(from_user.sender, "user");

        let from_model = ChatMessageResponse::from(turn(ROLE_ASSISTANT, "a"));
        assert_eq!(from_model.sender, "ai");
    }
}
