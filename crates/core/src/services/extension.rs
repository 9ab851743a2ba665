//! Browser-extension facing operations: quick summaries and raw transcripts.

use sea_orm::Set;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use studydeck_common::{AppError, AppResult, IdGenerator};
use studydeck_db::entities::video_summary;
use studydeck_db::repositories::VideoSummaryRepository;
use tracing::warn;

use super::ai::{AiError, BOARD_MAX_OUTPUT_TOKENS, GeminiClient};
use super::youtube::{VideoMetadata, YoutubeClient, YoutubeError, extract_video_id};

/// Input for extension requests. The popup sends either key; `userId` is
/// present when the user is signed in and wants the summary kept.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionInput {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub youtube_url: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl ExtensionInput {
    /// The URL to operate on, whichever key was provided.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().or(self.youtube_url.as_deref())
    }
}

/// Three summary variants for the extension popup.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeResponse {
    pub video_id: String,
    pub metadata: VideoMetadata,
    pub transcript: String,
    pub summaries: Value,
}

/// Raw transcript with metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptResponse {
    pub video_id: String,
    pub metadata: VideoMetadata,
    pub transcript: String,
}

/// A saved summary from a user's history.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummaryResponse {
    pub id: String,
    pub user_id: String,
    pub video_id: String,
    pub title: String,
    pub channel: String,
    pub duration: String,
    pub url: String,
    pub brief_summary: String,
    pub detailed_summary: String,
    pub bullet_points: Value,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<video_summary::Model> for VideoSummaryResponse {
    fn from(s: video_summary::Model) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            video_id: s.video_id,
            title: s.title,
            channel: s.channel,
            duration: s.duration,
            url: s.url,
            brief_summary: s.brief_summary,
            detailed_summary: s.detailed_summary,
            bullet_points: s.bullet_points,
            created_at: s.created_at.to_rfc3339(),
            updated_at: s.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Service backing the extension surface.
#[derive(Clone)]
pub struct ExtensionService {
    youtube: YoutubeClient,
    ai: GeminiClient,
    summary_repo: VideoSummaryRepository,
    id_gen: IdGenerator,
}

impl ExtensionService {
    /// Create a new extension service.
    #[must_use]
    pub fn new(
        youtube: YoutubeClient,
        ai: GeminiClient,
        summary_repo: VideoSummaryRepository,
    ) -> Self {
        Self {
            youtube,
            ai,
            summary_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Summarize a video: transcript plus brief/detailed/bulletPoints variants.
    ///
    /// When a user ID is supplied the summary is also kept in that user's
    /// history; persistence failures never fail the request.
    pub async fn summarize(&self, input: ExtensionInput) -> AppResult<SummarizeResponse> {
        let url = input
            .url()
            .ok_or_else(|| AppError::Validation("A url is required".to_string()))?;
        let video_id = extract_video_id(url).ok_or(YoutubeError::InvalidUrl)?;

        let (metadata, transcript) = tokio::join!(
            self.youtube.fetch_metadata(&video_id),
            self.youtube.fetch_transcript(&video_id),
        );
        let transcript = transcript?;

        let prompt = build_summaries_prompt(&metadata.title, &transcript);
        let summaries = self
            .ai
            .generate_json(&prompt, BOARD_MAX_OUTPUT_TOKENS)
            .await?;
        validate_summaries(&summaries)?;

        if let Some(user_id) = input.user_id.as_deref() {
            self.persist_summary(user_id, &video_id, &metadata, &summaries)
                .await;
        }

        Ok(SummarizeResponse {
            video_id,
            metadata,
            transcript,
            summaries,
        })
    }

    /// Upsert the summary into the user's history. Best-effort: the response
    /// already carries the generated content.
    async fn persist_summary(
        &self,
        user_id: &str,
        video_id: &str,
        metadata: &VideoMetadata,
        summaries: &Value,
    ) {
        let brief = field_string(summaries, "brief");
        let detailed = field_string(summaries, "detailed");
        let bullet_points = summaries
            .get("bulletPoints")
            .cloned()
            .unwrap_or_else(|| json!([]));
        let now = chrono::Utc::now();

        let result = match self
            .summary_repo
            .find_by_user_and_video(user_id, video_id)
            .await
        {
            Ok(Some(existing)) => {
                let mut active: video_summary::ActiveModel = existing.into();
                active.brief_summary = Set(brief);
                active.detailed_summary = Set(detailed);
                active.bullet_points = Set(bullet_points);
                active.updated_at = Set(Some(now.into()));
                self.summary_repo.update(active).await
            }
            Ok(None) => {
                self.summary_repo
                    .create(video_summary::ActiveModel {
                        id: Set(self.id_gen.generate()),
                        user_id: Set(user_id.to_string()),
                        video_id: Set(video_id.to_string()),
                        title: Set(metadata.title.clone()),
                        channel: Set(metadata.channel.clone()),
                        duration: Set(metadata.duration.clone()),
                        url: Set(format!("https://www.youtube.com/watch?v={video_id}")),
                        brief_summary: Set(brief),
                        detailed_summary: Set(detailed),
                        bullet_points: Set(bullet_points),
                        created_at: Set(now.into()),
                        updated_at: Set(None),
                    })
                    .await
            }
            Err(err) => Err(err),
        };

        if let Err(err) = result {
            warn!(user_id, video_id, error = %err, "Failed to save summary to history");
        }
    }

    /// Fetch the raw transcript with metadata.
    pub async fn transcript(&self, input: ExtensionInput) -> AppResult<TranscriptResponse> {
        let url = input
            .url()
            .ok_or_else(|| AppError::Validation("A url is required".to_string()))?;
        let video_id = extract_video_id(url).ok_or(YoutubeError::InvalidUrl)?;

        let (metadata, transcript) = tokio::join!(
            self.youtube.fetch_metadata(&video_id),
            self.youtube.fetch_transcript(&video_id),
        );

        Ok(TranscriptResponse {
            video_id,
            metadata,
            transcript: transcript?,
        })
    }

    /// List a user's saved summaries, newest first.
    pub async fn history(&self, user_id: &str) -> AppResult<Vec<VideoSummaryResponse>> {
        let summaries = self.summary_repo.find_by_user_id(user_id).await?;
        Ok(summaries.into_iter().map(Into::into).collect())
    }

    /// Get a single saved summary.
    pub async fn summary(&self, id: &str) -> AppResult<VideoSummaryResponse> {
        Ok(self.summary_repo.get_by_id(id).await?.into())
    }
}

fn field_string(value: &Value, field: &str) -> String {
    match value.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

fn validate_summaries(summaries: &Value) -> Result<(), AiError> {
    let Some(obj) = summaries.as_object() else {
        return Err(AiError::MalformedContent(
            "Summaries payload is not a JSON object".to_string(),
        ));
    };
    for field in ["brief", "detailed", "bulletPoints"] {
        if !obj.contains_key(field) || obj[field].is_null() {
            return Err(AiError::MalformedContent(format!(
                "Missing summary variant: {field}"
            )));
        }
    }
    Ok(())
}

fn build_summaries_prompt(title: &str, transcript: &str) -> String {
    format!(
        r#"Summarize the following YouTube video transcript as a single JSON object with exactly these fields:
- "brief": a 1-2 sentence summary
- "detailed": a multi-paragraph summary
- "bulletPoints": an array of 5-10 bullet point strings

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
    use serde_json::json;

    #[test]
    fn test_input_accepts_either_key() {
        let input = ExtensionInput {
            url: None,
            youtube_url: Some("https://youtu.be/dQw4w9WgXcQ".to_string()),
            user_id: None,
        };
        assert_eq!(input.url(), Some("https://youtu.be/dQw4w9WgXcQ"));

        let input = ExtensionInput {
            url: Some("https://example.com".to_string()),
            youtube_url: None,
            user_id: None,
        };
        assert_eq!(input.url(), Some("https://example.com"));
    }

    #[test]
    fn test_validate_summaries() {
        let ok = json!({"brief": "b", "detailed": "d", "bulletPoints": ["x"]});
        assert!(validate_summaries(&ok).is_ok());

        let missing = json!({"brief": "b", "detailed": "d"});
        assert!(validate_summaries(&missing).is_err());
    }

    #[test]
    fn test_field_string_handles_non_strings() {
        let value = json!({"brief": "short", "detailed": 42});
        assert_eq!(field_string(&value, "brief"), "short");
        assert_eq!(field_string(&value, "detailed"), "42");
        assert_eq!(field_string(&value, "missing"), "");
    }
}
