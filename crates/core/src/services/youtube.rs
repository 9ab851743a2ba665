//! YouTube client: video-ID extraction, metadata lookup, transcript fetch.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;
use studydeck_common::AppError;
use thiserror::Error;
use tracing::warn;

/// Matches watch, share, embed, and legacy URL forms and captures the
/// 11-character video ID.
static VIDEO_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#,
    )
    .unwrap()
});

static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").unwrap());

/// Errors from YouTube calls.
#[derive(Debug, Error)]
pub enum YoutubeError {
    #[error("Invalid YouTube URL")]
    InvalidUrl,

    #[error("No captions are available for this video")]
    TranscriptUnavailable,

    #[error("YouTube request failed: {0}")]
    RequestFailed(String),

    #[error("Malformed YouTube response: {0}")]
    MalformedResponse(String),
}

impl From<YoutubeError> for AppError {
    fn from(err: YoutubeError) -> Self {
        match err {
            YoutubeError::InvalidUrl | YoutubeError::TranscriptUnavailable => {
                Self::BadRequest(err.to_string())
            }
            YoutubeError::RequestFailed(_) | YoutubeError::MalformedResponse(_) => {
                Self::ExternalService(err.to_string())
            }
        }
    }
}

/// Extract the 11-character video ID from a YouTube URL.
#[must_use]
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Format an ISO-8601 duration (`PT1H2M3S`) as `1:02:03` / `5:09` / `0:45`.
///
/// Unparseable input yields `"Unknown"`.
#[must_use]
pub fn format_duration(iso: &str) -> String {
    let Some(caps) = DURATION_RE.captures(iso) else {
        return "Unknown".to_string();
    };

    let part = |i: usize| -> u64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };

    let (hours, minutes, seconds) = (part(1), part(2), part(3));
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Video metadata as shown on a study board.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    pub title: String,
    pub channel: String,
    pub duration: String,
}

impl VideoMetadata {
    /// Placeholder values used when the Data API is unavailable.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            title: "YouTube Video".to_string(),
            channel: "Unknown Channel".to_string(),
            duration: "Unknown".to_string(),
        }
    }
}

/// YouTube API client.
///
/// Metadata lookups degrade to [`VideoMetadata::fallback`] when the Data API
/// key is absent or the call fails; transcript fetches are hard errors.
#[derive(Clone)]
pub struct YoutubeClient {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl YoutubeClient {
    /// Create a new client. `api_key` enables Data API metadata lookups.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .unwrap_or_default(),
            api_key,
        }
    }

    /// Fetch title, channel, and formatted duration for a video.
    ///
    /// Never fails the caller: any problem is logged and fallback metadata is
    /// returned.
    pub async fn fetch_metadata(&self, video_id: &str) -> VideoMetadata {
        let Some(api_key) = self.api_key.as_deref() else {
            return VideoMetadata::fallback();
        };

        match self.fetch_metadata_inner(video_id, api_key).await {
            Ok(meta) => meta,
            Err(err) => {
                warn!(video_id, error = %err, "Video metadata lookup failed, using fallback");
                VideoMetadata::fallback()
            }
        }
    }

    async fn fetch_metadata_inner(
        &self,
        video_id: &str,
        api_key: &str,
    ) -> Result<VideoMetadata, YoutubeError> {
        #[derive(Deserialize)]
        struct VideosResponse {
            items: Vec<VideoItem>,
        }

        #[derive(Deserialize)]
        struct VideoItem {
            snippet: Snippet,
            #[serde(rename = "contentDetails")]
            content_details: ContentDetails,
        }

        #[derive(Deserialize)]
        struct Snippet {
            title: String,
            #[serde(rename = "channelTitle")]
            channel_title: String,
        }

        #[derive(Deserialize)]
        struct ContentDetails {
            duration: String,
        }

        let url = format!(
            "https://www.googleapis.com/youtube/v3/videos?part=snippet,contentDetails&id={video_id}&key={api_key}"
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| YoutubeError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(YoutubeError::RequestFailed(format!(
                "Data API returned {}",
                response.status()
            )));
        }

        let videos: VideosResponse = response
            .json()
            .await
            .map_err(|e| YoutubeError::MalformedResponse(e.to_string()))?;

        let item = videos
            .items
            .into_iter()
            .next()
            .ok_or_else(|| YoutubeError::MalformedResponse("No video item returned".to_string()))?;

        Ok(VideoMetadata {
            title: item.snippet.title,
            channel: item.snippet.channel_title,
            duration: format_duration(&item.content_details.duration),
        })
    }

    /// Fetch the English caption track for a video as plain text.
    pub async fn fetch_transcript(&self, video_id: &str) -> Result<String, YoutubeError> {
        #[derive(Deserialize)]
        struct TimedText {
            #[serde(default)]
            events: Vec<TimedTextEvent>,
        }

        #[derive(Deserialize)]
        struct TimedTextEvent {
            #[serde(default)]
            segs: Vec<TimedTextSeg>,
        }

        #[derive(Deserialize)]
        struct TimedTextSeg {
            #[serde(default)]
            utf8: String,
        }

        let url =
            format!("https://www.youtube.com/api/timedtext?v={video_id}&lang=en&fmt=json3");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| YoutubeError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(YoutubeError::TranscriptUnavailable);
        }

        let body = response
            .text()
            .await
            .map_err(|e| YoutubeError::RequestFailed(e.to_string()))?;

        // The endpoint returns an empty body when no caption track exists.
        if body.trim().is_empty() {
            return Err(YoutubeError::TranscriptUnavailable);
        }

        let timed_text: TimedText = serde_json::from_str(&body)
            .map_err(|e| YoutubeError::MalformedResponse(e.to_string()))?;

        let transcript = timed_text
            .events
            .iter()
            .flat_map(|e| e.segs.iter())
            .map(|s| s.utf8.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if transcript.is_empty() {
            return Err(YoutubeError::TranscriptUnavailable);
        }

        Ok(transcript)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_extract_video_id_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_extract_video_id_embed_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_extract_video_id_with_extra_params() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?t=42&v=dQw4w9WgXcQ&feature=share")
                .as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_extract_video_id_rejects_non_youtube() {
        assert_eq!(extract_video_id("https://vimeo.com/12345678901"), None);
        assert_eq!(extract_video_id("not a url"), None);
    }

    #[test]
    fn test_format_duration_with_hours() {
        assert_eq!(format_duration("PT1H2M3S"), "1:02:03");
    }

    #[test]
    fn test_format_duration_minutes_seconds() {
        assert_eq!(format_duration("PT5M9S"), "5:09");
    }

    #[test]
    fn test_format_duration_seconds_only() {
        assert_eq!(format_duration("PT45S"), "0:45");
    }

    #[test]
    fn test_format_duration_unparseable() {
        assert_eq!(format_duration("garbage"), "Unknown");
    }
}
