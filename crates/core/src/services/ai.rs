//! Gemini client and model-output handling.

use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use studydeck_common::AppError;
use thiserror::Error;

/// Token budget for study-board generation.
pub const BOARD_MAX_OUTPUT_TOKENS: u32 = 4096;

/// Token budget for flow-plan generation.
pub const FLOW_MAX_OUTPUT_TOKENS: u32 = 3096;

/// Token budget for chat replies.
pub const CHAT_MAX_OUTPUT_TOKENS: u32 = 1024;

/// Fields every study-board content payload must carry.
const REQUIRED_CONTENT_FIELDS: [&str; 5] =
    ["tldr", "detailedSummary", "summary", "flashcards", "quiz"];

/// Errors from generative-AI calls.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI API key is not configured")]
    NotConfigured,

    #[error("AI request failed: {0}")]
    RequestFailed(String),

    #[error("AI API returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("AI returned an empty response")]
    EmptyResponse,

    #[error("AI returned malformed content: {0}")]
    MalformedContent(String),
}

impl From<AiError> for AppError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::NotConfigured => Self::Config(err.to_string()),
            AiError::RequestFailed(_)
            | AiError::Upstream { .. }
            | AiError::EmptyResponse
            | AiError::MalformedContent(_) => Self::ExternalService(err.to_string()),
        }
    }
}

/// Extract the JSON payload from model output text.
///
/// Models frequently fence JSON in ```json blocks; this strips the fences and
/// surrounding prose, returning the candidate JSON text.
#[must_use]
pub fn extract_json_payload(text: &str) -> &str {
    let trimmed = text.trim();

    // Fenced block: take what is between the first fence line and the closing fence.
    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        // Skip an optional language tag on the fence line.
        let body_start = after_fence.find('\n').map_or(0, |i| i + 1);
        let body = &after_fence[body_start..];
        if let Some(end) = body.find("```") {
            return body[..end].trim();
        }
        return body.trim();
    }

    trimmed
}

/// Validate a study-board content payload from the model.
///
/// Every required field must be present and non-null before the content is
/// returned to a client or persisted.
pub fn validate_board_content(content: &Value) -> Result<(), AiError> {
    let Some(obj) = content.as_object() else {
        return Err(AiError::MalformedContent(
            "Content is not a JSON object".to_string(),
        ));
    };

    for field in REQUIRED_CONTENT_FIELDS {
        if !obj.contains_key(field) || obj[field].is_null() {
            return Err(AiError::MalformedContent(format!(
                "Missing required field: {field}"
            )));
        }
    }

    Ok(())
}

/// Gemini REST client.
///
/// Constructed once from config and injected into services; never a lazy
/// global.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

impl GeminiClient {
    /// Create a new client for the given model.
    #[must_use]
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            api_key,
            model,
        }
    }

    /// Whether a key is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Send a prompt and return the raw model text.
    pub async fn generate_text(
        &self,
        prompt: &str,
        max_output_tokens: u32,
    ) -> Result<String, AiError> {
        let api_key = self.api_key.as_deref().ok_or(AiError::NotConfigured)?;

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={api_key}",
            self.model
        );

        let body = json!({
            "contents": [{
                "parts": [{"text": prompt}]
            }],
            "generationConfig": {
                "temperature": 0.7,
                "topK": 40,
                "topP": 0.95,
                "maxOutputTokens": max_output_tokens,
            }
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Upstream { status, body });
        }

        #[derive(Deserialize)]
        struct GenerateResponse {
            #[serde(default)]
            candidates: Vec<Candidate>,
        }

        #[derive(Deserialize)]
        struct Candidate {
            content: CandidateContent,
        }

        #[derive(Deserialize)]
        struct CandidateContent {
            #[serde(default)]
            parts: Vec<Part>,
        }

        #[derive(Deserialize)]
        struct Part {
            #[serde(default)]
            text: String,
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AiError::MalformedContent(e.to_string()))?;

        let text: String = generated
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AiError::EmptyResponse);
        }

        Ok(text)
    }

    /// Send a prompt and parse the response as JSON, stripping fences.
    pub async fn generate_json(
        &self,
        prompt: &str,
        max_output_tokens: u32,
    ) -> Result<Value, AiError> {
        let text = self.generate_text(prompt, max_output_tokens).await?;
        let payload = extract_json_payload(&text);
        serde_json::from_str(payload).map_err(|e| AiError::MalformedContent(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_payload_json_fence() {
        let text = "```json\n{\"a\": 1}\n```";
        assert_eq!(extract_json_payload(text), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_json_payload_bare_fence() {
        let text = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json_payload(text), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_json_payload_unfenced() {
        assert_eq!(extract_json_payload("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_json_payload_with_prose_around_fence() {
        let text = "Here is the JSON you asked for:\n```json\n{\"a\": 1}\n```\nEnjoy!";
        assert_eq!(extract_json_payload(text), "{\"a\": 1}");
    }

    #[test]
    fn test_validate_board_content_complete() {
        let content = json!({
            "tldr": "short",
            "detailedSummary": "long",
            "summary": ["a", "b"],
            "flashcards": [{"question": "q", "answer": "a"}],
            "quiz": [{"question": "q", "options": []}],
        });
        assert!(validate_board_content(&content).is_ok());
    }

    #[test]
    fn test_validate_board_content_missing_field() {
        let content = json!({
            "tldr": "short",
            "detailedSummary": "long",
            "summary": ["a"],
            "flashcards": [],
        });
        let err = validate_board_content(&content).unwrap_err();
        assert!(err.to_string().contains("quiz"));
    }

    #[test]
    fn test_validate_board_content_null_field() {
        let content = json!({
            "tldr": null,
            "detailedSummary": "long",
            "summary": ["a"],
            "flashcards": [],
            "quiz": [],
        });
        assert!(validate_board_content(&content).is_err());
    }

    #[test]
    fn test_validate_board_content_not_object() {
        assert!(validate_board_content(&json!([1, 2, 3])).is_err());
    }
}
