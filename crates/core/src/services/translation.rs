//! Translation proxy backed by LibreTranslate.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use studydeck_common::AppError;
use thiserror::Error;

/// Supported target languages and their display names.
const SUPPORTED_LANGUAGES: [(&str, &str); 4] = [
    ("en", "English"),
    ("hi", "Hindi"),
    ("mr", "Marathi"),
    ("fr", "French"),
];

/// Errors from translation calls.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("Text is required")]
    EmptyText,

    #[error("Unsupported target language: {0}")]
    UnsupportedLanguage(String),

    #[error("Translation service timed out")]
    Timeout,

    #[error("Translation service is rate limited")]
    RateLimited,

    #[error("Translation request failed: {0}")]
    RequestFailed(String),

    #[error("Malformed translation response: {0}")]
    MalformedResponse(String),
}

impl From<TranslateError> for AppError {
    fn from(err: TranslateError) -> Self {
        match err {
            TranslateError::EmptyText | TranslateError::UnsupportedLanguage(_) => {
                Self::BadRequest(err.to_string())
            }
            TranslateError::Timeout => Self::UpstreamTimeout(err.to_string()),
            TranslateError::RateLimited => Self::RateLimited,
            TranslateError::RequestFailed(_) | TranslateError::MalformedResponse(_) => {
                Self::ExternalService(err.to_string())
            }
        }
    }
}

/// Look up the display name of a supported target language.
#[must_use]
pub fn language_name(code: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Translation request input.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateInput {
    pub text: String,
    pub target_lang: String,
}

/// Translation response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    pub original_text: String,
    pub translated_text: String,
    pub detected_source: String,
    pub target_lang: String,
    pub target_language_name: &'static str,
}

/// LibreTranslate proxy service.
#[derive(Clone)]
pub struct TranslationService {
    http: reqwest::Client,
    url: String,
}

impl TranslationService {
    /// Create a new translation service for a LibreTranslate instance.
    #[must_use]
    pub fn new(url: String, timeout_seconds: u64) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(timeout_seconds))
                .build()
                .unwrap_or_default(),
            url,
        }
    }

    /// Translate text into one of the supported target languages.
    pub async fn translate(&self, input: TranslateInput) -> Result<TranslateResponse, TranslateError> {
        let text = input.text.trim();
        if text.is_empty() {
            return Err(TranslateError::EmptyText);
        }

        let target = input.target_lang.to_lowercase();
        let target_name = language_name(&target)
            .ok_or_else(|| TranslateError::UnsupportedLanguage(target.clone()))?;

        let body = json!({
            "q": text,
            "source": "auto",
            "target": target,
            "format": "text",
        });

        let response = self
            .http
            .post(format!("{}/translate", self.url))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranslateError::Timeout
                } else {
                    TranslateError::RequestFailed(e.to_string())
                }
            })?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TranslateError::RateLimited);
        }

        if !response.status().is_success() {
            return Err(TranslateError::RequestFailed(format!(
                "LibreTranslate returned {}",
                response.status()
            )));
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct LibreTranslateResponse {
            translated_text: String,
            detected_language: Option<DetectedLang>,
        }

        #[derive(Deserialize)]
        struct DetectedLang {
            language: String,
        }

        let libre: LibreTranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::MalformedResponse(e.to_string()))?;

        Ok(TranslateResponse {
            original_text: text.to_string(),
            translated_text: libre.translated_text,
            detected_source: libre
                .detected_language
                .map_or_else(|| "auto".to_string(), |d| d.language),
            target_lang: target,
            target_language_name: target_name,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_language_names() {
        assert_eq!(language_name("en"), Some("English"));
        assert_eq!(language_name("hi"), Some("Hindi"));
        assert_eq!(language_name("mr"), Some("Marathi"));
        assert_eq!(language_name("fr"), Some("French"));
    }

    #[test]
    fn test_unsupported_language_rejected() {
        assert_eq!(language_name("de"), None);
        assert_eq!(language_name(""), None);
    }

    #[tokio::test]
    async fn test_empty_text_is_a_client_error() {
        let service = TranslationService::new("http://localhost:5000".to_string(), 1);
        let err = service
            .translate(TranslateInput {
                text: "   ".to_string(),
                target_lang: "en".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::EmptyText));
        assert!(matches!(AppError::from(err), AppError::BadRequest(_)));
    }
}
