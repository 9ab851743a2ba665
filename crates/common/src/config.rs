//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Generative AI configuration.
    #[serde(default)]
    pub ai: AiConfig,
    /// YouTube Data API configuration.
    #[serde(default)]
    pub youtube: YoutubeConfig,
    /// Translation proxy configuration.
    #[serde(default)]
    pub translation: TranslationConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Generative AI (Gemini) configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AiConfig {
    /// API key. Falls back to the `GEMINI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model identifier.
    #[serde(default = "default_ai_model")]
    pub model: String,
}

/// YouTube Data API configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct YoutubeConfig {
    /// API key for metadata lookups. Falls back to the `YOUTUBE_API_KEY`
    /// environment variable. Metadata degrades to fallbacks when absent.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Translation proxy (`LibreTranslate`) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationConfig {
    /// Base URL of the LibreTranslate instance.
    #[serde(default = "default_translation_url")]
    pub url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_translation_timeout")]
    pub timeout_seconds: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            url: default_translation_url(),
            timeout_seconds: default_translation_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

fn default_ai_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_translation_url() -> String {
    "http://localhost:5000".to_string()
}

const fn default_translation_timeout() -> u64 {
    10
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `STUDYDECK_ENV`)
    /// 3. Environment variables with `STUDYDECK` prefix
    ///
    /// The bare `GEMINI_API_KEY` and `YOUTUBE_API_KEY` environment variables
    /// are honored as fallbacks for the corresponding config keys.
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("STUDYDECK_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("STUDYDECK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: Self = config.try_deserialize()?;
        config.apply_env_fallbacks();
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("STUDYDECK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: Self = config.try_deserialize()?;
        config.apply_env_fallbacks();
        Ok(config)
    }

    fn apply_env_fallbacks(&mut self) {
        if self.ai.api_key.is_none()
            && let Ok(key) = std::env::var("GEMINI_API_KEY")
            && !key.is_empty()
        {
            self.ai.api_key = Some(key);
        }
        if self.youtube.api_key.is_none()
            && let Ok(key) = std::env::var("YOUTUBE_API_KEY")
            && !key.is_empty()
        {
            self.youtube.api_key = Some(key);
        }
    }
}
