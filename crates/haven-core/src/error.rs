//! Error types for the Haven core.

use thiserror::Error;

/// Failure talking to the external emotion classification service.
///
/// Never surfaced to HTTP clients: [`crate::EmotionClassifier::classify_or_general`]
/// collapses every variant to the `general` label.
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("classifier request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("classifier returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("classifier body was not a JSON string label: {0}")]
    Body(String),
}

/// Failure from a completion provider (hosted LLM).
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("no API key for live completion (set HAVEN__LLM_API_KEY or OPENROUTER_API_KEY)")]
    MissingApiKey,

    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("completion API error ({status}): {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("completion API returned no content")]
    EmptyResponse,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config load failed: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}
