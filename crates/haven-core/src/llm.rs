//! Completion providers: the hosted language model behind a trait.
//!
//! `OpenRouterProvider` speaks the OpenAI-compatible chat completions protocol (OpenRouter
//! by default, any compatible endpoint via `llm_api_url`). `MockProvider` returns a
//! deterministic reply and is the default mode so the service runs without credentials.

use crate::config::HavenConfig;
use crate::error::LlmError;
use crate::prompt::{PromptMessage, PromptRole};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Mode for LLM invocation: mock (simulated reply) or live (external API).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmMode {
    #[default]
    Mock,
    Live,
}

impl LlmMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmMode::Mock => "mock",
            LlmMode::Live => "live",
        }
    }

    /// Case-insensitive; `None` for anything but `mock` or `live`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Some(LlmMode::Mock),
            "live" => Some(LlmMode::Live),
            _ => None,
        }
    }
}

/// Prompt sent to a provider. `conversation_id` is the per-session conversation key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub conversation_id: String,
    pub messages: Vec<PromptMessage>,
}

impl CompletionRequest {
    pub fn system_prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == PromptRole::System)
            .map(|m| m.content.as_str())
    }

    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == PromptRole::User)
            .map(|m| m.content.as_str())
    }
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

/// Selects the provider for `config.llm_mode`. Live mode without a key is an error.
pub fn build_provider(config: &HavenConfig) -> Result<Arc<dyn CompletionProvider>, LlmError> {
    match config.llm_mode() {
        LlmMode::Mock => Ok(Arc::new(MockProvider)),
        LlmMode::Live => Ok(Arc::new(OpenRouterProvider::from_config(config)?)),
    }
}

// OpenAI-compatible request/response
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
    temperature: f32,
    /// Conversation key, so the provider can attribute turns to one end user.
    user: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenRouterProvider {
    api_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    client: reqwest::Client,
}

impl OpenRouterProvider {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into().trim().to_string(),
            model: model.into(),
            temperature: 0.0,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &HavenConfig) -> Result<Self, LlmError> {
        let key = config.llm_api_key.clone().ok_or(LlmError::MissingApiKey)?;
        Ok(Self::new(&config.llm_api_url, key, &config.llm_model)
            .with_temperature(config.temperature))
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        tracing::debug!(
            target: "haven::llm",
            model = %self.model,
            messages = request.messages.len(),
            "dispatching completion"
        );

        let body = ChatRequest {
            model: &self.model,
            messages: &request.messages,
            temperature: self.temperature,
            user: &request.conversation_id,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", "https://haven.local")
            .header("X-Title", "Haven")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Status { status, body });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}

/// Deterministic stand-in for the hosted model.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockProvider;

#[async_trait]
impl CompletionProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let user = request.last_user_message().unwrap_or_default();
        let preview: String = user.chars().take(80).collect();
        let ellipsis = if user.chars().count() > 80 { "…" } else { "" };
        Ok(format!(
            "[Mock reply] Thank you for sharing that with me. You said: \"{}{}\". I'm here with you. Tell me more about how that feels.",
            preview, ellipsis
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(text: &str) -> CompletionRequest {
        CompletionRequest {
            conversation_id: "s1".to_string(),
            messages: vec![
                PromptMessage::new(PromptRole::System, "be kind"),
                PromptMessage::new(PromptRole::User, text),
            ],
        }
    }

    #[test]
    fn llm_mode_parse() {
        assert_eq!(LlmMode::parse("live"), Some(LlmMode::Live));
        assert_eq!(LlmMode::parse(" LIVE "), Some(LlmMode::Live));
        assert_eq!(LlmMode::parse("mock"), Some(LlmMode::Mock));
        assert_eq!(LlmMode::parse("openai"), None);
        assert_eq!(LlmMode::parse("lvie"), None);
    }

    #[tokio::test]
    async fn mock_is_deterministic_and_quotes_user() {
        let req = request("my dog name was rishabh");
        let a = MockProvider.complete(&req).await.unwrap();
        let b = MockProvider.complete(&req).await.unwrap();
        assert_eq!(a, b);
        assert!(a.contains("my dog name was rishabh"));
    }

    #[test]
    fn build_provider_requires_key_in_live_mode() {
        let mut cfg = HavenConfig {
            llm_mode: "live".to_string(),
            ..HavenConfig::default()
        };
        assert!(matches!(build_provider(&cfg), Err(LlmError::MissingApiKey)));
        cfg.llm_api_key = Some("k".to_string());
        assert_eq!(build_provider(&cfg).unwrap().name(), "openrouter");
        cfg.llm_mode = "mock".to_string();
        assert_eq!(build_provider(&cfg).unwrap().name(), "mock");
    }

    #[tokio::test]
    async fn openrouter_sends_history_and_conversation_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "test/model",
                "user": "s1",
                "messages": [
                    { "role": "system", "content": "be kind" },
                    { "role": "user", "content": "hello" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": { "role": "assistant", "content": "  Hi! How are you?  " }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenRouterProvider::new(
            format!("{}/v1/chat/completions", server.uri()),
            "test-key",
            "test/model",
        );
        let reply = provider.complete(&request("hello")).await.unwrap();
        assert_eq!(reply, "Hi! How are you?");
    }

    #[tokio::test]
    async fn openrouter_non_success_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let provider = OpenRouterProvider::new(server.uri(), "k", "m");
        match provider.complete(&request("hello")).await {
            Err(LlmError::Status { status, body }) => {
                assert_eq!(status.as_u16(), 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn openrouter_empty_choices_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let provider = OpenRouterProvider::new(server.uri(), "k", "m");
        assert!(matches!(
            provider.complete(&request("hello")).await,
            Err(LlmError::EmptyResponse)
        ));
    }
}
