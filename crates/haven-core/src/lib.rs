//! haven-core: the support chatbot's turn pipeline.
//!
//! Crisis detection and emotion lookup tables are local; emotion classification and text
//! generation are external services reached over HTTP.

pub mod classifier;
pub mod config;
pub mod crisis;
pub mod emotion;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod responder;
pub mod session;

pub use classifier::{EmotionClassifier, HttpEmotionClassifier};
pub use config::HavenConfig;
pub use crisis::{CRISIS_ACTION, CRISIS_KEYWORDS};
pub use emotion::{Emotion, SuggestedAction, GENERAL_LABEL};
pub use error::{ClassifyError, ConfigError, LlmError};
pub use llm::{
    build_provider, CompletionProvider, CompletionRequest, LlmMode, MockProvider,
    OpenRouterProvider,
};
pub use prompt::{PromptKind, PromptMessage, PromptRole, PromptTemplate};
pub use responder::{ChatOutcome, ResponseGenerator, TurnState, APOLOGY};
pub use session::{Role, Session, SessionStore, Turn};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
