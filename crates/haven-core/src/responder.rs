//! Response generator: one chat turn from user text to `(reply, suggested action)`.
//!
//! Turn states: `AwaitingClassification -> AwaitingGeneration -> Complete | Failed`.
//! The session lock is held for the whole turn. A failed generation leaves history
//! untouched; the emotion cached during classification is kept.

use crate::classifier::EmotionClassifier;
use crate::crisis::{self, CRISIS_ACTION};
use crate::emotion::{Emotion, SuggestedAction};
use crate::llm::{CompletionProvider, CompletionRequest};
use crate::prompt::{self, PromptKind};
use crate::session::{Role, SessionStore};
use std::sync::Arc;

/// Returned as the reply when the language model call fails.
pub const APOLOGY: &str =
    "I'm sorry, I'm having trouble responding right now. Please try again in a moment.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    AwaitingClassification,
    AwaitingGeneration,
    Complete,
    Failed,
}

/// Result of one chat turn. Only `reply` and `action` go over the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOutcome {
    pub reply: String,
    pub action: SuggestedAction,
    pub emotion: String,
    pub crisis: bool,
    pub prompt: PromptKind,
    pub state: TurnState,
}

pub struct ResponseGenerator {
    sessions: Arc<SessionStore>,
    classifier: Arc<dyn EmotionClassifier>,
    provider: Arc<dyn CompletionProvider>,
}

impl ResponseGenerator {
    pub fn new(
        sessions: Arc<SessionStore>,
        classifier: Arc<dyn EmotionClassifier>,
        provider: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            sessions,
            classifier,
            provider,
        }
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Classify `text` and overwrite the session's cached emotion with the result.
    pub async fn classify_for_session(&self, session_id: &str, text: &str) -> String {
        let label = self.classifier.classify_or_general(text).await;
        self.sessions.set_emotion(session_id, label.clone()).await;
        tracing::info!(
            target: "haven::responder",
            session_id,
            emotion = %label,
            "emotion cached"
        );
        label
    }

    pub async fn respond(&self, session_id: &str, text: &str) -> ChatOutcome {
        let mut session = self.sessions.lock(session_id).await;

        let mut state = TurnState::AwaitingClassification;
        tracing::debug!(target: "haven::responder", session_id, ?state);
        let emotion = match session.emotion.clone() {
            Some(cached) => cached,
            None => {
                let label = self.classifier.classify_or_general(text).await;
                session.emotion = Some(label.clone());
                label
            }
        };

        let crisis = crisis::detect(text);
        if crisis {
            tracing::warn!(
                target: "haven::responder",
                session_id,
                keywords = ?crisis::matched_keywords(text),
                "crisis language detected"
            );
        }

        let template = prompt::build(Emotion::from_label(&emotion), crisis, session.has_history());
        let request = CompletionRequest {
            conversation_id: session_id.to_string(),
            messages: template.render(&session.history, text),
        };

        state = TurnState::AwaitingGeneration;
        tracing::debug!(
            target: "haven::responder",
            session_id,
            ?state,
            prompt = ?template.kind(),
            history = session.history.len(),
            "submitting to {}",
            self.provider.name()
        );

        match self.provider.complete(&request).await {
            Ok(reply) => {
                session.push(Role::User, text);
                session.push(Role::Assistant, reply.clone());
                let action = if crisis {
                    SuggestedAction::Text(CRISIS_ACTION.to_string())
                } else {
                    Emotion::from_label(&emotion).suggested_action()
                };
                tracing::info!(
                    target: "haven::responder",
                    session_id,
                    emotion = %emotion,
                    crisis,
                    reply_len = reply.len(),
                    "turn complete"
                );
                ChatOutcome {
                    reply,
                    action,
                    emotion,
                    crisis,
                    prompt: template.kind(),
                    state: TurnState::Complete,
                }
            }
            Err(e) => {
                tracing::error!(
                    target: "haven::responder",
                    session_id,
                    error = %e,
                    "generation failed"
                );
                ChatOutcome {
                    reply: APOLOGY.to_string(),
                    action: SuggestedAction::none(),
                    emotion,
                    crisis,
                    prompt: template.kind(),
                    state: TurnState::Failed,
                }
            }
        }
    }
}
