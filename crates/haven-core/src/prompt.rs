//! Prompt builder: picks the crisis or emotion-support template for a turn.
//!
//! Crisis always wins. Otherwise the emotion-specific empathy line is used only on the
//! first turn of a session; later turns get [`NEUTRAL_LINE`] whatever the emotion.

use crate::emotion::Emotion;
use crate::session::{Role, Turn};
use serde::{Deserialize, Serialize};

const SUPPORT_PREAMBLE: &str = "You are a conversational mental health assistant. Provide emotional support like a caring friend. Follow the guidelines based on the user's emotional state:";

const SUPPORT_CLOSING: &str = "Answer in a friendly and conversational manner, like talking to a close friend.";

/// Used in place of the empathy line once the session has history.
pub const NEUTRAL_LINE: &str = "Continue the conversation naturally from what the user has already shared, staying warm and supportive.";

/// System instructions for turns flagged by the crisis detector.
pub const CRISIS_INSTRUCTIONS: &str = "You are a conversational mental health assistant, and the user may be in crisis or at risk of harming themselves. Respond with warmth, calm, and without judgement. Acknowledge their pain and let them know they are not alone. Gently but clearly encourage them to contact a crisis line, emergency services, or someone they trust right now. Keep the reply short and easy to read. Never provide information that could be used for self-harm.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

impl From<Role> for PromptRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => PromptRole::User,
            Role::Assistant => PromptRole::Assistant,
        }
    }
}

/// One rendered chat message, serialized in the OpenAI-compatible `{role, content}` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl PromptMessage {
    pub fn new(role: PromptRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Which template a turn was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Crisis,
    Empathy(Emotion),
    Neutral,
}

/// System instruction block plus slots for prior history and the new user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    kind: PromptKind,
    system: String,
}

impl PromptTemplate {
    pub fn kind(&self) -> PromptKind {
        self.kind
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    /// `[system, ...history, user]`.
    pub fn render(&self, history: &[Turn], user_text: &str) -> Vec<PromptMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(PromptMessage::new(PromptRole::System, self.system.clone()));
        messages.extend(
            history
                .iter()
                .map(|t| PromptMessage::new(t.role.into(), t.content.clone())),
        );
        messages.push(PromptMessage::new(PromptRole::User, user_text));
        messages
    }
}

pub fn build(emotion: Emotion, crisis: bool, has_prior_history: bool) -> PromptTemplate {
    if crisis {
        return PromptTemplate {
            kind: PromptKind::Crisis,
            system: CRISIS_INSTRUCTIONS.to_string(),
        };
    }
    let (kind, guideline) = if has_prior_history {
        (PromptKind::Neutral, NEUTRAL_LINE)
    } else {
        (PromptKind::Empathy(emotion), emotion.empathy_line())
    };
    PromptTemplate {
        kind,
        system: format!("{}\n\n{}\n\n{}", SUPPORT_PREAMBLE, guideline, SUPPORT_CLOSING),
    }
}
