//! Emotion labels and the fixed lookup tables keyed by them.
//!
//! The classifier boundary treats labels as opaque strings; everything downstream goes
//! through [`Emotion::from_label`], which maps anything unrecognized to [`Emotion::General`].

use serde::{Deserialize, Serialize};

/// Label used whenever classification fails or returns something outside the known set.
pub const GENERAL_LABEL: &str = "general";

const DEFAULT_ACTION: &str =
    "I'm here to support you in any way I can. Feel free to share more.";

/// Coarse emotional tone of a message: six known labels plus the `general` fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Love,
    Surprise,
    Joy,
    Sadness,
    Anger,
    Fear,
    General,
}

impl Emotion {
    /// Every label the classifier is expected to produce (excludes the fallback).
    pub const KNOWN: [Emotion; 6] = [
        Emotion::Love,
        Emotion::Surprise,
        Emotion::Joy,
        Emotion::Sadness,
        Emotion::Anger,
        Emotion::Fear,
    ];

    /// Case-insensitive; unknown labels become `General`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "love" => Emotion::Love,
            "surprise" => Emotion::Surprise,
            "joy" => Emotion::Joy,
            "sadness" => Emotion::Sadness,
            "anger" => Emotion::Anger,
            "fear" => Emotion::Fear,
            _ => Emotion::General,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Love => "love",
            Emotion::Surprise => "surprise",
            Emotion::Joy => "joy",
            Emotion::Sadness => "sadness",
            Emotion::Anger => "anger",
            Emotion::Fear => "fear",
            Emotion::General => GENERAL_LABEL,
        }
    }

    /// Empathy sentence interpolated into the first-turn system prompt.
    pub fn empathy_line(&self) -> &'static str {
        match self {
            Emotion::Love => "I can sense a lot of love here. That's such a powerful emotion! It's amazing to see that you're feeling so much love. Is there anything you'd like to share more about this feeling?",
            Emotion::Surprise => "Wow, something unexpected has come up! Tell me more about it. Surprises can really make things interesting. Do you want to explore how this surprise made you feel?",
            Emotion::Joy => "I'm so glad you're feeling joyful! Moments like these are what make life great. Do you want to talk about what's bringing you so much happiness?",
            Emotion::Sadness => "I'm really sorry you're feeling sad. It's okay to feel this way sometimes. If you'd like, we can talk more about what's causing this sadness or we can do something to lift your mood.",
            Emotion::Anger => "It sounds like you're feeling frustrated or angry. It's important to express how you feel. How about we try something together to calm down a bit?",
            Emotion::Fear => "I understand that you might be feeling scared or anxious. It's okay to feel fear sometimes. I'm here with you. Let's focus on what we can do to make things feel a little more manageable.",
            Emotion::General => "Whatever you're feeling, I'm here to support you. Feel free to share anything you'd like to talk about.",
        }
    }

    /// Coping hint returned next to the model's reply (non-crisis turns only).
    pub fn suggested_action(&self) -> SuggestedAction {
        match self {
            Emotion::Joy => SuggestedAction::Text(
                "How about sharing this joy with a friend or writing it down so you can come back to it later? It's always nice to hold onto moments like these.".to_string(),
            ),
            Emotion::Sadness => SuggestedAction::Text(
                "It might help to take a few deep breaths or try a short mindfulness exercise. Or if you prefer, we can talk more about what's troubling you.".to_string(),
            ),
            Emotion::Anger => SuggestedAction::Text(
                "Let's try a calming exercise. Take a deep breath in... hold it... and slowly let it out. Let's repeat that a few times.".to_string(),
            ),
            Emotion::Fear => SuggestedAction::Steps(
                [
                    "Focus on 5 things you can see.",
                    "Focus on 4 things you can touch.",
                    "Focus on 3 things you can hear.",
                    "Focus on 2 things you can smell.",
                    "Focus on 1 thing you can taste.",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ),
            Emotion::Love | Emotion::Surprise | Emotion::General => {
                SuggestedAction::Text(DEFAULT_ACTION.to_string())
            }
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suggested action payload: a single sentence or an ordered list of steps.
/// Serializes as a bare JSON string or a JSON array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SuggestedAction {
    Text(String),
    Steps(Vec<String>),
}

impl SuggestedAction {
    /// Empty action, used when generation failed.
    pub fn none() -> Self {
        SuggestedAction::Text(String::new())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            SuggestedAction::Text(s) => s.is_empty(),
            SuggestedAction::Steps(steps) => steps.is_empty(),
        }
    }
}

impl Default for SuggestedAction {
    fn default() -> Self {
        Self::none()
    }
}
