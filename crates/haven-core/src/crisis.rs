//! Crisis language detection: a keyword heuristic, not a classifier.
//!
//! Case-insensitive substring match against [`CRISIS_KEYWORDS`]. False negatives are
//! expected and false positives are possible ("depressed" always triggers).

/// Phrases that flag a message as possible self-harm language.
pub const CRISIS_KEYWORDS: &[&str] = &[
    "suicide",
    "suicidal",
    "kill myself",
    "end my life",
    "want to die",
    "self harm",
    "self-harm",
    "hurt myself",
    "no reason to live",
    "depressed",
];

/// Action returned instead of the emotion table whenever the crisis flag is set.
pub const CRISIS_ACTION: &str = "Please reach out for help right now. If you are in immediate danger, contact your local emergency services. You can call or text 988 (Suicide & Crisis Lifeline, US) any time, or talk to someone you trust. You don't have to go through this alone.";

/// True when `text` contains any crisis keyword.
pub fn detect(text: &str) -> bool {
    let lower = text.to_lowercase();
    CRISIS_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Keywords present in `text`, in list order. Used for logging only.
pub fn matched_keywords(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    CRISIS_KEYWORDS
        .iter()
        .copied()
        .filter(|k| lower.contains(k))
        .collect()
}
