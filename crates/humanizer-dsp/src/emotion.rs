//! Keyword-based emotion classification of utterance text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse emotional colour of an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    /// No marker matched.
    #[default]
    Neutral,
    /// Empathy or sadness.
    Warm,
    /// Exclamations and enthusiasm.
    Excited,
    /// Soothing, slow delivery.
    Calm,
    /// Emphasis and instructions.
    Serious,
}

impl Emotion {
    /// All emotions, in declaration order.
    pub const ALL: [Emotion; 5] = [
        Emotion::Neutral,
        Emotion::Warm,
        Emotion::Excited,
        Emotion::Calm,
        Emotion::Serious,
    ];

    /// Lowercase name, as used in JSON and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Warm => "warm",
            Emotion::Excited => "excited",
            Emotion::Calm => "calm",
            Emotion::Serious => "serious",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown emotion name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown emotion '{0}' (expected one of: neutral, warm, excited, calm, serious)")]
pub struct ParseEmotionError(String);

impl FromStr for Emotion {
    type Err = ParseEmotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Emotion::ALL
            .into_iter()
            .find(|e| e.as_str() == lowered)
            .ok_or_else(|| ParseEmotionError(s.to_string()))
    }
}

/// Ordered keyword groups. The first group with a hit wins.
pub const RULES: &[(Emotion, &[&str])] = &[
    (Emotion::Excited, &["!", "wow", "amazing", "yes"]),
    (Emotion::Warm, &["sorry", "sad", "unfortunately"]),
    (Emotion::Calm, &["relax", "deep breath", "calm"]),
    (Emotion::Serious, &["important", "listen", "focus"]),
];

/// Classifies `text` into an emotion.
///
/// Matching is case-insensitive substring search against [`RULES`]. Text
/// without any marker is [`Emotion::Neutral`].
pub fn classify(text: &str) -> Emotion {
    matched_keyword(text).map_or(Emotion::Neutral, |(emotion, _)| emotion)
}

/// Like [`classify`], but also reports the keyword that fired.
pub fn matched_keyword(text: &str) -> Option<(Emotion, &'static str)> {
    let lowered = text.to_lowercase();
    RULES.iter().find_map(|(emotion, keywords)| {
        keywords
            .iter()
            .find(|keyword| lowered.contains(*keyword))
            .map(|keyword| (*emotion, *keyword))
    })
}
