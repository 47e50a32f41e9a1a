//! Closed emotion vocabulary shared by every signal in the engine.
//!
//! The label set is a fixed enum rather than an open string space so the
//! valence scale and the semantic distance table stay total: every pair of
//! labels has a defined distance, and trend math never meets an unknown tag.

use serde::{Deserialize, Serialize};

/// The fixed emotion vocabulary.
///
/// Affect tags arriving from the vision collaborator and linguistic sentiment
/// estimates both draw from this set. Serialized lowercase so external tags
/// like `"sad"` deserialize directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Crisis,
    Angry,
    Fearful,
    Sad,
    Neutral,
    Calm,
    Content,
    Happy,
}

/// Polarity class used by the semantic distance table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Polarity {
    Negative,
    Neutral,
    Positive,
}

impl EmotionLabel {
    /// Scalar valence on the ordered scale used for trajectory slopes.
    pub fn valence(self) -> f64 {
        match self {
            EmotionLabel::Crisis => -2.0,
            EmotionLabel::Angry | EmotionLabel::Fearful | EmotionLabel::Sad => -1.0,
            EmotionLabel::Neutral => 0.0,
            EmotionLabel::Calm => 1.0,
            EmotionLabel::Content | EmotionLabel::Happy => 2.0,
        }
    }

    fn polarity(self) -> Polarity {
        match self {
            EmotionLabel::Crisis
            | EmotionLabel::Angry
            | EmotionLabel::Fearful
            | EmotionLabel::Sad => Polarity::Negative,
            EmotionLabel::Neutral => Polarity::Neutral,
            EmotionLabel::Calm | EmotionLabel::Content | EmotionLabel::Happy => Polarity::Positive,
        }
    }

    /// Wire/display form of the label (matches the serde encoding).
    pub fn as_str(self) -> &'static str {
        match self {
            EmotionLabel::Crisis => "crisis",
            EmotionLabel::Angry => "angry",
            EmotionLabel::Fearful => "fearful",
            EmotionLabel::Sad => "sad",
            EmotionLabel::Neutral => "neutral",
            EmotionLabel::Calm => "calm",
            EmotionLabel::Content => "content",
            EmotionLabel::Happy => "happy",
        }
    }
}

impl std::fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed symmetric semantic distance between two labels.
///
/// Distances are polarity-driven: labels inside the same polarity class are
/// near (calm/content), neutral sits one step from the positive cluster and
/// two from the negative one, and cross-polarity pairs are far (calm/sad).
/// The contradiction detector flags pairs whose distance exceeds its
/// threshold (default 1).
pub fn semantic_distance(a: EmotionLabel, b: EmotionLabel) -> u8 {
    if a == b {
        return 0;
    }
    match (a.polarity(), b.polarity()) {
        (x, y) if x == y => 1,
        (Polarity::Neutral, Polarity::Positive) | (Polarity::Positive, Polarity::Neutral) => 1,
        (Polarity::Neutral, Polarity::Negative) | (Polarity::Negative, Polarity::Neutral) => 2,
        _ => 3,
    }
}
