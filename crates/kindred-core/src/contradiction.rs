//! Contradiction Detector: spoken sentiment vs. observed affect.
//!
//! "You said fine, but you looked sad." The detector estimates a linguistic
//! sentiment from the turn text and compares it against the affect tag from
//! the vision collaborator. A missing tag is insufficient signal, never a
//! contradiction.

use crate::emotion::{semantic_distance, EmotionLabel};
use crate::lexicon::Lexicon;
use serde::Serialize;
use tracing::debug;

/// Linguistic sentiment estimate for one turn's text.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SentimentEstimate {
    pub label: EmotionLabel,
    /// Winning lexicon score, in [0,1]; 0 when the estimate defaulted to neutral.
    pub confidence: f64,
}

/// Estimate sentiment from text via the positive/negative lexicons.
///
/// Majority wins: positive maps to content, negative to sad, and a tie or
/// double zero yields neutral with zero confidence.
pub fn linguistic_sentiment(text: Option<&str>) -> SentimentEstimate {
    let positive = Lexicon::SentimentPositive.match_text(text);
    let negative = Lexicon::SentimentNegative.match_text(text);

    if positive.score > negative.score {
        SentimentEstimate { label: EmotionLabel::Content, confidence: positive.score }
    } else if negative.score > positive.score {
        SentimentEstimate { label: EmotionLabel::Sad, confidence: negative.score }
    } else {
        SentimentEstimate { label: EmotionLabel::Neutral, confidence: 0.0 }
    }
}

/// Raised when words and face disagree beyond the semantic tolerance.
///
/// Carries both labels so the orchestrator can surface a reflective prompt
/// instead of silently picking one signal.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ContradictionFlag {
    /// What the words said.
    pub spoken: EmotionLabel,
    /// What the face showed.
    pub observed: EmotionLabel,
    /// Semantic distance between the two labels.
    pub distance: u8,
}

/// Compare the linguistic estimate against the affect tag.
///
/// No affect tag ⇒ no flag. Otherwise a flag is raised iff the fixed
/// semantic distance between the labels exceeds `threshold`.
pub fn detect(
    spoken: EmotionLabel,
    affect: Option<EmotionLabel>,
    threshold: u8,
) -> Option<ContradictionFlag> {
    let observed = affect?;
    let distance = semantic_distance(spoken, observed);
    if distance > threshold {
        debug!(%spoken, %observed, distance, "contradiction between words and affect");
        Some(ContradictionFlag { spoken, observed, distance })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hedged_words_estimate_neutral() {
        let est = linguistic_sentiment(Some("I feel okay I guess"));
        assert_eq!(est.label, EmotionLabel::Neutral);
        assert_eq!(est.confidence, 0.0);
    }

    #[test]
    fn negative_words_win_the_majority() {
        let est = linguistic_sentiment(Some("so tired and stressed and lonely"));
        assert_eq!(est.label, EmotionLabel::Sad);
        assert!(est.confidence > 0.0);
    }

    #[test]
    fn positive_words_win_the_majority() {
        let est = linguistic_sentiment(Some("today was great, I'm really glad"));
        assert_eq!(est.label, EmotionLabel::Content);
    }

    #[test]
    fn missing_text_is_neutral() {
        assert_eq!(linguistic_sentiment(None).label, EmotionLabel::Neutral);
    }

    #[test]
    fn no_affect_tag_never_flags() {
        assert!(detect(EmotionLabel::Sad, None, 1).is_none());
        assert!(detect(EmotionLabel::Content, None, 1).is_none());
    }

    #[test]
    fn neutral_words_over_sad_face_flags() {
        let flag = detect(EmotionLabel::Neutral, Some(EmotionLabel::Sad), 1).expect("flag");
        assert_eq!(flag.spoken, EmotionLabel::Neutral);
        assert_eq!(flag.observed, EmotionLabel::Sad);
    }

    #[test]
    fn near_labels_do_not_flag() {
        assert!(detect(EmotionLabel::Calm, Some(EmotionLabel::Content), 1).is_none());
        assert!(detect(EmotionLabel::Neutral, Some(EmotionLabel::Calm), 1).is_none());
    }
}
