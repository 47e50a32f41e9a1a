//! Prompt builders for the downstream language model.
//!
//! The engine decides; these functions phrase the decision as context the
//! host injects into its model call. Nothing here talks to a network — the
//! output is a plain string handed to the LLM collaborator.

use crate::emotion::EmotionLabel;
use crate::orchestrator::{DecisionBundle, ResponseDirective};
use crate::session_log::LoggedTurn;
use crate::trajectory::Trend;

/// System framing for the per-turn response call.
pub const FUSION_SYSTEM: &str = "CONTEXT: Short, solution-focused spoken support. \
Validate based on words and observed emotion, offer ONE specific tool right now, \
keep it under 3 sentences, and match the pace hint.";

/// Build the per-turn fusion prompt from the user's words and the decision.
pub fn fusion_prompt(user_text: &str, decision: &DecisionBundle) -> String {
    let emotion = decision
        .trajectory
        .dominant
        .map(EmotionLabel::as_str)
        .unwrap_or("unknown");
    let trend = match decision.trajectory.trend {
        Trend::Improving => "lifting",
        Trend::Worsening => "sinking",
        Trend::Stable => "steady",
        Trend::InsufficientData => "too early to tell",
    };
    let contradiction = match &decision.contradiction {
        Some(flag) => format!(
            "words said {} but the face showed {}; invite a gentle check-in",
            flag.spoken, flag.observed
        ),
        None => "none noted".to_string(),
    };
    let playbook = match &decision.response {
        ResponseDirective::Playbook { directive, .. } => *directive,
        ResponseDirective::Crisis(payload) => payload.message,
    };

    format!(
        "USER SAID: '{user_text}'. \
EMOTIONAL STATE: '{emotion}'. \
EMOTION TRAJECTORY: {trend}. \
CONTRADICTION FLAG: {contradiction}. \
SUGGESTED PLAYBOOK: {playbook}. \
PACE HINT: {hint:?}. \
RESPONSE LENGTH CAP: {cap} characters.",
        hint = decision.pacing.hint,
        cap = decision.pacing.max_response_chars,
    )
}

/// System framing for the end-of-session summary call.
pub const SUMMARY_SYSTEM: &str = "You are preparing a concise session handoff. \
Summarize in 3 bullet points: (1) observed emotion trend, (2) key concerns, \
(3) agreed small actions. Keep it under 80 words.";

/// Build the summary prompt from the emotion timeline and recent turns.
pub fn summary_prompt(
    timeline: impl Iterator<Item = (u64, EmotionLabel)>,
    recent_turns: &[LoggedTurn],
) -> String {
    let emotions: Vec<&str> = timeline.map(|(_, label)| label.as_str()).collect();
    let snippets: Vec<String> = recent_turns
        .iter()
        .filter_map(|entry| {
            entry
                .turn
                .text
                .as_deref()
                .map(|text| format!("[{}] {}", entry.observation.dominant(), text))
        })
        .collect();

    format!(
        "Recent emotions: {}. Transcript snippets: {}",
        emotions.join(", "),
        snippets.join(" | ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::orchestrator::SessionOrchestrator;

    #[test]
    fn fusion_prompt_carries_every_signal() {
        let mut s = SessionOrchestrator::new(EngineConfig::default());
        let text = "I feel okay I guess";
        let bundle = s.process_turn(Some(text), Some(EmotionLabel::Sad), 3.0, 5).unwrap();

        let prompt = fusion_prompt(text, &bundle);
        assert!(prompt.contains("I feel okay I guess"));
        assert!(prompt.contains("'sad'"));
        assert!(prompt.contains("words said neutral but the face showed sad"));
        assert!(prompt.contains("PACE HINT"));
    }

    #[test]
    fn crisis_prompt_carries_the_fixed_message() {
        let mut s = SessionOrchestrator::new(EngineConfig::default());
        let bundle = s.process_turn(Some("I want to end my life"), None, 2.0, 6).unwrap();

        let prompt = fusion_prompt("I want to end my life", &bundle);
        assert!(prompt.contains("Your safety matters"));
    }

    #[test]
    fn summary_prompt_lists_emotions_in_order() {
        let mut s = SessionOrchestrator::new(EngineConfig::default());
        s.process_turn(Some("rough day"), Some(EmotionLabel::Sad), 2.0, 2).unwrap();
        s.process_turn(Some("a bit better now"), Some(EmotionLabel::Calm), 2.0, 4).unwrap();

        let prompt = summary_prompt(s.emotion_timeline(), s.recent_turns(6));
        assert!(prompt.contains("sad, calm"));
        assert!(prompt.contains("rough day"));
    }
}
