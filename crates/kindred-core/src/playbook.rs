//! Playbook catalog and selector: coping strategies keyed by emotion and intent.
//!
//! The catalog is a closed enum; selection is a deterministic lookup with a
//! documented fallback ladder, so the selector can never come back
//! empty-handed. Repetition-avoidance across turns is the orchestrator's
//! business, not the selector's — selection is stateless per call.

use crate::emotion::EmotionLabel;
use crate::lexicon::Lexicon;
use crate::trajectory::Trend;
use serde::Serialize;
use tracing::debug;

/// Detected conversational intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Intent {
    Venting,
    Crisis,
    SeekingAdvice,
    SmallTalk,
}

/// Walk the intent lexicons in declared priority order; the first one with a
/// nonzero match wins. No match means no intent.
pub fn detect_intent(text: Option<&str>) -> Option<Intent> {
    const ORDER: [(Lexicon, Intent); 4] = [
        (Lexicon::IntentVenting, Intent::Venting),
        (Lexicon::IntentCrisis, Intent::Crisis),
        (Lexicon::IntentSeekingAdvice, Intent::SeekingAdvice),
        (Lexicon::IntentSmallTalk, Intent::SmallTalk),
    ];
    ORDER
        .into_iter()
        .find(|(lexicon, _)| lexicon.match_text(text).is_hit())
        .map(|(_, intent)| intent)
}

/// The fixed coping-strategy catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Playbook {
    GeneralValidation,
    ReflectiveListening,
    BehavioralActivation,
    Grounding54321,
    PanicKit,
    CooldownReset,
    BoundarySetting,
    MicroCheckin,
    SteadyReflection,
    SavorAndShare,
    SleepWindDown,
    OverwhelmTriage,
    SolutionSketch,
    CrisisStabilization,
}

impl Playbook {
    pub fn as_str(self) -> &'static str {
        match self {
            Playbook::GeneralValidation => "general-validation",
            Playbook::ReflectiveListening => "reflective-listening",
            Playbook::BehavioralActivation => "behavioral-activation",
            Playbook::Grounding54321 => "grounding-5-4-3-2-1",
            Playbook::PanicKit => "panic-kit",
            Playbook::CooldownReset => "cooldown-reset",
            Playbook::BoundarySetting => "boundary-setting",
            Playbook::MicroCheckin => "micro-checkin",
            Playbook::SteadyReflection => "steady-reflection",
            Playbook::SavorAndShare => "savor-and-share",
            Playbook::SleepWindDown => "sleep-wind-down",
            Playbook::OverwhelmTriage => "overwhelm-triage",
            Playbook::SolutionSketch => "solution-sketch",
            Playbook::CrisisStabilization => "crisis-stabilization",
        }
    }

    /// The concrete mini-protocol handed to the response generator.
    pub fn directive(self) -> &'static str {
        match self {
            Playbook::GeneralValidation => {
                "Pick one concrete action in 5 minutes (move, text, or jot a thought). Keep it small and doable."
            }
            Playbook::ReflectiveListening => {
                "Reflect their words back, name the feeling you heard, and ask one open question before offering anything."
            }
            Playbook::BehavioralActivation => {
                "Run a 5-minute activation: stand, stretch, and text one friend a kind line."
            }
            Playbook::Grounding54321 => {
                "Try 5-4-3-2-1 grounding with one slow exhale per step."
            }
            Playbook::PanicKit => {
                "Panic kit: 3 paced breaths (inhale 4, exhale 6) plus name 3 things you can see."
            }
            Playbook::CooldownReset => {
                "Cool-down reset: cold water on wrists plus two minutes outside before replying to anyone."
            }
            Playbook::BoundarySetting => {
                "Name the trigger, then pick one boundary you can state today in a single sentence."
            }
            Playbook::MicroCheckin => {
                "Micro check-in: what mattered most today? Pick one tiny action that honors it in 5 minutes."
            }
            Playbook::SteadyReflection => {
                "Name what is working today and one small way to protect it this week."
            }
            Playbook::SavorAndShare => {
                "Savor it: say the good moment out loud and share it with one person today."
            }
            Playbook::SleepWindDown => {
                "Sleep wind-down: dim the lights, one minute of slow 6-second exhales, then write one worry and shelve it till morning."
            }
            Playbook::OverwhelmTriage => {
                "Overwhelm triage: list the top 3 tasks, pick one 10-minute starter, and ignore the rest for 30 minutes."
            }
            Playbook::SolutionSketch => {
                "Sketch the smallest next step together: one option, one first move, one time to try it."
            }
            Playbook::CrisisStabilization => {
                "Stabilize first: slow the breathing together and stay with one safe next step."
            }
        }
    }
}

impl std::fmt::Display for Playbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Choose a playbook for (emotion, intent, trend).
///
/// Resolution order:
/// 1. topic routes (panic / sleep / overwhelm keywords in the text);
/// 2. exact (emotion, intent) table entry;
/// 3. (emotion, any-intent) row;
/// 4. (any-emotion, intent) row;
/// 5. `general-validation`.
///
/// A worsening trajectory upgrades a small-talk selection to reflective
/// listening: light chatter over a sinking trend gets a gentle check-in
/// instead of chit-chat.
pub fn select(
    text: Option<&str>,
    emotion: Option<EmotionLabel>,
    intent: Option<Intent>,
    trend: Trend,
) -> Playbook {
    let chosen = topic_route(text)
        .or_else(|| emotion.zip(intent).and_then(|(e, i)| exact_entry(e, i)))
        .or_else(|| emotion.map(emotion_row))
        .or_else(|| intent.map(intent_row))
        .unwrap_or(Playbook::GeneralValidation);

    let chosen = if trend == Trend::Worsening && intent == Some(Intent::SmallTalk) {
        Playbook::ReflectiveListening
    } else {
        chosen
    };

    debug!(playbook = %chosen, ?emotion, ?intent, ?trend, "playbook selected");
    chosen
}

fn topic_route(text: Option<&str>) -> Option<Playbook> {
    if Lexicon::TopicPanic.match_text(text).is_hit() {
        Some(Playbook::PanicKit)
    } else if Lexicon::TopicSleep.match_text(text).is_hit() {
        Some(Playbook::SleepWindDown)
    } else if Lexicon::TopicOverwhelm.match_text(text).is_hit() {
        Some(Playbook::OverwhelmTriage)
    } else {
        None
    }
}

fn exact_entry(emotion: EmotionLabel, intent: Intent) -> Option<Playbook> {
    match (emotion, intent) {
        (EmotionLabel::Sad, Intent::Venting) => Some(Playbook::ReflectiveListening),
        (EmotionLabel::Sad, Intent::SeekingAdvice) => Some(Playbook::BehavioralActivation),
        (EmotionLabel::Fearful, Intent::Venting) => Some(Playbook::Grounding54321),
        (EmotionLabel::Fearful, Intent::SeekingAdvice) => Some(Playbook::PanicKit),
        (EmotionLabel::Angry, Intent::Venting) => Some(Playbook::CooldownReset),
        (EmotionLabel::Angry, Intent::SeekingAdvice) => Some(Playbook::BoundarySetting),
        (EmotionLabel::Neutral, Intent::SmallTalk) => Some(Playbook::MicroCheckin),
        _ => None,
    }
}

fn emotion_row(emotion: EmotionLabel) -> Playbook {
    match emotion {
        EmotionLabel::Crisis => Playbook::CrisisStabilization,
        EmotionLabel::Angry => Playbook::CooldownReset,
        EmotionLabel::Fearful => Playbook::Grounding54321,
        EmotionLabel::Sad => Playbook::BehavioralActivation,
        EmotionLabel::Neutral => Playbook::MicroCheckin,
        EmotionLabel::Calm => Playbook::SteadyReflection,
        EmotionLabel::Content | EmotionLabel::Happy => Playbook::SavorAndShare,
    }
}

fn intent_row(intent: Intent) -> Playbook {
    match intent {
        Intent::Venting => Playbook::ReflectiveListening,
        Intent::Crisis => Playbook::Grounding54321,
        Intent::SeekingAdvice => Playbook::SolutionSketch,
        Intent::SmallTalk => Playbook::MicroCheckin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn venting_outranks_small_talk_in_intent_priority() {
        let intent = detect_intent(Some("hey, I just need to vent for a minute"));
        assert_eq!(intent, Some(Intent::Venting));
    }

    #[test]
    fn no_intent_keywords_means_no_intent() {
        assert_eq!(detect_intent(Some("the train was late again")), None);
        assert_eq!(detect_intent(None), None);
    }

    #[test]
    fn exact_table_entry_wins() {
        let p = select(Some("can you just listen"), Some(EmotionLabel::Sad), Some(Intent::Venting), Trend::Stable);
        assert_eq!(p, Playbook::ReflectiveListening);
    }

    #[test]
    fn topic_route_overrides_the_table() {
        let p = select(
            Some("I can't sleep at all lately, what should I do"),
            Some(EmotionLabel::Sad),
            Some(Intent::SeekingAdvice),
            Trend::Stable,
        );
        assert_eq!(p, Playbook::SleepWindDown);
    }

    #[test]
    fn emotion_row_covers_missing_intent() {
        let p = select(None, Some(EmotionLabel::Fearful), None, Trend::Stable);
        assert_eq!(p, Playbook::Grounding54321);
    }

    #[test]
    fn intent_row_covers_missing_emotion() {
        let p = select(None, None, Some(Intent::SeekingAdvice), Trend::Stable);
        assert_eq!(p, Playbook::SolutionSketch);
    }

    #[test]
    fn selector_never_returns_nothing() {
        // No signal at all still resolves to the default.
        let p = select(None, None, None, Trend::InsufficientData);
        assert_eq!(p, Playbook::GeneralValidation);
    }

    #[test]
    fn every_emotion_intent_pair_resolves() {
        let emotions = [
            EmotionLabel::Crisis,
            EmotionLabel::Angry,
            EmotionLabel::Fearful,
            EmotionLabel::Sad,
            EmotionLabel::Neutral,
            EmotionLabel::Calm,
            EmotionLabel::Content,
            EmotionLabel::Happy,
        ];
        let intents = [Intent::Venting, Intent::Crisis, Intent::SeekingAdvice, Intent::SmallTalk];
        for &e in &emotions {
            for &i in &intents {
                // A total selection: the call itself is the assertion.
                let _ = select(None, Some(e), Some(i), Trend::Stable);
            }
        }
    }

    #[test]
    fn worsening_trend_upgrades_small_talk() {
        let p = select(None, Some(EmotionLabel::Neutral), Some(Intent::SmallTalk), Trend::Worsening);
        assert_eq!(p, Playbook::ReflectiveListening);
    }
}
