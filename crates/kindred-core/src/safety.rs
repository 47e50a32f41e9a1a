//! Safety Protocol: crisis and elevated-risk screening.
//!
//! This is the highest-priority path in the engine. The orchestrator runs it
//! against the raw turn text before any other derivation, and a crisis hit
//! replaces — never accompanies — the normal playbook output for that turn.
//! The crisis response is a fixed, human-reviewed message; nothing generated.

use crate::lexicon::Lexicon;
use serde::Serialize;
use tracing::{debug, warn};

/// Session safety level. Transitions are one-way within a session
/// (normal → elevated → crisis-triggered); only the orchestrator's explicit
/// escalation acknowledgment steps back down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SafetyState {
    Normal,
    Elevated,
    CrisisTriggered,
}

/// Fixed crisis response delivered in place of any playbook output.
#[derive(Debug, Clone, Serialize)]
pub struct CrisisPayload {
    /// Reviewed message spoken to the user, verbatim.
    pub message: &'static str,
    /// Instruction for the host: what to do beyond speaking the message.
    pub escalation: &'static str,
    /// Crisis lexicon terms that fired, for the audit log.
    pub matched_terms: Vec<&'static str>,
}

pub(crate) const CRISIS_MESSAGE: &str = "I hear you mentioning harm. Your safety matters. \
If you are in danger, contact a local emergency number or a trusted person right now. \
I can listen and help you plan one safe step.";

pub(crate) const CRISIS_ESCALATION: &str = "Surface local crisis resources and offer a warm \
handoff to a human supporter; do not generate a model response for this turn.";

/// Outcome of screening one turn's raw text.
#[derive(Debug, Clone)]
pub struct SafetyAssessment {
    /// State after this turn, monotonic relative to `current`.
    pub state: SafetyState,
    /// Present iff the crisis lexicon fired this turn.
    pub crisis: Option<CrisisPayload>,
}

impl SafetyAssessment {
    pub fn crisis_hit(&self) -> bool {
        self.crisis.is_some()
    }
}

/// Screen raw turn text and compute the next safety state.
///
/// Runs on the unprocessed text so a failure anywhere downstream can never
/// suppress a crisis match. `None` text screens clean. Pure function of its
/// inputs and the static lexicons.
pub fn assess(text: Option<&str>, current: SafetyState) -> SafetyAssessment {
    let crisis = Lexicon::Crisis.match_text(text);
    if crisis.is_hit() {
        warn!(terms = ?crisis.terms, "⚠️ crisis indicators detected, activating crisis protocol");
        return SafetyAssessment {
            state: SafetyState::CrisisTriggered,
            crisis: Some(CrisisPayload {
                message: CRISIS_MESSAGE,
                escalation: CRISIS_ESCALATION,
                matched_terms: crisis.terms,
            }),
        };
    }

    let elevated = Lexicon::ElevatedRisk.match_text(text);
    let state = if elevated.is_hit() && current == SafetyState::Normal {
        debug!(terms = ?elevated.terms, "elevated-risk language noted");
        SafetyState::Elevated
    } else {
        current
    };

    SafetyAssessment { state, crisis: None }
}
