//! Session Orchestrator: one decision per turn, one session per instance.
//!
//! The orchestrator is the only place the components are sequenced. Per
//! incoming turn: safety first (a crisis hit replaces the playbook output),
//! then the trajectory tracker, the contradiction detector, the playbook
//! selector and pacing controller, and finally the session log. Everything
//! it calls is a total function over clamped inputs, so the only errors a
//! caller can see are lifecycle violations.
//!
//! Turns are processed strictly one at a time in arrival order; the engine
//! holds no locks and performs no I/O. Independent sessions are fully
//! independent values.

use crate::config::EngineConfig;
use crate::contradiction::{self, ContradictionFlag};
use crate::emotion::EmotionLabel;
use crate::error::{SessionError, SessionResult};
use crate::pacing::{self, PacingProfile};
use crate::playbook::{self, Playbook};
use crate::safety::{self, CrisisPayload, SafetyState};
use crate::session_log::{LoggedTurn, SessionLog, SessionRecord, Summary, Turn};
use crate::trajectory::{EmotionObservation, TrajectorySignal, TrajectoryTracker};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

/// What the response generator should do this turn.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ResponseDirective {
    /// Normal routing: surface this coping playbook.
    Playbook { playbook: Playbook, directive: &'static str },
    /// Crisis routing: deliver the fixed payload, nothing else.
    Crisis(CrisisPayload),
}

/// The per-turn decision returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionBundle {
    pub turn_seq: u64,
    pub response: ResponseDirective,
    pub pacing: PacingProfile,
    pub contradiction: Option<ContradictionFlag>,
    pub trajectory: TrajectorySignal,
    pub safety_state: SafetyState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Active,
    Closed,
}

/// Owns one session's lifecycle and state.
#[derive(Debug)]
pub struct SessionOrchestrator {
    config: EngineConfig,
    state: SessionState,
    safety_state: SafetyState,
    tracker: TrajectoryTracker,
    log: SessionLog,
    next_seq: u64,
    last_playbook: Option<Playbook>,
}

impl SessionOrchestrator {
    pub fn new(config: EngineConfig) -> Self {
        info!("session started");
        SessionOrchestrator {
            config,
            state: SessionState::Active,
            safety_state: SafetyState::Normal,
            tracker: TrajectoryTracker::new(),
            log: SessionLog::new(Utc::now()),
            next_seq: 0,
            last_playbook: None,
        }
    }

    /// Process one turn and return the decision bundle.
    ///
    /// `text` is `None` when transcription failed. Negative or non-finite
    /// duration and negative word count are clamped to zero rather than
    /// failing the turn. Fails only with [`SessionError::Closed`].
    pub fn process_turn(
        &mut self,
        text: Option<&str>,
        affect_tag: Option<EmotionLabel>,
        duration_secs: f64,
        word_count: i64,
    ) -> SessionResult<DecisionBundle> {
        if self.state == SessionState::Closed {
            return Err(SessionError::Closed);
        }

        let duration_secs = if duration_secs.is_finite() { duration_secs.max(0.0) } else { 0.0 };
        let word_count = word_count.max(0).min(u32::MAX as i64) as u32;

        let seq = self.next_seq;
        self.next_seq += 1;

        // Safety screening runs first, on the raw text. Its result is
        // carried through unconditionally; nothing below can overwrite it.
        let assessment = safety::assess(text, self.safety_state);
        self.safety_state = assessment.state;

        // A crisis hit pins the linguistic label to crisis so the
        // trajectory records the turn honestly.
        let sentiment = if assessment.crisis_hit() {
            contradiction::SentimentEstimate { label: EmotionLabel::Crisis, confidence: 1.0 }
        } else {
            contradiction::linguistic_sentiment(text)
        };

        let observation = EmotionObservation {
            turn_seq: seq,
            linguistic: sentiment.label,
            confidence: sentiment.confidence,
            affect: affect_tag,
        };
        self.tracker.record(observation);
        let signal = self
            .tracker
            .current_trend(self.config.trend_window, self.config.trend_slope_threshold);

        // No transcript means no spoken sentiment to contradict.
        let flag = if text.is_some() {
            contradiction::detect(sentiment.label, affect_tag, self.config.contradiction_threshold)
        } else {
            None
        };

        let crisis_hit = assessment.crisis_hit();
        let (response, pacing, chosen) = match assessment.crisis {
            Some(payload) => (ResponseDirective::Crisis(payload), PacingProfile::crisis(), None),
            None => {
                let intent = playbook::detect_intent(text);
                let chosen = playbook::select(text, signal.dominant, intent, signal.trend);
                let mut history: Vec<(u32, f64)> = self
                    .log
                    .recent_turns(self.log.len())
                    .iter()
                    .map(|e| (e.turn.word_count, e.turn.duration_secs))
                    .collect();
                history.push((word_count, duration_secs));
                let pacing = pacing::profile_for(&history, &self.config);
                (
                    ResponseDirective::Playbook { playbook: chosen, directive: chosen.directive() },
                    pacing,
                    Some(chosen),
                )
            }
        };

        self.log.add_turn(LoggedTurn {
            turn: Turn {
                seq,
                text: text.map(str::to_string),
                affect: affect_tag,
                duration_secs,
                word_count,
                timestamp: Utc::now(),
            },
            observation,
            contradiction: flag,
            playbook: chosen,
            safety_state: self.safety_state,
            crisis_hit,
        })?;
        if let Some(p) = chosen {
            self.last_playbook = Some(p);
        }

        debug!(seq, state = ?self.safety_state, trend = ?signal.trend, "turn processed");
        Ok(DecisionBundle {
            turn_seq: seq,
            response,
            pacing,
            contradiction: flag,
            trajectory: signal,
            safety_state: self.safety_state,
        })
    }

    /// Close the session. Exactly once; fixes the summary.
    pub fn close_session(&mut self) -> SessionResult<Summary> {
        let summary = self.log.close(Utc::now())?.clone();
        self.state = SessionState::Closed;
        Ok(summary)
    }

    /// The session summary; valid only after [`close_session`](Self::close_session).
    pub fn summary(&self) -> SessionResult<&Summary> {
        self.log.summary()
    }

    /// Finalized record for the persistence collaborator; valid after close.
    pub fn to_record(&self) -> SessionResult<SessionRecord> {
        self.log.to_record()
    }

    /// Ordered (sequence number, dominant label) pairs for UI/telemetry.
    pub fn emotion_timeline(&self) -> impl Iterator<Item = (u64, EmotionLabel)> + '_ {
        self.log.emotion_timeline()
    }

    /// The last `n` logged turns in chronological order.
    pub fn recent_turns(&self, n: usize) -> &[LoggedTurn] {
        self.log.recent_turns(n)
    }

    pub fn safety_state(&self) -> SafetyState {
        self.safety_state
    }

    /// The previous turn's playbook, for host-side repetition avoidance.
    pub fn last_playbook(&self) -> Option<Playbook> {
        self.last_playbook
    }

    /// Step a crisis-triggered session back to elevated after a human
    /// escalation has been acknowledged. The only way down; the state never
    /// returns to normal within the session.
    pub fn acknowledge_escalation(&mut self) -> SafetyState {
        if self.safety_state == SafetyState::CrisisTriggered {
            info!("crisis escalation acknowledged, stepping back to elevated");
            self.safety_state = SafetyState::Elevated;
        }
        self.safety_state
    }
}
