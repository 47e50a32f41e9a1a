//! Session Log: append-only turn history and end-of-session summary.
//!
//! Turns are immutable once appended. Closing the session happens exactly
//! once: it fixes the end time and the summary, and a second close is a
//! state error rather than a silent recompute.

use crate::contradiction::ContradictionFlag;
use crate::emotion::EmotionLabel;
use crate::error::{SessionError, SessionResult};
use crate::playbook::Playbook;
use crate::safety::SafetyState;
use crate::trajectory::{dominant_of, EmotionObservation};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

/// One user exchange as received by the orchestrator.
#[derive(Debug, Clone, Serialize)]
pub struct Turn {
    /// Contiguous from 0 within a session.
    pub seq: u64,
    /// Transcribed text, or `None` when transcription failed.
    pub text: Option<String>,
    /// Affect tag from the vision collaborator, if any.
    pub affect: Option<EmotionLabel>,
    /// Spoken duration in seconds, clamped to ≥ 0 on ingestion.
    pub duration_secs: f64,
    /// Word count, clamped to ≥ 0 on ingestion.
    pub word_count: u32,
    pub timestamp: DateTime<Utc>,
}

/// A turn plus everything the engine derived from it.
#[derive(Debug, Clone, Serialize)]
pub struct LoggedTurn {
    pub turn: Turn,
    pub observation: EmotionObservation,
    pub contradiction: Option<ContradictionFlag>,
    /// `None` on crisis turns, where the payload replaced the playbook.
    pub playbook: Option<Playbook>,
    pub safety_state: SafetyState,
    pub crisis_hit: bool,
}

/// End-of-session summary, computed once at close.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    /// Mode over the whole session, most-recent tiebreak; `None` for an
    /// empty session.
    pub dominant_emotion: Option<EmotionLabel>,
    pub contradiction_count: usize,
    pub crisis_trigger_count: usize,
    /// Playbooks surfaced, in turn order; crisis turns contribute nothing.
    pub playbooks_used: Vec<Playbook>,
    pub turn_count: usize,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

/// The finalized session as handed to the persistence collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct SessionRecord {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub turns: Vec<LoggedTurn>,
    pub summary: Summary,
}

#[derive(Debug)]
struct ClosedState {
    ended_at: DateTime<Utc>,
    summary: Summary,
}

/// Append-only record of the session's turns and derived signals.
#[derive(Debug)]
pub struct SessionLog {
    started_at: DateTime<Utc>,
    entries: Vec<LoggedTurn>,
    closed: Option<ClosedState>,
}

impl SessionLog {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        SessionLog { started_at, entries: Vec::new(), closed: None }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append one turn with its derived signals.
    pub fn add_turn(&mut self, entry: LoggedTurn) -> SessionResult<()> {
        if self.closed.is_some() {
            return Err(SessionError::Closed);
        }
        debug!(seq = entry.turn.seq, total = self.entries.len() + 1, "turn logged");
        self.entries.push(entry);
        Ok(())
    }

    /// Ordered (sequence number, dominant label) pairs, one per turn so far.
    /// Lazy and restartable; bounded by the turns logged at call time.
    pub fn emotion_timeline(&self) -> impl Iterator<Item = (u64, EmotionLabel)> + '_ {
        self.entries.iter().map(|e| (e.turn.seq, e.observation.dominant()))
    }

    /// The last `n` turns in chronological order (all of them if fewer exist).
    pub fn recent_turns(&self, n: usize) -> &[LoggedTurn] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Close the session: set the end time and compute the summary.
    /// Calling this twice is a state error.
    pub fn close(&mut self, now: DateTime<Utc>) -> SessionResult<&Summary> {
        if self.closed.is_some() {
            return Err(SessionError::AlreadyClosed);
        }
        let summary = self.compute_summary(now);
        info!(
            turns = summary.turn_count,
            contradictions = summary.contradiction_count,
            crisis_triggers = summary.crisis_trigger_count,
            "session closed"
        );
        Ok(&self.closed.insert(ClosedState { ended_at: now, summary }).summary)
    }

    /// The summary; valid only after [`close`](Self::close).
    pub fn summary(&self) -> SessionResult<&Summary> {
        self.closed.as_ref().map(|c| &c.summary).ok_or(SessionError::NotClosed)
    }

    /// Snapshot the finalized record for the persistence collaborator.
    pub fn to_record(&self) -> SessionResult<SessionRecord> {
        let closed = self.closed.as_ref().ok_or(SessionError::NotClosed)?;
        Ok(SessionRecord {
            started_at: self.started_at,
            ended_at: closed.ended_at,
            turns: self.entries.clone(),
            summary: closed.summary.clone(),
        })
    }

    fn compute_summary(&self, ended_at: DateTime<Utc>) -> Summary {
        Summary {
            dominant_emotion: dominant_of(self.entries.iter().map(|e| e.observation.dominant())),
            contradiction_count: self.entries.iter().filter(|e| e.contradiction.is_some()).count(),
            crisis_trigger_count: self.entries.iter().filter(|e| e.crisis_hit).count(),
            playbooks_used: self.entries.iter().filter_map(|e| e.playbook).collect(),
            turn_count: self.entries.len(),
            started_at: self.started_at,
            ended_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn entry(seq: u64, label: EmotionLabel, playbook: Option<Playbook>, crisis: bool) -> LoggedTurn {
        LoggedTurn {
            turn: Turn {
                seq,
                text: Some("hello".to_string()),
                affect: None,
                duration_secs: 2.0,
                word_count: 5,
                timestamp: ts(seq as i64),
            },
            observation: EmotionObservation {
                turn_seq: seq,
                linguistic: label,
                confidence: 0.5,
                affect: None,
            },
            contradiction: None,
            playbook,
            safety_state: SafetyState::Normal,
            crisis_hit: crisis,
        }
    }

    #[test]
    fn timeline_is_ordered_and_bounded_by_turns_so_far() {
        let mut log = SessionLog::new(ts(0));
        log.add_turn(entry(0, EmotionLabel::Sad, Some(Playbook::BehavioralActivation), false)).unwrap();
        log.add_turn(entry(1, EmotionLabel::Neutral, Some(Playbook::MicroCheckin), false)).unwrap();

        let timeline: Vec<_> = log.emotion_timeline().collect();
        assert_eq!(timeline, vec![(0, EmotionLabel::Sad), (1, EmotionLabel::Neutral)]);
        // Restartable: a second pass sees the same sequence.
        assert_eq!(log.emotion_timeline().count(), 2);
    }

    #[test]
    fn recent_turns_returns_all_when_fewer_exist() {
        let mut log = SessionLog::new(ts(0));
        log.add_turn(entry(0, EmotionLabel::Calm, None, false)).unwrap();
        assert_eq!(log.recent_turns(6).len(), 1);
        assert_eq!(log.recent_turns(0).len(), 0);
    }

    #[test]
    fn second_close_is_a_state_error() {
        let mut log = SessionLog::new(ts(0));
        log.add_turn(entry(0, EmotionLabel::Sad, Some(Playbook::GeneralValidation), false)).unwrap();
        assert!(log.close(ts(10)).is_ok());
        assert!(matches!(log.close(ts(11)), Err(SessionError::AlreadyClosed)));
    }

    #[test]
    fn summary_before_close_is_a_state_error() {
        let log = SessionLog::new(ts(0));
        assert!(matches!(log.summary(), Err(SessionError::NotClosed)));
    }

    #[test]
    fn add_after_close_is_rejected() {
        let mut log = SessionLog::new(ts(0));
        log.close(ts(1)).unwrap();
        let err = log.add_turn(entry(0, EmotionLabel::Calm, None, false)).unwrap_err();
        assert_eq!(err, SessionError::Closed);
    }

    #[test]
    fn summary_counts_what_happened() {
        let mut log = SessionLog::new(ts(0));
        log.add_turn(entry(0, EmotionLabel::Sad, Some(Playbook::BehavioralActivation), false)).unwrap();
        log.add_turn(entry(1, EmotionLabel::Sad, None, true)).unwrap();
        log.add_turn(entry(2, EmotionLabel::Calm, Some(Playbook::SteadyReflection), false)).unwrap();

        let summary = log.close(ts(30)).unwrap();
        assert_eq!(summary.dominant_emotion, Some(EmotionLabel::Sad));
        assert_eq!(summary.crisis_trigger_count, 1);
        assert_eq!(
            summary.playbooks_used,
            vec![Playbook::BehavioralActivation, Playbook::SteadyReflection]
        );
        assert_eq!(summary.turn_count, 3);
        assert_eq!(summary.ended_at, ts(30));
    }

    #[test]
    fn finalized_record_serializes_for_persistence() {
        let mut log = SessionLog::new(ts(0));
        log.add_turn(entry(0, EmotionLabel::Content, Some(Playbook::SavorAndShare), false)).unwrap();
        log.close(ts(5)).unwrap();

        let record = log.to_record().unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"savor-and-share\""));
        assert!(json.contains("\"content\""));
    }
}
