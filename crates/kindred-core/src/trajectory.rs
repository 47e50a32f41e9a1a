//! Emotion Trajectory Tracker: per-turn observations and trend signals.
//!
//! Observations are append-only and never mutated retroactively; the trend
//! signal is recomputed from the tail of the history on every turn, so it is
//! a pure function of the observations up to and including the current one.

use crate::emotion::EmotionLabel;
use serde::Serialize;
use tracing::debug;

/// One emotion observation, derived from exactly one turn.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EmotionObservation {
    /// Sequence number of the turn this observation was derived from.
    pub turn_seq: u64,
    /// Linguistic sentiment estimated from the turn's text.
    pub linguistic: EmotionLabel,
    /// Confidence of the linguistic estimate, in [0,1].
    pub confidence: f64,
    /// Externally supplied affect tag, if the vision collaborator sent one.
    pub affect: Option<EmotionLabel>,
}

impl EmotionObservation {
    /// The label this observation contributes to the trajectory.
    ///
    /// Blend rule (deterministic, documented): the affect tag wins when
    /// present, otherwise the linguistic estimate stands.
    pub fn dominant(&self) -> EmotionLabel {
        self.affect.unwrap_or(self.linguistic)
    }
}

/// Trend classification over a trajectory window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trend {
    Improving,
    Worsening,
    Stable,
    InsufficientData,
}

/// Summary over the last K observations: trend plus dominant emotion.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TrajectorySignal {
    pub trend: Trend,
    /// Mode of the window, ties broken by most-recent occurrence.
    /// `None` only when no observations exist at all.
    pub dominant: Option<EmotionLabel>,
}

/// Ordered history of per-turn emotion observations.
#[derive(Debug, Default)]
pub struct TrajectoryTracker {
    observations: Vec<EmotionObservation>,
}

impl TrajectoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one observation. Always appends; never idempotent.
    pub fn record(&mut self, observation: EmotionObservation) {
        debug!(
            seq = observation.turn_seq,
            dominant = %observation.dominant(),
            "emotion observation recorded"
        );
        self.observations.push(observation);
    }

    pub fn observations(&self) -> &[EmotionObservation] {
        &self.observations
    }

    /// Compute the trajectory signal over the last `window` observations.
    ///
    /// Trend is the least-squares slope of valence over the window index:
    /// improving above `slope_threshold`, worsening below its negation,
    /// stable between, and insufficient-data with fewer than two
    /// observations in the window.
    pub fn current_trend(&self, window: usize, slope_threshold: f64) -> TrajectorySignal {
        let tail_start = self.observations.len().saturating_sub(window.max(1));
        let tail = &self.observations[tail_start..];

        let dominant = dominant_of(tail.iter().map(EmotionObservation::dominant));

        if tail.len() < 2 {
            return TrajectorySignal { trend: Trend::InsufficientData, dominant };
        }

        let slope = valence_slope(tail);
        let trend = if slope > slope_threshold {
            Trend::Improving
        } else if slope < -slope_threshold {
            Trend::Worsening
        } else {
            Trend::Stable
        };
        TrajectorySignal { trend, dominant }
    }
}

/// Least-squares slope of valence against window index.
fn valence_slope(tail: &[EmotionObservation]) -> f64 {
    let n = tail.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y: f64 = tail.iter().map(|o| o.dominant().valence()).sum::<f64>() / n;

    let mut num = 0.0;
    let mut den = 0.0;
    for (i, obs) in tail.iter().enumerate() {
        let dx = i as f64 - mean_x;
        num += dx * (obs.dominant().valence() - mean_y);
        den += dx * dx;
    }
    // den is zero only for a single point, which current_trend filters out.
    num / den
}

/// Mode of a label sequence, ties broken by the most recent occurrence.
pub(crate) fn dominant_of<I: Iterator<Item = EmotionLabel>>(labels: I) -> Option<EmotionLabel> {
    let labels: Vec<EmotionLabel> = labels.collect();
    let mut best: Option<(EmotionLabel, usize, usize)> = None; // (label, count, last index)
    for (idx, &label) in labels.iter().enumerate() {
        let count = labels.iter().filter(|&&l| l == label).count();
        match best {
            Some((_, bc, bl)) if count < bc || (count == bc && idx < bl) => {}
            _ => best = Some((label, count, idx)),
        }
    }
    best.map(|(label, _, _)| label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(seq: u64, linguistic: EmotionLabel, affect: Option<EmotionLabel>) -> EmotionObservation {
        EmotionObservation { turn_seq: seq, linguistic, confidence: 0.8, affect }
    }

    #[test]
    fn fewer_than_two_observations_is_insufficient_data() {
        let mut tracker = TrajectoryTracker::new();
        assert_eq!(tracker.current_trend(5, 0.2).trend, Trend::InsufficientData);
        assert!(tracker.current_trend(5, 0.2).dominant.is_none());

        tracker.record(obs(0, EmotionLabel::Sad, None));
        let signal = tracker.current_trend(5, 0.2);
        assert_eq!(signal.trend, Trend::InsufficientData);
        assert_eq!(signal.dominant, Some(EmotionLabel::Sad));
    }

    #[test]
    fn rising_valence_reads_as_improving() {
        // Valences -1, -1, 0, 1, 2 across five turns.
        let mut tracker = TrajectoryTracker::new();
        for (i, label) in [
            EmotionLabel::Sad,
            EmotionLabel::Sad,
            EmotionLabel::Neutral,
            EmotionLabel::Calm,
            EmotionLabel::Content,
        ]
        .into_iter()
        .enumerate()
        {
            tracker.record(obs(i as u64, label, None));
        }
        assert_eq!(tracker.current_trend(5, 0.2).trend, Trend::Improving);
    }

    #[test]
    fn falling_valence_reads_as_worsening() {
        let mut tracker = TrajectoryTracker::new();
        for (i, label) in [EmotionLabel::Calm, EmotionLabel::Neutral, EmotionLabel::Sad]
            .into_iter()
            .enumerate()
        {
            tracker.record(obs(i as u64, label, None));
        }
        assert_eq!(tracker.current_trend(5, 0.2).trend, Trend::Worsening);
    }

    #[test]
    fn flat_window_is_stable() {
        let mut tracker = TrajectoryTracker::new();
        for i in 0..4 {
            tracker.record(obs(i, EmotionLabel::Neutral, None));
        }
        assert_eq!(tracker.current_trend(5, 0.2).trend, Trend::Stable);
    }

    #[test]
    fn affect_tag_wins_the_blend() {
        let o = obs(0, EmotionLabel::Neutral, Some(EmotionLabel::Sad));
        assert_eq!(o.dominant(), EmotionLabel::Sad);
    }

    #[test]
    fn dominant_ties_break_toward_most_recent() {
        let labels = [EmotionLabel::Sad, EmotionLabel::Calm, EmotionLabel::Sad, EmotionLabel::Calm];
        assert_eq!(dominant_of(labels.into_iter()), Some(EmotionLabel::Calm));
    }

    #[test]
    fn window_only_sees_the_tail() {
        let mut tracker = TrajectoryTracker::new();
        // Old sad history followed by a flat calm tail.
        for i in 0..5 {
            tracker.record(obs(i, EmotionLabel::Sad, None));
        }
        for i in 5..8 {
            tracker.record(obs(i, EmotionLabel::Calm, None));
        }
        let signal = tracker.current_trend(3, 0.2);
        assert_eq!(signal.trend, Trend::Stable);
        assert_eq!(signal.dominant, Some(EmotionLabel::Calm));
    }
}
