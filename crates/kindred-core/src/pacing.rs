//! Pacing Controller: adaptive response length and delivery speed.
//!
//! A user talking fast usually needs the agent to slow the room down: the
//! response gets a tighter length cap, a slower speech multiplier, and a
//! longer pre-response pause. Computed fresh each turn from the recent
//! speaking-rate history; nothing persists beyond the session.

use crate::config::EngineConfig;
use serde::Serialize;
use tracing::debug;

/// Delivery hint attached to the profile, for the TTS collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaceHint {
    Normal,
    Slower,
}

/// Target response shape for the current turn.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PacingProfile {
    /// Character cap for the generated response.
    pub max_response_chars: usize,
    /// Speech-rate multiplier for playback (1.0 = normal).
    pub rate_multiplier: f64,
    /// Silence before the response starts, in seconds.
    pub pre_pause_secs: f64,
    pub hint: PaceHint,
}

impl PacingProfile {
    /// Cold-start / normal-rate profile.
    pub fn default_profile() -> Self {
        PacingProfile {
            max_response_chars: 320,
            rate_multiplier: 1.0,
            pre_pause_secs: 0.2,
            hint: PaceHint::Normal,
        }
    }

    /// Deliberate profile used when the user is speaking fast.
    pub fn slower() -> Self {
        PacingProfile {
            max_response_chars: 220,
            rate_multiplier: 0.85,
            pre_pause_secs: 0.8,
            hint: PaceHint::Slower,
        }
    }

    /// Mid-band profile for a brisk but not rushing talker: normal rate,
    /// slightly tighter cap.
    pub fn brisk() -> Self {
        PacingProfile {
            max_response_chars: 280,
            rate_multiplier: 1.0,
            pre_pause_secs: 0.2,
            hint: PaceHint::Normal,
        }
    }

    /// Fixed profile for crisis turns: short, slow, with a settling pause.
    pub fn crisis() -> Self {
        PacingProfile {
            max_response_chars: 240,
            rate_multiplier: 0.85,
            pre_pause_secs: 0.5,
            hint: PaceHint::Slower,
        }
    }
}

impl Default for PacingProfile {
    fn default() -> Self {
        Self::default_profile()
    }
}

/// Compute the pacing profile from recent `(word_count, duration_secs)`
/// pairs in chronological order.
///
/// Speaking rate is words/duration per turn; turns with duration ≤ 0 are
/// excluded from the rolling average rather than read as infinite rate.
/// Above the fast threshold delivery slows down; below the slow threshold
/// the full default cap and normal rate stand; the band in between gets a
/// slightly tighter cap at normal rate. With no valid history at all
/// (cold start) the default profile applies.
pub fn profile_for(history: &[(u32, f64)], config: &EngineConfig) -> PacingProfile {
    let rates: Vec<f64> = history
        .iter()
        .rev()
        .filter(|(_, secs)| *secs > 0.0)
        .take(config.pacing_window.max(1))
        .map(|(words, secs)| *words as f64 / secs)
        .collect();

    if rates.is_empty() {
        return PacingProfile::default_profile();
    }

    let avg = rates.iter().sum::<f64>() / rates.len() as f64;
    let profile = if avg > config.fast_rate_wps {
        PacingProfile::slower()
    } else if avg < config.slow_rate_wps {
        PacingProfile::default_profile()
    } else {
        PacingProfile::brisk()
    };
    debug!(avg_rate = avg, hint = ?profile.hint, "pacing profile computed");
    profile
}
