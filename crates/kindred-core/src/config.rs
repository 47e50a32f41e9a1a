//! Engine configuration.
//!
//! The core reads no environment and opens no files; the host deserializes
//! an [`EngineConfig`] from wherever it keeps settings and hands it in.
//! Every field has a serde default so a partial config (or `{}`) is valid.

use serde::{Deserialize, Serialize};

fn default_trend_window() -> usize {
    5
}

fn default_trend_slope_threshold() -> f64 {
    0.2
}

fn default_contradiction_threshold() -> u8 {
    1
}

fn default_pacing_window() -> usize {
    3
}

fn default_fast_rate() -> f64 {
    3.0
}

fn default_slow_rate() -> f64 {
    1.8
}

/// Tunables for the session intelligence engine.
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | trend_window | 5 | Observations per trajectory window. |
/// | trend_slope_threshold | 0.2 | Valence slope beyond which trend is improving/worsening. |
/// | contradiction_threshold | 1 | Semantic distance above which words vs. face is flagged. |
/// | pacing_window | 3 | Valid turns in the speaking-rate rolling average. |
/// | fast_rate_wps | 3.0 | Words/sec above which delivery slows down. |
/// | slow_rate_wps | 1.8 | Words/sec below which the full default cap applies; between the two thresholds the cap tightens slightly. |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_trend_window")]
    pub trend_window: usize,
    #[serde(default = "default_trend_slope_threshold")]
    pub trend_slope_threshold: f64,
    #[serde(default = "default_contradiction_threshold")]
    pub contradiction_threshold: u8,
    #[serde(default = "default_pacing_window")]
    pub pacing_window: usize,
    #[serde(default = "default_fast_rate")]
    pub fast_rate_wps: f64,
    #[serde(default = "default_slow_rate")]
    pub slow_rate_wps: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trend_window: default_trend_window(),
            trend_slope_threshold: default_trend_slope_threshold(),
            contradiction_threshold: default_contradiction_threshold(),
            pacing_window: default_pacing_window(),
            fast_rate_wps: default_fast_rate(),
            slow_rate_wps: default_slow_rate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_deserializes_to_defaults() {
        let cfg: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.trend_window, 5);
        assert_eq!(cfg.pacing_window, 3);
        assert_eq!(cfg.contradiction_threshold, 1);
    }

    #[test]
    fn partial_override_keeps_remaining_defaults() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"trend_window": 8}"#).unwrap();
        assert_eq!(cfg.trend_window, 8);
        assert!((cfg.fast_rate_wps - 3.0).abs() < f64::EPSILON);
    }
}
