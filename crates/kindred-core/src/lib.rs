//! # Kindred Core - Session Intelligence Engine
//!
//! This crate turns raw per-turn signals (transcribed speech, an optional
//! facial-affect tag, timing) into one decision per turn: which coping
//! playbook to surface, whether the crisis protocol takes over, how the
//! response should be paced, and what context to hand the downstream model.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Session Orchestrator                      │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐     │
//! │  │    Safety    │ → │  Trajectory  │ → │ Contradiction│     │
//! │  │   Protocol   │   │   Tracker    │   │   Detector   │     │
//! │  └──────┬───────┘   └──────────────┘   └──────────────┘     │
//! │         │ crisis short-circuit                ↓              │
//! │         │           ┌──────────────┐   ┌──────────────┐     │
//! │         └─────────→ │   Playbook   │   │    Pacing    │     │
//! │                     │   Selector   │   │  Controller  │     │
//! │                     └──────┬───────┘   └──────┬───────┘     │
//! │                            └───→ Session Log ←┘             │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine is synchronous and performs no I/O: audio capture, vision
//! inference, model calls, and persistence are the host's collaborators.
//! Each [`SessionOrchestrator`] owns one session; independent sessions are
//! independent values and may live on different threads.

pub mod config;
pub mod contradiction;
pub mod emotion;
pub mod error;
pub mod lexicon;
pub mod orchestrator;
pub mod pacing;
pub mod playbook;
pub mod prompts;
pub mod safety;
pub mod session_log;
pub mod trajectory;

pub use config::EngineConfig;
pub use contradiction::{linguistic_sentiment, ContradictionFlag, SentimentEstimate};
pub use emotion::{semantic_distance, EmotionLabel};
pub use error::{SessionError, SessionResult};
pub use lexicon::{Lexicon, LexiconMatch};
pub use orchestrator::{DecisionBundle, ResponseDirective, SessionOrchestrator};
pub use pacing::{PaceHint, PacingProfile};
pub use playbook::{detect_intent, Intent, Playbook};
pub use prompts::{fusion_prompt, summary_prompt, FUSION_SYSTEM, SUMMARY_SYSTEM};
pub use safety::{CrisisPayload, SafetyState};
pub use session_log::{LoggedTurn, SessionLog, SessionRecord, Summary, Turn};
pub use trajectory::{EmotionObservation, TrajectorySignal, TrajectoryTracker, Trend};
