//! Error types for the session intelligence engine.
//!
//! Errors are reserved for caller-side lifecycle bugs. Malformed
//! measurements are clamped and insufficient history yields sentinel
//! results, so everything below the orchestrator is a total function.

use thiserror::Error;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// State violations surfaced to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session is closed; no further turns are accepted")]
    Closed,

    #[error("session is already closed; close_session may only be called once")]
    AlreadyClosed,

    #[error("session is still active; summary is available only after close_session")]
    NotClosed,
}
