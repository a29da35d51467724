use thiserror::Error;

use crate::engine::player::Phase;

/// Errors reported by playback operations.
///
/// Phase violations are expected in normal use (double-pressed keys race
/// against the session finishing on its own), so callers treat them as
/// no-ops to log, never as reasons to crash.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("{op} is not valid while {phase:?}")]
    InvalidPhase { op: &'static str, phase: Phase },
}
