//! Error type for game orchestration
//!
//! Wraps the rules and AI error families and adds the one failure the
//! orchestrator produces itself: input arriving in a state that does not
//! accept it.

use crate::ai::AiError;
use crate::rules::RulesError;

/// Errors that can occur while driving a game
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// Input submitted while the turn state does not accept it
    #[error("input not accepted: {state}")]
    InputNotAccepted { state: String },

    /// Rejected at the rules boundary (illegal move, bad FEN)
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// Escalated from the AI pipeline; only `AiError::Inconsistency`
    /// reaches callers, the recoverable cases are handled internally
    #[error(transparent)]
    Ai(#[from] AiError),
}
