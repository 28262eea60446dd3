//! Error types for the AI move pipeline
//!
//! `SourceUnavailable` and `Unresolved` are expected, recoverable outcomes:
//! the orchestrator answers both with the fallback selector and the player
//! only sees a status-line note. `Inconsistency` is not recoverable - it
//! means a move drawn from the legal set failed to apply, which is a
//! contract violation between the selector and the rules layer.

/// Errors from the move acquisition pipeline
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// The move source failed across every supported request shape
    /// (network error, timeout, or unusable response bodies)
    #[error("move source unavailable: {message}")]
    SourceUnavailable { message: String },

    /// The source answered, but the text matches no legal move
    #[error("unresolvable move text: {text:?}")]
    Unresolved { text: String },

    /// A legal-set move failed to apply; fatal programming-error signal
    #[error("internal inconsistency: {message}")]
    Inconsistency { message: String },
}
