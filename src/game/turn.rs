//! Turn-ownership state machine
//!
//! Tracks who may act on the game right now. Human move input is accepted
//! only in `HumanToMove`; while the remote side is thinking or a promotion
//! choice is pending, new drops are declined instead of queued. The
//! promotion transient carries the pending squares so the position itself
//! stays untouched until a piece kind is chosen.

use shakmaty::Square;

use crate::rules::GameOutcome;

/// Who acts next, or why nobody does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Waiting for the human to submit a move
    HumanToMove,
    /// The remote move pipeline owns this turn
    RemoteToMove,
    /// A human pawn reached the back rank; waiting for the piece choice
    AwaitingPromotion { from: Square, to: Square },
    /// Terminal; no further input accepted
    GameOver(GameOutcome),
}

impl TurnState {
    /// Whether a new human move may be submitted
    pub fn accepts_move_input(&self) -> bool {
        matches!(self, TurnState::HumanToMove)
    }

    /// Whether the remote pipeline should run
    pub fn is_remote_turn(&self) -> bool {
        matches!(self, TurnState::RemoteToMove)
    }

    /// The pending promotion squares, if a choice is outstanding
    pub fn awaiting_promotion(&self) -> Option<(Square, Square)> {
        match self {
            TurnState::AwaitingPromotion { from, to } => Some((*from, *to)),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self, TurnState::GameOver(_))
    }

    /// Short human-readable form for status text and errors
    pub fn describe(&self) -> String {
        match self {
            TurnState::HumanToMove => "your move".to_string(),
            TurnState::RemoteToMove => "waiting for the AI move".to_string(),
            TurnState::AwaitingPromotion { from, to } => {
                format!("promotion pending for {from}{to}")
            }
            TurnState::GameOver(outcome) => format!("game over: {outcome}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::Color;

    #[test]
    fn only_human_to_move_accepts_input() {
        assert!(TurnState::HumanToMove.accepts_move_input());
        assert!(!TurnState::RemoteToMove.accepts_move_input());
        assert!(!TurnState::AwaitingPromotion {
            from: Square::E7,
            to: Square::E8
        }
        .accepts_move_input());
        assert!(!TurnState::GameOver(GameOutcome::Stalemate).accepts_move_input());
    }

    #[test]
    fn promotion_transient_exposes_its_squares() {
        let state = TurnState::AwaitingPromotion {
            from: Square::A7,
            to: Square::A8,
        };
        assert_eq!(state.awaiting_promotion(), Some((Square::A7, Square::A8)));
        assert!(TurnState::HumanToMove.awaiting_promotion().is_none());
    }

    #[test]
    fn terminal_state_is_recognized() {
        let state = TurnState::GameOver(GameOutcome::Checkmate {
            winner: Color::White,
        });
        assert!(state.is_over());
        assert!(!state.is_remote_turn());
        assert!(state.describe().contains("checkmate"));
    }
}
