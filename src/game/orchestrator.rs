//! Game session orchestration
//!
//! [`GameSession`] owns the live position and everything derived from it,
//! and is the only place moves get committed. Both sides go through the
//! same commit path: trial-apply at the rules boundary, then record the
//! ply, update the captured tally, push the snapshot, and re-derive turn
//! ownership from the new position.
//!
//! The remote turn runs the acquisition pipeline in order - fetch, staged
//! resolution, fallback - and always ends with a committed legal move; the
//! only error that escapes is [`AiError::Inconsistency`], which signals a
//! broken contract rather than a flaky server.

use shakmaty::{Chess, Color, Position, Role, Square};
use tracing::{info, warn};

use crate::ai::{self, fallback, MoveQuality, RemoteMoveSource};
use crate::rules::{self, Applied, GameOutcome, RulesError};

use super::captured::CapturedPieces;
use super::error::GameError;
use super::history::PositionHistory;
use super::moves::{MoveLog, MoveRecord};
use super::turn::TurnState;

/// Where a committed move came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOrigin {
    Human,
    Remote,
    Fallback {
        rationale: &'static str,
        quality: MoveQuality,
    },
}

/// Report for one committed ply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlyReport {
    pub notation: String,
    pub color: Color,
    pub origin: MoveOrigin,
    pub outcome: Option<GameOutcome>,
}

/// Result of submitting a human move
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HumanMoveOutcome {
    Played(PlyReport),
    /// The drop is a pawn reaching the back rank; nothing is committed
    /// until a piece kind arrives via [`GameSession::choose_promotion`]
    PromotionNeeded { from: Square, to: Square },
}

/// One game of human vs remote move source
pub struct GameSession {
    position: Chess,
    human_color: Color,
    turn: TurnState,
    history: PositionHistory,
    move_log: MoveLog,
    captured: CapturedPieces,
    status: String,
}

impl GameSession {
    /// Fresh game from the starting position
    pub fn new(human_color: Color) -> Self {
        Self::with_position(Chess::default(), human_color)
    }

    /// Game rooted at an arbitrary position
    ///
    /// The move log and captured tally start empty regardless of how deep
    /// into a game the position is; both are forward-only projections.
    pub fn with_position(position: Chess, human_color: Color) -> Self {
        let turn = derive_turn(&position, human_color);
        let history = PositionHistory::new(position.clone());
        GameSession {
            position,
            human_color,
            turn,
            history,
            move_log: MoveLog::default(),
            captured: CapturedPieces::default(),
            status: "New game".to_string(),
        }
    }

    /// Game rooted at a FEN string (loading a saved game)
    pub fn from_fen(fen: &str, human_color: Color) -> Result<Self, RulesError> {
        Ok(Self::with_position(rules::from_fen(fen)?, human_color))
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    pub fn fen(&self) -> String {
        rules::to_fen(&self.position)
    }

    pub fn turn_state(&self) -> TurnState {
        self.turn
    }

    pub fn human_color(&self) -> Color {
        self.human_color
    }

    pub fn move_log(&self) -> &MoveLog {
        &self.move_log
    }

    pub fn captured(&self) -> &CapturedPieces {
        &self.captured
    }

    /// One-line status for the presentation layer
    pub fn status_line(&self) -> &str {
        &self.status
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Submit a human move as a coordinate pair
    ///
    /// Declined outside `HumanToMove`. A pawn drop onto the back rank
    /// switches to the promotion transient without touching the position.
    pub fn submit_human_move(
        &mut self,
        from: Square,
        to: Square,
    ) -> Result<HumanMoveOutcome, GameError> {
        if !self.turn.accepts_move_input() {
            return Err(GameError::InputNotAccepted {
                state: self.turn.describe(),
            });
        }

        if rules::promotion_candidate(&self.position, from, to) {
            info!("[GAME] promotion choice pending for {from}{to}");
            self.turn = TurnState::AwaitingPromotion { from, to };
            return Ok(HumanMoveOutcome::PromotionNeeded { from, to });
        }

        let applied = rules::apply_coords(&self.position, from, to, None)?;
        Ok(HumanMoveOutcome::Played(
            self.commit(applied, MoveOrigin::Human),
        ))
    }

    /// Complete a pending promotion with the chosen piece kind
    pub fn choose_promotion(&mut self, kind: Role) -> Result<PlyReport, GameError> {
        let Some((from, to)) = self.turn.awaiting_promotion() else {
            return Err(GameError::InputNotAccepted {
                state: self.turn.describe(),
            });
        };
        // An invalid kind (king, pawn) fails here and the transient stays
        // active for another attempt.
        let applied = rules::apply_coords(&self.position, from, to, Some(kind))?;
        Ok(self.commit(applied, MoveOrigin::Human))
    }

    /// Abandon a pending promotion and return the turn to the human
    pub fn cancel_promotion(&mut self) {
        if self.turn.awaiting_promotion().is_some() {
            self.turn = TurnState::HumanToMove;
        }
    }

    /// Run the full remote turn: pacing delay, fetch, resolve, fallback
    pub async fn play_remote_turn(
        &mut self,
        source: &RemoteMoveSource,
    ) -> Result<PlyReport, GameError> {
        if !self.turn.is_remote_turn() {
            return Err(GameError::InputNotAccepted {
                state: self.turn.describe(),
            });
        }
        // Perceived pacing only; not a correctness requirement.
        tokio::time::sleep(source.move_delay()).await;

        match source.request_move(&self.position).await {
            Ok(text) => self.finish_remote_turn(Some(&text)),
            Err(err) => {
                warn!("[AI] move fetch failed: {err}");
                self.finish_remote_turn(None)
            }
        }
    }

    /// Synchronous tail of the remote turn
    ///
    /// `raw` is the fetched text, or `None` when the fetch already failed.
    /// Resolution failure and fetch failure land in the same place: the
    /// fallback selector, whose move is committed like any other.
    pub fn finish_remote_turn(&mut self, raw: Option<&str>) -> Result<PlyReport, GameError> {
        if !self.turn.is_remote_turn() {
            return Err(GameError::InputNotAccepted {
                state: self.turn.describe(),
            });
        }

        if let Some(text) = raw {
            if let Some(applied) = ai::resolve(&self.position, text) {
                info!("[AI] remote move {} accepted", applied.notation);
                return Ok(self.commit(applied, MoveOrigin::Remote));
            }
            warn!("[AI] remote text {text:?} matched no legal move, falling back");
        }

        let fallback = fallback::select(&self.position)?;
        let origin = MoveOrigin::Fallback {
            rationale: fallback.rationale,
            quality: fallback.quality,
        };
        Ok(self.commit(fallback.applied, origin))
    }

    /// Take back one ply; turn ownership follows the restored position
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(position) => {
                self.position = position;
                self.turn = derive_turn(&self.position, self.human_color);
                // Move log and captured tally stay as played; see the
                // module docs of `moves` and `captured`.
                self.status = "Took back one move".to_string();
                true
            }
            None => false,
        }
    }

    /// Replay one undone ply, if the branch still exists
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(position) => {
                self.position = position;
                self.turn = derive_turn(&self.position, self.human_color);
                self.status = "Replayed one move".to_string();
                true
            }
            None => false,
        }
    }

    /// Reset everything to the starting position
    pub fn new_game(&mut self) {
        self.position = Chess::default();
        self.history.reset(self.position.clone());
        self.move_log.clear();
        self.captured.clear();
        self.turn = derive_turn(&self.position, self.human_color);
        self.status = "New game".to_string();
        info!("[GAME] new game started, human plays {:?}", self.human_color);
    }

    fn commit(&mut self, applied: Applied, origin: MoveOrigin) -> PlyReport {
        let mover = self.position.turn();

        if let Some(kind) = applied.descriptor.captured {
            self.captured.record(mover, kind);
        }
        self.move_log.push(MoveRecord {
            notation: applied.notation.clone(),
            color: mover,
        });

        self.position = applied.position;
        self.history.commit(&self.position);

        let outcome = rules::terminal_state(&self.position);
        self.turn = derive_turn(&self.position, self.human_color);

        self.status = match &origin {
            MoveOrigin::Human => format!("You played {}", applied.notation),
            MoveOrigin::Remote => format!("AI move (remote): {}", applied.notation),
            MoveOrigin::Fallback { rationale, quality } => format!(
                "AI move (fallback strategy): {} - {rationale} [{quality}]",
                applied.notation
            ),
        };
        if let Some(outcome) = outcome {
            self.status.push_str(&format!(" - {outcome}"));
        }
        info!("[GAME] {}", self.status);

        PlyReport {
            notation: applied.notation,
            color: mover,
            origin,
            outcome,
        }
    }
}

fn derive_turn(position: &Chess, human_color: Color) -> TurnState {
    match rules::terminal_state(position) {
        Some(outcome) => TurnState::GameOver(outcome),
        None if position.turn() == human_color => TurnState::HumanToMove,
        None => TurnState::RemoteToMove,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_human_starts_with_the_move() {
        let session = GameSession::new(Color::White);
        assert_eq!(session.turn_state(), TurnState::HumanToMove);
        assert_eq!(session.move_log().len(), 0);
    }

    #[test]
    fn black_human_starts_waiting_for_the_remote() {
        let session = GameSession::new(Color::Black);
        assert_eq!(session.turn_state(), TurnState::RemoteToMove);
    }

    #[test]
    fn legal_human_move_commits_and_toggles_the_turn() {
        let mut session = GameSession::new(Color::White);
        let outcome = session
            .submit_human_move(Square::E2, Square::E4)
            .expect("e2e4 is legal");

        let HumanMoveOutcome::Played(report) = outcome else {
            panic!("expected a committed ply");
        };
        assert_eq!(report.notation, "e4");
        assert_eq!(report.origin, MoveOrigin::Human);
        assert_eq!(session.turn_state(), TurnState::RemoteToMove);
        assert_eq!(session.move_log().len(), 1);
    }

    #[test]
    fn illegal_human_move_changes_nothing() {
        let mut session = GameSession::new(Color::White);
        let fen_before = session.fen();

        let result = session.submit_human_move(Square::E2, Square::E5);
        assert!(matches!(result, Err(GameError::Rules(_))));
        assert_eq!(session.fen(), fen_before);
        assert_eq!(session.turn_state(), TurnState::HumanToMove);
        assert_eq!(session.move_log().len(), 0);
    }

    #[test]
    fn input_is_declined_on_the_remote_turn() {
        let mut session = GameSession::new(Color::Black);
        let result = session.submit_human_move(Square::E2, Square::E4);
        assert!(matches!(result, Err(GameError::InputNotAccepted { .. })));
    }

    #[test]
    fn remote_turn_is_declined_when_it_is_not_remote() {
        let mut session = GameSession::new(Color::White);
        let result = session.finish_remote_turn(Some("e5"));
        assert!(matches!(result, Err(GameError::InputNotAccepted { .. })));
    }

    #[test]
    fn resolved_remote_text_commits_as_a_remote_move() {
        let mut session = GameSession::new(Color::Black);
        let report = session.finish_remote_turn(Some("  e4.\n")).unwrap();
        assert_eq!(report.notation, "e4");
        assert_eq!(report.origin, MoveOrigin::Remote);
        assert_eq!(session.turn_state(), TurnState::HumanToMove);
    }

    #[test]
    fn garbage_remote_text_falls_back_to_a_legal_move() {
        let mut session = GameSession::new(Color::Black);
        let report = session
            .finish_remote_turn(Some("as an AI language model"))
            .unwrap();
        assert!(matches!(report.origin, MoveOrigin::Fallback { .. }));
        assert_eq!(session.turn_state(), TurnState::HumanToMove);
        assert!(session.status_line().contains("fallback strategy"));
    }

    #[test]
    fn fetch_failure_falls_back_the_same_way() {
        let mut session = GameSession::new(Color::Black);
        let report = session.finish_remote_turn(None).unwrap();
        assert!(matches!(report.origin, MoveOrigin::Fallback { .. }));
        assert_eq!(session.move_log().len(), 1);
    }

    #[test]
    fn mate_ends_the_game_with_the_right_winner() {
        let mut session = GameSession::from_fen(
            "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5Q2/PPPP1PPP/RNB1K1NR w KQkq - 4 4",
            Color::White,
        )
        .unwrap();
        let outcome = session
            .submit_human_move(Square::F3, Square::F7)
            .expect("Qxf7# is legal");

        let HumanMoveOutcome::Played(report) = outcome else {
            panic!("expected a committed ply");
        };
        assert_eq!(report.notation, "Qxf7#");
        assert_eq!(
            report.outcome,
            Some(GameOutcome::Checkmate {
                winner: Color::White
            })
        );
        assert!(session.turn_state().is_over());
    }

    #[test]
    fn capture_feeds_the_tally() {
        let mut session = GameSession::from_fen(
            "4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1",
            Color::White,
        )
        .unwrap();
        session
            .submit_human_move(Square::E4, Square::D5)
            .expect("exd5 is legal");
        assert_eq!(session.captured().count(Color::White, Role::Pawn), 1);
    }
}
