//! Rules capability layer over `shakmaty`
//!
//! Everything above this module treats chess rules as an external oracle:
//! legality, check/checkmate/stalemate detection and SAN handling are
//! delegated to `shakmaty`, never reimplemented. This module narrows that
//! crate down to the handful of operations the rest of the game needs:
//!
//! - Enumerating fully-qualified legal-move descriptors for a position
//! - Trial-applying a move (SAN text or coordinate pair) on a disposable
//!   copy, returning the new position plus the applied descriptor
//! - Terminal-state classification (checkmate, stalemate, draw)
//! - FEN round-trips for history storage, persistence and prompts
//!
//! Positions are `shakmaty::Chess` values and are never mutated in place:
//! every application clones first and returns the successor, so callers
//! keep their current position untouched until they decide to commit.

use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, File, Move, Position, Role, Square};

/// Errors from the rules boundary
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// Move text or coordinate pair does not describe a legal move
    #[error("illegal move: {notation}")]
    IllegalMove { notation: String },

    /// Position text could not be parsed as FEN
    #[error("invalid position: {text}")]
    InvalidFen { text: String },
}

/// A fully qualified candidate move for a given position
///
/// One entry per legal move: canonical SAN (without check suffix), the
/// squares involved, the moving piece, and the flags downstream consumers
/// branch on (captures feed the tally, promotions gate the piece-choice
/// dialog, gives-check drives fallback bucketing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveDescriptor {
    /// Canonical SAN, no `+`/`#` suffix
    pub san: String,
    pub from: Option<Square>,
    pub to: Square,
    pub role: Role,
    pub captured: Option<Role>,
    pub promotion: Option<Role>,
    pub is_castle: bool,
    pub is_en_passant: bool,
    /// Whether the resulting position has the opponent in check
    pub gives_check: bool,
}

/// Result of applying a move to a position
///
/// `position` is the successor; the caller's position is untouched.
/// `notation` is the SAN with `+`/`#` suffix for display and the move log.
#[derive(Debug, Clone)]
pub struct Applied {
    pub position: Chess,
    pub descriptor: MoveDescriptor,
    pub notation: String,
}

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Checkmate { winner: Color },
    Stalemate,
    Draw,
}

impl std::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameOutcome::Checkmate { winner: Color::White } => write!(f, "checkmate, White wins"),
            GameOutcome::Checkmate { winner: Color::Black } => write!(f, "checkmate, Black wins"),
            GameOutcome::Stalemate => write!(f, "stalemate"),
            GameOutcome::Draw => write!(f, "draw"),
        }
    }
}

/// Enumerate legal-move descriptors for a position
pub fn legal_descriptors(position: &Chess) -> Vec<MoveDescriptor> {
    position
        .legal_moves()
        .iter()
        .map(|m| describe(position, m))
        .collect()
}

/// Apply SAN text against a position
///
/// The text must be bare SAN (callers strip `+`/`#` and other trailing
/// punctuation first). Fails with [`RulesError::IllegalMove`] when the text
/// does not parse or does not match a legal move.
pub fn apply_san(position: &Chess, text: &str) -> Result<Applied, RulesError> {
    let san: San = text.parse().map_err(|_| RulesError::IllegalMove {
        notation: text.to_string(),
    })?;
    let m = san.to_move(position).map_err(|_| RulesError::IllegalMove {
        notation: text.to_string(),
    })?;
    apply_move(position, &m)
}

/// Apply a coordinate move against a position
///
/// Castling is submitted as the king's two-square hop (e1→g1 style).
/// Promotion moves only match when `promotion` carries the chosen piece;
/// submitting a back-rank pawn push with `promotion: None` is illegal, which
/// is what lets the orchestrator hold the move open until a piece is chosen.
pub fn apply_coords(
    position: &Chess,
    from: Square,
    to: Square,
    promotion: Option<Role>,
) -> Result<Applied, RulesError> {
    for m in &position.legal_moves() {
        let Some((mf, mt)) = move_endpoints(m) else {
            continue;
        };
        if mf != from || mt != to || m.promotion() != promotion {
            continue;
        }
        return apply_move(position, m);
    }
    Err(RulesError::IllegalMove {
        notation: format!("{from}{to}"),
    })
}

/// Whether (from, to) is a legal pawn move that still needs a promotion choice
pub fn promotion_candidate(position: &Chess, from: Square, to: Square) -> bool {
    position.legal_moves().iter().any(|m| {
        m.promotion().is_some()
            && matches!(move_endpoints(m), Some((f, t)) if f == from && t == to)
    })
}

/// Classify a terminal position, if the game is over
pub fn terminal_state(position: &Chess) -> Option<GameOutcome> {
    if position.is_checkmate() {
        Some(GameOutcome::Checkmate {
            winner: !position.turn(),
        })
    } else if position.is_stalemate() {
        Some(GameOutcome::Stalemate)
    } else if position.is_insufficient_material() || position.halfmoves() >= 100 {
        Some(GameOutcome::Draw)
    } else {
        None
    }
}

/// Serialize a position to FEN
pub fn to_fen(position: &Chess) -> String {
    Fen::from_position(&position.clone(), EnPassantMode::Legal).to_string()
}

/// Parse a FEN string into a position
pub fn from_fen(text: &str) -> Result<Chess, RulesError> {
    let fen: Fen = text.parse().map_err(|_| RulesError::InvalidFen {
        text: text.to_string(),
    })?;
    fen.into_position(CastlingMode::Standard)
        .map_err(|_| RulesError::InvalidFen {
            text: text.to_string(),
        })
}

fn apply_move(position: &Chess, m: &Move) -> Result<Applied, RulesError> {
    let descriptor = describe(position, m);
    let next = position
        .clone()
        .play(m.clone())
        .map_err(|_| RulesError::IllegalMove {
            notation: descriptor.san.clone(),
        })?;
    let mut notation = descriptor.san.clone();
    if next.is_checkmate() {
        notation.push('#');
    } else if next.is_check() {
        notation.push('+');
    }
    Ok(Applied {
        position: next,
        descriptor,
        notation,
    })
}

fn describe(position: &Chess, m: &Move) -> MoveDescriptor {
    let (from, to) = match move_endpoints(m) {
        Some((f, t)) => (Some(f), t),
        None => (None, m.to()),
    };
    let gives_check = position
        .clone()
        .play(m.clone())
        .map(|next| next.is_check())
        .unwrap_or(false);
    MoveDescriptor {
        san: San::from_move(position, m.clone()).to_string(),
        from,
        to,
        role: m.role(),
        captured: m.capture(),
        promotion: m.promotion(),
        is_castle: m.is_castle(),
        is_en_passant: m.is_en_passant(),
        gives_check,
    }
}

/// Endpoints of a move as the player sees them
///
/// For castling the destination is the king's landing square (g- or c-file),
/// not the rook square shakmaty stores internally.
fn move_endpoints(m: &Move) -> Option<(Square, Square)> {
    match m {
        Move::Normal { from, to, .. } => Some((*from, *to)),
        Move::EnPassant { from, to } => Some((*from, *to)),
        Move::Castle { king, rook } => {
            let king_dest = if rook.file() == File::H {
                Square::from_coords(File::G, rook.rank())
            } else {
                Square::from_coords(File::C, rook.rank())
            };
            Some((*king, king_dest))
        }
        Move::Put { .. } => None,
    }
}
