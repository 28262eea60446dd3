//! Staged resolution of raw model text against the legal-move set
//!
//! Models answer with anything from clean SAN to quoted, punctuated or
//! underspecified move text. Resolution runs a fixed sequence of matching
//! stages, first hit wins:
//!
//! 1. Clean the text (first token, surrounding punctuation and quotes
//!    stripped) and apply it directly as SAN.
//! 2. Case-insensitive match against the canonical SAN of a legal move.
//! 3. Piece-letter + destination shorthand, including the bare destination
//!    square (recovers a knight move written as just "f3").
//! 4. A stage-2/3 hit is re-validated by applying its canonical SAN; the
//!    re-validation itself must succeed.
//!
//! Absence of a result is the designed failure path - this function never
//! errors and never mutates the caller's position.

use shakmaty::Chess;
use tracing::{debug, warn};

use crate::rules::{self, Applied};

/// Resolve raw move text to an applied legal move, or `None`
pub fn resolve(position: &Chess, raw: &str) -> Option<Applied> {
    let token = clean_token(raw)?;

    if let Ok(applied) = rules::apply_san(position, &token) {
        debug!("[AI] resolved {token:?} by direct application");
        return Some(applied);
    }

    let descriptors = rules::legal_descriptors(position);
    let matched = descriptors
        .iter()
        .find(|descriptor| descriptor.san.eq_ignore_ascii_case(&token))
        .or_else(|| {
            descriptors.iter().find(|descriptor| {
                let shorthand = format!("{}{}", descriptor.role.upper_char(), descriptor.to);
                shorthand.eq_ignore_ascii_case(&token)
                    || descriptor.to.to_string().eq_ignore_ascii_case(&token)
            })
        })?;

    match rules::apply_san(position, &matched.san) {
        Ok(applied) => {
            debug!("[AI] resolved {token:?} as {}", matched.san);
            Some(applied)
        }
        Err(err) => {
            warn!(
                "[AI] matched {token:?} to {} but re-validation failed: {err}",
                matched.san
            );
            None
        }
    }
}

/// First whitespace-delimited token with surrounding punctuation removed
fn clean_token(raw: &str) -> Option<String> {
    let token = raw.split_whitespace().next()?;
    let token = token.trim_matches(|c: char| {
        matches!(
            c,
            '"' | '\'' | '`' | '.' | ',' | ';' | ':' | '!' | '?' | '(' | ')' | '[' | ']' | '{'
                | '}' | '*' | '<' | '>'
        )
    });
    let token = token.trim_end_matches(['+', '#']);
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::{Role, Square};

    #[test]
    fn punctuated_san_resolves_by_direct_application() {
        let applied = resolve(&Chess::default(), "  Nf3.\n").expect("Nf3 is legal");
        assert_eq!(applied.descriptor.san, "Nf3");
        assert_eq!(applied.descriptor.to, Square::F3);
    }

    #[test]
    fn quoted_and_suffixed_text_is_cleaned() {
        assert!(resolve(&Chess::default(), "\"e4\"").is_some());
        assert!(resolve(&Chess::default(), "Nf3+").is_some());
        assert!(resolve(&Chess::default(), "(e4)").is_some());
    }

    #[test]
    fn lowercase_san_matches_case_insensitively() {
        let applied = resolve(&Chess::default(), "nf3").expect("matches Nf3");
        assert_eq!(applied.descriptor.san, "Nf3");
    }

    #[test]
    fn bare_destination_recovers_an_undisambiguated_knight_move() {
        // No f-pawn, so the knight move is the only way to reach f3
        let position =
            rules::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPP1PP/RNBQKBNR w KQkq - 0 1").unwrap();
        let applied = resolve(&position, "f3").expect("resolves to the knight move");
        assert_eq!(applied.descriptor.san, "Nf3");
        assert_eq!(applied.descriptor.role, Role::Knight);
    }

    #[test]
    fn piece_letter_destination_shorthand_matches() {
        let position =
            rules::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPP1PP/RNBQKBNR w KQkq - 0 1").unwrap();
        let applied = resolve(&position, "NF3").expect("piece+destination shorthand");
        assert_eq!(applied.descriptor.san, "Nf3");
    }

    #[test]
    fn illegal_move_text_resolves_to_none() {
        // Qh5 is blocked in the starting position; mate suffix changes nothing
        assert!(resolve(&Chess::default(), "Qh5#").is_none());
    }

    #[test]
    fn prose_and_empty_text_resolve_to_none() {
        assert!(resolve(&Chess::default(), "").is_none());
        assert!(resolve(&Chess::default(), "   \n").is_none());
        assert!(resolve(&Chess::default(), "I would play e4 here").is_none());
    }

    #[test]
    fn resolution_is_idempotent() {
        let first = resolve(&Chess::default(), "e4").unwrap();
        let second = resolve(&Chess::default(), "e4").unwrap();
        assert_eq!(first.notation, second.notation);
        assert_eq!(
            rules::to_fen(&first.position),
            rules::to_fen(&second.position)
        );
    }
}
