//! Prompt construction for the move request
//!
//! The prompt pins the answer format hard: the downstream parser wants one
//! short move token, and everything here exists to discourage prose.

use shakmaty::{Chess, Color, Position};

use crate::rules;

const SYSTEM_INSTRUCTION: &str = "You are a chess engine. Reply with exactly one chess move in \
standard algebraic notation. No commentary, no punctuation, no move numbers.";

/// Prompt text for one move request
///
/// The same text feeds both request shapes: chat requests split it into
/// system and user messages, the legacy completion request concatenates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePrompt {
    pub system: String,
    pub user: String,
}

impl MovePrompt {
    /// Build the prompt for the side to move in `position`
    pub fn for_position(position: &Chess) -> Self {
        let legal: Vec<String> = rules::legal_descriptors(position)
            .into_iter()
            .map(|descriptor| descriptor.san)
            .collect();
        Self::new(&rules::to_fen(position), position.turn(), &legal)
    }

    pub fn new(fen: &str, to_move: Color, legal: &[String]) -> Self {
        let side = match to_move {
            Color::White => "White",
            Color::Black => "Black",
        };
        MovePrompt {
            system: SYSTEM_INSTRUCTION.to_string(),
            user: format!(
                "Position (FEN): {fen}\nSide to move: {side}\nLegal moves: {}\nAnswer with exactly one move from the list.",
                legal.join(", ")
            ),
        }
    }

    /// Single-string form for the legacy completion endpoint
    pub fn completion_text(&self) -> String {
        format!("{}\n\n{}\nMove:", self.system, self.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_fen_and_legal_moves() {
        let prompt = MovePrompt::for_position(&Chess::default());
        assert!(prompt
            .user
            .contains("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"));
        assert!(prompt.user.contains("Side to move: White"));
        assert!(prompt.user.contains("Nf3"));
        assert!(prompt.user.contains("e4"));
    }

    #[test]
    fn completion_text_carries_the_same_prompt() {
        let prompt = MovePrompt::for_position(&Chess::default());
        let text = prompt.completion_text();
        assert!(text.starts_with(&prompt.system));
        assert!(text.contains(&prompt.user));
    }
}
