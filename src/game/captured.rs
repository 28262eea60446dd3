//! Captured-piece tally
//!
//! Per-side count of captured piece kinds plus the material balance derived
//! from the standard piece values (pawn 1, knight/bishop 3, rook 5,
//! queen 9).
//!
//! The tally is a forward-only projection: it grows as moves are committed
//! and is deliberately NOT reverted on undo, so after an undo it can show
//! captures that no longer correspond to the live position. The snapshot
//! history is the single source of truth for position state; this is
//! display bookkeeping.

use std::collections::BTreeMap;

use shakmaty::{Color, Role};

/// Pieces captured by each side, keyed by piece kind
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CapturedPieces {
    by_white: BTreeMap<Role, u32>,
    by_black: BTreeMap<Role, u32>,
}

impl CapturedPieces {
    /// Record a capture made by `capturing_side`
    pub fn record(&mut self, capturing_side: Color, kind: Role) {
        let tally = match capturing_side {
            Color::White => &mut self.by_white,
            Color::Black => &mut self.by_black,
        };
        *tally.entry(kind).or_insert(0) += 1;
    }

    /// How many pieces of `kind` the given side has captured
    pub fn count(&self, capturing_side: Color, kind: Role) -> u32 {
        self.tally(capturing_side).get(&kind).copied().unwrap_or(0)
    }

    /// Total pieces captured by the given side
    pub fn total(&self, capturing_side: Color) -> u32 {
        self.tally(capturing_side).values().sum()
    }

    /// Material balance in pawn units; positive means White is ahead
    pub fn material_advantage(&self) -> i32 {
        let sum = |tally: &BTreeMap<Role, u32>| -> i32 {
            tally
                .iter()
                .map(|(kind, count)| piece_value(*kind) * *count as i32)
                .sum()
        };
        sum(&self.by_white) - sum(&self.by_black)
    }

    /// Compact display form of one side's haul, e.g. `"Px2 N"`
    pub fn summary(&self, capturing_side: Color) -> String {
        let parts: Vec<String> = self
            .tally(capturing_side)
            .iter()
            .map(|(kind, count)| {
                if *count > 1 {
                    format!("{}x{count}", kind.upper_char())
                } else {
                    kind.upper_char().to_string()
                }
            })
            .collect();
        parts.join(" ")
    }

    /// Clear both tallies (new game)
    pub fn clear(&mut self) {
        self.by_white.clear();
        self.by_black.clear();
    }

    fn tally(&self, capturing_side: Color) -> &BTreeMap<Role, u32> {
        match capturing_side {
            Color::White => &self.by_white,
            Color::Black => &self.by_black,
        }
    }
}

/// Standard piece value in pawn units; the king carries none
fn piece_value(kind: Role) -> i32 {
    match kind {
        Role::Pawn => 1,
        Role::Knight => 3,
        Role::Bishop => 3,
        Role::Rook => 5,
        Role::Queen => 9,
        Role::King => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_and_balanced() {
        let captured = CapturedPieces::default();
        assert_eq!(captured.total(Color::White), 0);
        assert_eq!(captured.total(Color::Black), 0);
        assert_eq!(captured.material_advantage(), 0);
    }

    #[test]
    fn records_counts_per_side_and_kind() {
        let mut captured = CapturedPieces::default();
        captured.record(Color::White, Role::Pawn);
        captured.record(Color::White, Role::Pawn);
        captured.record(Color::Black, Role::Knight);

        assert_eq!(captured.count(Color::White, Role::Pawn), 2);
        assert_eq!(captured.count(Color::White, Role::Knight), 0);
        assert_eq!(captured.count(Color::Black, Role::Knight), 1);
        assert_eq!(captured.total(Color::White), 2);
    }

    #[test]
    fn material_advantage_uses_standard_values() {
        let mut captured = CapturedPieces::default();
        captured.record(Color::White, Role::Queen); // +9
        captured.record(Color::Black, Role::Rook); // -5
        captured.record(Color::Black, Role::Pawn); // -1
        assert_eq!(captured.material_advantage(), 3);
    }

    #[test]
    fn summary_renders_counts() {
        let mut captured = CapturedPieces::default();
        captured.record(Color::White, Role::Pawn);
        captured.record(Color::White, Role::Pawn);
        captured.record(Color::White, Role::Knight);
        assert_eq!(captured.summary(Color::White), "Px2 N");
        assert_eq!(captured.summary(Color::Black), "");
    }

    #[test]
    fn clear_resets_both_sides() {
        let mut captured = CapturedPieces::default();
        captured.record(Color::White, Role::Queen);
        captured.record(Color::Black, Role::Bishop);
        captured.clear();
        assert_eq!(captured, CapturedPieces::default());
    }
}
