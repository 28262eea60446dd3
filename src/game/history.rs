//! Position history with undo/redo
//!
//! An ordered sequence of immutable position snapshots plus a cursor. The
//! entry under the cursor is always exactly the orchestrator's live
//! position; positions are compared by their FEN serialization.
//!
//! Committing while the cursor sits before the end discards everything
//! after it first (branch discard): a move made after an undo permanently
//! erases the undone-and-not-redone future.
//!
//! The SAN move log and the captured-piece tally are deliberately NOT part
//! of this store's rollback scope; see [`crate::game::moves`] and
//! [`crate::game::captured`].

use shakmaty::Chess;

use crate::rules;

struct Entry {
    position: Chess,
    fen: String,
}

/// Snapshot log with cursor
///
/// Invariant: `0 <= current < entries.len()` at all times; the store is
/// never empty, it always holds at least the position it was created with.
pub struct PositionHistory {
    entries: Vec<Entry>,
    current: usize,
}

impl PositionHistory {
    /// Create a history rooted at `initial`
    pub fn new(initial: Chess) -> Self {
        let fen = rules::to_fen(&initial);
        PositionHistory {
            entries: vec![Entry {
                position: initial,
                fen,
            }],
            current: 0,
        }
    }

    /// Commit a position as the new head
    ///
    /// No-op when `position` equals the entry under the cursor (idempotent
    /// against duplicate commits). Otherwise truncates the redo branch,
    /// appends, and advances the cursor to the new last index.
    pub fn commit(&mut self, position: &Chess) {
        let fen = rules::to_fen(position);
        if fen == self.entries[self.current].fen {
            return;
        }
        self.entries.truncate(self.current + 1);
        self.entries.push(Entry {
            position: position.clone(),
            fen,
        });
        self.current = self.entries.len() - 1;
    }

    /// Step back one snapshot; `None` when already at the oldest state
    pub fn undo(&mut self) -> Option<Chess> {
        if self.current == 0 {
            return None;
        }
        self.current -= 1;
        Some(self.entries[self.current].position.clone())
    }

    /// Step forward one snapshot; `None` when no redo branch exists
    pub fn redo(&mut self) -> Option<Chess> {
        if self.current + 1 >= self.entries.len() {
            return None;
        }
        self.current += 1;
        Some(self.entries[self.current].position.clone())
    }

    /// Clear everything and root the history at `position`
    pub fn reset(&mut self, position: Chess) {
        let fen = rules::to_fen(&position);
        self.entries.clear();
        self.entries.push(Entry { position, fen });
        self.current = 0;
    }

    /// Position under the cursor
    pub fn current_position(&self) -> &Chess {
        &self.entries[self.current].position
    }

    /// FEN of the position under the cursor
    pub fn current_fen(&self) -> &str {
        &self.entries[self.current].fen
    }

    pub fn cursor(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        // The invariant keeps at least one entry; kept for API symmetry.
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.current > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current + 1 < self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::Chess;

    fn after(moves: &[&str]) -> Chess {
        let mut position = Chess::default();
        for san in moves {
            position = crate::rules::apply_san(&position, san).unwrap().position;
        }
        position
    }

    #[test]
    fn commit_advances_the_cursor() {
        let mut history = PositionHistory::new(Chess::default());
        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), 0);

        history.commit(&after(&["e4"]));
        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), 1);
    }

    #[test]
    fn committing_the_current_position_is_a_no_op() {
        let mut history = PositionHistory::new(Chess::default());
        let e4 = after(&["e4"]);
        history.commit(&e4);
        history.commit(&e4);
        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), 1);
    }

    #[test]
    fn undo_redo_round_trip_restores_the_cursor() {
        //! commit(p); undo(); redo() points the cursor back at p
        let mut history = PositionHistory::new(Chess::default());
        let p = after(&["e4"]);
        history.commit(&p);
        let head_fen = history.current_fen().to_string();

        let back = history.undo().expect("one step back exists");
        assert_eq!(crate::rules::to_fen(&back), crate::rules::to_fen(&Chess::default()));

        let forward = history.redo().expect("redo branch exists");
        assert_eq!(crate::rules::to_fen(&forward), head_fen);
        assert_eq!(history.cursor(), 1);
    }

    #[test]
    fn undo_at_the_root_returns_none() {
        let mut history = PositionHistory::new(Chess::default());
        assert!(history.undo().is_none());
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn redo_at_the_head_returns_none() {
        let mut history = PositionHistory::new(Chess::default());
        history.commit(&after(&["e4"]));
        assert!(history.redo().is_none());
    }

    #[test]
    fn committing_after_undo_discards_the_branch() {
        //! commit(a); commit(b); commit(c); undo(); undo(); commit(d)
        //! makes b and c unreachable: redo() is None
        let mut history = PositionHistory::new(Chess::default());
        history.commit(&after(&["e4"]));
        history.commit(&after(&["e4", "e5"]));
        history.commit(&after(&["e4", "e5", "Nf3"]));
        assert_eq!(history.len(), 4);

        history.undo();
        history.undo();
        assert_eq!(history.cursor(), 1);

        history.commit(&after(&["e4", "c5"]));
        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), 2);
        assert!(history.redo().is_none());
    }

    #[test]
    fn reset_roots_the_history_at_one_entry() {
        let mut history = PositionHistory::new(Chess::default());
        history.commit(&after(&["e4"]));
        history.commit(&after(&["e4", "e5"]));

        history.reset(Chess::default());
        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
