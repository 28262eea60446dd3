//! Forward-only move log
//!
//! One [`MoveRecord`] per committed ply, append-only. Like the captured
//! tally, the log is NOT rewound on undo: after taking moves back it keeps
//! showing the line as it was played, which is a documented simplification,
//! not a defect. It resets only on a new game.

use shakmaty::Color;

/// One committed ply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// SAN with check/mate suffix, as shown to the player
    pub notation: String,
    pub color: Color,
}

/// Append-only record of committed plies
#[derive(Debug, Default, Clone)]
pub struct MoveLog {
    records: Vec<MoveRecord>,
}

impl MoveLog {
    pub fn push(&mut self, record: MoveRecord) {
        self.records.push(record);
    }

    pub fn last(&self) -> Option<&MoveRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MoveRecord> {
        self.records.iter()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Numbered display form, e.g. `"1. e4 e5 2. Nf3"`
    ///
    /// A log that starts with a Black ply (game loaded from FEN) renders as
    /// `"1... e5"`.
    pub fn rendered(&self) -> String {
        let mut out = String::new();
        let mut number = 0u32;
        for record in &self.records {
            match record.color {
                Color::White => {
                    number += 1;
                    out.push_str(&format!("{}. {} ", number, record.notation));
                }
                Color::Black => {
                    if number == 0 {
                        number = 1;
                        out.push_str(&format!("1... {} ", record.notation));
                    } else {
                        out.push_str(&format!("{} ", record.notation));
                    }
                }
            }
        }
        out.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ply(notation: &str, color: Color) -> MoveRecord {
        MoveRecord {
            notation: notation.to_string(),
            color,
        }
    }

    #[test]
    fn log_starts_empty() {
        let log = MoveLog::default();
        assert!(log.is_empty());
        assert!(log.last().is_none());
        assert_eq!(log.rendered(), "");
    }

    #[test]
    fn renders_numbered_pairs() {
        let mut log = MoveLog::default();
        log.push(ply("e4", Color::White));
        log.push(ply("e5", Color::Black));
        log.push(ply("Nf3", Color::White));
        assert_eq!(log.rendered(), "1. e4 e5 2. Nf3");
    }

    #[test]
    fn renders_a_black_first_ply() {
        let mut log = MoveLog::default();
        log.push(ply("e5", Color::Black));
        log.push(ply("Nf3", Color::White));
        assert_eq!(log.rendered(), "1... e5 2. Nf3");
    }

    #[test]
    fn clear_empties_the_log() {
        let mut log = MoveLog::default();
        log.push(ply("e4", Color::White));
        log.clear();
        assert!(log.is_empty());
    }
}
