//! Saved-game persistence
//!
//! Named saved games as `{name, fen, timestamp}` records in a single JSON
//! file under the platform data directory. The store is deliberately dumb:
//! the game core only needs save, list and delete-by-index; everything it
//! persists is derivable from the FEN on load.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::info;

/// One saved game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGame {
    pub name: String,
    pub fen: String,
    pub timestamp: DateTime<Utc>,
}

/// Errors from the saved-game store
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage format: {0}")]
    Format(#[from] serde_json::Error),

    #[error("no platform data directory available")]
    NoDataDir,
}

/// JSON-file-backed store of saved games
pub struct SavedGameStore {
    path: PathBuf,
}

impl SavedGameStore {
    /// Store at the platform data directory, created on demand
    pub fn open_default() -> Result<Self, StorageError> {
        let dirs = ProjectDirs::from("", "", "lmchess").ok_or(StorageError::NoDataDir)?;
        let dir = dirs.data_dir();
        fs::create_dir_all(dir)?;
        Ok(SavedGameStore {
            path: dir.join("saved_games.json"),
        })
    }

    /// Store at an explicit file path
    pub fn at(path: PathBuf) -> Self {
        SavedGameStore { path }
    }

    /// All saved games, oldest first; a missing file is an empty list
    pub fn list(&self) -> Result<Vec<SavedGame>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Append a record
    pub fn save(&self, record: SavedGame) -> Result<(), StorageError> {
        let mut games = self.list()?;
        info!("[STORE] saving game {:?}", record.name);
        games.push(record);
        self.write(&games)
    }

    /// Remove the record at `index`; `None` when out of range
    pub fn delete(&self, index: usize) -> Result<Option<SavedGame>, StorageError> {
        let mut games = self.list()?;
        if index >= games.len() {
            return Ok(None);
        }
        let removed = games.remove(index);
        self.write(&games)?;
        info!("[STORE] deleted game {:?}", removed.name);
        Ok(Some(removed))
    }

    fn write(&self, games: &[SavedGame]) -> Result<(), StorageError> {
        fs::write(&self.path, serde_json::to_string_pretty(games)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_store(tag: &str) -> SavedGameStore {
        let path = std::env::temp_dir().join(format!(
            "lmchess-store-{}-{tag}.json",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        SavedGameStore::at(path)
    }

    fn record(name: &str) -> SavedGame {
        SavedGame {
            name: name.to_string(),
            fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn missing_file_lists_as_empty() {
        let store = scratch_store("empty");
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn save_then_list_round_trips() {
        let store = scratch_store("roundtrip");
        store.save(record("first")).unwrap();
        store.save(record("second")).unwrap();

        let games = store.list().unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].name, "first");
        assert_eq!(games[1].name, "second");
    }

    #[test]
    fn delete_removes_by_index() {
        let store = scratch_store("delete");
        store.save(record("first")).unwrap();
        store.save(record("second")).unwrap();

        let removed = store.delete(0).unwrap();
        assert_eq!(removed.map(|g| g.name), Some("first".to_string()));
        let games = store.list().unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].name, "second");

        assert!(store.delete(5).unwrap().is_none());
    }
}
