//! JSON snapshot files in the save directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::game::quest::QuestSnapshot;
use crate::game::session::GameSession;

/// Location flags.
pub const LOCATIONS_FILE: &str = "locations.json";
/// Chapter flags.
pub const CHAPTERS_FILE: &str = "chapters.json";
/// Puzzle flags.
pub const PUZZLES_FILE: &str = "puzzles.json";
/// Session counters.
pub const GAME_FILE: &str = "game.json";

const ALL_FILES: [&str; 4] = [LOCATIONS_FILE, CHAPTERS_FILE, PUZZLES_FILE, GAME_FILE];

/// Save failures.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Filesystem problem.
    #[error("save file {}: {source}", .path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Snapshot could not be encoded or decoded.
    #[error("save file {}: {source}", .path.display())]
    Json {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// Reads and writes the snapshot files.
#[derive(Clone, Debug)]
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    /// Store rooted at `dir`. Nothing is touched until the first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Save directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    fn write<T: Serialize>(&self, file: &str, value: &T) -> Result<(), PersistError> {
        let path = self.path(file);
        let json = serde_json::to_string_pretty(value)
            .map_err(|source| PersistError::Json { path: path.clone(), source })?;

        fs::create_dir_all(&self.dir)
            .map_err(|source| PersistError::Io { path: self.dir.clone(), source })?;
        fs::write(&path, json).map_err(|source| PersistError::Io { path, source })
    }

    fn read<T: DeserializeOwned>(&self, file: &str) -> Result<T, PersistError> {
        let path = self.path(file);
        let json = fs::read_to_string(&path)
            .map_err(|source| PersistError::Io { path: path.clone(), source })?;
        serde_json::from_str(&json).map_err(|source| PersistError::Json { path, source })
    }

    /// Read `file`, treating any problem as "no save".
    fn read_or_none<T: DeserializeOwned>(&self, file: &str) -> Option<T> {
        match self.read(file) {
            Ok(value) => Some(value),
            Err(PersistError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                debug!(file, "No saved data");
                None
            }
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable save file");
                None
            }
        }
    }

    // =========================================================================
    // QUEST
    // =========================================================================

    /// Write the three quest files.
    pub fn save_quest(&self, snapshot: &QuestSnapshot) -> Result<(), PersistError> {
        self.write(LOCATIONS_FILE, &snapshot.locations)?;
        self.write(CHAPTERS_FILE, &snapshot.chapters)?;
        self.write(PUZZLES_FILE, &snapshot.puzzles)?;
        debug!(dir = %self.dir.display(), "Quest saved");
        Ok(())
    }

    /// Load quest progress; `None` when no file could be read.
    ///
    /// Files are independent: a missing chapter file still lets the
    /// puzzle file load, with the missing list left empty.
    pub fn load_quest(&self) -> Option<QuestSnapshot> {
        let locations = self.read_or_none(LOCATIONS_FILE);
        let chapters = self.read_or_none(CHAPTERS_FILE);
        let puzzles = self.read_or_none(PUZZLES_FILE);

        if locations.is_none() && chapters.is_none() && puzzles.is_none() {
            return None;
        }
        Some(QuestSnapshot {
            locations: locations.unwrap_or_default(),
            chapters: chapters.unwrap_or_default(),
            puzzles: puzzles.unwrap_or_default(),
        })
    }

    // =========================================================================
    // SESSION
    // =========================================================================

    /// Write `game.json`.
    pub fn save_session(&self, session: &GameSession) -> Result<(), PersistError> {
        self.write(GAME_FILE, session)
    }

    /// Load the session; `None` when missing or unreadable.
    pub fn load_session(&self) -> Option<GameSession> {
        self.read_or_none(GAME_FILE)
    }

    /// Remove every save file. Missing files are fine.
    pub fn delete_all(&self) -> Result<(), PersistError> {
        for file in ALL_FILES {
            let path = self.path(file);
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(source) => return Err(PersistError::Io { path, source }),
            }
        }
        info!(dir = %self.dir.display(), "Save files deleted");
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QuestDefinition;
    use crate::core::Duration;
    use crate::game::quest::Quest;

    fn quest() -> Quest {
        Quest::new(&QuestDefinition::builtin()).unwrap()
    }

    #[test]
    fn test_quest_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path().join("save"));

        let mut original = quest();
        original.solve(0);
        original.solve(1);
        original.read_chapter(1);
        store.save_quest(&original.snapshot()).unwrap();

        let snapshot = store.load_quest().unwrap();
        let mut restored = quest();
        restored.restore(&snapshot);
        assert_eq!(restored.snapshot(), original.snapshot());
        assert!(restored.chapter(2).unwrap().is_unlocked());
    }

    #[test]
    fn test_session_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path());

        let mut session = GameSession::new();
        session.start_game();
        session.needed_hint();
        session.total_time = Duration::from_minutes(12.0);
        store.save_session(&session).unwrap();

        let loaded = store.load_session().unwrap();
        assert_eq!(loaded.hints_needed, 1);
        assert!(loaded.game_started);
        assert_eq!(loaded.total_time, Duration::from_minutes(12.0));
        assert!(!loaded.is_running());
    }

    #[test]
    fn test_missing_files_load_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path());
        assert!(store.load_quest().is_none());
        assert!(store.load_session().is_none());
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path());
        fs::write(dir.path().join(GAME_FILE), "{ not json").unwrap();
        fs::write(dir.path().join(PUZZLES_FILE), "[]").unwrap();

        assert!(store.load_session().is_none());
        let snapshot = store.load_quest().unwrap();
        assert!(snapshot.puzzles.is_empty());
        assert!(snapshot.chapters.is_empty());
    }

    #[test]
    fn test_delete_all() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path());
        store.save_quest(&quest().snapshot()).unwrap();
        store.save_session(&GameSession::new()).unwrap();

        store.delete_all().unwrap();
        assert!(store.load_quest().is_none());
        assert!(!dir.path().join(GAME_FILE).exists());

        // Second delete has nothing to remove
        store.delete_all().unwrap();
    }
}
