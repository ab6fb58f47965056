//! Saved-game persistence.
//!
//! One game in progress is kept as JSON under the platform data directory.
//! Boards are stored in their 81-character compact form; given flags are
//! reconstructed from the initial board on load.

use std::fs;
use std::io;
use std::path::PathBuf;

use rustdoku_core::{Difficulty, GameSession, Grid};
use serde::{Deserialize, Serialize};

/// Serialized game state.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveState {
    solution: String,
    initial: String,
    current: String,
    difficulty: Difficulty,
    elapsed_secs: u64,
}

impl SaveState {
    /// Snapshot a session for saving.
    pub fn capture(session: &GameSession, elapsed_secs: u64) -> Self {
        Self {
            solution: session.solution().to_string_compact(),
            initial: session.initial().to_string_compact(),
            current: session.current().to_string_compact(),
            difficulty: session.difficulty(),
            elapsed_secs,
        }
    }

    /// Elapsed play time when the game was saved.
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Rebuild the session. `None` if the save is corrupt or the boards do
    /// not belong together.
    pub fn into_session(&self) -> Option<GameSession> {
        let solution = Grid::from_string(&self.solution)?;
        let initial = Grid::from_string(&self.initial)?;
        let current = Grid::from_string(&self.current)?;
        GameSession::from_parts(solution, initial, current, self.difficulty)
    }

    /// Load the saved game, if any.
    pub fn load() -> Option<Self> {
        let json = fs::read_to_string(save_path()?).ok()?;
        serde_json::from_str(&json).ok()
    }

    /// Write the save file, creating the directory if needed.
    pub fn store(&self) -> io::Result<()> {
        let path = save_path()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no data directory"))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }

    /// Delete the save file, ignoring a missing one.
    pub fn remove() {
        if let Some(path) = save_path() {
            let _ = fs::remove_file(path);
        }
    }
}

fn save_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("rustdoku").join("save.json"))
}
