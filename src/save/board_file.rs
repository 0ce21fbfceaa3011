//! Board save/load
//!
//! Writes the board to a JSON snapshot file and reads it back.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::board::{Board, Card, Connection, Group, Selection};

/// Snapshot file version for compatibility checking
pub const SNAPSHOT_VERSION: u32 = 1;

/// File name used inside the data directory
const BOARD_FILE_NAME: &str = "board.json";

/// Complete board state as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub version: u32,
    pub groups: Vec<Group>,
    pub cards: Vec<Card>,
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub selection: Option<Selection>,
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            groups: Vec::new(),
            cards: Vec::new(),
            connections: Vec::new(),
            selection: None,
        }
    }
}

/// Save error types
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Board file version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Get the directory board files live in
pub fn save_directory() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "linkboard", "Linkboard") {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        // Fallback to current directory
        PathBuf::from(".")
    }
}

/// Default location of the board file
pub fn default_board_path() -> PathBuf {
    save_directory().join(BOARD_FILE_NAME)
}

/// Write the board to `path`, creating parent directories as needed
pub fn save_board(board: &Board, path: &Path) -> Result<(), SaveError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| SaveError::Io { path: dir.to_path_buf(), source })?;
    }

    let json = serde_json::to_string_pretty(&board.snapshot())?;
    fs::write(path, json).map_err(|source| SaveError::Io { path: path.to_path_buf(), source })?;

    log::info!("Board saved to {:?}", path);
    Ok(())
}

/// Read a board snapshot from `path`
///
/// The snapshot is not checked against the board invariants here; that
/// happens when it is dispatched as a `LoadState` action.
pub fn load_board(path: &Path) -> Result<BoardSnapshot, SaveError> {
    let data = fs::read_to_string(path).map_err(|source| SaveError::Io { path: path.to_path_buf(), source })?;
    let snapshot: BoardSnapshot = serde_json::from_str(&data)?;

    if snapshot.version != SNAPSHOT_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SNAPSHOT_VERSION,
            found: snapshot.version,
        });
    }

    log::info!("Board loaded from {:?}", path);
    Ok(snapshot)
}
