//! User settings
//!
//! Loaded from `settings.ron` in the platform config directory, with
//! fallback to hardcoded defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::render::GlyphMode;

const SETTINGS_FILE_NAME: &str = "settings.ron";

/// Everything a user can tweak without recompiling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Title of the left column panel
    pub left_title: String,
    /// Title of the right column panel
    pub right_title: String,
    /// Force a glyph mode instead of detecting it
    pub glyph_mode: Option<GlyphMode>,
    /// Accent used for selections and connection lines
    pub accent: (u8, u8, u8),
    /// Colour of the left column frame
    pub left_tone: (u8, u8, u8),
    /// Colour of the right column frame
    pub right_tone: (u8, u8, u8),
    /// Where log output goes
    pub log_file: PathBuf,
    /// Board file to use instead of the default data-dir location
    pub board_file: Option<PathBuf>,
    /// Load the board file at startup if it exists
    pub load_on_start: bool,
    /// Write the board file on quit
    pub save_on_exit: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            left_title: "Left".to_string(),
            right_title: "Right".to_string(),
            glyph_mode: None,
            accent: (227, 6, 19),
            left_tone: (200, 120, 80),
            right_tone: (90, 140, 200),
            log_file: PathBuf::from("linkboard.log"),
            board_file: None,
            load_on_start: false,
            save_on_exit: false,
        }
    }
}

/// Settings error types
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

impl Settings {
    /// Load settings from the config directory, or defaults
    pub fn load() -> Self {
        let path = settings_path();
        if !path.exists() {
            log::info!("No settings at {:?}, using defaults", path);
            return Self::default();
        }

        Self::load_from(&path).unwrap_or_else(|e| {
            log::warn!("Failed to load settings: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Load settings from a specific RON file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path)
            .map_err(|source| SettingsError::Read { path: path.to_path_buf(), source })?;
        let settings = Self::from_ron(&content)?;
        log::info!("Settings loaded from {:?}", path);
        Ok(settings)
    }

    /// Parse settings from RON text; missing fields take their defaults
    pub fn from_ron(content: &str) -> Result<Self, SettingsError> {
        Ok(ron::from_str(content)?)
    }

    /// Board file in effect, honouring the override
    pub fn board_path(&self) -> PathBuf {
        self.board_file
            .clone()
            .unwrap_or_else(crate::save::default_board_path)
    }
}

/// Get the path of the settings file
pub fn settings_path() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "linkboard", "Linkboard") {
        proj_dirs.config_dir().join(SETTINGS_FILE_NAME)
    } else {
        PathBuf::from(SETTINGS_FILE_NAME)
    }
}
