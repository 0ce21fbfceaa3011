//! Configuration
//!
//! User settings read from a RON file in the platform config directory.

pub mod settings;

pub use settings::{Settings, SettingsError, settings_path};
