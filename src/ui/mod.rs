//! User interface module
//!
//! Handles all UI rendering and input using ratatui.

pub mod app;
pub mod input;
pub mod widgets;

pub use app::App;
