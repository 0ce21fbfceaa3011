//! Linkboard - A two-column terminal board for linking cards
//!
//! Cards live in named groups on either side of the screen. Picking a card
//! on one side and then a card on the other links them, and the link is
//! drawn as a line pinned to both cards.

pub mod board;
pub mod config;
pub mod geometry;
pub mod render;
pub mod save;
pub mod ui;

// Re-export commonly used types
pub use board::{Board, BoardAction, BoardError, Column, Outcome};
pub use config::Settings;
pub use ui::App;
