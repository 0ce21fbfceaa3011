//! Save/load system
//!
//! Handles writing the board to disk and reading it back.

pub mod board_file;

pub use board_file::{
    BoardSnapshot, SaveError, SNAPSHOT_VERSION,
    save_board, load_board, default_board_path, save_directory,
};
