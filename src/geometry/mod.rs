//! Geometry module - Card positions and the lines pinned to them
//!
//! Layout and line endpoints are derived from the board, the screen area
//! and the column scroll offsets, and recomputed whenever any of the three
//! changes.

pub mod layout;
pub mod lines;

pub use layout::{
    content_row, BoardLayout, ColumnLayout, Hit, Row, RowKind, ADD_CARD_LABEL, ADD_GROUP_LABEL,
};
pub use lines::{compute_lines, LineSegment};

use ratatui::layout::Rect;

use crate::board::Board;

/// Inputs the cached geometry was computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GeometryKey {
    area: Rect,
    scroll: [u16; 2],
    revision: u64,
}

/// Cached layout and connection lines
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    key: Option<GeometryKey>,
    layout: BoardLayout,
    lines: Vec<LineSegment>,
}

impl Geometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring layout and lines up to date. Returns true if they were recomputed.
    pub fn sync(&mut self, board: &Board, area: Rect, scroll: [u16; 2]) -> bool {
        let key = GeometryKey {
            area,
            scroll,
            revision: board.revision(),
        };
        if self.key == Some(key) {
            return false;
        }

        self.layout = BoardLayout::compute(board, area, scroll);
        self.lines = compute_lines(board.connections(), &self.layout);
        self.key = Some(key);
        log::trace!("Recomputed geometry: {} lines in {:?}", self.lines.len(), area);
        true
    }

    /// Force the next `sync` to recompute
    pub fn invalidate(&mut self) {
        self.key = None;
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn lines(&self) -> &[LineSegment] {
        &self.lines
    }
}
