//! Connections layer widget
//!
//! Rasterizes connection lines onto the terminal grid, on top of the column
//! panels.

use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};

use crate::geometry::LineSegment;
use crate::render::{GlyphMode, LineGlyphs};

/// Direction of travel through a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    Horizontal,
    Vertical,
    /// Right and up, or left and down
    Rising,
    /// Right and down, or left and up
    Falling,
    Endpoint,
}

impl Stroke {
    fn glyph(self, glyphs: &LineGlyphs) -> char {
        match self {
            Stroke::Horizontal => glyphs.horizontal,
            Stroke::Vertical => glyphs.vertical,
            Stroke::Rising => glyphs.rising,
            Stroke::Falling => glyphs.falling,
            Stroke::Endpoint => glyphs.endpoint,
        }
    }
}

/// Cells covered by a line from `start` to `end` (Bresenham), with the
/// stroke to draw in each
pub fn line_cells(start: (i32, i32), end: (i32, i32)) -> Vec<(i32, i32, Stroke)> {
    let (mut x, mut y) = start;
    let (x1, y1) = end;
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut cells = Vec::new();
    loop {
        if x == x1 && y == y1 {
            cells.push((x, y, Stroke::Endpoint));
            break;
        }

        let e2 = 2 * err;
        let (mut step_x, mut step_y) = (0, 0);
        if e2 >= dy {
            err += dy;
            step_x = sx;
        }
        if e2 <= dx {
            err += dx;
            step_y = sy;
        }

        let stroke = if cells.is_empty() {
            Stroke::Endpoint
        } else if step_y == 0 {
            Stroke::Horizontal
        } else if step_x == 0 {
            Stroke::Vertical
        } else if step_x * step_y < 0 {
            Stroke::Rising
        } else {
            Stroke::Falling
        };
        cells.push((x, y, stroke));

        x += step_x;
        y += step_y;
    }
    cells
}

/// Widget drawing every connection line over the board
pub struct ConnectionsLayer<'a> {
    lines: &'a [LineSegment],
    glyphs: LineGlyphs,
    style: Style,
}

impl<'a> ConnectionsLayer<'a> {
    pub fn new(lines: &'a [LineSegment]) -> Self {
        Self {
            lines,
            glyphs: GlyphMode::default().line_glyphs(),
            style: Style::default(),
        }
    }

    pub fn glyphs(mut self, glyphs: LineGlyphs) -> Self {
        self.glyphs = glyphs;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl<'a> Widget for ConnectionsLayer<'a> {
    /// `area` must be the board container the segments are relative to
    fn render(self, area: Rect, buf: &mut Buffer) {
        for line in self.lines {
            let (x1, y1) = line.start(area);
            let (x2, y2) = line.end(area);
            let cells = line_cells((x1 as i32, y1 as i32), (x2 as i32, y2 as i32));

            for (x, y, stroke) in cells {
                if x < 0 || y < 0 {
                    continue;
                }
                let (x, y) = (x as u16, y as u16);
                if x >= area.right() || y >= area.bottom() {
                    continue;
                }
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_char(stroke.glyph(&self.glyphs)).set_style(self.style);
                }
            }
        }
    }
}
