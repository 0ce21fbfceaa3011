//! Rendering support
//!
//! Supports two glyph modes for connection lines:
//! - ASCII: plain `- | / \` strokes
//! - Unicode: box-drawing strokes

pub mod mode;

pub use mode::{GlyphMode, LineGlyphs, detect_glyph_mode};
