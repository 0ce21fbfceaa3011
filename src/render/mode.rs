//! Glyph mode detection
//!
//! Picks between plain ASCII and Unicode box-drawing glyphs for connection
//! lines based on what the terminal locale advertises.

use std::env;

use serde::{Deserialize, Serialize};

/// Available glyph sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GlyphMode {
    /// `- | / \ o`, works everywhere
    Ascii,
    /// Box-drawing lines and a filled dot
    #[default]
    Unicode,
}

impl GlyphMode {
    /// Get a human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            GlyphMode::Ascii => "ASCII",
            GlyphMode::Unicode => "Unicode",
        }
    }

    /// Glyphs used to draw connection lines in this mode
    pub fn line_glyphs(&self) -> LineGlyphs {
        match self {
            GlyphMode::Ascii => LineGlyphs {
                horizontal: '-',
                vertical: '|',
                rising: '/',
                falling: '\\',
                endpoint: 'o',
            },
            GlyphMode::Unicode => LineGlyphs {
                horizontal: '─',
                vertical: '│',
                rising: '╱',
                falling: '╲',
                endpoint: '●',
            },
        }
    }
}

/// Characters for each stroke direction of a rasterized line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineGlyphs {
    pub horizontal: char,
    pub vertical: char,
    /// Going up as x grows (screen y shrinks)
    pub rising: char,
    /// Going down as x grows
    pub falling: char,
    pub endpoint: char,
}

/// Detect the best glyph mode for the current terminal
pub fn detect_glyph_mode() -> GlyphMode {
    let mode = glyph_mode_from(|key| env::var(key).ok());
    log::info!("Using {} glyph mode", mode.name());
    mode
}

/// Locale-driven detection with an injectable environment lookup
pub fn glyph_mode_from<F>(lookup: F) -> GlyphMode
where
    F: Fn(&str) -> Option<String>,
{
    // LC_ALL overrides LC_CTYPE, which overrides LANG
    for key in ["LC_ALL", "LC_CTYPE", "LANG"] {
        if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
            let upper = value.to_uppercase();
            return if upper.contains("UTF-8") || upper.contains("UTF8") {
                GlyphMode::Unicode
            } else {
                GlyphMode::Ascii
            };
        }
    }

    // Modern terminals generally support Unicode
    GlyphMode::Unicode
}
