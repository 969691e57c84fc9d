// src/text/mod.rs

//! Text shaping seam and the glyph-run cache.
//!
//! Shaping itself (font loading, glyph layout, coverage) is delegated to a
//! [`TextShaper`]. The screen only ever sees the result: an RGB image plus a
//! per-pixel alpha mask for one line of text, which the rasterizer
//! composites into the frame buffer.

pub mod cache;
pub mod headless;

pub use cache::TextCache;
pub use headless::HeadlessShaper;

use crate::color::Color;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Identifies a font face at a particular pixel size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontId {
    pub family: String,
    pub size_px: u32,
}

impl FontId {
    pub fn new(family: impl Into<String>, size_px: u32) -> Self {
        Self {
            family: family.into(),
            size_px,
        }
    }
}

impl Default for FontId {
    fn default() -> Self {
        Self::new("monospace", 16)
    }
}

/// Everything besides the text itself that changes how a line renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextStyle {
    pub antialias: bool,
    pub fg: Color,
    /// Opaque background behind the glyphs, or `None` for transparent.
    pub bg: Option<Color>,
    pub font: FontId,
}

impl TextStyle {
    pub fn new(fg: Color) -> Self {
        Self {
            antialias: true,
            fg,
            bg: None,
            font: FontId::default(),
        }
    }

    pub fn with_background(mut self, bg: Color) -> Self {
        self.bg = Some(bg);
        self
    }

    pub fn with_font(mut self, font: FontId) -> Self {
        self.font = font;
        self
    }

    pub fn with_antialias(mut self, antialias: bool) -> Self {
        self.antialias = antialias;
        self
    }
}

/// A rendered glyph run: an RGB image with a matching alpha mask.
///
/// `rgb` holds `width * height * 3` bytes and `alpha` holds
/// `width * height` bytes, both row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedText {
    pub width: usize,
    pub height: usize,
    pub rgb: Vec<u8>,
    pub alpha: Vec<u8>,
}

impl RenderedText {
    /// Color and alpha of one pixel of the run, or `None` when out of range.
    pub fn pixel(&self, x: usize, y: usize) -> Option<(Color, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = y * self.width + x;
        let color = Color::from_bytes(self.rgb.get(i * 3..i * 3 + 3)?)?;
        Some((color, *self.alpha.get(i)?))
    }

    /// Whether the buffers match the declared size.
    pub fn is_well_formed(&self) -> bool {
        let area = self.width * self.height;
        self.rgb.len() == area * 3 && self.alpha.len() == area
    }
}

/// Renders single lines of text into glyph-run images.
///
/// Implementations may be called from any producer thread.
pub trait TextShaper: Send + Sync {
    /// Renders one line (no `'\n'`) of `text` in `style`.
    fn render(&self, text: &str, style: &TextStyle) -> Result<RenderedText>;

    /// Height in pixels of one line set in `font`.
    fn line_height(&self, font: &FontId) -> u32;
}
