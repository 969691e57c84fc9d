// src/text/headless.rs

//! Headless text shaper.
//!
//! Draws every non-whitespace character as a solid block inside a fixed-size
//! cell, so layout and compositing can be exercised without a font stack.
//! Counts its render calls, which makes cache behaviour observable.

use super::{FontId, RenderedText, TextShaper, TextStyle};
use anyhow::{bail, Result};
use log::trace;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Shaper that renders block glyphs and counts how often it is asked to.
#[derive(Debug, Default)]
pub struct HeadlessShaper {
    calls: AtomicUsize,
}

impl HeadlessShaper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful and failed `render` calls so far.
    pub fn render_calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// Cell width for `font`: half the pixel size, never less than one.
    pub fn advance(font: &FontId) -> usize {
        (font.size_px as usize / 2).max(1)
    }
}

impl TextShaper for HeadlessShaper {
    fn render(&self, text: &str, style: &TextStyle) -> Result<RenderedText> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if text.contains('\n') {
            bail!("HeadlessShaper: cannot render a line break");
        }
        if style.font.size_px == 0 {
            bail!("HeadlessShaper: font '{}' has zero size", style.font.family);
        }

        let cell_w = Self::advance(&style.font);
        let height = self.line_height(&style.font) as usize;
        let chars: Vec<char> = text.chars().collect();
        let width = cell_w * chars.len();
        trace!("HeadlessShaper: rendering {:?} as {}x{}", text, width, height);

        let mut rgb = vec![0u8; width * height * 3];
        let mut alpha = vec![0u8; width * height];
        let fg = style.fg.to_bytes();
        let bg = style.bg.map(|c| c.to_bytes());

        for row in 0..height {
            for col in 0..width {
                let i = row * width + col;
                let ch = chars[col / cell_w];
                let (cx, cy) = (col % cell_w, row);
                // One pixel of padding around each block.
                let covered = !ch.is_whitespace()
                    && cx >= 1
                    && cx + 1 < cell_w
                    && cy >= 1
                    && cy + 1 < height;
                if covered {
                    rgb[i * 3..i * 3 + 3].copy_from_slice(&fg);
                    alpha[i] = 255;
                } else if let Some(bg) = bg {
                    rgb[i * 3..i * 3 + 3].copy_from_slice(&bg);
                    alpha[i] = 255;
                }
            }
        }

        Ok(RenderedText {
            width,
            height,
            rgb,
            alpha,
        })
    }

    fn line_height(&self, font: &FontId) -> u32 {
        font.size_px
    }
}
