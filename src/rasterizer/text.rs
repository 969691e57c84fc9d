// src/rasterizer/text.rs

//! Multi-line text layout and glyph-run compositing.

use super::Point;
use crate::framebuffer::{FrameBuffer, Region};
use crate::text::{RenderedText, TextCache, TextShaper, TextStyle};
use anyhow::Result;
use log::trace;

/// Where a block of text ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLayout {
    /// Bottom-right corner of the last glyph run, or the cursor position
    /// when no run was produced. Suitable as the origin of the next write.
    pub next: Point,
    /// Number of lines laid out, blank ones included.
    pub lines: usize,
    /// Pixels written into the buffer.
    pub written: usize,
}

/// Composites `run` with its top-left corner at `origin`.
///
/// Only pixels with non-zero alpha are written; the run is clipped to the
/// buffer on both axes.
pub fn composite_run(fb: &mut FrameBuffer, run: &RenderedText, origin: Point) -> usize {
    let (x, y) = origin;
    let Some(visible) = Region::clipped(
        x,
        y,
        run.width as i64,
        run.height as i64,
        fb.width(),
        fb.height(),
    ) else {
        return 0;
    };

    let mut written = 0;
    for py in visible.y..visible.y + visible.height {
        let sy = (py as i64 - y) as usize;
        for px in visible.x..visible.x + visible.width {
            let sx = (px as i64 - x) as usize;
            match run.pixel(sx, sy) {
                Some((color, alpha)) if alpha > 0 => {
                    fb.set_pixel(px as i64, py as i64, color);
                    written += 1;
                }
                _ => {}
            }
        }
    }
    written
}

/// Lays out `text` starting at `origin`, one shaped run per `'\n'`-separated
/// line, fetching runs through `cache`.
///
/// Every line, blank or not, advances the cursor by the font's line height
/// plus `line_spacing`.
pub fn draw_text(
    fb: &mut FrameBuffer,
    cache: &mut TextCache,
    shaper: &dyn TextShaper,
    text: &str,
    origin: Point,
    style: &TextStyle,
    line_spacing: i64,
) -> Result<TextLayout> {
    let (x, mut cursor_y) = origin;
    let mut layout = TextLayout {
        next: origin,
        lines: 0,
        written: 0,
    };
    if text.is_empty() {
        return Ok(layout);
    }

    let advance = shaper.line_height(&style.font) as i64 + line_spacing;
    let mut last_run_corner = None;
    for line in text.split('\n') {
        layout.lines += 1;
        if !line.is_empty() {
            let run = cache.get_or_render(line, style, shaper)?;
            let written = composite_run(fb, &run, (x, cursor_y));
            if written == 0 {
                trace!("draw_text: line {:?} at y={} is not visible", line, cursor_y);
            }
            layout.written += written;
            last_run_corner = Some((x + run.width as i64, cursor_y + run.height as i64));
        }
        cursor_y += advance;
    }
    layout.next = last_run_corner.unwrap_or((x, cursor_y));
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::resolution::Resolution;
    use crate::text::{FontId, HeadlessShaper};

    fn style() -> TextStyle {
        TextStyle::new(Color::WHITE).with_font(FontId::new("mono", 10))
    }

    fn lit_rows(fb: &FrameBuffer) -> Vec<i64> {
        (0..fb.height() as i64)
            .filter(|&y| (0..fb.width() as i64).any(|x| fb.get_pixel(x, y) != Some(Color::BLACK)))
            .collect()
    }

    #[test]
    fn test_blank_lines_advance_the_cursor() {
        let mut fb = FrameBuffer::new(Resolution::new(100, 100));
        let mut cache = TextCache::new(None);
        let shaper = HeadlessShaper::new();
        let layout = draw_text(&mut fb, &mut cache, &shaper, "ab\n\ncd", (0, 0), &style(), 2).unwrap();
        assert_eq!(layout.lines, 3);
        // Line pitch is 12; the third line starts at y = 24.
        let rows = lit_rows(&fb);
        assert!(rows.contains(&1) && rows.contains(&8));
        assert!(!rows.iter().any(|&y| (12..24).contains(&y)));
        assert!(rows.contains(&25));
        assert_eq!(layout.next, (10, 34));
        // Only the two non-empty lines were shaped.
        assert_eq!(shaper.render_calls(), 2);
    }

    #[test]
    fn test_transparent_pixels_keep_the_background() {
        let mut fb = FrameBuffer::new(Resolution::new(20, 20));
        let backdrop = Color::new(9, 9, 9);
        fb.fill(backdrop);
        let mut cache = TextCache::new(None);
        draw_text(&mut fb, &mut cache, &HeadlessShaper::new(), "a", (0, 0), &style(), 0).unwrap();
        assert_eq!(fb.get_pixel(0, 0), Some(backdrop));
        assert_eq!(fb.get_pixel(2, 2), Some(Color::WHITE));
    }

    #[test]
    fn test_runs_are_clipped_on_both_axes() {
        let mut fb = FrameBuffer::new(Resolution::new(8, 8));
        let mut cache = TextCache::new(None);
        let layout = draw_text(
            &mut fb,
            &mut cache,
            &HeadlessShaper::new(),
            "wide text",
            (-3, 4),
            &style(),
            0,
        )
        .unwrap();
        assert!(layout.written > 0);
        assert_eq!(fb.get_pixel(0, 5), Some(Color::WHITE));
    }

    #[test]
    fn test_offscreen_lines_still_advance() {
        let mut fb = FrameBuffer::new(Resolution::new(50, 15));
        let mut cache = TextCache::new(None);
        let layout = draw_text(
            &mut fb,
            &mut cache,
            &HeadlessShaper::new(),
            "a\nb\nc",
            (0, -20),
            &style(),
            0,
        )
        .unwrap();
        // Lines start at -20, -10, 0; only "c" is visible.
        assert_eq!(lit_rows(&fb), (1..9).collect::<Vec<_>>());
        assert_eq!(layout.next, (5, 10));
    }

    #[test]
    fn test_text_without_runs_reports_cursor() {
        let mut fb = FrameBuffer::new(Resolution::new(10, 10));
        let mut cache = TextCache::new(None);
        let shaper = HeadlessShaper::new();
        let layout = draw_text(&mut fb, &mut cache, &shaper, "", (3, 4), &style(), 0).unwrap();
        assert_eq!(layout.next, (3, 4));
        assert_eq!(layout.lines, 0);

        let layout = draw_text(&mut fb, &mut cache, &shaper, "\n", (3, 4), &style(), 1).unwrap();
        assert_eq!(layout.lines, 2);
        assert_eq!(layout.next, (3, 26));
        assert_eq!(shaper.render_calls(), 0);
    }
}
