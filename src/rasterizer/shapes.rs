// src/rasterizer/shapes.rs

//! Rectangles and circular arcs.

use super::line::draw_line;
use super::{Point, Stroke};
use crate::color::Color;
use crate::framebuffer::{FrameBuffer, Region};
use log::trace;

/// Draws an axis-aligned rectangle with its top-left corner at `origin`.
///
/// A non-positive size or a negative origin draws nothing. Filled rectangles
/// are clipped to the buffer; outlines are the four one-pixel edges.
pub fn draw_rectangle(
    fb: &mut FrameBuffer,
    origin: Point,
    width: i64,
    height: i64,
    color: Color,
    stroke: Stroke,
) -> usize {
    let (x, y) = origin;
    if width <= 0 || height <= 0 || x < 0 || y < 0 {
        trace!(
            "draw_rectangle: ignoring {}x{} at {:?}",
            width,
            height,
            origin
        );
        return 0;
    }

    match stroke {
        Stroke::Filled => {
            let Some(region) = Region::clipped(x, y, width, height, fb.width(), fb.height()) else {
                return 0;
            };
            fb.fill_region(x, y, width, height, color);
            region.area()
        }
        Stroke::Outline(_) => {
            let (right, bottom) = (x.saturating_add(width - 1), y.saturating_add(height - 1));
            draw_line(fb, (x, y), (right, y), color)
                + draw_line(fb, (right, y), (right, bottom), color)
                + draw_line(fb, (right, bottom), (x, bottom), color)
                + draw_line(fb, (x, bottom), (x, y), color)
        }
    }
}

/// Plots sample points along a circular arc.
///
/// Angles are in degrees, measured clockwise from the +x axis (y grows
/// downward). An `end` smaller than `start` wraps past 360. Samples are
/// rounded to the nearest pixel; those off the buffer are discarded.
pub fn draw_arc(
    fb: &mut FrameBuffer,
    center: Point,
    radius: i64,
    start_deg: f64,
    end_deg: f64,
    color: Color,
) -> usize {
    if radius <= 0 {
        trace!("draw_arc: ignoring radius {}", radius);
        return 0;
    }
    let mut end_deg = end_deg;
    if end_deg < start_deg {
        end_deg += 360.0;
    }

    let (w, h) = (fb.width() as i128, fb.height() as i128);
    let (ci, cj, ri) = (center.0 as i128, center.1 as i128, radius as i128);
    if ci + ri < 0 || ci - ri >= w || cj + ri < 0 || cj - ri >= h {
        trace!("draw_arc: circle at {:?} misses the buffer", center);
        return 0;
    }

    let (cx, cy) = (center.0 as f64, center.1 as f64);
    let r = radius as f64;
    let steps = radius.saturating_mul(8).max(1);
    let (start, sweep) = (start_deg.to_radians(), (end_deg - start_deg).to_radians());

    let mut written = 0;
    for i in 0..=steps {
        let theta = start + sweep * (i as f64 / steps as f64);
        let x = (cx + r * theta.cos()).round() as i64;
        let y = (cy + r * theta.sin()).round() as i64;
        if fb.set_pixel(x, y, color) {
            written += 1;
        }
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolution::Resolution;

    #[test]
    fn test_filled_then_outlined_changes_only_border() {
        let mut fb = FrameBuffer::new(Resolution::new(30, 30));
        let (fill, edge) = (Color::new(0, 0, 200), Color::WHITE);
        draw_rectangle(&mut fb, (5, 6), 10, 8, fill, Stroke::Filled);
        draw_rectangle(&mut fb, (5, 6), 10, 8, edge, Stroke::Outline(1));
        for y in 0..30 {
            for x in 0..30 {
                let inside = (5..15).contains(&x) && (6..14).contains(&y);
                let border = inside && (x == 5 || x == 14 || y == 6 || y == 13);
                let expected = if border {
                    edge
                } else if inside {
                    fill
                } else {
                    Color::BLACK
                };
                assert_eq!(fb.get_pixel(x, y), Some(expected), "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_extreme_geometry_does_not_overflow() {
        let mut fb = FrameBuffer::new(Resolution::new(10, 10));
        let n = draw_rectangle(&mut fb, (2, 3), i64::MAX, i64::MAX, Color::WHITE, Stroke::Outline(1));
        // Only the top and left edges are on the buffer.
        assert_eq!(n, 8 + 7);
        assert_eq!(
            draw_arc(&mut fb, (i64::MIN, 0), i64::MAX / 4, 0.0, 360.0, Color::WHITE),
            0
        );
    }

    #[test]
    fn test_invalid_rectangles_are_no_ops() {
        let mut fb = FrameBuffer::new(Resolution::new(10, 10));
        assert_eq!(draw_rectangle(&mut fb, (1, 1), 0, 5, Color::WHITE, Stroke::Filled), 0);
        assert_eq!(draw_rectangle(&mut fb, (1, 1), 5, -2, Color::WHITE, Stroke::Filled), 0);
        assert_eq!(draw_rectangle(&mut fb, (-1, 1), 5, 5, Color::WHITE, Stroke::Outline(1)), 0);
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_filled_rectangle_is_clipped() {
        let mut fb = FrameBuffer::new(Resolution::new(10, 10));
        assert_eq!(draw_rectangle(&mut fb, (8, 8), 5, 5, Color::WHITE, Stroke::Filled), 4);
    }

    #[test]
    fn test_full_circle_arc_stays_on_radius() {
        let mut fb = FrameBuffer::new(Resolution::new(50, 50));
        let n = draw_arc(&mut fb, (25, 25), 10, 0.0, 360.0, Color::WHITE);
        assert!(n > 0);
        assert_eq!(fb.get_pixel(35, 25), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(25, 35), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(25, 25), Some(Color::BLACK));
        for y in 0..50 {
            for x in 0..50 {
                if fb.get_pixel(x, y) == Some(Color::WHITE) {
                    let d = (((x - 25).pow(2) + (y - 25).pow(2)) as f64).sqrt();
                    assert!((d - 10.0).abs() < 1.0, "({}, {}) is {} from center", x, y, d);
                }
            }
        }
    }

    #[test]
    fn test_arc_wraps_when_end_precedes_start() {
        let mut fb = FrameBuffer::new(Resolution::new(50, 50));
        draw_arc(&mut fb, (25, 25), 10, 270.0, 90.0, Color::WHITE);
        // The sweep passes through 0 degrees (+x) but not 180 (-x).
        assert_eq!(fb.get_pixel(35, 25), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(15, 25), Some(Color::BLACK));
    }

    #[test]
    fn test_arc_off_buffer_and_zero_radius() {
        let mut fb = FrameBuffer::new(Resolution::new(10, 10));
        assert_eq!(draw_arc(&mut fb, (100, 100), 5, 0.0, 360.0, Color::WHITE), 0);
        assert_eq!(draw_arc(&mut fb, (5, 5), 0, 0.0, 360.0, Color::WHITE), 0);
    }
}
