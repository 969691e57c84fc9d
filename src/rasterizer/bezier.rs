// src/rasterizer/bezier.rs

//! Quadratic and cubic Bézier curves, flattened by fixed parametric
//! stepping and joined with line segments.

use super::line::draw_line;
use super::Point;
use crate::color::Color;
use crate::framebuffer::FrameBuffer;

/// Parameter samples per curve (`Δt = 0.001`).
const SAMPLES: u32 = 1000;

fn quadratic_at(p: [Point; 3], t: f64) -> (f64, f64) {
    let u = 1.0 - t;
    let (b0, b1, b2) = (u * u, 2.0 * u * t, t * t);
    (
        b0 * p[0].0 as f64 + b1 * p[1].0 as f64 + b2 * p[2].0 as f64,
        b0 * p[0].1 as f64 + b1 * p[1].1 as f64 + b2 * p[2].1 as f64,
    )
}

fn cubic_at(p: [Point; 4], t: f64) -> (f64, f64) {
    let u = 1.0 - t;
    let (b0, b1, b2, b3) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
    (
        b0 * p[0].0 as f64 + b1 * p[1].0 as f64 + b2 * p[2].0 as f64 + b3 * p[3].0 as f64,
        b0 * p[0].1 as f64 + b1 * p[1].1 as f64 + b2 * p[2].1 as f64 + b3 * p[3].1 as f64,
    )
}

/// Walks `t` from 0 to 1 and connects each newly reached pixel to the
/// previous one, so the curve has no gaps.
fn flatten(
    fb: &mut FrameBuffer,
    start: Point,
    color: Color,
    at: impl Fn(f64) -> (f64, f64),
) -> usize {
    let mut written = usize::from(fb.set_pixel(start.0, start.1, color));
    let mut prev = start;
    for i in 1..=SAMPLES {
        let (x, y) = at(i as f64 / SAMPLES as f64);
        let pixel = (x.round() as i64, y.round() as i64);
        if pixel != prev {
            // `prev` was already counted as the end of the previous segment.
            let joint = usize::from(fb.contains(prev.0, prev.1));
            written += draw_line(fb, prev, pixel, color).saturating_sub(joint);
            prev = pixel;
        }
    }
    written
}

/// Draws a quadratic curve from `p0` to `p2` pulled toward `p1`.
pub fn draw_quadratic_bezier(
    fb: &mut FrameBuffer,
    p0: Point,
    p1: Point,
    p2: Point,
    color: Color,
) -> usize {
    flatten(fb, p0, color, |t| quadratic_at([p0, p1, p2], t))
}

/// Draws a cubic curve from `p0` to `p3` with handles `p1` and `p2`.
pub fn draw_cubic_bezier(
    fb: &mut FrameBuffer,
    p0: Point,
    p1: Point,
    p2: Point,
    p3: Point,
    color: Color,
) -> usize {
    flatten(fb, p0, color, |t| cubic_at([p0, p1, p2, p3], t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolution::Resolution;

    fn lit(fb: &FrameBuffer) -> Vec<Point> {
        let mut out = Vec::new();
        for y in 0..fb.height() as i64 {
            for x in 0..fb.width() as i64 {
                if fb.get_pixel(x, y) == Some(Color::WHITE) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    /// Every lit pixel has a lit 8-neighbour.
    fn is_connected(points: &[Point]) -> bool {
        points.len() < 2
            || points.iter().all(|&(x, y)| {
                points
                    .iter()
                    .any(|&(ox, oy)| (ox, oy) != (x, y) && (ox - x).abs() <= 1 && (oy - y).abs() <= 1)
            })
    }

    #[test]
    fn test_quadratic_hits_both_endpoints_and_is_connected() {
        let mut fb = FrameBuffer::new(Resolution::new(100, 100));
        draw_quadratic_bezier(&mut fb, (5, 90), (50, 0), (95, 90), Color::WHITE);
        let points = lit(&fb);
        assert!(points.contains(&(5, 90)));
        assert!(points.contains(&(95, 90)));
        // Apex of the parabola at t = 0.5.
        assert!(points.contains(&(50, 45)));
        assert!(is_connected(&points));
    }

    #[test]
    fn test_cubic_hits_both_endpoints_and_is_connected() {
        let mut fb = FrameBuffer::new(Resolution::new(100, 100));
        draw_cubic_bezier(&mut fb, (10, 10), (90, 10), (10, 90), (90, 90), Color::WHITE);
        let points = lit(&fb);
        assert!(points.contains(&(10, 10)));
        assert!(points.contains(&(90, 90)));
        assert!(is_connected(&points));
    }

    #[test]
    fn test_collinear_controls_draw_a_straight_line() {
        let mut fb = FrameBuffer::new(Resolution::new(50, 10));
        let n = draw_quadratic_bezier(&mut fb, (0, 5), (20, 5), (40, 5), Color::WHITE);
        let points = lit(&fb);
        assert_eq!(points.len(), 41);
        assert_eq!(n, 41);
        assert!(points.iter().all(|&(_, y)| y == 5));
    }

    #[test]
    fn test_curve_leaving_the_buffer_is_clipped() {
        let mut fb = FrameBuffer::new(Resolution::new(20, 20));
        draw_quadratic_bezier(&mut fb, (10, 10), (60, -40), (10, 30), Color::WHITE);
        assert_eq!(fb.get_pixel(10, 10), Some(Color::WHITE));
    }
}
