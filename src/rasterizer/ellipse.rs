// src/rasterizer/ellipse.rs

//! Axis-aligned ellipses, evaluated as membership masks on the backend.
//!
//! With `F(x, y) = ((x - cx) / rx)^2 + ((y - cy) / ry)^2 - 1`:
//!
//! ```text
//! filled          F <= 0
//! outline, t <= 1 |d| <= 0.5
//! outline, t > 1  d <= t/2  AND NOT  d <= -t/2
//! ```
//!
//! where `d = F / |grad F|` approximates the signed distance to the curve.

use super::{Point, Stroke};
use crate::backend::NumericBackend;
use crate::color::Color;
use crate::framebuffer::{FrameBuffer, Mask, Region};
use log::trace;

/// Signed distance estimate of `(x, y)` from the ellipse boundary.
///
/// Negative inside, positive outside. The center (zero gradient) reports
/// negative infinity.
fn signed_distance(x: f64, y: f64, cx: f64, cy: f64, rx: f64, ry: f64) -> f64 {
    let (dx, dy) = (x - cx, y - cy);
    let f = (dx / rx).powi(2) + (dy / ry).powi(2) - 1.0;
    let gx = 2.0 * dx / (rx * rx);
    let gy = 2.0 * dy / (ry * ry);
    let grad = (gx * gx + gy * gy).sqrt();
    if grad == 0.0 {
        f64::NEG_INFINITY
    } else {
        f / grad
    }
}

/// Draws an ellipse centered at `center` with radii `rx`, `ry`.
///
/// A non-positive radius draws nothing. An outline at least as thick as the
/// smaller radius is drawn filled.
pub fn draw_ellipse(
    fb: &mut FrameBuffer,
    backend: &dyn NumericBackend,
    center: Point,
    rx: i64,
    ry: i64,
    color: Color,
    stroke: Stroke,
) -> usize {
    if rx <= 0 || ry <= 0 {
        trace!("draw_ellipse: ignoring radii {}x{}", rx, ry);
        return 0;
    }
    let stroke = match stroke {
        Stroke::Outline(t) if t >= rx.min(ry) => Stroke::Filled,
        s => s,
    };

    let margin = match stroke {
        Stroke::Filled => 0,
        Stroke::Outline(t) => t.max(1).saturating_add(1),
    };
    let (cx, cy) = center;
    let span = |r: i64| r.saturating_add(margin).saturating_mul(2).saturating_add(1);
    let Some(region) = Region::clipped(
        cx.saturating_sub(rx).saturating_sub(margin),
        cy.saturating_sub(ry).saturating_sub(margin),
        span(rx),
        span(ry),
        fb.width(),
        fb.height(),
    ) else {
        trace!("draw_ellipse: {:?} is outside the buffer", center);
        return 0;
    };

    let (cxf, cyf, rxf, ryf) = (cx as f64, cy as f64, rx as f64, ry as f64);
    let mask = match stroke {
        Stroke::Filled => backend.grid_mask(region, &|x: f64, y: f64| {
            ((x - cxf) / rxf).powi(2) + ((y - cyf) / ryf).powi(2) <= 1.0
        }),
        Stroke::Outline(t) if t <= 1 => backend.grid_mask(region, &|x: f64, y: f64| {
            signed_distance(x, y, cxf, cyf, rxf, ryf).abs() <= 0.5
        }),
        Stroke::Outline(t) => {
            let half = t as f64 / 2.0;
            let outer = backend.grid_mask(region, &|x: f64, y: f64| {
                signed_distance(x, y, cxf, cyf, rxf, ryf) <= half
            });
            let inner = backend.grid_mask(region, &|x: f64, y: f64| {
                signed_distance(x, y, cxf, cyf, rxf, ryf) <= -half
            });
            outer.and_not(&inner)
        }
    };
    write_mask(fb, &mask, color)
}

fn write_mask(fb: &mut FrameBuffer, mask: &Mask, color: Color) -> usize {
    fb.mask_write(mask, color);
    mask.count()
}
