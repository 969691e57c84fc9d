// src/rasterizer/line.rs

//! Line rasterization with window clipping.
//!
//! The Bresenham walk is evaluated in closed form: the minor-axis offset
//! at major step `k` is `floor((2·minor·k + major) / (2·major))`, which is
//! exactly where the incremental walk lands. Clipping therefore only
//! narrows the range of `k`; the visible pixels are the same ones the
//! unclipped walk would set.

use super::Point;
use crate::color::Color;
use crate::framebuffer::FrameBuffer;
use bitflags::bitflags;
use log::trace;

bitflags! {
    /// Which boundaries of the clip window a point violates.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Outcode: u8 {
        const LEFT = 1;
        const RIGHT = 2;
        const BOTTOM = 4;
        const TOP = 8;
    }
}

impl Outcode {
    fn of(x: i64, y: i64, w: i64, h: i64) -> Self {
        let mut code = Outcode::empty();
        if x < 0 {
            code |= Outcode::LEFT;
        } else if x >= w {
            code |= Outcode::RIGHT;
        }
        if y < 0 {
            code |= Outcode::TOP;
        } else if y >= h {
            code |= Outcode::BOTTOM;
        }
        code
    }
}

/// A Bresenham walk from one lattice point to another.
///
/// All arithmetic is 128-bit so any pair of `i64` endpoints is valid.
#[derive(Debug, Clone, Copy)]
struct Walk {
    x0: i128,
    y0: i128,
    step_x: i128,
    step_y: i128,
    x_major: bool,
    major: u128,
    minor: u128,
}

impl Walk {
    fn new(p0: Point, p1: Point) -> Self {
        let (x0, y0) = (p0.0 as i128, p0.1 as i128);
        let (x1, y1) = (p1.0 as i128, p1.1 as i128);
        let dx = (x1 - x0).unsigned_abs();
        let dy = (y1 - y0).unsigned_abs();
        let x_major = dx >= dy;
        let (major, minor) = if x_major { (dx, dy) } else { (dy, dx) };
        Self {
            x0,
            y0,
            step_x: if x0 < x1 { 1 } else { -1 },
            step_y: if y0 < y1 { 1 } else { -1 },
            x_major,
            major,
            minor,
        }
    }

    /// Minor-axis offset after `k` major steps.
    fn minor_offset(&self, k: u128) -> u128 {
        if self.major == 0 {
            return 0;
        }
        // floor((2t + M) / 2M) split as q + floor((2r + M) / 2M) to stay in range.
        let t = self.minor * k;
        let (q, r) = (t / self.major, t % self.major);
        q + (2 * r + self.major) / (2 * self.major)
    }

    fn at(&self, k: u128) -> (i128, i128) {
        let along = k as i128;
        let across = self.minor_offset(k) as i128;
        if self.x_major {
            (self.x0 + self.step_x * along, self.y0 + self.step_y * across)
        } else {
            (self.x0 + self.step_x * across, self.y0 + self.step_y * along)
        }
    }

    /// Steps `k` in `0..=major` whose major coordinate lies in `[0, len)`.
    fn major_range(&self, len: i128) -> Option<(u128, u128)> {
        let (start, step) = if self.x_major {
            (self.x0, self.step_x)
        } else {
            (self.y0, self.step_y)
        };
        let (lo, hi) = if step > 0 {
            (-start, len - 1 - start)
        } else {
            (start - (len - 1), start)
        };
        let lo = lo.max(0);
        let hi = hi.min(self.major as i128);
        (lo <= hi).then(|| (lo as u128, hi as u128))
    }
}

/// Visits every pixel of the walk `p0 → p1` that lies inside
/// `[0, width) x [0, height)`, in walk order.
fn walk_visible(p0: Point, p1: Point, width: usize, height: usize, mut plot: impl FnMut(i64, i64)) {
    let (w, h) = (width as i64, height as i64);
    if w == 0 || h == 0 {
        return;
    }
    if Outcode::of(p0.0, p0.1, w, h).intersects(Outcode::of(p1.0, p1.1, w, h)) {
        return;
    }

    let walk = Walk::new(p0, p1);
    let major_len = i128::from(if walk.x_major { w } else { h });
    let Some((first, last)) = walk.major_range(major_len) else {
        return;
    };
    for k in first..=last {
        let (x, y) = walk.at(k);
        if (0..w as i128).contains(&x) && (0..h as i128).contains(&y) {
            plot(x as i64, y as i64);
        }
    }
}

/// Clips the segment `p0 → p1` to `[0, width) x [0, height)`.
///
/// Returns the first and last pixels of the segment's raster that fall
/// inside the window, or `None` when none do.
pub fn clip_line(p0: Point, p1: Point, width: usize, height: usize) -> Option<(Point, Point)> {
    let mut visible: Option<(Point, Point)> = None;
    walk_visible(p0, p1, width, height, |x, y| {
        let first = visible.map_or((x, y), |(first, _)| first);
        visible = Some((first, (x, y)));
    });
    visible
}

/// Draws a one-pixel line, clipped to the buffer.
pub fn draw_line(fb: &mut FrameBuffer, p0: Point, p1: Point, color: Color) -> usize {
    let (width, height) = (fb.width(), fb.height());
    let mut written = 0;
    walk_visible(p0, p1, width, height, |x, y| {
        if fb.set_pixel(x, y, color) {
            written += 1;
        }
    });
    if written == 0 {
        trace!("draw_line: {:?} -> {:?} is outside the buffer", p0, p1);
    }
    written
}
