// src/rasterizer/mod.rs

//! Stateless rasterization algorithms that write into a [`FrameBuffer`].
//!
//! ```text
//! Screen::draw_*  →  [lock FrameBuffer]  →  rasterizer::*  →  pixels
//!                                               │
//!                                               └─ grid_mask → NumericBackend
//! ```
//!
//! Invalid geometry (non-positive sizes, zero radii) is a silent no-op,
//! logged at trace level. Out-of-bounds geometry is clipped.
//!
//! Every primitive returns the number of pixels it wrote, which callers
//! may ignore.

pub mod bezier;
pub mod ellipse;
pub mod line;
pub mod shapes;
pub mod text;

pub use bezier::{draw_cubic_bezier, draw_quadratic_bezier};
pub use ellipse::draw_ellipse;
pub use line::{clip_line, draw_line};
pub use shapes::{draw_arc, draw_rectangle};
pub use text::{composite_run, draw_text, TextLayout};

/// An integer pixel coordinate. May lie outside the buffer.
pub type Point = (i64, i64);

/// How a closed shape is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    /// Interior and boundary.
    Filled,
    /// Boundary band of the given width in pixels.
    Outline(i64),
}

impl Stroke {
    /// Interprets a thickness where any negative value means filled.
    pub fn from_thickness(thickness: i64) -> Self {
        if thickness < 0 {
            Stroke::Filled
        } else {
            Stroke::Outline(thickness)
        }
    }
}
