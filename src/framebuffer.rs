// src/framebuffer.rs

//! The frame buffer and the small geometry types the rasterizer writes
//! through.
//!
//! Pixels are stored row-major, three bytes (R, G, B) per pixel:
//!
//! ```text
//! Pixel (x, y) lives at byte offset (y * width + x) * 3
//! ```
//!
//! Out-of-range raw pixel writes are rejected silently; clipping happens in
//! the rasterizer for the primitives that define it.

use crate::color::Color;
use crate::resolution::Resolution;

/// Bytes per stored pixel.
pub const BYTES_PER_PIXEL: usize = 3;

/// Writes `color` into every pixel of an RGB byte slice.
pub fn fill_rgb(pixels: &mut [u8], color: Color) {
    let bytes = color.to_bytes();
    for pixel in pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
        pixel.copy_from_slice(&bytes);
    }
}

/// An axis-aligned box of pixels, always fully inside the buffer it was
/// clipped against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Region {
    /// Clips the box `(x, y, width, height)` to `[0, bounds_w) x [0, bounds_h)`.
    ///
    /// Returns `None` when nothing of the box remains visible.
    pub fn clipped(
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        bounds_w: usize,
        bounds_h: usize,
    ) -> Option<Self> {
        if width <= 0 || height <= 0 {
            return None;
        }
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(width).min(bounds_w as i64);
        let y1 = y.saturating_add(height).min(bounds_h as i64);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(Self {
            x: x0 as usize,
            y: y0 as usize,
            width: (x1 - x0) as usize,
            height: (y1 - y0) as usize,
        })
    }

    /// The whole area of a `width x height` buffer.
    pub fn full(width: usize, height: usize) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }
}

/// A boolean membership mask over a region of the frame buffer.
///
/// Produced by a backend's `grid_mask` and consumed by
/// [`FrameBuffer::mask_write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    region: Region,
    bits: Vec<bool>,
}

impl Mask {
    /// Wraps row-major `bits` covering `region`.
    ///
    /// Returns `None` if the bit count does not match the region's area.
    pub fn from_bits(region: Region, bits: Vec<bool>) -> Option<Self> {
        (bits.len() == region.area()).then_some(Self { region, bits })
    }

    /// An empty mask that selects nothing.
    pub fn empty() -> Self {
        Self {
            region: Region::full(0, 0),
            bits: Vec::new(),
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// Whether the absolute pixel `(x, y)` is selected.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        let r = self.region;
        if x < r.x || y < r.y || x >= r.x + r.width || y >= r.y + r.height {
            return false;
        }
        self.bits[(y - r.y) * r.width + (x - r.x)]
    }

    /// Number of selected pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Keeps the pixels selected by `self` and not by `other`.
    pub fn and_not(mut self, other: &Mask) -> Self {
        let r = self.region;
        for row in 0..r.height {
            for col in 0..r.width {
                let idx = row * r.width + col;
                if self.bits[idx] && other.contains(r.x + col, r.y + row) {
                    self.bits[idx] = false;
                }
            }
        }
        self
    }
}

/// In-memory RGB image representing the next frame to display.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl FrameBuffer {
    /// Creates a black buffer of the given resolution.
    pub fn new(resolution: Resolution) -> Self {
        let width = resolution.width as usize;
        let height = resolution.height as usize;
        Self {
            width,
            height,
            pixels: vec![0u8; width * height * BYTES_PER_PIXEL],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width as u32, self.height as u32)
    }

    /// Whether the signed coordinate lies inside the buffer.
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * BYTES_PER_PIXEL
    }

    /// Sets one pixel. Returns `false` (and writes nothing) when out of range.
    #[inline]
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Color) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        let idx = self.offset(x as usize, y as usize);
        self.pixels[idx..idx + BYTES_PER_PIXEL].copy_from_slice(&color.to_bytes());
        true
    }

    /// Reads one pixel, or `None` when out of range.
    pub fn get_pixel(&self, x: i64, y: i64) -> Option<Color> {
        if !self.contains(x, y) {
            return None;
        }
        let idx = self.offset(x as usize, y as usize);
        Color::from_bytes(&self.pixels[idx..idx + BYTES_PER_PIXEL])
    }

    /// Overwrites the whole buffer.
    pub fn fill(&mut self, color: Color) {
        fill_rgb(&mut self.pixels, color);
    }

    /// Overwrites an axis-aligned box, clamped to the buffer.
    pub fn fill_region(&mut self, x: i64, y: i64, width: i64, height: i64, color: Color) {
        let Some(region) = Region::clipped(x, y, width, height, self.width, self.height) else {
            return;
        };
        for row in region.y..region.y + region.height {
            let start = self.offset(region.x, row);
            let end = start + region.width * BYTES_PER_PIXEL;
            fill_rgb(&mut self.pixels[start..end], color);
        }
    }

    /// Writes `color` to every pixel selected by `mask`.
    ///
    /// Mask pixels outside the buffer are ignored.
    pub fn mask_write(&mut self, mask: &Mask, color: Color) {
        let r = mask.region();
        let bytes = color.to_bytes();
        for row in 0..r.height {
            let y = r.y + row;
            if y >= self.height {
                break;
            }
            for col in 0..r.width {
                let x = r.x + col;
                if x >= self.width {
                    break;
                }
                if mask.bits[row * r.width + col] {
                    let idx = self.offset(x, y);
                    self.pixels[idx..idx + BYTES_PER_PIXEL].copy_from_slice(&bytes);
                }
            }
        }
    }

    /// Raw row-major RGB bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable raw row-major RGB bytes, for backend bulk operations.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }
}

/// A presentable copy of the frame buffer, handed to the display surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub resolution: Resolution,
    /// Row-major RGB bytes.
    pub pixels: Vec<u8>,
}

impl Frame {
    /// A black frame of the given resolution.
    pub fn blank(resolution: Resolution) -> Self {
        Self {
            resolution,
            pixels: vec![0u8; resolution.pixel_count() * BYTES_PER_PIXEL],
        }
    }

    /// Reads one pixel of the frame, or `None` when out of range.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.resolution.width || y >= self.resolution.height {
            return None;
        }
        let idx = (y as usize * self.resolution.width as usize + x as usize) * BYTES_PER_PIXEL;
        Color::from_bytes(&self.pixels[idx..idx + BYTES_PER_PIXEL])
    }
}
