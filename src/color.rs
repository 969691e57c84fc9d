// src/color.rs

//! Defines the frame-buffer color type (`Color`) and the named palette
//! (`NamedColor`) used as convenience colors by callers.
//!
//! Colors in the frame buffer are opaque RGB triples. Alpha only exists
//! transiently while text is composited (see `crate::text`).

use serde::{Deserialize, Serialize};

/// An opaque RGB color, one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Returns the color as the three bytes stored in the frame buffer.
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Builds a color from the first three bytes of a pixel slice.
    ///
    /// Returns `None` if the slice holds fewer than three bytes.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [r, g, b, ..] => Some(Self::new(*r, *g, *b)),
            _ => None,
        }
    }

    /// Multiplies every channel by `factor`, clamping to `0..=255`.
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(
            scale_channel(self.r, factor),
            scale_channel(self.g, factor),
            scale_channel(self.b, factor),
        )
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

/// Scales a single channel by `factor`, clamped to the byte range.
#[inline]
pub fn scale_channel(value: u8, factor: f32) -> u8 {
    (value as f32 * factor).round().clamp(0.0, 255.0) as u8
}

/// The sixteen standard named colors (8 normal, 8 bright).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NamedColor {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
    BrightBlack = 8,
    BrightRed = 9,
    BrightGreen = 10,
    BrightYellow = 11,
    BrightBlue = 12,
    BrightMagenta = 13,
    BrightCyan = 14,
    BrightWhite = 15,
}

impl NamedColor {
    /// Converts an index (0-15) to a `NamedColor`, or `None` if out of range.
    pub fn from_index(idx: u8) -> Option<Self> {
        use NamedColor::*;
        const ALL: [NamedColor; 16] = [
            Black,
            Red,
            Green,
            Yellow,
            Blue,
            Magenta,
            Cyan,
            White,
            BrightBlack,
            BrightRed,
            BrightGreen,
            BrightYellow,
            BrightBlue,
            BrightMagenta,
            BrightCyan,
            BrightWhite,
        ];
        ALL.get(idx as usize).copied()
    }

    /// Returns the RGB value of this named color.
    pub fn to_color(self) -> Color {
        match self {
            NamedColor::Black => Color::new(0, 0, 0),
            NamedColor::Red => Color::new(205, 0, 0),
            NamedColor::Green => Color::new(0, 205, 0),
            NamedColor::Yellow => Color::new(205, 205, 0),
            NamedColor::Blue => Color::new(0, 0, 238),
            NamedColor::Magenta => Color::new(205, 0, 205),
            NamedColor::Cyan => Color::new(0, 205, 205),
            NamedColor::White => Color::new(229, 229, 229),
            NamedColor::BrightBlack => Color::new(127, 127, 127),
            NamedColor::BrightRed => Color::new(255, 0, 0),
            NamedColor::BrightGreen => Color::new(0, 255, 0),
            NamedColor::BrightYellow => Color::new(255, 255, 0),
            NamedColor::BrightBlue => Color::new(92, 92, 255),
            NamedColor::BrightMagenta => Color::new(255, 0, 255),
            NamedColor::BrightCyan => Color::new(0, 255, 255),
            NamedColor::BrightWhite => Color::new(255, 255, 255),
        }
    }
}

impl From<NamedColor> for Color {
    fn from(named: NamedColor) -> Self {
        named.to_color()
    }
}
