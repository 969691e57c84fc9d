// src/resolution.rs

//! Screen resolution and its derived aspect ratio.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest denominator the reported aspect ratio may use.
const MAX_RATIO_DENOMINATOR: u64 = 100;

/// Width and height of the virtual screen in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels covered by this resolution.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns the reduced aspect ratio, e.g. `16:9` for 1280x720.
    ///
    /// Ratios that do not reduce to a denominator of at most 100 are
    /// approximated by the closest fraction that does. A zero height yields
    /// the raw `width:0` pair.
    pub fn ratio(&self) -> AspectRatio {
        let (w, h) = (self.width as u64, self.height as u64);
        if h == 0 {
            return AspectRatio {
                numerator: w,
                denominator: 0,
            };
        }
        let (numerator, denominator) = limit_denominator(w, h, MAX_RATIO_DENOMINATOR);
        AspectRatio {
            numerator,
            denominator,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A reduced `numerator:denominator` aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AspectRatio {
    pub numerator: u64,
    pub denominator: u64,
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.numerator, self.denominator)
    }
}

impl PartialEq<&str> for AspectRatio {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Closest fraction to `n/d` whose denominator does not exceed `max_den`.
///
/// Walks the continued-fraction expansion of `n/d`, then picks between the
/// last convergent and the best semiconvergent.
fn limit_denominator(n: u64, d: u64, max_den: u64) -> (u64, u64) {
    let g = gcd(n, d).max(1);
    let (num, den) = (n / g, d / g);
    if den <= max_den {
        return (num, den);
    }

    let (mut p0, mut q0, mut p1, mut q1) = (0u64, 1u64, 1u64, 0u64);
    let (mut n, mut d) = (num, den);
    loop {
        let a = n / d;
        let q2 = q0 + a * q1;
        if q2 > max_den {
            break;
        }
        (p0, q0, p1, q1) = (p1, q1, p0 + a * p1, q2);
        (n, d) = (d, n - a * d);
    }

    let k = (max_den - q0) / q1;
    if 2 * d * (q0 + k * q1) <= den {
        (p1, q1)
    } else {
        (p0 + k * p1, q0 + k * q1)
    }
}
