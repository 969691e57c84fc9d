// src/backend/cpu.rs

//! Scalar backend: plain loops on the calling thread.

use super::{eval_rows, scale_slice, BackendKind, GridPredicate, NumericBackend};
use crate::color::Color;
use crate::framebuffer::{fill_rgb, Mask, Region};

/// Always-available fallback backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpuBackend;

impl CpuBackend {
    pub fn new() -> Self {
        Self
    }
}

impl NumericBackend for CpuBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Cpu
    }

    fn name(&self) -> &str {
        "CpuBackend"
    }

    fn grid_mask(&self, region: Region, predicate: &GridPredicate<'_>) -> Mask {
        let mut bits = vec![false; region.area()];
        eval_rows(region, 0, &mut bits, predicate);
        Mask::from_bits(region, bits).unwrap_or_else(Mask::empty)
    }

    fn fill(&self, pixels: &mut [u8], color: Color) {
        fill_rgb(pixels, color);
    }

    fn scale_into(&self, src: &[u8], dst: &mut Vec<u8>, factor: f32) {
        dst.resize(src.len(), 0);
        if factor == 1.0 {
            dst.copy_from_slice(src);
        } else {
            scale_slice(src, dst, factor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_mask_uses_absolute_coordinates() {
        let backend = CpuBackend::new();
        let region = Region { x: 5, y: 7, width: 2, height: 2 };
        let mask = backend.grid_mask(region, &|x: f64, y: f64| x == 6.0 && y == 7.0);
        assert_eq!(mask.count(), 1);
        assert!(mask.contains(6, 7));
        assert!(!mask.contains(5, 7));
    }

    #[test]
    fn test_scale_into_identity_and_half() {
        let backend = CpuBackend::new();
        let src = vec![10u8, 200, 255];
        let mut dst = Vec::new();
        backend.scale_into(&src, &mut dst, 1.0);
        assert_eq!(dst, src);
        backend.scale_into(&src, &mut dst, 0.5);
        assert_eq!(dst, vec![5, 100, 128]);
    }
}
