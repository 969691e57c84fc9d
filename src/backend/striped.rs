// src/backend/striped.rs

//! Accelerated backend: splits every array operation into horizontal
//! stripes and runs them on a fixed set of worker threads.
//!
//! Each stripe owns a disjoint slice of the output, so no synchronization is
//! needed beyond the scope join. Small workloads run inline; spawning
//! workers for a few hundred pixels costs more than it saves.

use super::{eval_rows, scale_slice, BackendError, BackendKind, DeviceProbe, GridPredicate, NumericBackend};
use crate::color::Color;
use crate::framebuffer::{fill_rgb, Mask, Region, BYTES_PER_PIXEL};
use log::debug;
use std::sync::Arc;
use std::thread;

/// Below this many pixels an operation runs on the calling thread.
const INLINE_THRESHOLD_PX: usize = 16 * 1024;

/// Row-striped, multi-threaded backend.
#[derive(Debug, Clone)]
pub struct StripedBackend {
    threads: usize,
    name: String,
}

impl StripedBackend {
    /// Creates a backend that uses `threads` workers (at least one).
    pub fn new(threads: usize) -> Self {
        let threads = threads.max(1);
        Self {
            threads,
            name: format!("StripedBackend[{}]", threads),
        }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Number of stripes to cut an operation over `pixels` pixels into.
    fn stripes_for(&self, pixels: usize) -> usize {
        if pixels < INLINE_THRESHOLD_PX {
            1
        } else {
            self.threads
        }
    }
}

impl NumericBackend for StripedBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Accelerated
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn grid_mask(&self, region: Region, predicate: &GridPredicate<'_>) -> Mask {
        let mut bits = vec![false; region.area()];
        let stripes = self.stripes_for(region.area()).min(region.height.max(1));
        if stripes <= 1 || region.width == 0 {
            eval_rows(region, 0, &mut bits, predicate);
        } else {
            let rows_per_stripe = region.height.div_ceil(stripes);
            thread::scope(|s| {
                for (i, chunk) in bits.chunks_mut(rows_per_stripe * region.width).enumerate() {
                    s.spawn(move || eval_rows(region, i * rows_per_stripe, chunk, predicate));
                }
            });
        }
        Mask::from_bits(region, bits).unwrap_or_else(Mask::empty)
    }

    fn fill(&self, pixels: &mut [u8], color: Color) {
        let count = pixels.len() / BYTES_PER_PIXEL;
        let stripes = self.stripes_for(count);
        if stripes <= 1 {
            fill_rgb(pixels, color);
            return;
        }
        let chunk_px = count.div_ceil(stripes);
        thread::scope(|s| {
            for chunk in pixels.chunks_mut(chunk_px * BYTES_PER_PIXEL) {
                s.spawn(move || fill_rgb(chunk, color));
            }
        });
    }

    fn scale_into(&self, src: &[u8], dst: &mut Vec<u8>, factor: f32) {
        dst.resize(src.len(), 0);
        if factor == 1.0 {
            dst.copy_from_slice(src);
            return;
        }
        let stripes = self.stripes_for(src.len() / BYTES_PER_PIXEL);
        if stripes <= 1 {
            scale_slice(src, dst, factor);
            return;
        }
        let chunk = src.len().div_ceil(stripes).max(1);
        thread::scope(|s| {
            for (d, c) in dst.chunks_mut(chunk).zip(src.chunks(chunk)) {
                s.spawn(move || scale_slice(c, d, factor));
            }
        });
    }
}

/// Probes for a usable multi-core device.
///
/// The device counts as present when more than one hardware thread is
/// available (or a thread count is configured), and as usable when a worker
/// thread can actually be spawned and joined.
pub struct StripedProbe {
    threads: Option<usize>,
}

impl StripedProbe {
    pub fn new(threads: Option<usize>) -> Self {
        Self { threads }
    }
}

impl DeviceProbe for StripedProbe {
    fn probe(&self) -> Result<Arc<dyn NumericBackend>, BackendError> {
        let threads = match self.threads {
            Some(n) => n,
            None => thread::available_parallelism()
                .map_err(|e| BackendError::NoDevice(e.to_string()))?
                .get(),
        };
        if threads < 2 {
            return Err(BackendError::NoDevice(format!(
                "only {} hardware thread available",
                threads
            )));
        }

        let worker = thread::Builder::new()
            .name("backend-probe".to_string())
            .spawn(|| 1u8)
            .map_err(|e| BackendError::InitFailed(e.to_string()))?;
        worker
            .join()
            .map_err(|_| BackendError::InitFailed("probe worker panicked".to_string()))?;

        debug!("StripedProbe: {} worker threads usable", threads);
        Ok(Arc::new(StripedBackend::new(threads)))
    }
}
