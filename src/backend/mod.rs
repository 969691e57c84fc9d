// src/backend/mod.rs

//! Numeric backends: the array-operation strategy every vectorized
//! rasterization step is written against.
//!
//! A backend is chosen once per process by [`global`] (probe the accelerated
//! device, fall back to the CPU on any failure) and then injected into each
//! `Screen` as an `Arc<dyn NumericBackend>`. Nothing else in the crate looks
//! at which implementation is active.
//!
//! ```text
//!   select(config)
//!        │
//!        ├── preference = cpu ──────────────► CpuBackend
//!        │
//!        └── probe accelerated device
//!               ├── Ok  ──────────────────────► StripedBackend
//!               └── Err ── warn!, fall back ──► CpuBackend
//! ```

pub mod cpu;
pub mod striped;

pub use cpu::CpuBackend;
pub use striped::StripedBackend;

use crate::color::Color;
use crate::config::{BackendConfig, BackendPreference};
use crate::framebuffer::{Mask, Region};
use log::{debug, info, warn};
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

/// Predicate evaluated at integer pixel coordinates `(x, y)`.
pub type GridPredicate<'a> = dyn Fn(f64, f64) -> bool + Sync + 'a;

/// Which family of implementation a backend belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Scalar loops on the calling thread.
    Cpu,
    /// Data-parallel execution on an accelerated device.
    Accelerated,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Cpu => write!(f, "cpu"),
            BackendKind::Accelerated => write!(f, "accelerated"),
        }
    }
}

/// The array-operation capability set shared by all backends.
///
/// Implementations must produce identical results; they differ only in
/// where and how the work runs.
pub trait NumericBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Human-readable name, used in logs.
    fn name(&self) -> &str;

    /// Evaluates `predicate` at every integer coordinate of `region` and
    /// returns the resulting membership mask.
    fn grid_mask(&self, region: Region, predicate: &GridPredicate<'_>) -> Mask;

    /// Overwrites every RGB pixel of `pixels` with `color`.
    fn fill(&self, pixels: &mut [u8], color: Color);

    /// Copies `src` into `dst` with every channel multiplied by `factor`
    /// and clamped to `0..=255`. `dst` is resized to match `src`.
    fn scale_into(&self, src: &[u8], dst: &mut Vec<u8>, factor: f32);
}

/// Why an accelerated device could not be brought up.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("no accelerated device available: {0}")]
    NoDevice(String),
    #[error("accelerated device failed to initialize: {0}")]
    InitFailed(String),
}

/// Discovers and initializes an accelerated backend.
pub trait DeviceProbe {
    fn probe(&self) -> Result<Arc<dyn NumericBackend>, BackendError>;
}

/// Picks a backend for `config`, falling back to the CPU on any probe
/// failure. Never fails.
pub fn select(config: &BackendConfig) -> Arc<dyn NumericBackend> {
    match config.preference {
        BackendPreference::Cpu => {
            info!("Backend: CPU requested by configuration");
            Arc::new(CpuBackend::new())
        }
        BackendPreference::Auto => select_with(&striped::StripedProbe::new(config.threads)),
    }
}

/// Picks the backend produced by `probe`, or the CPU backend if it fails.
pub fn select_with(probe: &dyn DeviceProbe) -> Arc<dyn NumericBackend> {
    match probe.probe() {
        Ok(backend) => {
            info!("Backend: using {} ({})", backend.name(), backend.kind());
            backend
        }
        Err(e) => {
            warn!("Backend: {}. Falling back to CPU.", e);
            Arc::new(CpuBackend::new())
        }
    }
}

static GLOBAL_BACKEND: OnceCell<Arc<dyn NumericBackend>> = OnceCell::new();

/// Returns the process-wide backend, selecting it on first use.
///
/// Only the first caller's `config` is consulted; the selection is fixed for
/// the rest of the process lifetime.
pub fn global(config: &BackendConfig) -> Arc<dyn NumericBackend> {
    GLOBAL_BACKEND
        .get_or_init(|| {
            debug!("Backend: selecting process-wide backend");
            select(config)
        })
        .clone()
}

/// Scalar brightness scaling shared by both backends.
pub(crate) fn scale_slice(src: &[u8], dst: &mut [u8], factor: f32) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d = crate::color::scale_channel(*s, factor);
    }
}

/// Scalar mask evaluation over a block of rows of `region`.
pub(crate) fn eval_rows(
    region: Region,
    first_row: usize,
    out: &mut [bool],
    predicate: &GridPredicate<'_>,
) {
    if region.width == 0 {
        return;
    }
    for (i, row) in out.chunks_mut(region.width).enumerate() {
        let y = (region.y + first_row + i) as f64;
        for (col, bit) in row.iter_mut().enumerate() {
            *bit = predicate((region.x + col) as f64, y);
        }
    }
}
