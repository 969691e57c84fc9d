// src/display/drivers/headless.rs
//! Headless display surface.
//!
//! Keeps presented frames in memory instead of showing them. Clones share
//! state, so a test can keep one handle while the presenter owns another,
//! inject events through it and inspect what was presented.

use crate::display::surface::{DisplaySurface, SurfaceEvent};
use crate::framebuffer::Frame;
use crate::resolution::Resolution;
use anyhow::{bail, Context, Result};
use log::{info, trace};
use std::collections::VecDeque;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct HeadlessState {
    resolution: Option<Resolution>,
    open: bool,
    closed: bool,
    presented: u64,
    last_frame: Option<Frame>,
    pending_events: VecDeque<SurfaceEvent>,
    exported: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, HeadlessState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues an event for the next `poll_events`.
    pub fn push_event(&self, event: SurfaceEvent) {
        self.state().pending_events.push_back(event);
    }

    pub fn is_open(&self) -> bool {
        self.state().open
    }

    /// Whether `close` has been called.
    pub fn was_closed(&self) -> bool {
        self.state().closed
    }

    pub fn resolution(&self) -> Option<Resolution> {
        self.state().resolution
    }

    /// Number of `present` calls so far.
    pub fn presented(&self) -> u64 {
        self.state().presented
    }

    /// The most recently presented frame.
    pub fn last_frame(&self) -> Option<Frame> {
        self.state().last_frame.clone()
    }

    /// Paths passed to successful `export_frame` calls.
    pub fn exported(&self) -> Vec<PathBuf> {
        self.state().exported.clone()
    }
}

impl DisplaySurface for HeadlessSurface {
    fn open(&mut self, resolution: Resolution) -> Result<()> {
        info!("HeadlessSurface: open {}", resolution);
        let mut state = self.state();
        state.resolution = Some(resolution);
        state.open = true;
        state.closed = false;
        Ok(())
    }

    fn present(&mut self, frame: &Frame) -> Result<()> {
        let mut state = self.state();
        if !state.open {
            bail!("HeadlessSurface: present on a surface that is not open");
        }
        trace!("HeadlessSurface: present #{}", state.presented + 1);
        state.presented += 1;
        state.last_frame = Some(frame.clone());
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<SurfaceEvent> {
        self.state().pending_events.drain(..).collect()
    }

    /// Writes a binary PPM (`P6`) image.
    fn export_frame(&mut self, frame: &Frame, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        write!(
            file,
            "P6\n{} {}\n255\n",
            frame.resolution.width, frame.resolution.height
        )?;
        file.write_all(&frame.pixels)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("HeadlessSurface: exported frame to {}", path.display());
        self.state().exported.push(path.to_path_buf());
        Ok(())
    }

    fn close(&mut self) {
        info!("HeadlessSurface: close");
        let mut state = self.state();
        state.open = false;
        state.closed = true;
    }
}
