// src/display/surface.rs
//! DisplaySurface trait - the minimal interface to whatever shows the frames.
//!
//! A surface is owned by the presenter thread once the screen is powered on,
//! so it only needs to be `Send`.
//!
//! ## Lifecycle
//! 1. `open(resolution)` - create the window (or equivalent)
//! 2. `poll_events` / `present` - once per presentation tick
//! 3. `close()` - when the screen powers off

use crate::framebuffer::Frame;
use crate::keys::KeyPress;
use crate::resolution::Resolution;
use anyhow::Result;
use std::path::Path;

/// Events reported by a surface between ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// The user asked to close the window. Powers the screen off.
    CloseRequested,

    /// A key was pressed. Forwarded to the screen's keyboard queue.
    Key(KeyPress),

    /// The window was resized. The frame buffer keeps its size.
    Resize { width: u32, height: u32 },
}

/// Output device for presented frames.
pub trait DisplaySurface: Send {
    /// Creates the output at the given size.
    fn open(&mut self, resolution: Resolution) -> Result<()>;

    /// Shows `frame`. Called once per tick, also when nothing changed.
    fn present(&mut self, frame: &Frame) -> Result<()>;

    /// Drains events that arrived since the last call.
    fn poll_events(&mut self) -> Vec<SurfaceEvent>;

    /// Writes `frame` to an image file at `path`.
    fn export_frame(&mut self, frame: &Frame, path: &Path) -> Result<()>;

    /// Tears the output down. No further calls follow.
    fn close(&mut self);
}
