// src/display/mod.rs
//! Presentation side of the screen.
//!
//! - DisplaySurface: the external window/output the frames end up on
//! - Presenter: background thread pacing presentation at the refresh rate
//! - drivers: concrete surfaces (headless)

pub mod drivers;
pub mod presenter;
pub mod surface;

pub use drivers::HeadlessSurface;
pub use presenter::Presenter;
pub use surface::{DisplaySurface, SurfaceEvent};
