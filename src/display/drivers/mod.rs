// src/display/drivers/mod.rs
//! Concrete display surface implementations.

pub mod headless;

pub use headless::HeadlessSurface;
