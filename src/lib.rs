// src/lib.rs

//! A software-rendered virtual screen.
//!
//! Drawing calls rasterize into an in-memory RGB frame buffer; a presenter
//! thread publishes the buffer to a display surface at a fixed refresh
//! rate whenever it has changed.
//!
//! ```no_run
//! use virtual_screen::{Color, Config, HeadlessSurface, NamedColor, Screen};
//!
//! let screen = Screen::new(&Config::default());
//! screen
//!     .fill(Color::BLACK)
//!     .draw_line((0, 0), (1279, 719), Color::WHITE)
//!     .draw_circle((640, 360), 100, NamedColor::Red, -1)
//!     .accept_frame();
//! let presenter = screen.power_on(Box::new(HeadlessSurface::new())).unwrap();
//! screen.power_off();
//! presenter.join();
//! ```

pub mod backend;
pub mod color;
pub mod config;
pub mod dirty;
pub mod display;
pub mod error;
pub mod framebuffer;
pub mod input;
pub mod keys;
pub mod rasterizer;
pub mod resolution;
pub mod screen;
pub mod text;

pub use backend::{BackendKind, NumericBackend};
pub use color::{Color, NamedColor};
pub use config::{Config, CONFIG};
pub use display::{DisplaySurface, HeadlessSurface, Presenter, SurfaceEvent};
pub use error::{Result, ScreenError};
pub use framebuffer::Frame;
pub use input::InputQueue;
pub use keys::{KeyPress, KeySymbol, Modifiers};
pub use rasterizer::{Point, TextLayout};
pub use resolution::{AspectRatio, Resolution};
pub use screen::Screen;
pub use text::{FontId, TextShaper, TextStyle};
