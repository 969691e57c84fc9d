// src/screen.rs

//! The virtual screen: frame buffer, drawing API and power lifecycle.
//!
//! `Screen` is a cheap, cloneable handle; every clone talks to the same
//! frame buffer. Producers draw from any thread through the chainable
//! `draw_*` methods while a [`Presenter`] shows the result:
//!
//! ```text
//!  producer threads                       presenter thread
//!  ────────────────                       ────────────────
//!  draw_* ─► lock FrameBuffer ─► mark dirty
//!                                         tick: lock dirty flag
//!                                               try_lock FrameBuffer
//!                                               ├─ ok:   copy × brightness, clear flag
//!                                               └─ busy: keep previous copy, flag stays set
//!                                               present copy
//! ```
//!
//! Lock order is text cache → frame buffer → dirty flag. The presenter only
//! ever *tries* the frame-buffer lock, so it never waits on a draw.

use crate::backend::{self, NumericBackend};
use crate::color::Color;
use crate::config::Config;
use crate::dirty::DirtyTracker;
use crate::display::presenter::{Presenter, PresenterCommand, TickOutcome};
use crate::display::surface::DisplaySurface;
use crate::error::{Result, ScreenError};
use crate::framebuffer::{Frame, FrameBuffer};
use crate::input::InputQueue;
use crate::rasterizer::{self, Point, Stroke, TextLayout};
use crate::resolution::Resolution;
use crate::text::{HeadlessShaper, TextCache, TextShaper, TextStyle};
use log::{debug, info, trace};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, TryLockError};
use std::time::Duration;

/// How long `export_frame` waits for the presenter to answer.
const EXPORT_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings read by the presenter on every tick.
#[derive(Debug, Clone, Copy)]
struct DisplaySettings {
    refresh_rate: u32,
    brightness: f32,
}

#[derive(Debug, Default)]
struct PowerState {
    on: bool,
    /// Incremented on every power-on; a presenter only runs for its own.
    session: u64,
    commands: Option<Sender<PresenterCommand>>,
}

struct Inner {
    resolution: Resolution,
    backend: Arc<dyn NumericBackend>,
    shaper: Arc<dyn TextShaper>,
    framebuffer: Mutex<FrameBuffer>,
    text_cache: Mutex<TextCache>,
    dirty: DirtyTracker,
    settings: Mutex<DisplaySettings>,
    power: Mutex<PowerState>,
    power_changed: Condvar,
    keyboard: InputQueue,
    line_spacing: i64,
    frames_accepted: AtomicU64,
    frames_presented: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to a virtual pixel-addressable screen.
#[derive(Clone)]
pub struct Screen {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screen")
            .field("resolution", &self.inner.resolution)
            .field("backend", &self.inner.backend.name())
            .field("is_on", &self.is_on())
            .finish()
    }
}

impl Screen {
    /// Creates a powered-off screen using the process-wide backend and the
    /// headless text shaper.
    pub fn new(config: &Config) -> Self {
        Self::with_parts(
            config,
            backend::global(&config.backend),
            Arc::new(HeadlessShaper::new()),
        )
    }

    /// Creates a powered-off screen with an explicit backend and shaper.
    pub fn with_parts(
        config: &Config,
        backend: Arc<dyn NumericBackend>,
        shaper: Arc<dyn TextShaper>,
    ) -> Self {
        let resolution = config.display.resolution();
        info!(
            "Screen: {} ({}) on {}",
            resolution,
            resolution.ratio(),
            backend.name()
        );
        Self {
            inner: Arc::new(Inner {
                resolution,
                backend,
                shaper,
                framebuffer: Mutex::new(FrameBuffer::new(resolution)),
                text_cache: Mutex::new(TextCache::new(config.text.cache_capacity)),
                dirty: DirtyTracker::new(),
                settings: Mutex::new(DisplaySettings {
                    refresh_rate: config.display.refresh_rate.max(1),
                    brightness: config.display.brightness.clamp(0.0, 1.0),
                }),
                power: Mutex::new(PowerState::default()),
                power_changed: Condvar::new(),
                keyboard: InputQueue::new(config.input.capacity),
                line_spacing: config.text.line_spacing as i64,
                frames_accepted: AtomicU64::new(0),
                frames_presented: AtomicU64::new(0),
            }),
        }
    }

    // --- Accessors ---

    pub fn resolution(&self) -> Resolution {
        self.inner.resolution
    }

    pub fn backend(&self) -> &Arc<dyn NumericBackend> {
        &self.inner.backend
    }

    /// The keyboard queue fed by the display surface.
    pub fn keyboard(&self) -> &InputQueue {
        &self.inner.keyboard
    }

    pub fn refresh_rate(&self) -> u32 {
        lock(&self.inner.settings).refresh_rate
    }

    pub fn brightness(&self) -> f32 {
        lock(&self.inner.settings).brightness
    }

    /// Time between presentation ticks at the current refresh rate.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.refresh_rate() as f64)
    }

    /// Whether there are changes not yet presented.
    pub fn is_dirty(&self) -> bool {
        self.inner.dirty.is_dirty()
    }

    /// Number of `accept_frame` calls so far.
    pub fn frames_accepted(&self) -> u64 {
        self.inner.frames_accepted.load(Ordering::Relaxed)
    }

    /// Number of frames handed to a display surface so far.
    pub fn frames_presented(&self) -> u64 {
        self.inner.frames_presented.load(Ordering::Relaxed)
    }

    /// Reads one pixel of the frame buffer.
    pub fn get_pixel(&self, x: i64, y: i64) -> Option<Color> {
        lock(&self.inner.framebuffer).get_pixel(x, y)
    }

    /// Copies the frame buffer as it is now, without brightness applied.
    pub fn snapshot(&self) -> Frame {
        let fb = lock(&self.inner.framebuffer);
        Frame {
            resolution: fb.resolution(),
            pixels: fb.as_bytes().to_vec(),
        }
    }

    /// Number of glyph runs currently cached.
    pub fn cached_text_runs(&self) -> usize {
        lock(&self.inner.text_cache).len()
    }

    // --- Settings ---

    /// Changes the presentation rate, effective from the next tick.
    pub fn set_refresh_rate(&self, hz: u32) -> &Self {
        let hz = hz.max(1);
        debug!("Screen: refresh rate -> {} Hz", hz);
        lock(&self.inner.settings).refresh_rate = hz;
        self
    }

    /// Changes the brightness (clamped to `0.0..=1.0`), effective from the
    /// next tick.
    pub fn set_brightness(&self, brightness: f32) -> &Self {
        let brightness = brightness.clamp(0.0, 1.0);
        debug!("Screen: brightness -> {}", brightness);
        lock(&self.inner.settings).brightness = brightness;
        self.inner.dirty.mark();
        self
    }

    // --- Drawing ---

    /// Runs `draw` against the locked frame buffer and marks the screen
    /// dirty.
    fn mutate(&self, draw: impl FnOnce(&mut FrameBuffer)) -> &Self {
        let mut fb = lock(&self.inner.framebuffer);
        draw(&mut fb);
        self.inner.dirty.mark();
        self
    }

    /// Sets one pixel. Out-of-range coordinates are ignored.
    pub fn set_pixel(&self, x: i64, y: i64, color: impl Into<Color>) -> &Self {
        let color = color.into();
        self.mutate(|fb| {
            if !fb.set_pixel(x, y, color) {
                trace!("Screen: set_pixel({}, {}) out of range", x, y);
            }
        })
    }

    /// Overwrites the whole frame buffer.
    pub fn fill(&self, color: impl Into<Color>) -> &Self {
        let color = color.into();
        let backend = &self.inner.backend;
        self.mutate(|fb| backend.fill(fb.as_bytes_mut(), color))
    }

    /// Fills the screen with black.
    pub fn clear(&self) -> &Self {
        self.fill(Color::BLACK)
    }

    /// Overwrites an axis-aligned box, clamped to the screen.
    pub fn fill_region(&self, x: i64, y: i64, width: i64, height: i64, color: impl Into<Color>) -> &Self {
        let color = color.into();
        self.mutate(|fb| fb.fill_region(x, y, width, height, color))
    }

    pub fn draw_line(&self, p0: Point, p1: Point, color: impl Into<Color>) -> &Self {
        let color = color.into();
        self.mutate(|fb| {
            rasterizer::draw_line(fb, p0, p1, color);
        })
    }

    /// Draws a rectangle with its top-left corner at `origin`. A negative
    /// `thickness` fills it.
    pub fn draw_rectangle(
        &self,
        origin: Point,
        width: i64,
        height: i64,
        color: impl Into<Color>,
        thickness: i64,
    ) -> &Self {
        let color = color.into();
        self.mutate(|fb| {
            rasterizer::draw_rectangle(fb, origin, width, height, color, Stroke::from_thickness(thickness));
        })
    }

    /// Draws the arc of the circle around `center` from `start_deg` to
    /// `end_deg`.
    pub fn draw_arc(
        &self,
        center: Point,
        radius: i64,
        start_deg: f64,
        end_deg: f64,
        color: impl Into<Color>,
    ) -> &Self {
        let color = color.into();
        self.mutate(|fb| {
            rasterizer::draw_arc(fb, center, radius, start_deg, end_deg, color);
        })
    }

    /// Draws a circle. A negative `thickness` fills it.
    pub fn draw_circle(&self, center: Point, radius: i64, color: impl Into<Color>, thickness: i64) -> &Self {
        self.draw_ellipse(center, radius, radius, color, thickness)
    }

    /// Draws an axis-aligned ellipse. A negative `thickness` fills it.
    pub fn draw_ellipse(
        &self,
        center: Point,
        rx: i64,
        ry: i64,
        color: impl Into<Color>,
        thickness: i64,
    ) -> &Self {
        let color = color.into();
        let backend = self.inner.backend.as_ref();
        self.mutate(|fb| {
            rasterizer::draw_ellipse(fb, backend, center, rx, ry, color, Stroke::from_thickness(thickness));
        })
    }

    pub fn draw_quadratic_bezier(&self, p0: Point, p1: Point, p2: Point, color: impl Into<Color>) -> &Self {
        let color = color.into();
        self.mutate(|fb| {
            rasterizer::draw_quadratic_bezier(fb, p0, p1, p2, color);
        })
    }

    pub fn draw_cubic_bezier(
        &self,
        p0: Point,
        p1: Point,
        p2: Point,
        p3: Point,
        color: impl Into<Color>,
    ) -> &Self {
        let color = color.into();
        self.mutate(|fb| {
            rasterizer::draw_cubic_bezier(fb, p0, p1, p2, p3, color);
        })
    }

    /// Draws possibly multi-line `text` with its top-left corner at
    /// `origin`, using the configured line spacing.
    pub fn draw_text(&self, text: &str, origin: Point, style: &TextStyle) -> Result<&Self> {
        self.draw_text_with_cursor(text, origin, style, self.inner.line_spacing)?;
        Ok(self)
    }

    /// Like [`Screen::draw_text`] with an explicit line spacing, returning
    /// where the text ended so the next write can continue from there.
    pub fn draw_text_with_cursor(
        &self,
        text: &str,
        origin: Point,
        style: &TextStyle,
        line_spacing: i64,
    ) -> Result<TextLayout> {
        let mut cache = lock(&self.inner.text_cache);
        let mut fb = lock(&self.inner.framebuffer);
        let result = rasterizer::draw_text(
            &mut fb,
            &mut cache,
            self.inner.shaper.as_ref(),
            text,
            origin,
            style,
            line_spacing,
        );
        // Lines before a failing one are already in the buffer.
        self.inner.dirty.mark();
        result.map_err(|source| ScreenError::RenderFailure {
            text: text.to_owned(),
            source,
        })
    }

    /// Commits the current drawing batch for presentation.
    pub fn accept_frame(&self) -> &Self {
        self.inner.frames_accepted.fetch_add(1, Ordering::Relaxed);
        self.inner.dirty.mark();
        self
    }

    // --- Presentation ---

    /// Refreshes `frame` from the frame buffer if the screen is dirty.
    ///
    /// Returns `true` when `frame` now holds a fresh, brightness-scaled copy
    /// and the dirty flag was cleared. Returns `false`, leaving `frame`
    /// untouched, when nothing changed or a draw call holds the buffer (the
    /// flag then stays set for the next attempt).
    pub fn refresh_frame(&self, frame: &mut Frame) -> bool {
        let mut dirty = self.inner.dirty.lock();
        if !*dirty {
            return false;
        }
        let fb = match self.inner.framebuffer.try_lock() {
            Ok(fb) => fb,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => {
                trace!("Screen: frame buffer busy, re-presenting previous frame");
                return false;
            }
        };
        let brightness = self.brightness();
        self.inner
            .backend
            .scale_into(fb.as_bytes(), &mut frame.pixels, brightness);
        frame.resolution = fb.resolution();
        *dirty = false;
        true
    }

    /// One presentation tick for power-on `session`: refresh the frame if
    /// dirty and hand it to `surface`.
    ///
    /// The power state stays locked for the whole tick, so once
    /// [`Screen::power_off`] returns no further frame reaches the surface.
    pub(crate) fn present_tick(
        &self,
        session: u64,
        surface: &mut dyn DisplaySurface,
        frame: &mut Frame,
    ) -> Result<TickOutcome> {
        let power = lock(&self.inner.power);
        if !power.on || power.session != session {
            return Ok(TickOutcome::PoweredOff);
        }
        let fresh = self.refresh_frame(frame);
        surface.present(frame).map_err(ScreenError::SurfaceFailure)?;
        self.inner.frames_presented.fetch_add(1, Ordering::Relaxed);
        Ok(TickOutcome::Presented { fresh })
    }

    // --- Power ---

    pub fn is_on(&self) -> bool {
        lock(&self.inner.power).on
    }

    /// Opens `surface` and starts presenting on a background thread.
    ///
    /// The returned [`Presenter`] runs until the screen is powered off;
    /// dropping it powers the screen off.
    pub fn power_on(&self, mut surface: Box<dyn DisplaySurface>) -> Result<Presenter> {
        let mut power = lock(&self.inner.power);
        if power.on {
            return Err(ScreenError::AlreadyOn);
        }
        surface
            .open(self.inner.resolution)
            .map_err(ScreenError::SurfaceFailure)?;

        let (tx, rx) = mpsc::channel();
        let session = power.session + 1;
        let presenter = Presenter::spawn(self.clone(), session, surface, rx)
            .map_err(|e| ScreenError::PresenterUnavailable(format!("{:#}", e)))?;

        power.on = true;
        power.session = session;
        power.commands = Some(tx);
        // Present whatever is already in the buffer on the first tick.
        self.inner.dirty.mark();
        self.inner.power_changed.notify_all();
        info!("Screen: powered on (session {})", session);
        Ok(presenter)
    }

    /// Powers on and blocks until the screen is powered off again.
    pub fn run(&self, surface: Box<dyn DisplaySurface>) -> Result<()> {
        self.power_on(surface)?.join();
        Ok(())
    }

    /// Stops presentation. Callable from any thread; idempotent.
    ///
    /// In-flight draw calls complete. The frame buffer, text cache and
    /// backend are kept, so the screen can be powered on again.
    pub fn power_off(&self) -> &Self {
        let mut power = lock(&self.inner.power);
        if power.on {
            power.on = false;
            power.commands = None;
            self.inner.power_changed.notify_all();
            info!("Screen: powered off (session {})", power.session);
        }
        self
    }

    /// Powers off only if `session` is the current one.
    pub(crate) fn end_session(&self, session: u64) {
        let mut power = lock(&self.inner.power);
        if power.on && power.session == session {
            power.on = false;
            power.commands = None;
            self.inner.power_changed.notify_all();
            info!("Screen: powered off (session {})", session);
        }
    }

    /// Blocks until the screen is on or `timeout` elapses. Returns whether
    /// the screen is on.
    pub fn wait_until_on(&self, timeout: Duration) -> bool {
        let power = lock(&self.inner.power);
        let (power, _) = self
            .inner
            .power_changed
            .wait_timeout_while(power, timeout, |p| !p.on)
            .unwrap_or_else(PoisonError::into_inner);
        power.on
    }

    /// Asks the display surface to write the last presented frame to
    /// `path`.
    pub fn export_frame(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref().to_path_buf();
        let commands = lock(&self.inner.power)
            .commands
            .clone()
            .ok_or(ScreenError::PoweredOff)?;

        let (reply_tx, reply_rx) = mpsc::channel();
        commands
            .send(PresenterCommand::Export {
                path: path.clone(),
                reply: reply_tx,
            })
            .map_err(|_| ScreenError::PresenterUnavailable("presenter has exited".into()))?;

        match reply_rx.recv_timeout(EXPORT_TIMEOUT) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(ScreenError::ExportFailed { path, source }),
            Err(_) => Err(ScreenError::PresenterUnavailable(
                "presenter did not answer the export request".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests;
