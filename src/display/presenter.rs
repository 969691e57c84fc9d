// src/display/presenter.rs
//! Presenter - background thread that shows the frame buffer at a fixed rate.
//!
//! The presenter decouples drawing from presentation: producers mutate the
//! frame buffer at any rate, while this thread wakes once per refresh
//! interval and, per tick:
//!
//! 1. services queued commands (frame export)
//! 2. drains surface events (close powers off, keys go to the keyboard)
//! 3. presents, refreshing its copy first if the screen is dirty
//!
//! TODO: pace with the surface's vblank instead of `thread::sleep` once a
//! windowed surface exists.

use crate::display::surface::{DisplaySurface, SurfaceEvent};
use crate::framebuffer::Frame;
use crate::screen::Screen;
use anyhow::{Context, Result};
use log::*;
use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Requests serviced by the presenter thread between ticks.
#[derive(Debug)]
pub enum PresenterCommand {
    /// Export the most recently presented frame.
    Export {
        path: PathBuf,
        reply: Sender<Result<()>>,
    },
}

/// What a single presentation tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A frame was handed to the surface. `fresh` is false when the
    /// previous copy was re-presented.
    Presented { fresh: bool },
    /// The session this presenter belongs to has ended.
    PoweredOff,
}

/// Per-second frame counters for the FPS log line.
struct FrameStats {
    window_start: Instant,
    presented: u32,
    fresh: u32,
}

impl FrameStats {
    fn new() -> Self {
        Self {
            window_start: Instant::now(),
            presented: 0,
            fresh: 0,
        }
    }

    fn record(&mut self, fresh: bool) {
        self.presented += 1;
        if fresh {
            self.fresh += 1;
        }
        let elapsed = self.window_start.elapsed();
        if elapsed >= Duration::from_secs(1) {
            info!(
                "Presenter: FPS: {:.1} ({} new frames)",
                self.presented as f64 / elapsed.as_secs_f64(),
                self.fresh
            );
            *self = Self::new();
        }
    }
}

/// Handle to a running presenter thread.
///
/// The thread runs until the screen is powered off. Dropping the handle
/// powers off the session it belongs to and joins the thread.
#[must_use = "dropping the Presenter powers the screen off"]
pub struct Presenter {
    screen: Screen,
    session: u64,
    thread_handle: Option<JoinHandle<()>>,
}

impl Presenter {
    /// Spawns the presenter for power-on `session` of `screen`.
    ///
    /// `surface` must already be open.
    pub(crate) fn spawn(
        screen: Screen,
        session: u64,
        mut surface: Box<dyn DisplaySurface>,
        commands: Receiver<PresenterCommand>,
    ) -> Result<Self> {
        let thread_screen = screen.clone();
        let thread_handle = thread::Builder::new()
            .name("presenter".to_string())
            .spawn(move || {
                info!(
                    "Presenter: Started (session {}, target: {} FPS)",
                    session,
                    thread_screen.refresh_rate()
                );
                run(&thread_screen, session, surface.as_mut(), &commands);
                surface.close();
                debug!("Presenter: Thread exiting");
            })
            .context("Failed to spawn presenter thread")?;

        Ok(Self {
            screen,
            session,
            thread_handle: Some(thread_handle),
        })
    }

    /// Whether the presenter thread has exited.
    pub fn is_finished(&self) -> bool {
        self.thread_handle
            .as_ref()
            .map_or(true, JoinHandle::is_finished)
    }

    /// Blocks until the screen is powered off and the thread has exited.
    pub fn join(mut self) {
        self.join_thread();
    }

    fn join_thread(&mut self) {
        if let Some(handle) = self.thread_handle.take() {
            if let Err(e) = handle.join() {
                error!("Presenter thread panicked: {:?}", e);
            }
        }
    }
}

impl fmt::Debug for Presenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Presenter")
            .field("session", &self.session)
            .field("running", &self.thread_handle.is_some())
            .finish()
    }
}

impl Drop for Presenter {
    fn drop(&mut self) {
        if self.thread_handle.is_some() {
            debug!("Presenter dropped, ending session {}", self.session);
            self.screen.end_session(self.session);
            self.join_thread();
        }
    }
}

fn run(
    screen: &Screen,
    session: u64,
    surface: &mut dyn DisplaySurface,
    commands: &Receiver<PresenterCommand>,
) {
    let mut frame = Frame::blank(screen.resolution());
    let mut stats = FrameStats::new();

    loop {
        let tick_start = Instant::now();

        for command in commands.try_iter() {
            match command {
                PresenterCommand::Export { path, reply } => {
                    let result = surface.export_frame(&frame, &path);
                    if reply.send(result).is_err() {
                        warn!("Presenter: export requester went away");
                    }
                }
            }
        }

        for event in surface.poll_events() {
            match event {
                SurfaceEvent::CloseRequested => {
                    info!("Presenter: close requested, powering off");
                    screen.end_session(session);
                }
                SurfaceEvent::Key(key) => {
                    if !screen.keyboard().write(key) {
                        debug!("Presenter: keyboard queue full, dropped {:?}", key.symbol);
                    }
                }
                SurfaceEvent::Resize { width, height } => {
                    debug!(
                        "Presenter: surface resized to {}x{}, frame stays {}",
                        width,
                        height,
                        frame.resolution
                    );
                }
            }
        }

        match screen.present_tick(session, surface, &mut frame) {
            Ok(TickOutcome::Presented { fresh }) => stats.record(fresh),
            Ok(TickOutcome::PoweredOff) => break,
            Err(e) => error!("Presenter: {}", e),
        }

        thread::sleep(screen.frame_interval().saturating_sub(tick_start.elapsed()));
    }
}
