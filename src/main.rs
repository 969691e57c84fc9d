// src/main.rs

//! Headless demo session: draws a test card, presents it for a while and
//! optionally exports the presented frame.
//!
//! Usage: `virtual-screen [SECONDS] [EXPORT_PATH]`

use anyhow::Context;
use log::{info, warn};
use std::time::Duration;
use virtual_screen::{Color, HeadlessSurface, NamedColor, Screen, TextStyle, CONFIG};

const DEFAULT_RUN_SECONDS: u64 = 3;

fn draw_test_card(screen: &Screen) -> anyhow::Result<()> {
    let res = screen.resolution();
    let (w, h) = (res.width as i64, res.height as i64);
    let (cx, cy) = (w / 2, h / 2);

    screen
        .clear()
        .draw_rectangle((0, 0), w, h, NamedColor::BrightBlack, 1)
        .draw_line((0, 0), (w - 1, h - 1), NamedColor::Red)
        .draw_line((0, h - 1), (w - 1, 0), NamedColor::Red)
        .draw_circle((cx, cy), h / 4, NamedColor::Green, 3)
        .draw_ellipse((cx, cy), w / 3, h / 3, NamedColor::Blue, 1)
        .draw_arc((cx, cy), h / 5, 180.0, 360.0, NamedColor::Yellow)
        .draw_quadratic_bezier((0, h - 1), (cx, 0), (w - 1, h - 1), NamedColor::Cyan)
        .draw_cubic_bezier((0, cy), (cx / 2, 0), (cx + cx / 2, h - 1), (w - 1, cy), NamedColor::Magenta);

    let style = TextStyle::new(Color::WHITE);
    screen
        .draw_text(
            &format!("virtual-screen\n{} ({})", res, res.ratio()),
            (16, 16),
            &style,
        )
        .context("Failed to draw the test card caption")?
        .accept_frame();
    Ok(())
}

/// Main entry point for the `virtual-screen` demo.
fn main() -> anyhow::Result<()> {
    // Initialize the logger. Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    info!("Starting virtual-screen...");

    let mut args = std::env::args().skip(1);
    let seconds = match args.next() {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("Invalid run time '{}'", raw))?,
        None => DEFAULT_RUN_SECONDS,
    };
    let export_path = args.next();

    let screen = Screen::new(&CONFIG);
    draw_test_card(&screen)?;

    let surface = HeadlessSurface::new();
    let presenter = screen
        .power_on(Box::new(surface.clone()))
        .context("Failed to power on the screen")?;

    std::thread::sleep(Duration::from_secs(seconds));

    if let Some(path) = export_path {
        match screen.export_frame(&path) {
            Ok(()) => info!("Exported frame to {}", path),
            Err(e) => warn!("Export failed: {}", e),
        }
    }

    screen.power_off();
    presenter.join();
    info!(
        "Shutdown: {} frames accepted, {} presented",
        screen.frames_accepted(),
        surface.presented()
    );
    Ok(())
}
