// src/screen/tests.rs

use super::*;
use crate::backend::CpuBackend;
use crate::color::NamedColor;
use crate::display::{HeadlessSurface, SurfaceEvent};
use crate::keys::{KeyPress, KeySymbol};
use crate::text::FontId;
use std::thread;
use std::time::Instant;
use test_log::test;

fn config(width: u32, height: u32) -> Config {
    let mut config = Config::default();
    config.display.width = width;
    config.display.height = height;
    config.display.refresh_rate = 200;
    config
}

fn screen(width: u32, height: u32) -> Screen {
    Screen::with_parts(
        &config(width, height),
        Arc::new(CpuBackend::new()),
        Arc::new(HeadlessShaper::new()),
    )
}

/// Polls `cond` until it holds or two seconds pass.
fn eventually(cond: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    cond()
}

// --- Drawing & dirty flag ---

#[test]
fn test_new_screen_is_black_clean_and_off() {
    let s = screen(8, 4);
    assert!(!s.is_dirty());
    assert!(!s.is_on());
    assert_eq!(s.get_pixel(7, 3), Some(Color::BLACK));
    assert_eq!(s.resolution().ratio(), "2:1");
}

#[test]
fn test_every_draw_marks_dirty_until_consumed() {
    // Contract: the flag is set after any draw and cleared only by a refresh.
    let s = screen(20, 20);
    let mut frame = Frame::blank(s.resolution());
    let draws: Vec<Box<dyn Fn(&Screen)>> = vec![
        Box::new(|s: &Screen| {
            s.set_pixel(1, 1, Color::WHITE);
        }),
        Box::new(|s: &Screen| {
            s.fill(NamedColor::Blue);
        }),
        Box::new(|s: &Screen| {
            s.draw_line((0, 0), (5, 5), Color::WHITE);
        }),
        Box::new(|s: &Screen| {
            s.draw_rectangle((2, 2), 4, 4, Color::WHITE, 1);
        }),
        Box::new(|s: &Screen| {
            s.draw_arc((10, 10), 4, 0.0, 90.0, Color::WHITE);
        }),
        Box::new(|s: &Screen| {
            s.draw_circle((10, 10), 4, Color::WHITE, -1);
        }),
        Box::new(|s: &Screen| {
            s.draw_quadratic_bezier((0, 0), (10, 0), (10, 10), Color::WHITE);
        }),
        Box::new(|s: &Screen| {
            s.draw_cubic_bezier((0, 0), (5, 19), (15, 0), (19, 19), Color::WHITE);
        }),
        Box::new(|s: &Screen| {
            s.clear();
        }),
        // Off-screen draws still count as draws.
        Box::new(|s: &Screen| {
            s.draw_line((-5, -5), (-1, -9), Color::WHITE);
        }),
    ];
    for draw in draws {
        draw(&s);
        assert!(s.is_dirty());
        assert!(s.refresh_frame(&mut frame));
        assert!(!s.is_dirty());
        assert!(!s.refresh_frame(&mut frame));
    }
}

#[test]
fn test_draw_calls_chain() {
    let s = screen(10, 10);
    s.fill(Color::new(1, 2, 3))
        .set_pixel(0, 0, Color::WHITE)
        .draw_line((0, 9), (9, 9), (200u8, 0u8, 0u8))
        .accept_frame();
    assert_eq!(s.get_pixel(0, 0), Some(Color::WHITE));
    assert_eq!(s.get_pixel(5, 9), Some(Color::new(200, 0, 0)));
    assert_eq!(s.get_pixel(5, 5), Some(Color::new(1, 2, 3)));
    assert_eq!(s.frames_accepted(), 1);
}

#[test]
fn test_refresh_applies_brightness_without_touching_buffer() {
    let s = screen(2, 1);
    s.fill(Color::new(200, 100, 50)).set_brightness(0.5);
    let mut frame = Frame::blank(s.resolution());
    assert!(s.refresh_frame(&mut frame));
    assert_eq!(frame.pixel(0, 0), Some(Color::new(100, 50, 25)));
    assert_eq!(s.get_pixel(0, 0), Some(Color::new(200, 100, 50)));

    // A brightness change alone is enough to re-present.
    s.set_brightness(1.0);
    assert!(s.refresh_frame(&mut frame));
    assert_eq!(frame.pixel(1, 0), Some(Color::new(200, 100, 50)));
}

#[test]
fn test_refresh_skips_while_a_draw_holds_the_buffer() {
    // Contract: presentation never blocks on a draw; the previous copy is
    // kept and the flag stays set.
    let s = screen(4, 4);
    s.fill(Color::WHITE);
    let mut frame = Frame::blank(s.resolution());
    {
        let _held = s.inner.framebuffer.lock().unwrap();
        assert!(!s.refresh_frame(&mut frame));
        assert!(s.is_dirty());
        assert_eq!(frame.pixel(0, 0), Some(Color::BLACK));
    }
    assert!(s.refresh_frame(&mut frame));
    assert_eq!(frame.pixel(0, 0), Some(Color::WHITE));
}

#[test]
fn test_settings_are_clamped() {
    let s = screen(4, 4);
    s.set_refresh_rate(0).set_brightness(7.0);
    assert_eq!(s.refresh_rate(), 1);
    assert_eq!(s.brightness(), 1.0);
    s.set_refresh_rate(50);
    assert_eq!(s.frame_interval(), Duration::from_millis(20));
}

#[test]
fn test_concurrent_producers_serialize_on_the_buffer() {
    let s = screen(64, 64);
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let s = s.clone();
            thread::spawn(move || {
                for y in 0..16 {
                    s.draw_line((0, i * 16 + y), (63, i * 16 + y), Color::new(i as u8 + 1, 0, 0));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    for i in 0..4 {
        assert_eq!(s.get_pixel(31, i * 16 + 7), Some(Color::new(i as u8 + 1, 0, 0)));
    }
}

// --- Text ---

#[test]
fn test_identical_text_draws_reuse_the_cache() {
    let shaper = Arc::new(HeadlessShaper::new());
    let s = Screen::with_parts(&config(100, 40), Arc::new(CpuBackend::new()), shaper.clone());
    let style = TextStyle::new(Color::WHITE).with_font(FontId::new("mono", 10));
    s.draw_text("hi\nthere", (0, 0), &style).unwrap();
    s.draw_text("hi\nthere", (30, 5), &style).unwrap();
    assert_eq!(shaper.render_calls(), 2);
    assert_eq!(s.cached_text_runs(), 2);

    s.draw_text("hi", (0, 0), &style.clone().with_background(Color::BLACK))
        .unwrap();
    assert_eq!(shaper.render_calls(), 3);
}

#[test]
fn test_text_cursor_chains_layout() {
    let s = screen(100, 60);
    let style = TextStyle::new(Color::WHITE).with_font(FontId::new("mono", 10));
    let first = s.draw_text_with_cursor("abc", (2, 3), &style, 0).unwrap();
    assert_eq!(first.next, (17, 13));
    let second = s.draw_text_with_cursor("de", (0, first.next.1), &style, 0).unwrap();
    assert_eq!(second.next, (10, 23));
    assert!(s.is_dirty());
}

#[test]
fn test_shaper_failure_is_a_render_failure() {
    let s = screen(10, 10);
    let style = TextStyle::new(Color::WHITE).with_font(FontId::new("broken", 0));
    let err = s.draw_text("oops", (0, 0), &style).unwrap_err();
    assert!(matches!(err, ScreenError::RenderFailure { ref text, .. } if text == "oops"));
    assert_eq!(s.get_pixel(1, 1), Some(Color::BLACK));
}

/// Delegates to the headless shaper but refuses one particular line.
struct RefusingShaper {
    inner: HeadlessShaper,
    refuse: &'static str,
}

impl TextShaper for RefusingShaper {
    fn render(&self, text: &str, style: &TextStyle) -> anyhow::Result<crate::text::RenderedText> {
        if text == self.refuse {
            anyhow::bail!("RefusingShaper: {:?}", text);
        }
        self.inner.render(text, style)
    }

    fn line_height(&self, font: &FontId) -> u32 {
        self.inner.line_height(font)
    }
}

#[test]
fn test_partial_text_failure_still_marks_dirty() {
    // Contract: a draw that changed pixels sets the dirty flag even when it errors.
    let shaper = RefusingShaper {
        inner: HeadlessShaper::new(),
        refuse: "bad",
    };
    let s = Screen::with_parts(&config(40, 40), Arc::new(CpuBackend::new()), Arc::new(shaper));
    assert!(!s.is_dirty());
    let style = TextStyle::new(Color::WHITE).with_font(FontId::new("mono", 10));
    let err = s.draw_text("ok\nbad", (0, 0), &style).unwrap_err();
    assert!(matches!(err, ScreenError::RenderFailure { ref text, .. } if text == "ok\nbad"));
    assert_eq!(s.get_pixel(1, 1), Some(Color::WHITE));
    assert!(s.is_dirty());
}

// --- Power & presentation ---

#[test]
fn test_power_cycle_presents_until_power_off() {
    let s = screen(16, 8);
    let surface = HeadlessSurface::new();
    s.fill(Color::WHITE);

    let presenter = s.power_on(Box::new(surface.clone())).unwrap();
    assert!(s.wait_until_on(Duration::from_secs(1)));
    assert!(surface.is_open());
    assert!(eventually(|| surface.presented() >= 3));
    assert_eq!(
        surface.last_frame().and_then(|f| f.pixel(15, 7)),
        Some(Color::WHITE)
    );

    s.power_off();
    let presented = surface.presented();
    assert!(!s.is_on());
    thread::sleep(Duration::from_millis(30));
    // Contract: nothing is presented once power_off has returned.
    assert_eq!(surface.presented(), presented);
    presenter.join();
    assert!(surface.was_closed());
    assert!(s.frames_presented() >= 3);

    // Power-off keeps the buffer.
    assert_eq!(s.get_pixel(0, 0), Some(Color::WHITE));
}

#[test]
fn test_power_on_twice_is_rejected() {
    let s = screen(4, 4);
    let _presenter = s.power_on(Box::new(HeadlessSurface::new())).unwrap();
    let err = s.power_on(Box::new(HeadlessSurface::new())).unwrap_err();
    assert!(matches!(err, ScreenError::AlreadyOn));
}

#[test]
fn test_screen_can_be_powered_on_again() {
    let s = screen(4, 4);
    let first = s.power_on(Box::new(HeadlessSurface::new())).unwrap();
    s.power_off();
    first.join();
    let second = HeadlessSurface::new();
    let _presenter = s.power_on(Box::new(second.clone())).unwrap();
    assert!(eventually(|| second.presented() > 0));
}

#[test]
fn test_dropping_the_presenter_powers_off() {
    let s = screen(4, 4);
    let presenter = s.power_on(Box::new(HeadlessSurface::new())).unwrap();
    assert!(s.is_on());
    drop(presenter);
    assert!(!s.is_on());
}

#[test]
fn test_close_event_powers_off() {
    let s = screen(4, 4);
    let surface = HeadlessSurface::new();
    let presenter = s.power_on(Box::new(surface.clone())).unwrap();
    surface.push_event(SurfaceEvent::CloseRequested);
    assert!(eventually(|| !s.is_on()));
    assert!(eventually(|| presenter.is_finished()));
}

#[test]
fn test_key_events_reach_the_keyboard() {
    let s = screen(4, 4);
    let surface = HeadlessSurface::new();
    let _presenter = s.power_on(Box::new(surface.clone())).unwrap();
    surface.push_event(SurfaceEvent::Key(KeyPress::new(KeySymbol::Char('a'))));
    surface.push_event(SurfaceEvent::Key(KeyPress::new(KeySymbol::Enter)));
    assert!(eventually(|| s.keyboard().len() == 2));
    assert_eq!(s.keyboard().read().map(|k| k.symbol), Some(KeySymbol::Char('a')));
    assert_eq!(s.keyboard().read().map(|k| k.symbol), Some(KeySymbol::Enter));
}

#[test]
fn test_wait_until_on_times_out_when_off() {
    let s = screen(4, 4);
    assert!(!s.wait_until_on(Duration::from_millis(10)));
}

#[test]
fn test_export_frame() {
    let s = screen(3, 2);
    assert!(matches!(s.export_frame("/tmp/never.ppm"), Err(ScreenError::PoweredOff)));

    let surface = HeadlessSurface::new();
    let _presenter = s.power_on(Box::new(surface.clone())).unwrap();
    assert!(eventually(|| surface.presented() > 0));
    let path = std::env::temp_dir().join(format!("vscreen-screen-{}.ppm", std::process::id()));
    s.export_frame(&path).unwrap();
    assert_eq!(surface.exported(), vec![path.clone()]);
    let _ = std::fs::remove_file(path);

    let bad = Path::new("/nonexistent-dir/frame.ppm");
    assert!(matches!(s.export_frame(bad), Err(ScreenError::ExportFailed { .. })));
}
