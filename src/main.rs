//! gamepad-visualizer: live controller input viewer (X11)
//!
//! Reads controller lifecycle and state lines from a Unix socket, draws each
//! connected controller and presents the frame in a resizable window.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use log::{error, info};

use gamepad_visualizer::app::{App, Signal};
use gamepad_visualizer::canvas::{self, PixmapSurface};
use gamepad_visualizer::config::ViewerConfig;
use gamepad_visualizer::feed;
use gamepad_visualizer::session::RenderSession;
use gamepad_visualizer::surface::Surface;
use gamepad_visualizer::user_profiles::{StyleStore, UserProfiles};
use gamepad_visualizer::watcher;
use gamepad_visualizer::window::{ViewerWindow, WindowEvent};

/// How often a halted loop still looks at window events.
const IDLE_POLL: Duration = Duration::from_millis(100);

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ViewerConfig::find_and_load();
    let font = canvas::find_font(config.render.font.as_deref());

    let store_path = config.store_path();
    let presets = UserProfiles::new(StyleStore::open(&store_path));

    let mut session = RenderSession::new(config.background());
    session.set_mask(config.render.mask);
    session.set_debug(config.render.debug);
    let mut app = App::new(session, presets);

    let width = config.canvas.width.clamp(1, u16::MAX as u32) as u16;
    let height = config.canvas.height.clamp(1, u16::MAX as u32) as u16;
    let mut win = match ViewerWindow::new(width, height, "Gamepad Visualizer") {
        Ok(w) => w,
        Err(e) => {
            error!("Failed to create X11 window: {e}");
            std::process::exit(1);
        }
    };
    info!("Window created: {width}x{height}");
    let mut surface = PixmapSurface::new(width.into(), height.into(), font);

    let (tx, rx) = mpsc::channel::<Signal>();

    // Spawn feed listener thread
    let socket_path = config.feed.socket.clone();
    let feed_tx = tx.clone();
    std::thread::spawn(move || {
        if let Err(e) = feed::listen(&socket_path, feed_tx) {
            error!("Feed listener error: {e}");
        }
    });

    // Spawn style store watcher thread
    std::thread::spawn(move || {
        if let Err(e) = watcher::watch_store(&store_path, tx) {
            error!("Style store watcher error: {e}");
        }
    });

    let frame_duration = Duration::from_secs(1) / config.render.fps.max(1);

    'frames: loop {
        let frame_start = Instant::now();

        // Nothing changes on screen while halted; wait for the next signal.
        if app.session.is_halted() {
            match rx.recv_timeout(IDLE_POLL) {
                Ok(signal) => app.handle(signal),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    error!("All input threads stopped");
                    break;
                }
            }
        }

        // Drain incoming signals
        while let Ok(signal) = rx.try_recv() {
            app.handle(signal);
        }

        // Process X11 events (non-blocking)
        for event in win.poll_events() {
            match event {
                WindowEvent::Resized { width, height } => {
                    surface.resize(width, height);
                    app.session.mark_dirty();
                }
                WindowEvent::Exposed => app.session.mark_dirty(),
                WindowEvent::Closed => {
                    info!("Window closed");
                    break 'frames;
                }
            }
        }

        if app.session.needs_redraw() {
            app.session.render(&mut surface);
            let (w, h) = surface.size();
            win.present(&surface.to_argb(), w, h);
        }

        // Frame timing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_duration {
            std::thread::sleep(frame_duration - elapsed);
        }
    }
}
