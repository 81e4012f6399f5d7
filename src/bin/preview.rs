//! Local preview tool: renders controller frames to PNG files + atlas.
//! No X11 needed.
//!
//! Usage: cargo run --bin preview [-- --font PATH]
//!
//! Outputs:
//!   preview-output/<profile>-*.png  each profile idle and with inputs held
//!   preview-output/mask.png         alpha-mask export
//!   preview-output/debug.png        bounding boxes
//!   preview-output/multi-*.png      several controllers, landscape and portrait
//!   preview-output/empty.png        no-controller placeholder
//!   preview-output/atlas.png        single tiled overview

use std::path::{Path, PathBuf};

use gamepad_visualizer::canvas::{self, PixmapSurface};
use gamepad_visualizer::color::Color;
use gamepad_visualizer::config::ViewerConfig;
use gamepad_visualizer::gamepad::{ButtonReading, RawControllerState};
use gamepad_visualizer::mapping::{option, CHROMIUM_XBOX, FIREFOX_XBOX};
use gamepad_visualizer::session::RenderSession;
use gamepad_visualizer::style::{StyleOptions, PROFILE_NAME};

const SCREEN_W: u32 = 1280;
const SCREEN_H: u32 = 720;

struct Frame {
    label: String,
    rgba: Vec<u8>,
    width: u32,
    height: u32,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = ViewerConfig::find_and_load();
    let font_arg = std::env::args().skip_while(|a| a != "--font").nth(1).map(PathBuf::from);
    let font = canvas::find_font(font_arg.or(config.render.font.clone()).as_deref());

    let out = PathBuf::from("preview-output");
    if let Err(e) = std::fs::create_dir_all(&out) {
        eprintln!("cannot create {}: {e}", out.display());
        std::process::exit(1);
    }

    let background = config.background();
    let mut frames = Vec::new();
    let mut render = |label: &str, session: &RenderSession, width: u32, height: u32| {
        let mut surface = PixmapSurface::new(width, height, font.clone());
        session.render(&mut surface);
        frames.push(Frame { label: label.to_string(), rgba: surface.to_rgba(), width, height });
    };

    // ── One controller per profile ──────────────────────────
    let chromium_idle = RawControllerState::idle(0, CHROMIUM_XBOX.known_ids[0], 17, 4);
    let firefox_idle = RawControllerState::idle(0, FIREFOX_XBOX.known_ids[0], 11, 8);
    let unknown = RawControllerState::idle(0, "Generic USB Joystick", 6, 2);

    for (label, raw) in [("chromium-idle", &chromium_idle), ("firefox-idle", &firefox_idle), ("unknown", &unknown)] {
        let mut session = RenderSession::new(background);
        session.connect(raw.clone(), &StyleOptions::new());
        render(label, &session, SCREEN_W, SCREEN_H);
    }

    let named = StyleOptions::new()
        .with(PROFILE_NAME, "Player One")
        .with(option::SHOW_PROFILE_NAME, true)
        .with(option::COLOR_CASE, "#454545")
        .with(option::COLOR_PROFILE_NAME, "white");

    let mut session = RenderSession::new(background);
    session.connect(chromium_pressed(), &named);
    render("chromium-pressed", &session, SCREEN_W, SCREEN_H);

    let mut session = RenderSession::new(background);
    session.connect(firefox_pressed(), &StyleOptions::new());
    render("firefox-pressed", &session, SCREEN_W, SCREEN_H);

    // ── Session modes ───────────────────────────────────────
    let mut session = RenderSession::new(background);
    session.connect(chromium_pressed(), &named);
    session.set_mask(true);
    render("mask", &session, SCREEN_W, SCREEN_H);

    session.set_mask(false);
    session.set_debug(true);
    render("debug", &session, SCREEN_W, SCREEN_H);

    // ── Several controllers ─────────────────────────────────
    let mut session = RenderSession::new(background);
    session.connect(chromium_pressed(), &StyleOptions::new());
    let mut second = firefox_idle.clone();
    second.index = 1;
    session.connect(second, &StyleOptions::new());
    render("multi-landscape", &session, SCREEN_W, SCREEN_H);

    let mut third = unknown.clone();
    third.index = 2;
    session.connect(third, &StyleOptions::new());
    render("multi-portrait", &session, SCREEN_H, SCREEN_W + 200);

    render("empty", &RenderSession::new(background), SCREEN_W, SCREEN_H);

    for frame in &frames {
        let path = out.join(format!("{}.png", frame.label));
        save_rgba_png(&path, frame.width, frame.height, &frame.rgba);
        println!("{}", path.display());
    }

    let (atlas, atlas_w, atlas_h) = build_atlas(&frames);
    let atlas_path = out.join("atlas.png");
    save_rgba_png(&atlas_path, atlas_w, atlas_h, &atlas);
    println!("\natlas: {} ({}x{}, {} frames)", atlas_path.display(), atlas_w, atlas_h, frames.len());
}

/// A, LB, START, LT half-pulled, left stick clicked and pushed up-right, D-pad up.
fn chromium_pressed() -> RawControllerState {
    let mut buttons = vec![ButtonReading::default(); 17];
    for (i, v) in [(0, 1.0), (4, 1.0), (6, 0.5), (10, 1.0), (12, 1.0), (9, 1.0)] {
        buttons[i] = ButtonReading::new(v);
    }
    RawControllerState::new(0, CHROMIUM_XBOX.known_ids[0], buttons, vec![0.7, -0.7, 0.0, 0.3])
}

/// B, Y, RB, RT fully pulled, guide, hat down-left.
fn firefox_pressed() -> RawControllerState {
    let mut buttons = vec![ButtonReading::default(); 11];
    for i in [1, 3, 5, 8] {
        buttons[i] = ButtonReading::new(1.0);
    }
    let axes = vec![0.0, 0.0, -1.0, -0.5, 0.5, 1.0, -1.0, 1.0];
    RawControllerState::new(0, FIREFOX_XBOX.known_ids[0], buttons, axes)
}

/// Tile every frame, scaled to fit a fixed cell, onto one image.
fn build_atlas(frames: &[Frame]) -> (Vec<u8>, u32, u32) {
    let cols = 3_u32;
    let cell_w = SCREEN_W / 2;
    let cell_h = SCREEN_H / 2;
    let pad = 8_u32;
    let rows = (frames.len() as u32).div_ceil(cols);

    let atlas_w = cols * (cell_w + pad) + pad;
    let atlas_h = rows * (cell_h + pad) + pad;
    let bg = Color::rgb(30, 30, 46);

    let mut atlas: Vec<u8> = Vec::with_capacity((atlas_w * atlas_h * 4) as usize);
    for _ in 0..atlas_w * atlas_h {
        atlas.extend_from_slice(&[bg.r, bg.g, bg.b, 255]);
    }

    for (idx, frame) in frames.iter().enumerate() {
        let col = idx as u32 % cols;
        let row = idx as u32 / cols;
        let scale = (frame.width as f32 / cell_w as f32).max(frame.height as f32 / cell_h as f32);
        let thumb_w = (frame.width as f32 / scale) as u32;
        let thumb_h = (frame.height as f32 / scale) as u32;
        let ox = pad + col * (cell_w + pad) + (cell_w - thumb_w) / 2;
        let oy = pad + row * (cell_h + pad) + (cell_h - thumb_h) / 2;

        // Nearest-neighbor downsample and blit
        for ty in 0..thumb_h {
            for tx in 0..thumb_w {
                let sx = ((tx as f32 * scale) as u32).min(frame.width - 1);
                let sy = ((ty as f32 * scale) as u32).min(frame.height - 1);
                let si = ((sy * frame.width + sx) * 4) as usize;
                let di = (((oy + ty) * atlas_w + ox + tx) * 4) as usize;
                if si + 3 >= frame.rgba.len() || di + 3 >= atlas.len() {
                    continue;
                }
                atlas[di..di + 4].copy_from_slice(&frame.rgba[si..si + 4]);
            }
        }
    }

    (atlas, atlas_w, atlas_h)
}

fn save_rgba_png(path: &Path, w: u32, h: u32, rgba: &[u8]) {
    let file = std::fs::File::create(path).expect("create png");
    let buf = std::io::BufWriter::new(file);
    let mut encoder = png::Encoder::new(buf, w, h);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().expect("png header");
    writer.write_image_data(rgba).expect("png data");
}
