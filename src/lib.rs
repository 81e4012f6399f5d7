//! Shared modules for the gamepad visualizer.
//! Used by the live viewer (X11) and the preview binary (headless PNGs).

pub mod app;
pub mod canvas;
pub mod color;
pub mod config;
pub mod error;
pub mod feed;
pub mod gamepad;
pub mod geometry;
pub mod layout;
pub mod mapping;
pub mod primitives;
pub mod profile;
pub mod recording;
pub mod resolver;
pub mod session;
pub mod style;
pub mod surface;
pub mod user_profiles;
pub mod watcher;
pub mod window;
