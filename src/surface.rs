//! Minimal 2D drawing surface the renderer draws against.
//!
//! `PixmapSurface` (see `canvas`) draws into a real pixel buffer;
//! `RecordingSurface` (see `recording`) only records commands so frames can
//! be inspected headlessly.

use crate::color::Color;
use tiny_skia::{Path, Transform};

/// How a shape is filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Solid(Color),
    /// Radial gradient from `inner` at `center` to `outer` at `radius`.
    Radial {
        center: (f32, f32),
        radius: f32,
        inner: Color,
        outer: Color,
    },
}

impl Fill {
    /// The solid color, if this is a flat fill.
    pub fn solid(&self) -> Option<Color> {
        match *self {
            Fill::Solid(c) => Some(c),
            Fill::Radial { .. } => None,
        }
    }
}

pub trait Surface {
    /// Current pixel dimensions. Queried every frame, never cached.
    fn size(&self) -> (u32, u32);

    /// Reset every pixel to transparent.
    fn clear(&mut self);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, fill: Fill);

    /// 1px-ish outline used for debug bounding boxes.
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color, width: f32);

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, fill: Fill);

    fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color, width: f32);

    /// Fill `path` after applying `transform` (nonzero winding).
    fn fill_path(&mut self, path: &Path, transform: Transform, fill: Fill);

    /// Advance width of `text` at `size` px.
    fn measure_text(&self, text: &str, size: f32) -> f32;

    /// Draw `text` with its baseline at `baseline_y`.
    fn fill_text(&mut self, text: &str, x: f32, baseline_y: f32, size: f32, color: Color);
}
