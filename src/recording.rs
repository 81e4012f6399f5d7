//! Headless surface that records drawing commands instead of rasterizing.

use crate::color::Color;
use crate::surface::{Fill, Surface};
use tiny_skia::{Path, Rect, Transform};

/// Text advance per character, in em.
const ADVANCE_EM: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillRect { x: f32, y: f32, w: f32, h: f32, fill: Fill },
    StrokeRect { x: f32, y: f32, w: f32, h: f32, color: Color },
    FillCircle { cx: f32, cy: f32, radius: f32, fill: Fill },
    StrokeCircle { cx: f32, cy: f32, radius: f32, color: Color },
    /// Device-space bounds of the transformed path.
    FillPath { bounds: Rect, fill: Fill },
    Text { text: String, x: f32, baseline_y: f32, size: f32, color: Color },
}

impl DrawCommand {
    /// The fill or color this command paints with, as a flat color if it is one.
    pub fn solid_color(&self) -> Option<Color> {
        match self {
            DrawCommand::Clear => None,
            DrawCommand::FillRect { fill, .. }
            | DrawCommand::FillCircle { fill, .. }
            | DrawCommand::FillPath { fill, .. } => fill.solid(),
            DrawCommand::StrokeRect { color, .. }
            | DrawCommand::StrokeCircle { color, .. }
            | DrawCommand::Text { color, .. } => Some(*color),
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        RecordingSurface { width, height, commands: Vec::new() }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, fill: Fill) {
        self.commands.push(DrawCommand::FillRect { x, y, w, h, fill });
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color, _width: f32) {
        self.commands.push(DrawCommand::StrokeRect { x, y, w, h, color });
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, fill: Fill) {
        self.commands.push(DrawCommand::FillCircle { cx, cy, radius, fill });
    }

    fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color, _width: f32) {
        self.commands.push(DrawCommand::StrokeCircle { cx, cy, radius, color });
    }

    fn fill_path(&mut self, path: &Path, transform: Transform, fill: Fill) {
        let bounds = path
            .clone()
            .transform(transform)
            .map(|p| p.bounds())
            .unwrap_or_else(|| path.bounds());
        self.commands.push(DrawCommand::FillPath { bounds, fill });
    }

    fn measure_text(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * ADVANCE_EM
    }

    fn fill_text(&mut self, text: &str, x: f32, baseline_y: f32, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text { text: text.to_string(), x, baseline_y, size, color });
    }
}
