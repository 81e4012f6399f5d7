//! tiny-skia backed drawing surface with fontdue text.

use std::path::Path as FsPath;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::surface::{Fill, Surface};
use tiny_skia::*;

/// Fallback advance per character (in em) when no font is loaded.
const APPROX_ADVANCE_EM: f32 = 0.6;

pub struct PixmapSurface {
    pixmap: Pixmap,
    font: Option<fontdue::Font>,
}

impl PixmapSurface {
    pub fn new(width: u32, height: u32, font: Option<fontdue::Font>) -> Self {
        PixmapSurface { pixmap: new_pixmap(width, height), font }
    }

    /// Replace the backing buffer. Contents are discarded.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) != (self.pixmap.width(), self.pixmap.height()) {
            self.pixmap = new_pixmap(width, height);
        }
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Pixels packed as 0xAARRGGBB, row-major.
    pub fn to_argb(&self) -> Vec<u32> {
        let data = self.pixmap.data();
        let mut argb = Vec::with_capacity(data.len() / 4);
        for chunk in data.chunks_exact(4) {
            argb.push((chunk[3] as u32) << 24 | (chunk[0] as u32) << 16 | (chunk[1] as u32) << 8 | chunk[2] as u32);
        }
        argb
    }

    /// Straight (non-premultiplied) RGBA bytes, suitable for PNG encoding.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.pixmap.data().len());
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        rgba
    }

    fn paint(&self, fill: Fill) -> Option<Paint<'static>> {
        let shader = match fill {
            Fill::Solid(c) => {
                if c.a == 0 {
                    return None;
                }
                Shader::SolidColor(c.to_skia())
            }
            Fill::Radial { center, radius, inner, outer } => {
                let stops = vec![
                    GradientStop::new(0.0, inner.to_skia()),
                    GradientStop::new(1.0, outer.to_skia()),
                ];
                let p = Point::from_xy(center.0, center.1);
                RadialGradient::new(p, p, radius, stops, SpreadMode::Pad, Transform::identity())?
            }
        };
        Some(Paint { shader, anti_alias: true, ..Paint::default() })
    }

    fn stroke(&mut self, path: &tiny_skia::Path, color: Color, width: f32) {
        if let Some(paint) = self.paint(Fill::Solid(color)) {
            let stroke = Stroke { width, ..Stroke::default() };
            self.pixmap.stroke_path(path, &paint, &stroke, Transform::identity(), None);
        }
    }
}

impl Surface for PixmapSurface {
    fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, fill: Fill) {
        let Some(rect) = Rect::from_xywh(x, y, w, h) else { return };
        if let Some(paint) = self.paint(fill) {
            self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color, width: f32) {
        let Some(rect) = Rect::from_xywh(x, y, w, h) else { return };
        let path = PathBuilder::from_rect(rect);
        self.stroke(&path, color, width);
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, fill: Fill) {
        let Some(path) = circle_path(cx, cy, radius) else { return };
        if let Some(paint) = self.paint(fill) {
            self.pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }

    fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color, width: f32) {
        if let Some(path) = circle_path(cx, cy, radius) {
            self.stroke(&path, color, width);
        }
    }

    fn fill_path(&mut self, path: &tiny_skia::Path, transform: Transform, fill: Fill) {
        if let Some(paint) = self.paint(fill) {
            self.pixmap.fill_path(path, &paint, FillRule::Winding, transform, None);
        }
    }

    fn measure_text(&self, text: &str, size: f32) -> f32 {
        match &self.font {
            Some(font) => text.chars().map(|ch| font.metrics(ch, size).advance_width).sum(),
            None => text.chars().count() as f32 * size * APPROX_ADVANCE_EM,
        }
    }

    fn fill_text(&mut self, text: &str, x: f32, baseline_y: f32, size: f32, c: Color) {
        let Some(font) = &self.font else { return };
        if c.a == 0 {
            return;
        }
        let pw = self.pixmap.width() as i32;
        let ph = self.pixmap.height() as i32;
        let data = self.pixmap.data_mut();

        let mut cursor_x = x;
        for ch in text.chars() {
            let (metrics, bitmap) = font.rasterize(ch, size);
            let gx = cursor_x as i32 + metrics.xmin;
            let gy = baseline_y as i32 - metrics.ymin - metrics.height as i32;

            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let px = gx + col as i32;
                    let py = gy + row as i32;
                    if px < 0 || py < 0 || px >= pw || py >= ph {
                        continue;
                    }
                    let coverage = bitmap[row * metrics.width + col];
                    if coverage == 0 {
                        continue;
                    }
                    let alpha = ((coverage as u32 * c.a as u32) / 255) as u8;
                    let idx = ((py as u32 * pw as u32 + px as u32) * 4) as usize;
                    let inv = 255 - alpha as u32;
                    data[idx] = ((c.r as u32 * alpha as u32 + data[idx] as u32 * inv) / 255) as u8;
                    data[idx + 1] = ((c.g as u32 * alpha as u32 + data[idx + 1] as u32 * inv) / 255) as u8;
                    data[idx + 2] = ((c.b as u32 * alpha as u32 + data[idx + 2] as u32 * inv) / 255) as u8;
                    data[idx + 3] = (alpha as u32 + data[idx + 3] as u32 * inv / 255).min(255) as u8;
                }
            }
            cursor_x += metrics.advance_width;
        }
    }
}

fn new_pixmap(width: u32, height: u32) -> Pixmap {
    // tiny-skia refuses zero-sized pixmaps; a minimized window reports 0x0.
    Pixmap::new(width.max(1), height.max(1)).unwrap_or_else(|| {
        log::warn!("cannot allocate {width}x{height} pixmap, using 1x1");
        Pixmap::new(1, 1).expect("1x1 pixmap")
    })
}

pub(crate) fn circle_path(cx: f32, cy: f32, radius: f32) -> Option<tiny_skia::Path> {
    if radius <= 0.0 {
        return None;
    }
    let k = 0.5522847498_f32;
    let kr = k * radius;
    let mut pb = PathBuilder::new();
    pb.move_to(cx, cy - radius);
    pb.cubic_to(cx + kr, cy - radius, cx + radius, cy - kr, cx + radius, cy);
    pb.cubic_to(cx + radius, cy + kr, cx + kr, cy + radius, cx, cy + radius);
    pb.cubic_to(cx - kr, cy + radius, cx - radius, cy + kr, cx - radius, cy);
    pb.cubic_to(cx - radius, cy - kr, cx - kr, cy - radius, cx, cy - radius);
    pb.close();
    pb.finish()
}

/// Load a TTF/OTF font for text rendering.
pub fn load_font(path: &FsPath) -> Result<fontdue::Font> {
    let data = std::fs::read(path)?;
    fontdue::Font::from_bytes(data, fontdue::FontSettings::default())
        .map_err(|e| Error::Font(format!("{}: {e}", path.display())))
}

/// Common locations of a bold sans face, tried when none is configured.
const FONT_CANDIDATES: [&str; 4] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
];

/// The configured font, else the first system candidate that loads. `None`
/// means labels will be skipped.
pub fn find_font(configured: Option<&FsPath>) -> Option<fontdue::Font> {
    if let Some(path) = configured {
        match load_font(path) {
            Ok(font) => {
                log::info!("Loaded font {}", path.display());
                return Some(font);
            }
            Err(e) => log::warn!("Failed to load configured font: {e}"),
        }
    }
    for candidate in FONT_CANDIDATES {
        let path = FsPath::new(candidate);
        if path.exists() {
            if let Ok(font) = load_font(path) {
                log::info!("Loaded font {candidate}");
                return Some(font);
            }
        }
    }
    log::warn!("No font found, labels will not be drawn");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_rect_fills_pixels() {
        let mut s = PixmapSurface::new(10, 10, None);
        s.fill_rect(0.0, 0.0, 10.0, 10.0, Fill::Solid(Color::rgb(255, 0, 0)));
        let argb = s.to_argb();
        assert_eq!(argb.len(), 100);
        assert_eq!(argb[55], 0xFFFF0000);
    }

    #[test]
    fn clear_makes_transparent() {
        let mut s = PixmapSurface::new(4, 4, None);
        s.fill_rect(0.0, 0.0, 4.0, 4.0, Fill::Solid(Color::WHITE));
        s.clear();
        assert!(s.to_argb().iter().all(|&p| p == 0));
    }

    #[test]
    fn resize_changes_size() {
        let mut s = PixmapSurface::new(4, 4, None);
        s.resize(8, 2);
        assert_eq!(s.size(), (8, 2));
        s.resize(0, 0);
        assert_eq!(s.size(), (1, 1));
    }

    #[test]
    fn text_without_font_is_measured_not_drawn() {
        let mut s = PixmapSurface::new(50, 50, None);
        assert_eq!(s.measure_text("abcd", 10.0), 24.0);
        s.fill_text("abcd", 0.0, 40.0, 10.0, Color::WHITE);
        assert!(s.to_argb().iter().all(|&p| p == 0));
    }

    #[test]
    fn circle_covers_center_only() {
        let mut s = PixmapSurface::new(20, 20, None);
        s.fill_circle(10.0, 10.0, 4.0, Fill::Solid(Color::WHITE));
        let argb = s.to_argb();
        assert_eq!(argb[10 * 20 + 10], 0xFFFFFFFF);
        assert_eq!(argb[0], 0);
    }
}
