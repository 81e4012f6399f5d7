//! Drawing routines for the individual physical elements of a controller.
//!
//! Every routine draws one element centered on `center` at the fixed size
//! from `mapping`, reads its colors from the style map (flat white in mask
//! mode) and clamps its value inputs. None of them can fail.

use std::sync::OnceLock;

use log::warn;
use tiny_skia::{Path, PathBuilder, Rect, Transform};

use crate::color::Color;
use crate::geometry::{Point, Size};
use crate::mapping::{self, default, option};
use crate::style::StyleOptions;
use crate::surface::{Fill, Surface};

const DEBUG_CENTER_RADIUS: f32 = 5.0;
const DEBUG_STROKE: f32 = 1.0;
const FACE_CIRCLE_RADIUS: f32 = 20.0;
const FACE_OVERLAY_PRESSED: f32 = 0.2;
const FACE_OVERLAY_RELEASED: f32 = 0.4;
const FACE_LABEL_BASELINE: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Which D-pad arms are held. A hat reports diagonals as two arms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DpadState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DpadState {
    /// Opposing arms cannot both show: up wins over down, left over right.
    pub fn exclusive(self) -> Self {
        DpadState {
            down: self.down && !self.up,
            right: self.right && !self.left,
            ..self
        }
    }
}

/// Stroke the bounding box of an element and mark its center, when the
/// session asks for debug bounds.
pub fn bounds(s: &mut dyn Surface, center: Point, size: Size, style: &StyleOptions) {
    if !style.debug_bounds() {
        return;
    }
    let color = ink(style, default::DEBUG_BOUNDS);
    let tl = size.top_left(center);
    s.stroke_rect(tl.x, tl.y, size.width, size.height, color, DEBUG_STROKE);
    s.stroke_circle(center.x, center.y, DEBUG_CENTER_RADIUS, color, DEBUG_STROKE);
}

/// Controller body outline.
pub fn case(s: &mut dyn Surface, center: Point, style: &StyleOptions) {
    let size = mapping::CASE;
    let color = style.fill(option::COLOR_CASE, default::CASE);
    let tl = size.top_left(center);
    match case_outline() {
        Some(path) => {
            let transform = Transform::from_scale(mapping::CASE_PATH_SCALE, mapping::CASE_PATH_SCALE)
                .post_translate(tl.x, tl.y);
            s.fill_path(path, transform, Fill::Solid(color));
        }
        None => s.fill_rect(tl.x, tl.y, size.width, size.height, Fill::Solid(color)),
    }
    bounds(s, center, size, style);
}

/// Analog trigger. `value` is clamped to [0, 1]; the bar shortens from the
/// top as it is pulled.
pub fn trigger(s: &mut dyn Surface, center: Point, value: f32, style: &StyleOptions) {
    let size = mapping::TRIGGER;
    let v = clamp_unit(value);
    let color = style.fill(option::COLOR_RT_LT, default::TRIGGER);
    let tl = size.top_left(center);
    let y = tl.y + mapping::TRIGGER_PRESS_DEPTH * v;
    let h = mapping::TRIGGER_BASE_DEPTH + mapping::TRIGGER_PRESS_DEPTH * (1.0 - v);
    s.fill_rect(tl.x, y, size.width, h, Fill::Solid(color));
    bounds(s, center, size, style);
}

/// Shoulder bumper. The right one is the left outline mirrored.
pub fn bumper(s: &mut dyn Surface, center: Point, side: Side, pressed: bool, style: &StyleOptions) {
    let size = mapping::BUMPER;
    let color = style.fill(option::COLOR_RB_LB, default::BUMPER);
    let tl = size.top_left(center);
    let press = if pressed { mapping::BUMPER_PRESS_DEPTH } else { 0.0 };
    let top = tl.y + press;

    if let Some(path) = bumper_outline() {
        let base = match side {
            Side::Left => Transform::identity(),
            Side::Right => Transform::from_row(-1.0, 0.0, 0.0, 1.0, mapping::BUMPER_PATH_WIDTH, 0.0),
        };
        s.fill_path(path, base.post_translate(tl.x, top), Fill::Solid(color));
    }
    let base_h = mapping::BUMPER_BASE_DEPTH + if pressed { 0.0 } else { mapping::BUMPER_PRESS_DEPTH };
    s.fill_rect(tl.x, top + mapping::BUMPER_PATH_HEIGHT, size.width, base_h, Fill::Solid(color));
    bounds(s, center, size, style);
}

/// Plus-shaped D-pad: a center tile and four arms, held arms highlighted.
pub fn dpad(s: &mut dyn Surface, center: Point, state: DpadState, style: &StyleOptions) {
    let tile = mapping::DPAD_TILE;
    let idle = style.fill(option::COLOR_DPAD, default::DPAD);
    let held = style.fill(option::COLOR_DPAD_PRESSED, default::DPAD_PRESSED);
    let state = state.exclusive();

    // Cross underlay, so no seams show between the arms.
    s.fill_rect(center.x - tile / 2.0, center.y - tile * 1.5, tile, tile * 3.0, Fill::Solid(idle));
    s.fill_rect(center.x - tile * 1.5, center.y - tile / 2.0, tile * 3.0, tile, Fill::Solid(idle));

    let arms = [
        ((0.0, -1.0), state.up),
        ((0.0, 1.0), state.down),
        ((-1.0, 0.0), state.left),
        ((1.0, 0.0), state.right),
    ];
    for (dir, on) in arms {
        if let Some(path) = dpad_arm(center, dir, tile) {
            s.fill_path(&path, Transform::identity(), Fill::Solid(if on { held } else { idle }));
        }
    }
    bounds(s, center, mapping::DPAD, style);
}

/// One arm tile plus the wedge it points into the middle tile with.
fn dpad_arm(center: Point, (dx, dy): (f32, f32), tile: f32) -> Option<Path> {
    let half = tile / 2.0;
    let arm = center.offset(dx * tile, dy * tile);
    let edge = center.offset(dx * half, dy * half);
    let (px, py) = (-dy * half, dx * half);

    let mut pb = PathBuilder::new();
    pb.push_rect(Rect::from_xywh(arm.x - half, arm.y - half, tile, tile)?);
    pb.move_to(center.x, center.y);
    pb.line_to(edge.x + px, edge.y + py);
    pb.line_to(edge.x - px, edge.y - py);
    pb.close();
    pb.finish()
}

/// Thumb stick. `x`/`y` are clamped to [-1, 1]; a pressed stick grows its knob.
pub fn stick(s: &mut dyn Surface, center: Point, x: f32, y: f32, pressed: bool, style: &StyleOptions) {
    let size = mapping::STICK;
    let outer_radius = size.width / 2.0;
    let outer = if style.mask_mode() {
        Fill::Solid(Color::WHITE)
    } else {
        match style.color(option::COLOR_RSB_LSB) {
            Some(c) => Fill::Solid(c),
            None => Fill::Radial {
                center: (center.x, center.y),
                radius: mapping::STICK_GRADIENT_RADIUS,
                inner: default::STICK_OUTER_INNER,
                outer: default::STICK_OUTER_OUTER,
            },
        }
    };
    s.fill_circle(center.x, center.y, outer_radius, outer);

    let knob = center.offset(clamp_axis(x) * mapping::STICK_TRAVEL, clamp_axis(y) * mapping::STICK_TRAVEL);
    let knob_radius = mapping::STICK_AXIS_RADIUS * if pressed { 2.0 } else { 1.75 };
    let knob_fill = if style.mask_mode() {
        Fill::Solid(Color::WHITE)
    } else {
        Fill::Radial {
            center: (knob.x, knob.y),
            radius: mapping::STICK_GRADIENT_RADIUS,
            inner: default::STICK_KNOB_INNER,
            outer: default::STICK_KNOB_OUTER,
        }
    };
    s.fill_circle(knob.x, knob.y, knob_radius, knob_fill);
    bounds(s, center, size, style);
}

/// Round guide button in the middle of the pad.
pub fn guide(s: &mut dyn Surface, center: Point, pressed: bool, style: &StyleOptions) {
    let color = if pressed {
        style.fill(option::COLOR_XBOX_PRESSED, default::GUIDE_PRESSED)
    } else {
        style.fill(option::COLOR_XBOX, default::GUIDE)
    };
    round_button(s, center, mapping::GUIDE, color, style);
}

/// Small round start/back button.
pub fn start_back(s: &mut dyn Surface, center: Point, pressed: bool, style: &StyleOptions) {
    let color = if pressed {
        style.fill(option::COLOR_START_BACK_PRESSED, default::START_BACK_PRESSED)
    } else {
        style.fill(option::COLOR_START_BACK, default::START_BACK)
    };
    round_button(s, center, mapping::START_BACK, color, style);
}

fn round_button(s: &mut dyn Surface, center: Point, size: Size, color: Color, style: &StyleOptions) {
    s.fill_circle(center.x, center.y, size.width / 2.0, Fill::Solid(color));
    bounds(s, center, size, style);
}

/// Lettered face button. A white veil lightens it, less so while held.
pub fn face_button(
    s: &mut dyn Surface,
    center: Point,
    label: &str,
    color_id: &str,
    default_color: Color,
    pressed: bool,
    style: &StyleOptions,
) {
    let base = style.fill(color_id, default_color);
    s.fill_circle(center.x, center.y, FACE_CIRCLE_RADIUS, Fill::Solid(base));

    let veil = if pressed { FACE_OVERLAY_PRESSED } else { FACE_OVERLAY_RELEASED };
    let overlay = if style.mask_mode() { Color::WHITE } else { Color::WHITE.with_alpha(veil) };
    s.fill_circle(center.x, center.y, FACE_CIRCLE_RADIUS, Fill::Solid(overlay));

    let w = s.measure_text(label, mapping::FACE_LABEL_SIZE);
    s.fill_text(label, center.x - w / 2.0, center.y + FACE_LABEL_BASELINE, mapping::FACE_LABEL_SIZE, base);
    bounds(s, center, mapping::FACE_BUTTON, style);
}

/// A/B/X/Y diamond. `pressed` is in A, B, X, Y order.
pub fn face_group(s: &mut dyn Surface, center: Point, pressed: [bool; 4], style: &StyleOptions) {
    let d = mapping::FACE_BUTTON.width;
    let offsets = [(0.0, d), (d, 0.0), (-d, 0.0), (0.0, -d)];
    for (((label, id, color), (dx, dy)), down) in mapping::FACE_BUTTONS.iter().zip(offsets).zip(pressed) {
        face_button(s, center.offset(dx, dy), label, id, *color, down, style);
    }
    bounds(s, center, mapping::FACE_GROUP, style);
}

/// Centered single-line label with its baseline at `baseline`.
pub fn label(s: &mut dyn Surface, baseline: Point, text: &str, size: f32, color: Color) {
    let w = s.measure_text(text, size);
    s.fill_text(text, baseline.x - w / 2.0, baseline.y, size, color);
}

/// Fixed element color, flattened in mask mode.
fn ink(style: &StyleOptions, color: Color) -> Color {
    if style.mask_mode() {
        Color::WHITE
    } else {
        color
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

fn clamp_axis(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(-1.0, 1.0)
    }
}

fn case_outline() -> Option<&'static Path> {
    static CASE_OUTLINE: OnceLock<Option<Path>> = OnceLock::new();
    CASE_OUTLINE
        .get_or_init(|| parse_outline(mapping::CASE_PATH, mapping::CASE))
        .as_ref()
}

fn bumper_outline() -> Option<&'static Path> {
    static BUMPER_OUTLINE: OnceLock<Option<Path>> = OnceLock::new();
    BUMPER_OUTLINE
        .get_or_init(|| parse_outline(mapping::BUMPER_PATH, mapping::BUMPER))
        .as_ref()
}

/// Parse SVG path data into a path in its own unit space.
fn parse_outline(d: &str, size: Size) -> Option<Path> {
    let svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}"><path d="{d}"/></svg>"#,
        size.width, size.height
    );
    let opts = resvg::usvg::Options::default();
    let tree = match resvg::usvg::Tree::from_str(&svg, &opts) {
        Ok(t) => t,
        Err(e) => {
            warn!("outline path rejected: {e}");
            return None;
        }
    };
    let path = first_path(tree.root());
    if path.is_none() {
        warn!("outline path produced no geometry");
    }
    path
}

fn first_path(group: &resvg::usvg::Group) -> Option<Path> {
    group.children().iter().find_map(|node| match node {
        resvg::usvg::Node::Path(p) => Some(p.data().clone()),
        resvg::usvg::Node::Group(g) => first_path(g),
        _ => None,
    })
}
