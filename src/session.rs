//! Render session: the connected controllers plus everything that decides
//! whether and how the next frame is drawn.

use std::collections::BTreeMap;

use log::{debug, info};

use crate::color::Color;
use crate::gamepad::RawControllerState;
use crate::geometry::Point;
use crate::layout;
use crate::primitives;
use crate::profile::VisualizationProfile;
use crate::resolver;
use crate::style::StyleOptions;
use crate::surface::{Fill, Surface};

/// Background behind controllers in mask mode.
pub const MASK_BACKGROUND: Color = Color::BLACK;

const PLACEHOLDER: [&str; 2] = ["No controller connected.", "Connect a controller and press any button."];
const PLACEHOLDER_SIZE: f32 = 30.0;
const PLACEHOLDER_LINE_HEIGHT: f32 = 40.0;

/// One connected controller. `style` has already been validated against the
/// profile's schema.
#[derive(Debug, Clone)]
pub struct ControllerEntry {
    pub raw: RawControllerState,
    pub profile: VisualizationProfile,
    pub style: StyleOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    /// The idle frame is on screen; nothing is drawn until a change re-arms.
    Halted,
}

#[derive(Debug)]
pub struct RenderSession {
    entries: BTreeMap<u32, ControllerEntry>,
    background: Color,
    mask: bool,
    debug: bool,
    force_redraw: bool,
    empty_frame_rendered: bool,
    state: LoopState,
}

impl RenderSession {
    pub fn new(background: Color) -> Self {
        RenderSession {
            entries: BTreeMap::new(),
            background,
            mask: false,
            debug: false,
            force_redraw: true,
            empty_frame_rendered: false,
            state: LoopState::Running,
        }
    }

    /// Resolve a profile for `raw` and start tracking it.
    pub fn connect(&mut self, raw: RawControllerState, style: &StyleOptions) -> VisualizationProfile {
        let profile = resolver::resolve(&raw);
        self.connect_as(raw, profile, style);
        profile
    }

    /// Track `raw` under an explicitly chosen profile.
    pub fn connect_as(&mut self, raw: RawControllerState, profile: VisualizationProfile, style: &StyleOptions) {
        info!("controller {} connected as {} ({:?})", raw.index, profile.name(), raw.id);
        let style = style.validated(&profile.options());
        self.entries.insert(raw.index, ControllerEntry { raw, profile, style });
        self.mark_dirty();
    }

    /// Replace the readings of a tracked controller. Profile and style stay.
    /// Returns `false` when the index is not connected.
    pub fn update_state(&mut self, raw: RawControllerState) -> bool {
        match self.entries.get_mut(&raw.index) {
            Some(entry) => {
                entry.raw = raw;
                true
            }
            None => false,
        }
    }

    pub fn disconnect(&mut self, index: u32) -> Option<ControllerEntry> {
        let removed = self.entries.remove(&index);
        if removed.is_some() {
            info!("controller {index} disconnected");
            self.mark_dirty();
        }
        removed
    }

    /// User override of the resolved profile. The style is revalidated
    /// against the new profile's schema.
    pub fn set_profile(&mut self, index: u32, profile: VisualizationProfile, style: &StyleOptions) -> bool {
        let Some(entry) = self.entries.get_mut(&index) else {
            return false;
        };
        debug!("controller {index}: profile {} -> {}", entry.profile.name(), profile.name());
        entry.profile = profile;
        entry.style = style.validated(&profile.options());
        self.mark_dirty();
        true
    }

    pub fn set_style(&mut self, index: u32, style: &StyleOptions) -> bool {
        let Some(entry) = self.entries.get_mut(&index) else {
            return false;
        };
        entry.style = style.validated(&entry.profile.options());
        self.mark_dirty();
        true
    }

    pub fn set_mask(&mut self, on: bool) {
        if self.mask != on {
            self.mask = on;
            self.mark_dirty();
        }
    }

    pub fn set_debug(&mut self, on: bool) {
        if self.debug != on {
            self.debug = on;
            self.mark_dirty();
        }
    }

    pub fn set_background(&mut self, color: Color) {
        if self.background != color {
            self.background = color;
            self.mark_dirty();
        }
    }

    /// Force the next frame and re-arm a halted loop. Called on resize.
    pub fn mark_dirty(&mut self) {
        self.force_redraw = true;
        self.empty_frame_rendered = false;
        self.state = LoopState::Running;
    }

    /// Whether the coming frame must be drawn. Consumes the force flag; once
    /// the empty frame has been drawn the loop halts until the next change.
    pub fn needs_redraw(&mut self) -> bool {
        if !self.entries.is_empty() {
            self.force_redraw = false;
            self.state = LoopState::Running;
            return true;
        }
        if self.force_redraw || !self.empty_frame_rendered {
            self.force_redraw = false;
            self.empty_frame_rendered = true;
            return true;
        }
        if self.state == LoopState::Running {
            debug!("idle frame on screen, halting redraws");
            self.state = LoopState::Halted;
        }
        false
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_halted(&self) -> bool {
        self.state == LoopState::Halted
    }

    pub fn entry(&self, index: u32) -> Option<&ControllerEntry> {
        self.entries.get(&index)
    }

    /// Connected controllers in index order.
    pub fn entries(&self) -> impl Iterator<Item = &ControllerEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn mask(&self) -> bool {
        self.mask
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Draw one full frame. Canvas size is read from the surface each time.
    pub fn render(&self, s: &mut dyn Surface) {
        let (w, h) = s.size();
        let (w, h) = (w as f32, h as f32);
        s.clear();

        if self.entries.is_empty() {
            s.fill_rect(0.0, 0.0, w, h, Fill::Solid(self.background));
            self.placeholder(s, w, h);
            return;
        }

        let bg = if self.mask { MASK_BACKGROUND } else { self.background };
        s.fill_rect(0.0, 0.0, w, h, Fill::Solid(bg));

        let sizes: Vec<_> = self.entries.values().map(|e| e.profile.draw_size()).collect();
        let placed = layout::layout(&sizes, w, h);
        let flags = StyleOptions::new().with_mask(self.mask).with_debug(self.debug);
        for (entry, center) in self.entries.values().zip(placed.centers) {
            entry.profile.draw(s, center, &entry.raw, &entry.style.merged(&flags));
        }
    }

    fn placeholder(&self, s: &mut dyn Surface, w: f32, h: f32) {
        let color = contrast(self.background);
        let block = PLACEHOLDER_LINE_HEIGHT * (PLACEHOLDER.len() - 1) as f32;
        let first = h / 2.0 - block / 2.0 + PLACEHOLDER_SIZE / 3.0;
        for (i, line) in PLACEHOLDER.iter().enumerate() {
            let baseline = Point::new(w / 2.0, first + PLACEHOLDER_LINE_HEIGHT * i as f32);
            primitives::label(s, baseline, line, PLACEHOLDER_SIZE, color);
        }
    }
}

/// Black or white, whichever reads better on `bg`.
fn contrast(bg: Color) -> Color {
    let luma = 0.299 * bg.r as f32 + 0.587 * bg.g as f32 + 0.114 * bg.b as f32;
    if luma > 140.0 {
        Color::BLACK
    } else {
        Color::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawCommand, RecordingSurface};

    const CHROMIUM_ID: &str = "Microsoft Controller (STANDARD GAMEPAD Vendor: 045e Product: 02ea)";

    fn pad(index: u32) -> RawControllerState {
        RawControllerState::idle(index, CHROMIUM_ID, 17, 4)
    }

    #[test]
    fn empty_session_draws_once_then_halts() {
        let mut session = RenderSession::new(Color::rgb(0x80, 0x80, 0x80));
        assert!(session.needs_redraw());
        assert!(!session.needs_redraw());
        assert!(session.is_halted());
        assert!(!session.needs_redraw());
    }

    #[test]
    fn connect_rearms_and_then_suppresses_again() {
        let mut session = RenderSession::new(Color::WHITE);
        session.needs_redraw();
        session.needs_redraw();
        assert!(session.is_halted());

        session.connect(pad(0), &StyleOptions::new());
        assert_eq!(session.state(), LoopState::Running);
        assert!(session.needs_redraw());
        assert!(session.needs_redraw());

        session.disconnect(0);
        assert!(session.needs_redraw());
        assert!(!session.needs_redraw());
        assert!(session.is_halted());
    }

    #[test]
    fn option_change_forces_empty_frame() {
        let mut session = RenderSession::new(Color::WHITE);
        session.needs_redraw();
        session.needs_redraw();
        session.set_mask(true);
        assert!(!session.is_halted());
        assert!(session.needs_redraw());
        assert!(!session.needs_redraw());

        session.set_mask(true);
        assert!(!session.needs_redraw());
        session.mark_dirty();
        assert!(session.needs_redraw());
    }

    #[test]
    fn update_unknown_index_is_rejected() {
        let mut session = RenderSession::new(Color::WHITE);
        assert!(!session.update_state(pad(3)));
        session.connect(pad(3), &StyleOptions::new());
        let mut moved = pad(3);
        moved.axes[0] = 0.5;
        assert!(session.update_state(moved));
        assert_eq!(session.entry(3).map(|e| e.raw.axes[0]), Some(0.5));
    }

    #[test]
    fn style_is_validated_against_profile() {
        let mut session = RenderSession::new(Color::WHITE);
        let style = StyleOptions::new().with("colorCase", "#454545").with("colorBogus", "red");
        session.connect(pad(0), &style);
        let entry = session.entry(0).unwrap();
        assert_eq!(entry.profile, VisualizationProfile::XboxChromium);
        assert_eq!(entry.style.text("colorCase"), Some("#454545"));
        assert!(entry.style.get("colorBogus").is_none());

        session.set_profile(0, VisualizationProfile::Unknown, &style);
        assert!(session.entry(0).unwrap().style.is_empty());
    }

    #[test]
    fn empty_frame_shows_placeholder() {
        let session = RenderSession::new(Color::rgb(0x80, 0x80, 0x80));
        let mut s = RecordingSurface::new(640, 480);
        session.render(&mut s);
        assert_eq!(s.commands[0], DrawCommand::Clear);
        assert_eq!(s.texts(), PLACEHOLDER.to_vec());
    }

    #[test]
    fn mask_frame_is_black_and_white() {
        let mut session = RenderSession::new(Color::rgb(0, 255, 0));
        session.connect(pad(0), &StyleOptions::new().with("colorA", "red"));
        session.set_mask(true);
        let mut s = RecordingSurface::new(800, 600);
        session.render(&mut s);
        assert_eq!(s.commands[1].solid_color(), Some(MASK_BACKGROUND));
        assert!(s.commands[2..].iter().all(|c| c.solid_color() == Some(Color::WHITE)));
    }

    #[test]
    fn entry_colors_and_session_flags_both_reach_the_frame() {
        let mut session = RenderSession::new(Color::WHITE);
        session.connect(pad(0), &StyleOptions::new().with("colorCase", "red"));
        session.set_debug(true);
        let mut s = RecordingSurface::new(800, 600);
        session.render(&mut s);
        let red = Color::rgb(255, 0, 0);
        assert!(s.commands.iter().any(|c| matches!(c, DrawCommand::FillPath { .. }) && c.solid_color() == Some(red)));
        assert!(s.commands.iter().any(|c| matches!(c, DrawCommand::StrokeRect { .. })));
        assert_eq!(session.entry(0).unwrap().style.get("drawDebugBounds"), None);
    }

    #[test]
    fn frame_follows_surface_size() {
        let mut session = RenderSession::new(Color::WHITE);
        session.connect(pad(0), &StyleOptions::new());
        let mut s = RecordingSurface::new(800, 600);
        session.render(&mut s);
        s.resize(1600, 900);
        s.take();
        session.render(&mut s);
        assert_eq!(
            s.commands[1],
            DrawCommand::FillRect { x: 0.0, y: 0.0, w: 1600.0, h: 900.0, fill: Fill::Solid(Color::WHITE) }
        );
    }
}
