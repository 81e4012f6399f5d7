//! Visualization profiles: one variant per recognized hardware and
//! capture-environment combination, plus a catch-all fallback.

use crate::gamepad::RawControllerState;
use crate::geometry::{Point, Size};
use crate::mapping::{self, default, option, DpadSource, Element, FamilyTable, TriggerSource};
use crate::primitives::{self, DpadState, Side};
use crate::style::{OptionDescriptor, OptionKind, StyleOptions, PROFILE_NAME};
use crate::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualizationProfile {
    /// Standard-gamepad numbering: 17 buttons, 4 axes.
    XboxChromium,
    /// Raw HID numbering: 11 buttons, 8 axes, triggers and D-pad on axes.
    XboxFirefox,
    Unknown,
}

/// Semantic label of every raw index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub buttons: Vec<&'static str>,
    pub axes: Vec<&'static str>,
}

const PROFILE_NAME_OPTION: OptionDescriptor =
    OptionDescriptor::new(PROFILE_NAME, "Controller profile name", OptionKind::Text)
        .described("Enter a name for the options of this controller");

const XBOX_OPTIONS: [OptionDescriptor; 16] = [
    OptionDescriptor::new(option::SHOW_PROFILE_NAME, "Show profile name", OptionKind::Boolean),
    OptionDescriptor::new(option::COLOR_CASE, "Case color", OptionKind::Color),
    OptionDescriptor::new(option::COLOR_PROFILE_NAME, "Profile name color", OptionKind::Color),
    OptionDescriptor::new(option::COLOR_RT_LT, "RT / LT color", OptionKind::Color),
    OptionDescriptor::new(option::COLOR_RB_LB, "RB / LB color", OptionKind::Color),
    OptionDescriptor::new(option::COLOR_DPAD, "D-pad color", OptionKind::Color),
    OptionDescriptor::new(option::COLOR_DPAD_PRESSED, "D-pad pressed color", OptionKind::Color),
    OptionDescriptor::new(option::COLOR_RSB_LSB, "Sticks color", OptionKind::Color)
        .described("Replaces the default gradient of both sticks"),
    OptionDescriptor::new(option::COLOR_XBOX, "Guide button color", OptionKind::Color),
    OptionDescriptor::new(option::COLOR_A, "A color", OptionKind::Color),
    OptionDescriptor::new(option::COLOR_B, "B color", OptionKind::Color),
    OptionDescriptor::new(option::COLOR_X, "X color", OptionKind::Color),
    OptionDescriptor::new(option::COLOR_Y, "Y color", OptionKind::Color),
    OptionDescriptor::new(option::COLOR_XBOX_PRESSED, "Guide button pressed color", OptionKind::Color),
    OptionDescriptor::new(option::COLOR_START_BACK, "Start / Back color", OptionKind::Color),
    OptionDescriptor::new(option::COLOR_START_BACK_PRESSED, "Start / Back pressed color", OptionKind::Color),
];

impl VisualizationProfile {
    /// Hardware families in resolution order.
    pub const KNOWN: [VisualizationProfile; 2] = [VisualizationProfile::XboxChromium, VisualizationProfile::XboxFirefox];

    pub const ALL: [VisualizationProfile; 3] = [
        VisualizationProfile::XboxChromium,
        VisualizationProfile::XboxFirefox,
        VisualizationProfile::Unknown,
    ];

    /// Stable name, also the key of the profile's style namespace.
    pub fn name(self) -> &'static str {
        match self {
            VisualizationProfile::XboxChromium => "XBoxOne360ControllerChromium",
            VisualizationProfile::XboxFirefox => "XBoxOne360ControllerFirefox",
            VisualizationProfile::Unknown => mapping::UNKNOWN_NAME,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn family(self) -> Option<&'static FamilyTable> {
        match self {
            VisualizationProfile::XboxChromium => Some(&mapping::CHROMIUM_XBOX),
            VisualizationProfile::XboxFirefox => Some(&mapping::FIREFOX_XBOX),
            VisualizationProfile::Unknown => None,
        }
    }

    /// Exact match: a known identifying string and enough inputs.
    pub fn is_supported(self, raw: &RawControllerState) -> bool {
        match self.family() {
            Some(t) => t.known_ids.contains(&raw.id.as_str()) && meets_minimum(t, raw),
            None => false,
        }
    }

    /// Structural match on input counts alone. The fallback always matches.
    pub fn can_be_supported(self, raw: &RawControllerState) -> bool {
        match self.family() {
            Some(t) => meets_minimum(t, raw),
            None => true,
        }
    }

    /// Bounding box of the drawing; independent of any controller state.
    pub fn draw_size(self) -> Size {
        match self {
            VisualizationProfile::Unknown => mapping::CASE,
            _ => mapping::CONTROLLER,
        }
    }

    pub fn options(self) -> Vec<OptionDescriptor> {
        match self {
            VisualizationProfile::Unknown => Vec::new(),
            _ => std::iter::once(PROFILE_NAME_OPTION).chain(XBOX_OPTIONS).collect(),
        }
    }

    pub fn mapping(self) -> Mapping {
        match self.family() {
            Some(t) => Mapping { buttons: t.button_names.to_vec(), axes: t.axis_names.to_vec() },
            None => Mapping {
                buttons: vec![mapping::UNKNOWN_NAME; mapping::UNKNOWN_MAPPING_LEN],
                axes: vec![mapping::UNKNOWN_NAME; mapping::UNKNOWN_MAPPING_LEN],
            },
        }
    }

    /// Draw the controller with its bounding box centered on `center`.
    pub fn draw(self, s: &mut dyn Surface, center: Point, raw: &RawControllerState, style: &StyleOptions) {
        match self.family() {
            Some(table) => draw_family(table, s, center, raw, style),
            None => primitives::case(s, center, style),
        }
    }
}

fn meets_minimum(t: &FamilyTable, raw: &RawControllerState) -> bool {
    raw.buttons.len() >= t.min_buttons && raw.axes.len() >= t.min_axes
}

fn draw_family(table: &FamilyTable, s: &mut dyn Surface, center: Point, raw: &RawControllerState, style: &StyleOptions) {
    let anchor = mapping::CONTROLLER.top_left(center);
    let at = |e: Element| {
        let o = e.offset();
        anchor.offset(o.x, o.y)
    };
    let ix = &table.indices;
    let down = |i: usize| raw.button(i).is_down();

    let (lt, rt) = match ix.triggers {
        TriggerSource::Buttons { left, right } => (raw.button(left).value, raw.button(right).value),
        TriggerSource::Axes { left, right } => (axis_trigger(raw, left), axis_trigger(raw, right)),
    };
    primitives::trigger(s, at(Element::TriggerLeft), lt, style);
    primitives::trigger(s, at(Element::TriggerRight), rt, style);

    primitives::bumper(s, at(Element::BumperLeft), Side::Left, down(ix.bumper_left), style);
    primitives::bumper(s, at(Element::BumperRight), Side::Right, down(ix.bumper_right), style);

    primitives::case(s, at(Element::Case), style);

    let face = ix.face.map(down);
    primitives::face_group(s, at(Element::FaceButtons), face, style);

    let (lx, ly) = (raw.axis(ix.stick_left_axes), raw.axis(ix.stick_left_axes + 1));
    primitives::stick(s, at(Element::StickLeft), lx, ly, down(ix.stick_left_button), style);
    let (rx, ry) = (raw.axis(ix.stick_right_axes), raw.axis(ix.stick_right_axes + 1));
    primitives::stick(s, at(Element::StickRight), rx, ry, down(ix.stick_right_button), style);

    let dpad = match ix.dpad {
        DpadSource::Buttons { up, down: d, left, right } => DpadState {
            up: down(up),
            down: down(d),
            left: down(left),
            right: down(right),
        },
        DpadSource::Axes { horizontal, vertical } => {
            let (h, v) = (raw.axis(horizontal), raw.axis(vertical));
            DpadState { up: v < 0.0, down: v > 0.0, left: h < 0.0, right: h > 0.0 }
        }
    };
    primitives::dpad(s, at(Element::DPad), dpad, style);

    primitives::start_back(s, at(Element::Back), down(ix.back), style);
    primitives::start_back(s, at(Element::Start), down(ix.start), style);
    primitives::guide(s, at(Element::Guide), down(ix.guide), style);

    if style.flag(option::SHOW_PROFILE_NAME) {
        if let Some(name) = style.profile_name() {
            let color = style.fill(option::COLOR_PROFILE_NAME, default::PROFILE_NAME);
            primitives::label(s, at(Element::ProfileName), name, mapping::NAME_LABEL_SIZE, color);
        }
    }

    primitives::bounds(s, center, mapping::CONTROLLER, style);
}

/// Trigger on an axis resting at -1. A missing axis reads released.
fn axis_trigger(raw: &RawControllerState, i: usize) -> f32 {
    raw.axes.get(i).map_or(0.0, |a| (a + 1.0) / 2.0)
}
