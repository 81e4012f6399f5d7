//! Constant data for the illustrated controller families: element sizes,
//! style option ids and defaults, raw index tables, semantic names and the
//! layout offsets of every element relative to the controller's top-left.

use crate::color::Color;
use crate::geometry::{Point, Size};

// Element sizes. Fixed per primitive type so layout never depends on state.

pub const FACE_BUTTON_RADIUS: f32 = 10.0;
pub const FACE_BUTTON: Size = Size::square(FACE_BUTTON_RADIUS * 2.0 * 1.75);
pub const FACE_GROUP: Size = Size::square(FACE_BUTTON.width * 3.0);

pub const STICK_AXIS_RADIUS: f32 = 15.0;
pub const STICK: Size = Size::square(87.0);
/// Knob travel from center at full deflection.
pub const STICK_TRAVEL: f32 = STICK_AXIS_RADIUS * 2.0 * 0.45;
pub const STICK_GRADIENT_RADIUS: f32 = 55.0;

pub const DPAD_TILE: f32 = 25.0;
pub const DPAD: Size = Size::square(DPAD_TILE * 3.0);

pub const BUMPER_PATH_WIDTH: f32 = 127.0;
pub const BUMPER_PATH_HEIGHT: f32 = 26.0;
pub const BUMPER_PRESS_DEPTH: f32 = 12.0;
pub const BUMPER_BASE_DEPTH: f32 = 15.0;
pub const BUMPER: Size = Size::new(
    BUMPER_PATH_WIDTH,
    BUMPER_PATH_HEIGHT + BUMPER_PRESS_DEPTH + BUMPER_BASE_DEPTH,
);

pub const TRIGGER_WIDTH: f32 = 25.0;
pub const TRIGGER_PRESS_DEPTH: f32 = 35.0;
pub const TRIGGER_BASE_DEPTH: f32 = 25.0;
pub const TRIGGER: Size = Size::new(TRIGGER_WIDTH, TRIGGER_PRESS_DEPTH + TRIGGER_BASE_DEPTH);

pub const GUIDE: Size = Size::square(50.0);
pub const START_BACK: Size = Size::square(25.0);

pub const CASE: Size = Size::new(558.0, 335.0);
/// Room above the case for bumpers and triggers.
pub const CASE_TOP_MARGIN: f32 = 54.0;
pub const CASE_PATH_SCALE: f32 = 2.25;

/// Bounding box of a whole hardware-family illustration.
pub const CONTROLLER: Size = Size::new(CASE.width, CASE.height + CASE_TOP_MARGIN);

pub const NAME_LABEL_SIZE: f32 = 20.0;
/// Face button letters: 20pt bold.
pub const FACE_LABEL_SIZE: f32 = 20.0 * 4.0 / 3.0;

// Outline paths in their own unit space.

pub const CASE_PATH: &str = "M 158.75,-3.3333336e-7 C 188.1297,1.2619967 200.15153,6.9023647 211.66666,13.229168 c 7.97865,4.807494 12.50223,13.639725 15.875,23.812499 6.28144,22.082684 18.31653,45.56543 19.84375,66.145833 0.87505,12.34553 5.34551,42.75628 -23.8125,46.30208 -5.45657,-0.78677 -11.52732,-6.52704 -17.19791,-11.90625 -10.13244,-10.00018 -15.82707,-23.03864 -39.6875,-29.10416 H 124.35416 V -3.3333336e-7 Z m -68.791666,0 C 60.578632,1.2619967 48.556805,6.9023647 37.041667,13.229167 29.063019,18.036661 24.539443,26.868892 21.166667,37.041666 14.885229,59.124349 2.8501433,82.607102 1.3229183,103.18751 c -0.87504897,12.34553 -5.345502,42.75628 23.8124987,46.30208 5.456574,-0.78677 11.527325,-6.52704 17.197917,-11.90625 10.132433,-10.00019 15.827062,-23.03864 39.687499,-29.10417 H 124.35417 V -3.3333336e-7 Z";

pub const BUMPER_PATH: &str = "m 127,26 0,-8.524568 C 113.3988,7.1608169 98.857572,0.88512457 83.125242,0.3078023 42.799301,2.3602042 20.279728,15.078099 0,26.458333 Z";

/// Style option ids honored by the hardware families.
pub mod option {
    pub const SHOW_PROFILE_NAME: &str = "showProfileName";
    pub const COLOR_CASE: &str = "colorCase";
    pub const COLOR_PROFILE_NAME: &str = "colorProfileName";
    pub const COLOR_RT_LT: &str = "colorRtLt";
    pub const COLOR_RB_LB: &str = "colorRbLb";
    pub const COLOR_DPAD: &str = "colorDPad";
    pub const COLOR_DPAD_PRESSED: &str = "colorDPadPressed";
    pub const COLOR_RSB_LSB: &str = "colorRsbLsb";
    pub const COLOR_XBOX: &str = "colorXbox";
    pub const COLOR_XBOX_PRESSED: &str = "colorXboxPressed";
    pub const COLOR_A: &str = "colorA";
    pub const COLOR_B: &str = "colorB";
    pub const COLOR_X: &str = "colorX";
    pub const COLOR_Y: &str = "colorY";
    pub const COLOR_START_BACK: &str = "colorStartBack";
    pub const COLOR_START_BACK_PRESSED: &str = "colorStartBackPressed";
}

/// Colors used when an option is absent.
pub mod default {
    use crate::color::Color;

    pub const CASE: Color = Color::WHITE;
    pub const PROFILE_NAME: Color = Color::BLACK;
    pub const TRIGGER: Color = Color::rgb(0x61, 0x61, 0x61);
    pub const BUMPER: Color = Color::BLACK;
    pub const DPAD: Color = Color::BLACK;
    pub const DPAD_PRESSED: Color = Color::rgb(0x80, 0x80, 0x80);
    pub const STICK_OUTER_INNER: Color = Color::rgb(0xC0, 0xC0, 0xC0);
    pub const STICK_OUTER_OUTER: Color = Color::rgb(0x71, 0x71, 0x71);
    pub const STICK_KNOB_INNER: Color = Color::BLACK;
    pub const STICK_KNOB_OUTER: Color = Color::rgb(0x40, 0x40, 0x40);
    pub const GUIDE: Color = Color::rgb(0x61, 0x61, 0x61);
    pub const GUIDE_PRESSED: Color = Color::rgb(0x31, 0x31, 0x31);
    pub const START_BACK: Color = Color::rgb(0x61, 0x61, 0x61);
    pub const START_BACK_PRESSED: Color = Color::rgb(0x31, 0x31, 0x31);
    pub const A: Color = Color::rgb(0x6D, 0xA1, 0x3A);
    pub const B: Color = Color::rgb(0xD4, 0x1F, 0x1F);
    pub const X: Color = Color::rgb(0x23, 0x4E, 0xFA);
    pub const Y: Color = Color::rgb(0xFA, 0x9D, 0x23);
    pub const DEBUG_BOUNDS: Color = Color::BLACK;
}

/// Where a family reads its analog triggers from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    /// Analog button values, already in [0, 1].
    Buttons { left: usize, right: usize },
    /// Axes in [-1, 1], rescaled to [0, 1].
    Axes { left: usize, right: usize },
}

/// Where a family reads its D-pad from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DpadSource {
    Buttons { up: usize, down: usize, left: usize, right: usize },
    /// Hat reported as two axes: positive is right / down.
    Axes { horizontal: usize, vertical: usize },
}

/// Raw index table of one family. Two families illustrate the same
/// physical pad because capture environments number its inputs differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawIndexMap {
    /// A, B, X, Y.
    pub face: [usize; 4],
    pub bumper_left: usize,
    pub bumper_right: usize,
    pub triggers: TriggerSource,
    pub back: usize,
    pub start: usize,
    pub guide: usize,
    pub stick_left_button: usize,
    pub stick_right_button: usize,
    /// Horizontal axis of each stick; vertical is the next index.
    pub stick_left_axes: usize,
    pub stick_right_axes: usize,
    pub dpad: DpadSource,
}

/// Everything that distinguishes one hardware family from another.
#[derive(Debug, Clone, Copy)]
pub struct FamilyTable {
    pub min_buttons: usize,
    pub min_axes: usize,
    /// Identifying strings this family recognizes exactly.
    pub known_ids: &'static [&'static str],
    pub indices: RawIndexMap,
    pub button_names: &'static [&'static str],
    pub axis_names: &'static [&'static str],
}

pub static CHROMIUM_XBOX: FamilyTable = FamilyTable {
    min_buttons: 17,
    min_axes: 4,
    known_ids: &[
        "Microsoft Controller (STANDARD GAMEPAD Vendor: 045e Product: 02ea)",
        "©Microsoft Corporation Controller (STANDARD GAMEPAD Vendor: 045e Product: 028e)",
    ],
    indices: RawIndexMap {
        face: [0, 1, 2, 3],
        bumper_left: 4,
        bumper_right: 5,
        triggers: TriggerSource::Buttons { left: 6, right: 7 },
        back: 8,
        start: 9,
        guide: 16,
        stick_left_button: 10,
        stick_right_button: 11,
        stick_left_axes: 0,
        stick_right_axes: 2,
        dpad: DpadSource::Buttons { up: 12, down: 13, left: 14, right: 15 },
    },
    button_names: &[
        "A", "B", "X", "Y", "LB", "RB", "LT", "RT", "BACK", "START", "LSB", "RSB", "D-PAD-UP", "D-PAD-DOWN",
        "D-PAD-LEFT", "D-PAD-RIGHT", "XBOX",
    ],
    axis_names: &["LSB-HORIZONTAL", "LSB-VERTICAL", "RSB-HORIZONTAL", "RSB-VERTICAL"],
};

pub static FIREFOX_XBOX: FamilyTable = FamilyTable {
    min_buttons: 11,
    min_axes: 8,
    known_ids: &["045e-02ea-Microsoft X-Box One S pad", "045e-028e-Microsoft X-Box 360 pad"],
    indices: RawIndexMap {
        face: [0, 1, 2, 3],
        bumper_left: 4,
        bumper_right: 5,
        triggers: TriggerSource::Axes { left: 2, right: 5 },
        back: 6,
        start: 7,
        guide: 8,
        stick_left_button: 9,
        stick_right_button: 10,
        stick_left_axes: 0,
        stick_right_axes: 3,
        dpad: DpadSource::Axes { horizontal: 6, vertical: 7 },
    },
    button_names: &["A", "B", "X", "Y", "LB", "RB", "BACK", "START", "XBOX", "LSB", "RSB"],
    axis_names: &[
        "LSB-HORIZONTAL",
        "LSB-VERTICAL",
        "LT",
        "RSB-HORIZONTAL",
        "RSB-VERTICAL",
        "RT",
        "D-PAD-HORIZONTAL",
        "D-PAD-VERTICAL",
    ],
};

pub const UNKNOWN_NAME: &str = "Unknown";
/// Length of the filler name list of the fallback profile.
pub const UNKNOWN_MAPPING_LEN: usize = 100;

/// Elements drawn by the hardware families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    TriggerLeft,
    TriggerRight,
    BumperLeft,
    BumperRight,
    Case,
    FaceButtons,
    StickLeft,
    StickRight,
    DPad,
    Back,
    Start,
    Guide,
    ProfileName,
}

impl Element {
    /// Center of the element relative to the controller's top-left anchor.
    pub fn offset(self) -> Point {
        let w = CASE.width;
        match self {
            Element::TriggerLeft => Point::new(w / 5.0 + TRIGGER.width / 2.0, TRIGGER.height / 2.0),
            Element::TriggerRight => Point::new(w * 4.0 / 5.0 - TRIGGER.width / 2.0, TRIGGER.height / 2.0),
            Element::BumperLeft => Point::new(w * 3.0 / 20.0 + BUMPER.width / 2.0, BUMPER.height / 2.0 + 33.0),
            Element::BumperRight => Point::new(w * 17.0 / 20.0 - BUMPER.width / 2.0, BUMPER.height / 2.0 + 33.0),
            Element::Case => Point::new(w / 2.0, CASE.height / 2.0 + CASE_TOP_MARGIN),
            Element::FaceButtons => Point::new(w * 0.825 - FACE_GROUP.width / 2.0, FACE_GROUP.height / 2.0 + 70.0),
            Element::StickLeft => Point::new(w * 0.175 + STICK.width / 2.0, STICK.height / 2.0 + 75.0),
            Element::StickRight => Point::new(w * 0.7 - STICK.width / 2.0, STICK.height / 2.0 + 170.0),
            Element::DPad => Point::new(w * 0.3 + DPAD.width / 2.0, DPAD.height / 2.0 + 175.0),
            Element::Back => Point::new(w * 0.4 + START_BACK.width / 2.0, START_BACK.height / 2.0 + 105.0),
            Element::Start => Point::new(w * 0.6 - START_BACK.width / 2.0, START_BACK.height / 2.0 + 105.0),
            Element::Guide => Point::new(w / 2.0, GUIDE.height / 2.0 + 65.0),
            Element::ProfileName => Point::new(w / 2.0, NAME_LABEL_SIZE),
        }
    }
}

/// Face button label, option id and default color, in A, B, X, Y order.
pub const FACE_BUTTONS: [(&str, &str, Color); 4] = [
    ("A", option::COLOR_A, default::A),
    ("B", option::COLOR_B, default::B),
    ("X", option::COLOR_X, default::X),
    ("Y", option::COLOR_Y, default::Y),
];
