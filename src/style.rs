//! Style options: the user-configurable values a profile draws with.
//!
//! Each visualization profile declares an ordered schema of options. The
//! schema is the only authority on what is configurable; `validated` strips
//! anything a stored or merged map carries beyond it.

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Session-wide key: draw everything flat white for alpha-mask export.
pub const DRAW_ALPHA_MASK: &str = "drawAlphaMask";
/// Session-wide key: stroke bounding boxes around every element.
pub const DRAW_DEBUG_BOUNDS: &str = "drawDebugBounds";
/// Free-text display name every configurable profile carries.
pub const PROFILE_NAME: &str = "profileName";

const SESSION_KEYS: [&str; 2] = [DRAW_ALPHA_MASK, DRAW_DEBUG_BOUNDS];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Color,
    Text,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    pub kind: OptionKind,
    pub description: Option<&'static str>,
}

impl OptionDescriptor {
    pub const fn new(id: &'static str, display_name: &'static str, kind: OptionKind) -> Self {
        OptionDescriptor { id, display_name, kind, description: None }
    }

    pub const fn described(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    fn accepts(&self, value: &StyleValue) -> bool {
        match (self.kind, value) {
            (OptionKind::Boolean, StyleValue::Bool(_)) => true,
            (OptionKind::Text, StyleValue::Text(_)) => true,
            (OptionKind::Color, StyleValue::Text(s)) => Color::parse(s).is_some(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Bool(bool),
    Text(String),
}

impl From<bool> for StyleValue {
    fn from(b: bool) -> Self {
        StyleValue::Bool(b)
    }
}

impl From<&str> for StyleValue {
    fn from(s: &str) -> Self {
        StyleValue::Text(s.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(s: String) -> Self {
        StyleValue::Text(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleOptions(BTreeMap<String, StyleValue>);

impl StyleOptions {
    pub fn new() -> Self {
        StyleOptions::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, id: &str, value: impl Into<StyleValue>) -> Self {
        self.set(id, value);
        self
    }

    pub fn set(&mut self, id: &str, value: impl Into<StyleValue>) {
        self.0.insert(id.to_string(), value.into());
    }

    pub fn get(&self, id: &str) -> Option<&StyleValue> {
        self.0.get(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<StyleValue> {
        self.0.remove(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Boolean option; absent or non-boolean reads as `false`.
    pub fn flag(&self, id: &str) -> bool {
        matches!(self.0.get(id), Some(StyleValue::Bool(true)))
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        match self.0.get(id) {
            Some(StyleValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn profile_name(&self) -> Option<&str> {
        self.text(PROFILE_NAME)
    }

    pub fn mask_mode(&self) -> bool {
        self.flag(DRAW_ALPHA_MASK)
    }

    pub fn debug_bounds(&self) -> bool {
        self.flag(DRAW_DEBUG_BOUNDS)
    }

    /// Color for element option `id`: flat white in mask mode, otherwise the
    /// configured color, falling back to `default` when absent or unparseable.
    pub fn fill(&self, id: &str, default: Color) -> Color {
        if self.mask_mode() {
            return Color::WHITE;
        }
        self.color(id).unwrap_or(default)
    }

    /// Configured color for `id`, ignoring mask mode.
    pub fn color(&self, id: &str) -> Option<Color> {
        let raw = self.text(id)?;
        let parsed = Color::parse(raw);
        if parsed.is_none() {
            warn!("style option {id}: unparseable color {raw:?}, using default");
        }
        parsed
    }

    /// `self` overlaid with every entry of `over`.
    pub fn merged(&self, over: &StyleOptions) -> StyleOptions {
        let mut out = self.clone();
        for (k, v) in &over.0 {
            out.0.insert(k.clone(), v.clone());
        }
        out
    }

    pub fn with_mask(mut self, on: bool) -> Self {
        self.set(DRAW_ALPHA_MASK, on);
        self
    }

    pub fn with_debug(mut self, on: bool) -> Self {
        self.set(DRAW_DEBUG_BOUNDS, on);
        self
    }

    /// Keep only entries declared in `schema` (with a value of the declared
    /// kind) plus the session keys.
    pub fn validated(&self, schema: &[OptionDescriptor]) -> StyleOptions {
        let mut out = StyleOptions::new();
        for (id, value) in &self.0 {
            if SESSION_KEYS.contains(&id.as_str()) {
                if matches!(value, StyleValue::Bool(_)) {
                    out.0.insert(id.clone(), value.clone());
                }
                continue;
            }
            match schema.iter().find(|d| d.id == id.as_str()) {
                Some(desc) if desc.accepts(value) => {
                    out.0.insert(id.clone(), value.clone());
                }
                Some(desc) => warn!("style option {id}: value {value:?} is not a valid {:?}, dropped", desc.kind),
                None => warn!("style option {id}: not declared by this profile, dropped"),
            }
        }
        out
    }
}
