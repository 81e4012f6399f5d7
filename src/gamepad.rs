//! Raw controller snapshots as delivered by the polling side.

/// One button reading. `value` is analog in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ButtonReading {
    pub value: f32,
    pub pressed: bool,
    pub touched: bool,
}

impl ButtonReading {
    pub fn new(value: f32) -> Self {
        ButtonReading { value, pressed: value > 0.0, touched: value > 0.0 }
    }

    /// Two-state reading, matching how buttons are drawn: anything above zero is down.
    pub fn is_down(&self) -> bool {
        self.value > 0.0
    }
}

/// One polling tick of a connected controller. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct RawControllerState {
    pub index: u32,
    pub id: String,
    pub buttons: Vec<ButtonReading>,
    pub axes: Vec<f32>,
}

impl RawControllerState {
    pub fn new(index: u32, id: impl Into<String>, buttons: Vec<ButtonReading>, axes: Vec<f32>) -> Self {
        RawControllerState { index, id: id.into(), buttons, axes }
    }

    /// All buttons released, all axes centered.
    pub fn idle(index: u32, id: impl Into<String>, button_count: usize, axis_count: usize) -> Self {
        Self::new(index, id, vec![ButtonReading::default(); button_count], vec![0.0; axis_count])
    }

    /// Reading at `i`, released when the controller reports fewer buttons.
    pub fn button(&self, i: usize) -> ButtonReading {
        self.buttons.get(i).copied().unwrap_or_default()
    }

    /// Axis at `i`, centered when the controller reports fewer axes.
    pub fn axis(&self, i: usize) -> f32 {
        self.axes.get(i).copied().unwrap_or(0.0)
    }

    /// Same controller identity with new readings.
    pub fn with_readings(&self, buttons: Vec<ButtonReading>, axes: Vec<f32>) -> Self {
        RawControllerState { index: self.index, id: self.id.clone(), buttons, axes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_reads_are_neutral() {
        let s = RawControllerState::idle(0, "pad", 2, 1);
        assert!(!s.button(40).is_down());
        assert_eq!(s.axis(9), 0.0);
    }

    #[test]
    fn reading_from_value() {
        let b = ButtonReading::new(0.3);
        assert!(b.pressed && b.touched && b.is_down());
        assert!(!ButtonReading::new(0.0).pressed);
    }
}
