//! Locally tracked movement speeds
//!
//! The camera never reports these back, they only shape outgoing
//! movement commands.

use std::ops::RangeInclusive;

/// Movement axis with its own speed setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Pan,
    Tilt,
    Zoom,
    Focus,
}

impl Axis {
    /// Speeds accepted by the device for this axis
    pub fn range(self) -> RangeInclusive<u8> {
        match self {
            Self::Pan => 1..=24,
            Self::Tilt => 1..=20,
            Self::Zoom => 1..=7,
            Self::Focus => 1..=8,
        }
    }
}

/// Current speed per axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Speeds {
    pub pan: u8,
    pub tilt: u8,
    pub zoom: u8,
    pub focus: u8,
}

impl Speeds {
    pub fn get(&self, axis: Axis) -> u8 {
        match axis {
            Axis::Pan => self.pan,
            Axis::Tilt => self.tilt,
            Axis::Zoom => self.zoom,
            Axis::Focus => self.focus,
        }
    }

    /// Set a speed, clamped into the axis range. Returns the stored value.
    pub fn set(&mut self, axis: Axis, speed: u8) -> u8 {
        let range = axis.range();
        let speed = speed.clamp(*range.start(), *range.end());
        *self.slot(axis) = speed;
        speed
    }

    /// Raise a speed by one, saturating at the top of the range
    pub fn step_up(&mut self, axis: Axis) -> u8 {
        let current = self.get(axis);
        self.set(axis, current.saturating_add(1))
    }

    /// Lower a speed by one, saturating at the bottom of the range
    pub fn step_down(&mut self, axis: Axis) -> u8 {
        let current = self.get(axis);
        self.set(axis, current.saturating_sub(1))
    }

    fn slot(&mut self, axis: Axis) -> &mut u8 {
        match axis {
            Axis::Pan => &mut self.pan,
            Axis::Tilt => &mut self.tilt,
            Axis::Zoom => &mut self.zoom,
            Axis::Focus => &mut self.focus,
        }
    }
}

impl Default for Speeds {
    fn default() -> Self {
        Self {
            pan: 12,
            tilt: 10,
            zoom: 3,
            focus: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_defaults() {
        let speeds = Speeds::default();
        assert_eq!(speeds.get(Axis::Pan), 12);
        assert_eq!(speeds.get(Axis::Tilt), 10);
        assert_eq!(speeds.get(Axis::Zoom), 3);
        assert_eq!(speeds.get(Axis::Focus), 5);
    }

    #[test]
    fn test_speed_clamping() {
        let mut speeds = Speeds::default();

        assert_eq!(speeds.set(Axis::Pan, 30), 24);
        assert_eq!(speeds.set(Axis::Tilt, 0), 1);
        assert_eq!(speeds.step_up(Axis::Pan), 24);

        speeds.set(Axis::Zoom, 1);
        assert_eq!(speeds.step_down(Axis::Zoom), 1);
        assert_eq!(speeds.step_up(Axis::Zoom), 2);
    }
}
