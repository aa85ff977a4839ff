use serde::{Deserialize, Serialize};

pub const MIN_DIAMETER: f64 = 50.0;
pub const MAX_DIAMETER: f64 = 300.0;
pub const MIN_THICKNESS: f64 = 2.0;
pub const MAX_THICKNESS: f64 = 15.0;
pub const MIN_LENGTH: f64 = 500.0;
pub const MAX_LENGTH: f64 = 6000.0;

/// Range and step of a dimension control, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl FieldBounds {
    pub const OUTER_DIAMETER: Self = Self {
        min: MIN_DIAMETER,
        max: MAX_DIAMETER,
        step: 1.0,
    };
    pub const WALL_THICKNESS: Self = Self {
        min: MIN_THICKNESS,
        max: MAX_THICKNESS,
        step: 0.5,
    };
    pub const LENGTH: Self = Self {
        min: MIN_LENGTH,
        max: MAX_LENGTH,
        step: 100.0,
    };

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp into range and round to the nearest step counted from `min`.
    pub fn snap(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        (self.min + steps * self.step).min(self.max)
    }

    /// Number of distinct slider positions.
    pub fn positions(&self) -> usize {
        ((self.max - self.min) / self.step).round() as usize + 1
    }

    /// Value at slider position `index` (clamped to the last position).
    pub fn value_at(&self, index: usize) -> f64 {
        let index = index.min(self.positions() - 1);
        self.min + index as f64 * self.step
    }
}
