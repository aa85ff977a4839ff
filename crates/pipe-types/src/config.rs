use serde::{Deserialize, Serialize};

use crate::finish::FinishColor;

/// The pipe being configured. All dimensions are in millimeters.
///
/// A configuration handed to pricing or geometry satisfies
/// `wall_thickness < outer_diameter / 2`. That is maintained by the field
/// validator, not by this type: the struct is a plain data carrier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeConfiguration {
    pub outer_diameter: f64,
    pub wall_thickness: f64,
    pub length: f64,
    pub color: FinishColor,
}

impl PipeConfiguration {
    pub const DEFAULT_OUTER_DIAMETER: f64 = 200.0;
    pub const DEFAULT_WALL_THICKNESS: f64 = 8.0;
    pub const DEFAULT_LENGTH: f64 = 3000.0;

    pub fn new(outer_diameter: f64, wall_thickness: f64, length: f64, color: FinishColor) -> Self {
        Self {
            outer_diameter,
            wall_thickness,
            length,
            color,
        }
    }

    pub fn outer_radius(&self) -> f64 {
        self.outer_diameter / 2.0
    }

    pub fn inner_radius(&self) -> f64 {
        self.outer_radius() - self.wall_thickness
    }

    /// True when the wall leaves a bore, i.e. `2 * wall_thickness < outer_diameter`.
    pub fn has_open_bore(&self) -> bool {
        self.wall_thickness * 2.0 < self.outer_diameter
    }

    /// True when both configurations describe the same solid (color ignored).
    pub fn same_geometry(&self, other: &Self) -> bool {
        self.outer_diameter == other.outer_diameter
            && self.wall_thickness == other.wall_thickness
            && self.length == other.length
    }
}

impl Default for PipeConfiguration {
    fn default() -> Self {
        Self {
            outer_diameter: Self::DEFAULT_OUTER_DIAMETER,
            wall_thickness: Self::DEFAULT_WALL_THICKNESS,
            length: Self::DEFAULT_LENGTH,
            color: FinishColor::default(),
        }
    }
}
