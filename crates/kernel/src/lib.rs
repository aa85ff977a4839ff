pub mod geometry;
pub mod operations;
pub mod topology;
pub mod validation;

pub use operations::extrude::{AnnularProfile, ExtrudeOptions, extrude_annulus};
pub use topology::brep::{EntityStore, SolidId};
pub use validation::audit::verify_topology;
pub use validation::volume::{MassProperties, mass_properties};

/// Global tolerance configuration for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Points closer than this are considered coincident (meters).
    pub coincidence: f64,
    /// Relative tolerance for volume and area comparisons.
    pub relative: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            coincidence: 1e-9,
            relative: 1e-9,
        }
    }
}

impl Tolerance {
    pub fn points_coincident(&self, a: &geometry::point::Point3d, b: &geometry::point::Point3d) -> bool {
        a.distance_to(b) < self.coincidence
    }

    pub fn is_zero_length(&self, length: f64) -> bool {
        length.abs() < self.coincidence
    }
}

/// Default tolerance used by kernel operations.
pub fn default_tolerance() -> Tolerance {
    Tolerance::default()
}

/// Errors raised by kernel operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    #[error("need at least {required} segments, got {provided}")]
    InsufficientSegments { required: usize, provided: usize },

    #[error("{parameter} must be positive and finite, got {value}")]
    InvalidDimension { parameter: &'static str, value: f64 },

    #[error("inner radius {inner} must be smaller than outer radius {outer}")]
    ClosedBore { outer: f64, inner: f64 },

    #[error("chamfer {chamfer} too large for wall {wall} and length {length}")]
    ChamferTooLarge { chamfer: f64, wall: f64, length: f64 },

    #[error("face cannot be triangulated: {reason}")]
    UnsupportedFace { reason: String },
}
