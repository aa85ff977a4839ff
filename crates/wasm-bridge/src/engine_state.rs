use std::f64::consts::{FRAC_PI_2, FRAC_PI_8};

use serde::{Deserialize, Serialize};

use configurator::{MeshSettings, PricingRules, Session};
use pipe_kernel::geometry::transform::Transform;

/// Screen axis a rotation button turns the preview around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationAxis {
    X,
    Y,
}

/// Preview orientation as intrinsic X-Y-Z Euler angles in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Orientation {
    /// One button press.
    pub const STEP: f64 = FRAC_PI_8;

    /// Turned a quarter around X so the tube lies flat.
    pub const INITIAL: Self = Self {
        x: FRAC_PI_2,
        y: 0.0,
        z: 0.0,
    };

    pub fn rotated(self, axis: RotationAxis, direction: i8) -> Self {
        let delta = Self::STEP * f64::from(direction);
        match axis {
            RotationAxis::X => Self {
                x: self.x + delta,
                ..self
            },
            RotationAxis::Y => Self {
                y: self.y + delta,
                ..self
            },
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::euler_xyz(self.x, self.y, self.z)
    }

    /// Column-major model matrix for the renderer.
    pub fn matrix(&self) -> [f32; 16] {
        self.transform().to_f32_array()
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// The engine state wrapper for the WASM bridge.
///
/// Holds the configurator session and the preview orientation.
pub struct EngineState {
    pub session: Session,
    pub orientation: Orientation,
}

impl EngineState {
    pub fn new() -> Self {
        Self::with_session(Session::new())
    }

    /// Start from JSON mesh settings and pricing rules. Either document may
    /// leave fields out to keep their defaults.
    pub fn from_config_json(settings: &str, rules: &str) -> Result<Self, BridgeError> {
        let config_error = |e: configurator::SettingsError| BridgeError::Config {
            reason: e.to_string(),
        };
        let settings = MeshSettings::from_json(settings).map_err(config_error)?;
        let rules = PricingRules::from_json(rules).map_err(config_error)?;
        let session = Session::with_settings(settings, rules).map_err(config_error)?;
        Ok(Self::with_session(session))
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session,
            orientation: Orientation::INITIAL,
        }
    }

    /// Turn the preview one step. `direction` must be 1 or -1.
    pub fn rotate(&mut self, axis: RotationAxis, direction: i8) -> Result<Orientation, BridgeError> {
        if direction != 1 && direction != -1 {
            return Err(BridgeError::InvalidDirection { direction });
        }
        self.orientation = self.orientation.rotated(axis, direction);
        Ok(self.orientation)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors from the WASM bridge layer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BridgeError {
    #[error("rotation direction must be 1 or -1, got {direction}")]
    InvalidDirection { direction: i8 },

    #[error("invalid configuration: {reason}")]
    Config { reason: String },

    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    #[error("not implemented: {operation}")]
    NotImplemented { operation: String },
}
