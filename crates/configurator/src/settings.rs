use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Tessellation and unit settings for the geometry generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshSettings {
    /// Samples around each circle of the cross-section.
    pub segments: usize,
    /// Requested end chamfer in millimeters; 0 for square ends.
    pub chamfer_mm: f64,
    /// Scene units per millimeter.
    pub unit_scale: f64,
}

impl MeshSettings {
    pub const MIN_SEGMENTS: usize = 32;

    /// Load settings from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.segments < Self::MIN_SEGMENTS {
            return Err(SettingsError::TooFewSegments {
                minimum: Self::MIN_SEGMENTS,
                provided: self.segments,
            });
        }
        if !self.chamfer_mm.is_finite() || self.chamfer_mm < 0.0 {
            return Err(SettingsError::Negative {
                name: "chamfer_mm",
                value: self.chamfer_mm,
            });
        }
        if !self.unit_scale.is_finite() || self.unit_scale <= 0.0 {
            return Err(SettingsError::NotPositive {
                name: "unit_scale",
                value: self.unit_scale,
            });
        }
        Ok(())
    }

    /// Square-ended variant of these settings.
    pub fn without_chamfer(self) -> Self {
        Self {
            chamfer_mm: 0.0,
            ..self
        }
    }
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            segments: 64,
            chamfer_mm: 1.0,
            unit_scale: 0.001,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(MeshSettings::default().validate().is_ok());
        assert!(MeshSettings::default().without_chamfer().validate().is_ok());
    }

    #[test]
    fn test_coarse_meshes_are_rejected() {
        let settings = MeshSettings {
            segments: 31,
            ..MeshSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::TooFewSegments { minimum: 32, provided: 31 })
        ));
    }

    #[test]
    fn test_bad_scalars_are_rejected() {
        let negative = MeshSettings {
            chamfer_mm: -0.5,
            ..MeshSettings::default()
        };
        assert!(matches!(negative.validate(), Err(SettingsError::Negative { .. })));

        let zero_scale = MeshSettings {
            unit_scale: 0.0,
            ..MeshSettings::default()
        };
        assert!(matches!(zero_scale.validate(), Err(SettingsError::NotPositive { .. })));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = MeshSettings::from_json(r#"{"segments": 128}"#).unwrap();
        assert_eq!(settings.segments, 128);
        assert_eq!(settings.chamfer_mm, 1.0);
        assert!(matches!(
            MeshSettings::from_json(r#"{"segments": 8}"#),
            Err(SettingsError::TooFewSegments { .. })
        ));
        assert!(matches!(MeshSettings::from_json("{"), Err(SettingsError::Json(_))));
    }
}
