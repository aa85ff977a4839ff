use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use pipe_types::{Field, PipeConfiguration, RawValue};

use crate::error::SettingsError;
use crate::generator::{MaterialDescription, PipeMesh, build_mesh_with};
use crate::pricing::PricingRules;
use crate::settings::MeshSettings;
use crate::validate::try_update_field;

/// What happened to a single edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum EditOutcome {
    /// The field took the requested value.
    Applied,
    /// The field took the requested value and the wall thickness was reset.
    AutoCorrected,
    /// The edit was refused; the configuration is unchanged.
    Rejected { reason: String },
    /// The requested value equals the current one.
    Unchanged,
}

/// Serializable snapshot of a session for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub config: PipeConfiguration,
    pub price: f64,
    pub multiplier: f64,
    pub custom_color: bool,
    /// Catalogue name of the finish, or "Custom".
    pub finish_name: String,
}

/// One configurator session: the current configuration and everything derived from it.
///
/// Edits go through the validator; price is recomputed on every change and
/// the mesh only when a dimension changes.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    config: PipeConfiguration,
    price: f64,
    mesh: Option<PipeMesh>,
    mesh_revision: u64,
    settings: MeshSettings,
    rules: PricingRules,
}

impl Session {
    pub fn new() -> Self {
        Self::start(MeshSettings::default(), PricingRules::default())
    }

    /// Session with custom mesh settings and pricing rules.
    pub fn with_settings(settings: MeshSettings, rules: PricingRules) -> Result<Self, SettingsError> {
        settings.validate()?;
        rules.validate()?;
        Ok(Self::start(settings, rules))
    }

    fn start(settings: MeshSettings, rules: PricingRules) -> Self {
        let mut session = Self {
            id: Uuid::new_v4(),
            config: PipeConfiguration::default(),
            price: 0.0,
            mesh: None,
            mesh_revision: 0,
            settings,
            rules,
        };
        session.reprice();
        session.rebuild_mesh();
        info!(session = %session.id, price = session.price, "session started");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &PipeConfiguration {
        &self.config
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// The current mesh, absent when the configuration has no valid solid.
    pub fn mesh(&self) -> Option<&PipeMesh> {
        self.mesh.as_ref()
    }

    /// Incremented every time the mesh is rebuilt.
    pub fn mesh_revision(&self) -> u64 {
        self.mesh_revision
    }

    pub fn apply_edit(&mut self, field: Field, raw: &RawValue) -> EditOutcome {
        let update = match try_update_field(&self.config, field, raw) {
            Ok(update) => update,
            Err(e) => {
                warn!(session = %self.id, %field, error = %e, "edit rejected");
                return EditOutcome::Rejected {
                    reason: e.to_string(),
                };
            }
        };

        if update.config == self.config {
            debug!(session = %self.id, %field, "edit left configuration unchanged");
            return EditOutcome::Unchanged;
        }

        let geometry_changed = field.is_dimension() && !update.config.same_geometry(&self.config);
        self.config = update.config;
        self.reprice();
        if geometry_changed {
            self.rebuild_mesh();
        } else if let Some(mesh) = self.mesh.as_mut() {
            mesh.material = MaterialDescription::for_color(&self.config.color);
        }

        info!(
            session = %self.id,
            %field,
            auto_corrected = update.auto_corrected,
            price = self.price,
            "edit applied"
        );
        if update.auto_corrected {
            EditOutcome::AutoCorrected
        } else {
            EditOutcome::Applied
        }
    }

    /// True when the color is not one of the catalogue finishes.
    pub fn is_custom_color(&self) -> bool {
        self.config.color.is_custom()
    }

    pub fn summary(&self) -> SessionSummary {
        let finish_name = match self.config.color.standard_finish() {
            Some(finish) => finish.name().to_string(),
            None => "Custom".to_string(),
        };
        SessionSummary {
            config: self.config.clone(),
            price: self.price,
            multiplier: self.rules.multiplier(&self.config.color),
            custom_color: self.is_custom_color(),
            finish_name,
        }
    }

    fn reprice(&mut self) {
        self.price = self.rules.price(&self.config);
    }

    fn rebuild_mesh(&mut self) {
        self.mesh_revision += 1;
        self.mesh = match build_mesh_with(&self.config, &self.settings) {
            Ok(mesh) => Some(mesh),
            Err(e) => {
                warn!(session = %self.id, error = %e, "no mesh for configuration");
                None
            }
        };
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipe_types::StandardFinish;

    #[test]
    fn test_new_session_is_priced_and_meshed() {
        let session = Session::new();
        assert_eq!(session.price(), 70.93);
        assert!(session.mesh().is_some());
        assert_eq!(session.mesh_revision(), 1);
        assert!(!session.is_custom_color());
    }

    #[test]
    fn test_color_edit_does_not_rebuild_mesh() {
        let mut session = Session::new();
        let outcome = session.apply_edit(Field::Color, &StandardFinish::Blue.hex().into());
        assert_eq!(outcome, EditOutcome::Applied);
        assert_eq!(session.mesh_revision(), 1);
        let material = &session.mesh().unwrap().material;
        assert_eq!(material.base_color.as_str(), "#3b82f6");
        assert_eq!(material.rgb, [59.0 / 255.0, 130.0 / 255.0, 246.0 / 255.0]);
        assert_eq!(session.summary().finish_name, "Blue");
        assert_eq!(session.summary().multiplier, 1.25);
    }

    #[test]
    fn test_dimension_edit_rebuilds_mesh() {
        let mut session = Session::new();
        let outcome = session.apply_edit(Field::Length, &"1500".into());
        assert_eq!(outcome, EditOutcome::Applied);
        assert_eq!(session.mesh_revision(), 2);
        assert!(session.price() < 70.93);
    }

    #[test]
    fn test_rejected_edit_keeps_everything() {
        let mut session = Session::new();
        let before = session.summary();
        let outcome = session.apply_edit(Field::WallThickness, &RawValue::from(100.0));
        assert!(matches!(outcome, EditOutcome::Rejected { .. }));
        assert_eq!(session.summary(), before);
        assert_eq!(session.mesh_revision(), 1);
    }

    #[test]
    fn test_same_value_is_unchanged() {
        let mut session = Session::new();
        let outcome = session.apply_edit(Field::OuterDiameter, &"200".into());
        assert_eq!(outcome, EditOutcome::Unchanged);
        assert_eq!(session.mesh_revision(), 1);
    }

    #[test]
    fn test_auto_correction_is_reported() {
        let mut session = Session::new();
        let outcome = session.apply_edit(Field::OuterDiameter, &RawValue::from(10.0));
        assert_eq!(outcome, EditOutcome::AutoCorrected);
        assert_eq!(session.config().wall_thickness, 3.0);
        assert!(session.mesh().is_some());
    }

    #[test]
    fn test_collapsed_bore_drops_mesh() {
        let mut session = Session::new();
        session.apply_edit(Field::OuterDiameter, &RawValue::from(4.0));
        assert_eq!(session.config().wall_thickness, 0.0);
        assert!(session.mesh().is_none());
        assert_eq!(session.price(), 0.0);
    }

    #[test]
    fn test_custom_color_summary() {
        let mut session = Session::new();
        session.apply_edit(Field::Color, &"#123abc".into());
        let summary = session.summary();
        assert!(summary.custom_color);
        assert_eq!(summary.finish_name, "Custom");
        assert_eq!(summary.multiplier, 1.5);
    }

    #[test]
    fn test_invalid_settings_are_refused() {
        let settings = MeshSettings {
            segments: 16,
            ..MeshSettings::default()
        };
        assert!(Session::with_settings(settings, PricingRules::default()).is_err());
    }
}
