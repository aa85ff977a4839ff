use serde::{Deserialize, Serialize};

use pipe_types::{Field, FinishColor, PipeConfiguration, RawValue};

use crate::error::InvalidFieldUpdate;

/// Margin kept between the wall and the pipe axis when the thickness is edited.
pub const THICKNESS_MARGIN_MM: f64 = 1.0;

/// Margin left when a diameter edit forces the thickness down.
pub const AUTO_CORRECTION_MARGIN_MM: f64 = 2.0;

/// The configuration produced by an accepted edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldUpdate {
    pub config: PipeConfiguration,
    /// The wall thickness was changed along with the edited field.
    pub auto_corrected: bool,
}

/// Apply one field edit, reporting why it was refused if it was.
///
/// Rules:
/// - wall thickness above `outer_diameter / 2 - 1` is refused outright;
/// - a diameter whose radius is not larger than the current thickness also
///   resets the thickness to `radius - 2`. No lower bound applies;
/// - length and color are replaced as given.
///
/// Dimension text is parsed leniently; NaN and infinities are refused.
pub fn try_update_field(
    current: &PipeConfiguration,
    field: Field,
    raw: &RawValue,
) -> Result<FieldUpdate, InvalidFieldUpdate> {
    let mut next = current.clone();
    let mut auto_corrected = false;

    match field {
        Field::Color => next.color = FinishColor::new(raw.to_text()),
        Field::WallThickness => {
            let value = finite_number(field, raw)?;
            let max_allowed = current.outer_radius() - THICKNESS_MARGIN_MM;
            if value > max_allowed {
                return Err(InvalidFieldUpdate::ThicknessExceedsLimit {
                    requested: value,
                    max_allowed,
                });
            }
            next.wall_thickness = value;
        }
        Field::OuterDiameter => {
            let value = finite_number(field, raw)?;
            let new_radius = value / 2.0;
            next.outer_diameter = value;
            if current.wall_thickness >= new_radius {
                next.wall_thickness = new_radius - AUTO_CORRECTION_MARGIN_MM;
                auto_corrected = true;
            }
        }
        Field::Length => next.length = finite_number(field, raw)?,
    }

    Ok(FieldUpdate {
        config: next,
        auto_corrected,
    })
}

fn finite_number(field: Field, raw: &RawValue) -> Result<f64, InvalidFieldUpdate> {
    let value = raw.to_number();
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InvalidFieldUpdate::NotANumber {
            field,
            input: raw.to_text(),
        })
    }
}

/// Apply one field edit. Refused edits return the configuration unchanged.
pub fn update_field(current: &PipeConfiguration, field: Field, raw: &RawValue) -> PipeConfiguration {
    match try_update_field(current, field, raw) {
        Ok(update) => update.config,
        Err(_) => current.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipe_types::StandardFinish;

    fn defaults() -> PipeConfiguration {
        PipeConfiguration::default()
    }

    #[test]
    fn test_oversize_thickness_is_rejected() {
        let config = defaults();
        let next = update_field(&config, Field::WallThickness, &RawValue::from(100.0));
        assert_eq!(next, config);

        let err = try_update_field(&config, Field::WallThickness, &"100".into()).unwrap_err();
        assert_eq!(
            err,
            InvalidFieldUpdate::ThicknessExceedsLimit {
                requested: 100.0,
                max_allowed: 99.0
            }
        );
    }

    #[test]
    fn test_thickness_at_limit_is_accepted() {
        let next = update_field(&defaults(), Field::WallThickness, &RawValue::from(99.0));
        assert_eq!(next.wall_thickness, 99.0);
    }

    #[test]
    fn test_shrinking_diameter_corrects_thickness() {
        let update = try_update_field(&defaults(), Field::OuterDiameter, &RawValue::from(10.0)).unwrap();
        assert!(update.auto_corrected);
        assert_eq!(update.config.outer_diameter, 10.0);
        assert_eq!(update.config.wall_thickness, 3.0);
    }

    #[test]
    fn test_auto_correction_has_no_floor() {
        // Radius 2 against thickness 8 leaves no wall at all.
        let next = update_field(&defaults(), Field::OuterDiameter, &RawValue::from(4.0));
        assert_eq!(next.wall_thickness, 0.0);

        let next = update_field(&defaults(), Field::OuterDiameter, &RawValue::from(2.0));
        assert_eq!(next.wall_thickness, -1.0);
    }

    #[test]
    fn test_diameter_change_keeps_valid_thickness() {
        let update = try_update_field(&defaults(), Field::OuterDiameter, &"120".into()).unwrap();
        assert!(!update.auto_corrected);
        assert_eq!(update.config.wall_thickness, 8.0);
        assert_eq!(update.config.outer_diameter, 120.0);
    }

    #[test]
    fn test_thickness_equal_to_radius_triggers_correction() {
        // 16 mm diameter: radius 8 equals the current thickness.
        let next = update_field(&defaults(), Field::OuterDiameter, &RawValue::from(16.0));
        assert_eq!(next.wall_thickness, 6.0);
    }

    #[test]
    fn test_unparsable_dimension_is_rejected() {
        let config = defaults();
        for input in ["", "abc", "NaN", "inf"] {
            let result = try_update_field(&config, Field::Length, &input.into());
            assert!(
                matches!(result, Err(InvalidFieldUpdate::NotANumber { field: Field::Length, .. })),
                "{input:?} gave {result:?}"
            );
        }
        assert_eq!(update_field(&config, Field::OuterDiameter, &"x".into()), config);
        assert_eq!(
            update_field(&config, Field::Length, &RawValue::from(f64::INFINITY)),
            config
        );
    }

    #[test]
    fn test_text_with_units_is_read_as_number() {
        let next = update_field(&defaults(), Field::Length, &"2500mm".into());
        assert_eq!(next.length, 2500.0);
    }

    #[test]
    fn test_length_and_color_replace_unconditionally() {
        let next = update_field(&defaults(), Field::Length, &RawValue::from(12.0));
        assert_eq!(next.length, 12.0);

        let next = update_field(&defaults(), Field::Color, &"#123456".into());
        assert_eq!(next.color.as_str(), "#123456");
        assert!(next.color.is_custom());

        let next = update_field(&defaults(), Field::Color, &StandardFinish::Red.hex().into());
        assert_eq!(next.color.standard_finish(), Some(StandardFinish::Red));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let config = defaults();
        let snapshot = config.clone();
        let _ = update_field(&config, Field::OuterDiameter, &RawValue::from(10.0));
        assert_eq!(config, snapshot);
    }
}
