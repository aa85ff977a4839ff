use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bounds::FieldBounds;

/// An editable field of a [`PipeConfiguration`](crate::PipeConfiguration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    OuterDiameter,
    WallThickness,
    Length,
    Color,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::OuterDiameter,
        Field::WallThickness,
        Field::Length,
        Field::Color,
    ];

    /// Dimension fields change the solid; color only changes its surface.
    pub fn is_dimension(&self) -> bool {
        !matches!(self, Field::Color)
    }

    /// Slider bounds for dimension fields.
    pub fn bounds(&self) -> Option<FieldBounds> {
        match self {
            Field::OuterDiameter => Some(FieldBounds::OUTER_DIAMETER),
            Field::WallThickness => Some(FieldBounds::WALL_THICKNESS),
            Field::Length => Some(FieldBounds::LENGTH),
            Field::Color => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::OuterDiameter => "outer_diameter",
            Field::WallThickness => "wall_thickness",
            Field::Length => "length",
            Field::Color => "color",
        };
        f.write_str(name)
    }
}

/// A raw value coming from an input control, before validation.
///
/// Range inputs deliver text; programmatic callers usually pass numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Interpret the value as a number.
    ///
    /// Text is read like a lenient float parser: leading whitespace is
    /// skipped and the longest numeric prefix wins (`"12.5mm"` is `12.5`).
    /// Anything without a numeric prefix is NaN.
    pub fn to_number(&self) -> f64 {
        match self {
            RawValue::Number(n) => *n,
            RawValue::Text(s) => parse_leading_float(s),
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            RawValue::Number(n) => n.to_string(),
            RawValue::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

fn parse_leading_float(s: &str) -> f64 {
    let s = s.trim_start();
    (1..=s.len())
        .rev()
        .filter(|&end| s.is_char_boundary(end))
        .find_map(|end| {
            let prefix = &s[..end];
            // `f64::from_str` also accepts "nan"/"inf" spellings; only digits count here.
            if prefix.chars().any(|c| c.is_ascii_digit()) {
                prefix.parse::<f64>().ok()
            } else {
                None
            }
        })
        .unwrap_or(f64::NAN)
}
