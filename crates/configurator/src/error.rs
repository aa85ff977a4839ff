use pipe_kernel::KernelError;
use pipe_types::Field;

/// Why a field edit was refused. The configuration stays as it was.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidFieldUpdate {
    #[error("{field} expects a finite number, got {input:?}")]
    NotANumber { field: Field, input: String },

    #[error("wall thickness {requested} mm exceeds the {max_allowed} mm allowed for this diameter")]
    ThicknessExceedsLimit { requested: f64, max_allowed: f64 },
}

/// Invalid mesh settings or pricing rules.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("mesh needs at least {minimum} segments, got {provided}")]
    TooFewSegments { minimum: usize, provided: usize },

    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("{name} must be finite and positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("pricing rules are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the geometry generator.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error(
        "degenerate geometry: diameter {outer_diameter} mm, wall {wall_thickness} mm, length {length} mm"
    )]
    DegenerateGeometry {
        outer_diameter: f64,
        wall_thickness: f64,
        length: f64,
    },

    #[error("invalid mesh settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("generated solid failed its topology audit with {error_count} errors")]
    InvalidTopology { error_count: usize },
}
