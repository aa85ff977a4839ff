//! Pipe configurator: field validation, pricing, geometry generation and
//! the editing session that ties them together.

pub mod error;
pub mod generator;
pub mod pricing;
pub mod session;
pub mod settings;
pub mod validate;

pub use error::{GeneratorError, InvalidFieldUpdate, SettingsError};
pub use generator::{MaterialDescription, PipeMesh, build_mesh, build_mesh_with};
pub use pricing::{FinishMultipliers, PriceBreakdown, PricingRules, price};
pub use session::{EditOutcome, Session, SessionSummary};
pub use settings::MeshSettings;
pub use validate::{FieldUpdate, try_update_field, update_field};
