use serde::{Deserialize, Serialize};

use configurator::{EditOutcome, PipeMesh, SessionSummary};
use pipe_types::{Field, RawValue};

use crate::engine_state::{Orientation, RotationAxis};

/// Messages from the UI (JavaScript main thread) to the engine (WASM Worker).
/// Serialized as JSON for postMessage transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UiToEngine {
    /// Edit one field of the configuration. `value` is a number or the raw
    /// text of an input control.
    UpdateField { field: Field, value: RawValue },
    /// Turn the preview by one step around a screen axis.
    Rotate { axis: RotationAxis, direction: i8 },
    /// Ask for the full current state.
    GetState,
    AddToQuote,
}

/// Messages from the engine to the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EngineToUi {
    /// The result of an `UpdateField`.
    ConfigurationUpdated {
        summary: SessionSummary,
        outcome: EditOutcome,
        /// The solid was rebuilt. `mesh` is absent when the new
        /// configuration has no valid solid.
        geometry_changed: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mesh: Option<PipeMesh>,
    },
    OrientationChanged {
        orientation: Orientation,
    },
    State {
        summary: SessionSummary,
        orientation: Orientation,
        mesh: Option<PipeMesh>,
    },
    Error {
        message: String,
    },
}
