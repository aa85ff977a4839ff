use tracing::debug;

use pipe_types::{Field, RawValue};

use crate::engine_state::{BridgeError, EngineState};
use crate::messages::{EngineToUi, UiToEngine};

/// Dispatch a UI message to the engine and return a response.
///
/// This is the main entry point for processing messages from the JavaScript
/// main thread. Failures are reported as an `Error` response.
pub fn dispatch(state: &mut EngineState, msg: UiToEngine) -> EngineToUi {
    match handle_message(state, msg) {
        Ok(response) => response,
        Err(e) => EngineToUi::Error {
            message: e.to_string(),
        },
    }
}

/// Parse a JSON `UiToEngine`, dispatch it and serialize the response.
pub fn process_json(state: &mut EngineState, json_input: &str) -> String {
    let response = match serde_json::from_str::<UiToEngine>(json_input) {
        Ok(msg) => dispatch(state, msg),
        Err(e) => EngineToUi::Error {
            message: format!("Failed to parse message: {e}"),
        },
    };
    to_json(&response)
}

/// Serialize a response. A failure becomes an `Error` message in JSON.
pub fn to_json(response: &EngineToUi) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| {
        let error = EngineToUi::Error {
            message: BridgeError::Serialization {
                reason: e.to_string(),
            }
            .to_string(),
        };
        serde_json::to_string(&error).unwrap_or_default()
    })
}

fn handle_message(state: &mut EngineState, msg: UiToEngine) -> Result<EngineToUi, BridgeError> {
    match msg {
        UiToEngine::UpdateField { field, value } => {
            let value = slider_value(field, value);
            let revision = state.session.mesh_revision();
            let outcome = state.session.apply_edit(field, &value);
            let geometry_changed = state.session.mesh_revision() != revision;
            debug!(%field, ?outcome, geometry_changed, "field update dispatched");
            Ok(EngineToUi::ConfigurationUpdated {
                summary: state.session.summary(),
                outcome,
                geometry_changed,
                mesh: if geometry_changed {
                    state.session.mesh().cloned()
                } else {
                    None
                },
            })
        }

        UiToEngine::Rotate { axis, direction } => {
            let orientation = state.rotate(axis, direction)?;
            Ok(EngineToUi::OrientationChanged { orientation })
        }

        UiToEngine::GetState => Ok(EngineToUi::State {
            summary: state.session.summary(),
            orientation: state.orientation,
            mesh: state.session.mesh().cloned(),
        }),

        UiToEngine::AddToQuote => Err(BridgeError::NotImplemented {
            operation: "AddToQuote".to_string(),
        }),
    }
}

/// Bring a dimension value onto its slider: clamped to the range and
/// rounded to the step, as a range input does. Colors and unparseable text
/// pass through for the validator to judge.
fn slider_value(field: Field, value: RawValue) -> RawValue {
    let Some(bounds) = field.bounds() else {
        return value;
    };
    let number = value.to_number();
    if !number.is_finite() {
        return value;
    }
    let snapped = bounds.snap(number);
    if !bounds.contains(number) {
        debug!(%field, requested = number, snapped, "value outside slider range");
    }
    RawValue::Number(snapped)
}
