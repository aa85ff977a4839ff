//! PipeScenario: scripts a configurator session in tests.
//!
//! Wraps `wasm_bridge::process_json()` so scenarios exercise the same JSON
//! path the web worker uses, not a simulation of it.

use configurator::{EditOutcome, PipeMesh, SessionSummary};
use pipe_types::{Field, PipeConfiguration};
use serde_json::{json, Value};
use wasm_bridge::messages::EngineToUi;
use wasm_bridge::{EngineState, Orientation, RotationAxis};

use crate::assertions;
use crate::helpers::HarnessError;

/// The parts of a `ConfigurationUpdated` response a scenario inspects.
#[derive(Debug, Clone)]
pub struct EditResult {
    pub summary: SessionSummary,
    pub outcome: EditOutcome,
    pub geometry_changed: bool,
    pub mesh: Option<PipeMesh>,
}

/// A scripted editing session against a fresh engine.
pub struct PipeScenario {
    pub state: EngineState,
    history: Vec<(String, String)>,
}

impl PipeScenario {
    pub fn new() -> Self {
        Self {
            state: EngineState::new(),
            history: Vec::new(),
        }
    }

    /// Send a raw JSON message and return the raw JSON response.
    pub fn send_json(&mut self, message: &Value) -> Result<Value, HarnessError> {
        let input = message.to_string();
        let output = wasm_bridge::process_json(&mut self.state, &input);
        self.history.push((input, output.clone()));
        Ok(serde_json::from_str(&output)?)
    }

    /// Send a message and decode the typed response. `Error` responses
    /// become `HarnessError::DispatchError`.
    pub fn send(&mut self, message: &Value) -> Result<EngineToUi, HarnessError> {
        let response = self.send_json(message)?;
        match serde_json::from_value(response)? {
            EngineToUi::Error { message } => Err(HarnessError::DispatchError { message }),
            other => Ok(other),
        }
    }

    /// Edit one field. `value` is passed through as the input control would
    /// send it: a JSON number or a string.
    pub fn set(&mut self, field: Field, value: Value) -> Result<EditResult, HarnessError> {
        let message = json!({ "type": "UpdateField", "field": field.to_string(), "value": value });
        match self.send(&message)? {
            EngineToUi::ConfigurationUpdated {
                summary,
                outcome,
                geometry_changed,
                mesh,
            } => Ok(EditResult {
                summary,
                outcome,
                geometry_changed,
                mesh,
            }),
            other => Err(unexpected("ConfigurationUpdated", &other)),
        }
    }

    pub fn rotate(&mut self, axis: RotationAxis, direction: i8) -> Result<Orientation, HarnessError> {
        let message = json!({ "type": "Rotate", "axis": axis, "direction": direction });
        match self.send(&message)? {
            EngineToUi::OrientationChanged { orientation } => Ok(orientation),
            other => Err(unexpected("OrientationChanged", &other)),
        }
    }

    /// Ask the engine for its full state.
    pub fn snapshot(&mut self) -> Result<(SessionSummary, Orientation, Option<PipeMesh>), HarnessError> {
        match self.send(&json!({ "type": "GetState" }))? {
            EngineToUi::State {
                summary,
                orientation,
                mesh,
            } => Ok((summary, orientation, mesh)),
            other => Err(unexpected("State", &other)),
        }
    }

    pub fn config(&self) -> &PipeConfiguration {
        self.state.session.config()
    }

    /// Messages sent so far with their responses, as JSON text.
    pub fn history(&self) -> &[(String, String)] {
        &self.history
    }

    // ── Inline assertions ───────────────────────────────────────────────

    /// Assert the current session price, to the cent.
    pub fn assert_price(&self, expected: f64) -> Result<(), HarnessError> {
        let actual = self.state.session.price();
        if (actual - expected).abs() < 0.005 {
            Ok(())
        } else {
            Err(HarnessError::AssertionFailed {
                detail: format!(
                    "session price: expected {:.2}, got {:.2} for {:?}\nlast exchange: {}",
                    expected,
                    actual,
                    self.config(),
                    self.last_exchange(),
                ),
            })
        }
    }

    /// Assert the current mesh exists, is closed and sits on the origin.
    pub fn assert_mesh_sound(&self, ctx: &str) -> Result<(), HarnessError> {
        let pipe = self.state.session.mesh().ok_or_else(|| HarnessError::NoMesh {
            ctx: format!("[{}] {:?}", ctx, self.config()),
        })?;
        assertions::assert_closed_manifold(&pipe.mesh, ctx)?;
        assertions::assert_centered(pipe, 1e-9, ctx)?;
        assertions::assert_valid_wall(self.config(), ctx)
    }

    fn last_exchange(&self) -> String {
        self.history
            .last()
            .map(|(sent, received)| format!("{} -> {}", sent, received))
            .unwrap_or_else(|| "none".to_string())
    }
}

impl Default for PipeScenario {
    fn default() -> Self {
        Self::new()
    }
}

fn unexpected(expected: &str, actual: &EngineToUi) -> HarnessError {
    let actual = match actual {
        EngineToUi::ConfigurationUpdated { .. } => "ConfigurationUpdated",
        EngineToUi::OrientationChanged { .. } => "OrientationChanged",
        EngineToUi::State { .. } => "State",
        EngineToUi::Error { .. } => "Error",
    };
    HarnessError::UnexpectedResponse {
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
}
