pub mod dispatch;
pub mod engine_state;
pub mod messages;

#[cfg(target_arch = "wasm32")]
pub mod wasm_api;

pub use dispatch::{dispatch, process_json};
pub use engine_state::{BridgeError, EngineState, Orientation, RotationAxis};
pub use messages::{EngineToUi, UiToEngine};
