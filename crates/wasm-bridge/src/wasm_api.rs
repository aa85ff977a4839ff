//! WASM entry points for the web worker.
//!
//! This module is only compiled for the `wasm32` target. It provides the
//! `#[wasm_bindgen]` functions that JavaScript calls from the web worker.

use wasm_bindgen::prelude::*;

use configurator::PipeMesh;

use crate::dispatch;
use crate::engine_state::EngineState;
use crate::messages::EngineToUi;

// Global engine state. The web worker is single-threaded.
thread_local! {
    static ENGINE_STATE: std::cell::RefCell<Option<EngineState>> = const { std::cell::RefCell::new(None) };
}

/// Initialize the WASM engine. Must be called once before any other function.
///
/// Sets up panic hooks for better error messages and starts a session with
/// the default configuration.
#[wasm_bindgen]
pub fn init() {
    console_error_panic_hook::set_once();

    let state = EngineState::new();
    web_sys::console::log_1(&format!("pipe configurator session {}", state.session.id()).into());
    ENGINE_STATE.with(|cell| {
        *cell.borrow_mut() = Some(state);
    });
}

/// Initialize with mesh settings and pricing rules given as JSON documents.
///
/// Throws the configuration error instead of starting the engine.
#[wasm_bindgen]
pub fn init_with_config(settings_json: &str, rules_json: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let state = EngineState::from_config_json(settings_json, rules_json)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    web_sys::console::log_1(&format!("pipe configurator session {}", state.session.id()).into());
    ENGINE_STATE.with(|cell| {
        *cell.borrow_mut() = Some(state);
    });
    Ok(())
}

/// Process a JSON message from the UI and return a JSON response.
///
/// The input should be a JSON-serialized `UiToEngine` message.
/// Returns a JSON-serialized `EngineToUi` response.
#[wasm_bindgen]
pub fn process_message(json_input: &str) -> String {
    ENGINE_STATE.with(|cell| match cell.borrow_mut().as_mut() {
        Some(state) => dispatch::process_json(state, json_input),
        None => dispatch::to_json(&EngineToUi::Error {
            message: "Engine not initialized. Call init() first.".to_string(),
        }),
    })
}

/// Current mesh vertex positions as a Float32Array view into WASM memory.
///
/// The array contains [x0, y0, z0, x1, y1, z1, ...].
///
/// IMPORTANT: The returned view is invalidated by any WASM memory growth.
/// Copy or transfer the data immediately after calling this function.
#[wasm_bindgen]
pub fn get_mesh_vertices() -> js_sys::Float32Array {
    with_mesh(|pipe| unsafe { js_sys::Float32Array::view(&pipe.mesh.positions) })
        .unwrap_or_else(|| js_sys::Float32Array::new_with_length(0))
}

/// Current mesh vertex normals: [nx0, ny0, nz0, nx1, ny1, nz1, ...].
#[wasm_bindgen]
pub fn get_mesh_normals() -> js_sys::Float32Array {
    with_mesh(|pipe| unsafe { js_sys::Float32Array::view(&pipe.mesh.normals) })
        .unwrap_or_else(|| js_sys::Float32Array::new_with_length(0))
}

/// Current triangle indices, three per triangle.
#[wasm_bindgen]
pub fn get_mesh_indices() -> js_sys::Uint32Array {
    with_mesh(|pipe| unsafe { js_sys::Uint32Array::view(&pipe.mesh.indices) })
        .unwrap_or_else(|| js_sys::Uint32Array::new_with_length(0))
}

/// Model matrix for the current orientation, column-major.
#[wasm_bindgen]
pub fn get_model_matrix() -> js_sys::Float32Array {
    ENGINE_STATE.with(|cell| {
        let matrix = cell
            .borrow()
            .as_ref()
            .map(|state| state.orientation)
            .unwrap_or_default()
            .matrix();
        js_sys::Float32Array::from(&matrix[..])
    })
}

/// Helper: access the current mesh and apply a function to it.
fn with_mesh<T>(f: impl FnOnce(&PipeMesh) -> T) -> Option<T> {
    ENGINE_STATE.with(|cell| {
        let state = cell.borrow();
        let mesh = state.as_ref()?.session.mesh()?;
        Some(f(mesh))
    })
}
