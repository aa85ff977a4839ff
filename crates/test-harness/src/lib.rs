//! Test harness for the pipe configurator.
//!
//! Provides programmatic tools for scripting editing sessions through the
//! JSON bridge and checking prices and meshes at every step.
//!
//! # Key Components
//!
//! - [`PipeScenario`]: Drives an engine through the JSON message protocol
//! - [`helpers`]: Configuration builders, mesh math
//! - [`assertions`]: Assertion helpers with diagnostics

pub mod assertions;
pub mod helpers;
pub mod workflow;

pub use helpers::HarnessError;
pub use workflow::PipeScenario;
