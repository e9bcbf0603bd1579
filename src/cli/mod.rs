//! CLI command implementations

mod gate;
mod manifest;
pub mod style;

pub use gate::{GateOptions, run_gate};
pub use manifest::{ManifestOptions, run_manifest};
