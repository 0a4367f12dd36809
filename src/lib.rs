//! congestion-map
//! ==============
//!
//! Umbrella crate for the workspace. It re-exports [`congestion_core`] so the
//! demos under `demos/` can be run with `cargo run --example <name>`.
pub use congestion_core::*;
