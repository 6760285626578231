//! Suite-level tests for the arena engine.
//!
//! - `integration.rs`: end-to-end scenarios through the public surface
//! - `determinism.rs`: same seed + same level = same run
//! - `helpers.rs`: setup utilities and the occupancy audit

mod determinism;
mod helpers;

pub use helpers::*;
