//! Crate-level tests driving the full tick pipeline.
//!
//! - `determinism.rs`: same seed and inputs give identical runs
//! - `integration.rs`: end-to-end duels, hits, cooldowns and dodges
//! - `helpers.rs`: configs and drivers shared by both

mod determinism;
mod helpers;
mod integration;
