//! Scenario tests for the world driver.
//!
//! - `integration.rs`: landing, walls, pickups and skipped steps
//! - `determinism.rs`: identical inputs give bit-identical trajectories
//! - `helpers.rs`: level builders and stepping utilities

mod helpers;
mod integration;
