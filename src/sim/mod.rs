//! Simulation harness.
//!
//! Program loading, the cycle loop, and trace and report rendering.

/// Assembly-text program loader.
pub mod loader;

/// Trace and final-state writers.
pub mod report;

/// Cycle-loop driver.
pub mod simulator;

pub use simulator::{RunOutcome, Simulator};
