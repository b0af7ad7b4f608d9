//! APEX architectural state.
//!
//! This module contains the state that survives the pipeline: the register
//! file with its per-register validity bits and the flat data memory.

/// General-purpose and condition-code register file with validity tracking.
pub mod gpr;

/// Flat integer data memory.
pub mod memory;
