//! Common types used throughout the APEX pipeline simulator.
//!
//! This module provides the error taxonomy, memory access classification
//! and fixed architectural constants shared by the loader, the core and
//! the reporting layer.

/// Fixed architectural constants (register counts, default layout).
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Error types for program loading and simulation.
pub mod error;

pub use data::AccessType;
pub use error::{LoadError, SimError};
