//! Instruction pipeline implementation.
//!
//! This module contains the seven pipeline slots (Fetch, Decode/RF, Execute1,
//! Execute2, Memory1, Memory2, Writeback), the latch record they carry, the
//! hazard checks Decode performs, and the signals stages raise back to the CPU.

/// Decode-time hazard checks (operand validity, CC lookahead, HALT contention).
pub mod hazards;

/// Stage identifiers, latch records, and the latch array.
pub mod latches;

/// Per-stage reports and control signals.
pub mod signals;

/// Traits for pipeline latch components.
pub mod traits;

pub use latches::{Latch, LatchState, Pipeline, Stage, NUM_STAGES};
pub use signals::{CycleReport, CycleSignals, HaltSeverity, Signal, StageReport, StopReason};
pub use traits::PipelineLatch;
