//! APEX CPU core.
//!
//! Architectural state (`arch`), the seven-latch pipeline (`pipeline`), the
//! per-stage logic (`stages`), and the [`Cpu`] that ties them together and
//! advances one clock cycle per [`Cpu::tick`].

/// Register file and data memory.
pub mod arch;

/// The CPU and its per-cycle control.
pub mod cpu;

/// Latches, hazards and signals.
pub mod pipeline;

/// Stage implementations.
pub mod stages;

/// Execution units.
pub mod units;

pub use cpu::Cpu;
