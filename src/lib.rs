//! APEX Pipeline Simulator Library.
//!
//! This crate implements a cycle-accurate simulator for the APEX teaching
//! architecture: a seven-stage in-order pipeline with register-validity
//! interlocking, no forwarding, and branch resolution in the second execute
//! stage.
//!
//! # Architecture
//!
//! * **Pipeline**: Fetch, Decode/RF, Execute1, Execute2, Memory1, Memory2, Writeback.
//!   Stages are evaluated in reverse order each cycle so every latch is consumed
//!   before it is refilled.
//! * **Hazards**: Decode stalls on any invalid source register, and a
//!   conditional branch also waits for in-flight condition-code producers.
//! * **Control**: Taken branches and jumps flush Fetch through Execute2. HALT
//!   flushes the front end and drains the rest of the pipeline.
//!
//! # Modules
//!
//! * `common`: Shared constants and error handling.
//! * `config`: Configuration loading and parsing.
//! * `core`: CPU core implementation.
//! * `isa`: Instruction set definitions.
//! * `sim`: Program loader, cycle loop and reporting.
//! * `stats`: Performance statistics collection.

/// Shared constants, memory access types and error handling.
pub mod common;

/// Configuration system for memory size, code layout and tracing.
///
/// Loads and parses TOML configuration files; every key has a default.
pub mod config;

/// CPU core implementation: architectural state, pipeline latches and stages.
pub mod core;

/// Instruction set: opcodes, decoded instructions and code memory.
pub mod isa;

/// Simulation harness: loader, cycle loop, trace and final report.
pub mod sim;

/// Simulation statistics.
pub mod stats;
