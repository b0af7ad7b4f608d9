//! Load and Simulation Error definitions.
//!
//! This module defines the two failure families of the simulator:
//! 1. **Load failures:** the program text could not be turned into code memory.
//!    These are fatal and happen before any cycle runs.
//! 2. **Simulation faults:** checked contracts violated while the pipeline runs
//!    (register index or data address out of range, fetch outside code memory).
//!
//! Operand-not-ready and control hazards are never errors; they are stalls.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::data::AccessType;

/// Failure while reading or parsing a program file.
///
/// Every parse variant carries the 1-based line number of the offending record.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The program file could not be opened or read.
    #[error("could not read program '{}': {source}", .path.display())]
    Io {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The first token of a record is not a known mnemonic.
    #[error("line {line}: unknown opcode '{opcode}'")]
    UnknownOpcode {
        /// 1-based line number.
        line: usize,
        /// The unrecognised mnemonic.
        opcode: String,
    },

    /// A record carries the wrong number of operands for its opcode.
    #[error("line {line}: {opcode} expects {expected} operand(s), found {found}")]
    OperandCount {
        /// 1-based line number.
        line: usize,
        /// Mnemonic of the record.
        opcode: String,
        /// Operand count required by the opcode format.
        expected: usize,
        /// Operand count present in the record.
        found: usize,
    },

    /// An operand token is not a well-formed register (`R<n>`) or literal (`#<n>`).
    #[error("line {line}: malformed operand '{token}'")]
    MalformedOperand {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },

    /// A register operand names a register outside R0-R15.
    #[error("line {line}: register R{index} out of range")]
    RegisterOutOfRange {
        /// 1-based line number.
        line: usize,
        /// The requested register index.
        index: usize,
    },
}

/// Fault raised while the pipeline is running.
#[derive(Debug, Error)]
pub enum SimError {
    /// A register file access used an index outside the register file.
    #[error("register index {index} out of range")]
    RegisterOutOfRange {
        /// The requested register index.
        index: usize,
    },

    /// A load or store computed an address outside data memory.
    #[error("data memory {access} at address {addr} out of range")]
    MemoryOutOfRange {
        /// Effective address computed by Execute1.
        addr: i64,
        /// Direction of the faulting access.
        access: AccessType,
    },

    /// Fetch was asked for a `pc` below code memory or not instruction aligned.
    #[error("fetch at pc {pc} is outside code memory")]
    FetchOutOfRange {
        /// The faulting program counter.
        pc: u32,
    },

    /// A branch or jump resolved to a negative target address.
    #[error("control transfer at pc {pc} resolved to invalid target {target}")]
    InvalidTarget {
        /// Address of the branch or jump.
        pc: u32,
        /// The computed target.
        target: i64,
    },

    /// Writing the trace or the final report failed.
    #[error("report output failed: {0}")]
    Io(#[from] io::Error),
}
