//! APEX Instruction Set Architecture.
//!
//! Defines the closed opcode enumeration, the decoded instruction record,
//! code memory and the mnemonic renderer used by traces and listings.

/// Mnemonic rendering of decoded instructions.
pub mod disasm;

/// Decoded instruction record.
pub mod instruction;

/// Opcode enumeration and per-opcode classification.
pub mod opcode;

/// Code memory holding the loaded program.
pub mod program;

pub use instruction::Instruction;
pub use opcode::{Format, Opcode};
pub use program::Program;
