//! Decoded instruction record.
//!
//! Instructions are created once by the loader and never change inside code
//! memory. Each pipeline latch holds its own copy; the copy's `completed`
//! marker records the last stage that advanced this particular in-flight
//! instance and only ever moves forward.

use std::fmt;

use super::disasm;
use super::opcode::Opcode;
use crate::core::pipeline::latches::Stage;

/// A single APEX instruction with its register operands and literal.
///
/// Register fields not used by the opcode's format are zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// Operation code.
    pub opcode: Opcode,
    /// Destination register index.
    pub rd: usize,
    /// First source register index.
    pub rs1: usize,
    /// Second source register index.
    pub rs2: usize,
    /// Third source register index (`STR` only).
    pub rs3: usize,
    /// Literal operand.
    pub imm: i32,
    /// Last pipeline stage that advanced this instance, if any.
    pub completed: Option<Stage>,
}

impl Instruction {
    /// Creates an instruction with all operands zeroed.
    pub fn new(opcode: Opcode) -> Self {
        Self {
            opcode,
            rd: 0,
            rs1: 0,
            rs2: 0,
            rs3: 0,
            imm: 0,
            completed: None,
        }
    }

    /// Register written at Writeback, if the opcode writes one.
    pub fn destination(&self) -> Option<usize> {
        self.opcode.writes_register().then_some(self.rd)
    }

    /// Source registers Decode must see valid, in operand order.
    pub fn sources(&self) -> impl Iterator<Item = usize> {
        [self.rs1, self.rs2, self.rs3]
            .into_iter()
            .take(self.opcode.source_count())
    }

    /// Whether `stage` may still process this instance.
    ///
    /// Guards against a lingering latch copy being executed twice.
    pub fn pending_at(&self, stage: Stage) -> bool {
        self.completed.map_or(true, |done| done < stage)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&disasm::disassemble(self))
    }
}
