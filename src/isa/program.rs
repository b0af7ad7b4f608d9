//! Code memory.
//!
//! Holds the loaded instruction sequence and maps program-counter values onto
//! it. Instruction `i` lives at `code_base + i * instruction_width`.

use super::instruction::Instruction;
use crate::common::constants::{DEFAULT_CODE_BASE, DEFAULT_INSTRUCTION_WIDTH};
use crate::common::SimError;

/// The instruction store the Fetch stage reads from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
    base: u32,
    width: u32,
}

impl Program {
    /// Builds code memory at the default base address (4000) with 4-byte instructions.
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self::with_layout(instructions, DEFAULT_CODE_BASE, DEFAULT_INSTRUCTION_WIDTH)
    }

    /// Builds code memory with an explicit base address and instruction width.
    ///
    /// A zero width is treated as one byte so that address arithmetic stays defined.
    pub fn with_layout(instructions: Vec<Instruction>, base: u32, width: u32) -> Self {
        Self {
            instructions,
            base,
            width: width.max(1),
        }
    }

    /// Number of instructions in code memory.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether code memory is empty.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Address of the first instruction.
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Bytes between consecutive instructions.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Address one past the last instruction.
    pub fn end_pc(&self) -> u32 {
        self.base + self.width * self.instructions.len() as u32
    }

    /// Loaded instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Looks up the instruction at `pc`.
    ///
    /// Returns `Ok(None)` for addresses at or past [`Program::end_pc`], which the
    /// pipeline treats as the end-of-program marker.
    ///
    /// # Errors
    ///
    /// [`SimError::FetchOutOfRange`] if `pc` lies below the base address or is
    /// not aligned to the instruction width.
    pub fn fetch(&self, pc: u32) -> Result<Option<Instruction>, SimError> {
        if pc < self.base || (pc - self.base) % self.width != 0 {
            return Err(SimError::FetchOutOfRange { pc });
        }
        let index = ((pc - self.base) / self.width) as usize;
        Ok(self.instructions.get(index).copied())
    }

    /// Renders code memory as an `opcode rd rs1 rs2 rs3 imm` table.
    pub fn listing(&self) -> String {
        let mut out = format!(
            "{:<9} {:<9} {:<9} {:<9} {:<9} {:<9}\n",
            "opcode", "rd", "rs1", "rs2", "rs3", "imm"
        );
        for inst in &self.instructions {
            out.push_str(&format!(
                "{:<9} {:<9} {:<9} {:<9} {:<9} {:<9}\n",
                inst.opcode.to_string(),
                inst.rd,
                inst.rs1,
                inst.rs2,
                inst.rs3,
                inst.imm
            ));
        }
        out
    }
}
