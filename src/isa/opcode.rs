//! Opcode enumeration and classification.
//!
//! Each stage dispatches on [`Opcode`] with an exhaustive `match`, so adding a
//! variant forces every stage to say what it does with it. The classification
//! helpers below are the single source of truth for the hazard logic.

use strum::{Display, EnumIter, EnumString};

/// Operation code of an APEX instruction.
///
/// The textual mnemonic (as written in program files and traces) is derived
/// through `strum`; `EX-OR` is the only mnemonic that is not the upper-cased
/// variant name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Opcode {
    /// Move constant: `rd = imm`.
    Movc,
    /// `rd = rs1 + rs2`, sets CC.
    Add,
    /// `rd = rs1 - rs2`, sets CC.
    Sub,
    /// `rd = rs1 * rs2`, sets CC.
    Mul,
    /// `rd = rs1 & rs2`.
    And,
    /// `rd = rs1 | rs2`.
    Or,
    /// `rd = rs1 ^ rs2`.
    #[strum(to_string = "EX-OR")]
    ExOr,
    /// `rd = rs1 + imm`, sets CC.
    Addl,
    /// `rd = rs1 - imm`, sets CC.
    Subl,
    /// `rd = MEM[rs1 + imm]`.
    Load,
    /// `rd = MEM[rs1 + rs2]`.
    Ldr,
    /// `MEM[rs2 + imm] = rs1`.
    Store,
    /// `MEM[rs2 + rs3] = rs1`.
    Str,
    /// Branch to `pc + imm` when CC is set.
    Bz,
    /// Branch to `pc + imm` when CC is clear.
    Bnz,
    /// Jump to `rs1 + imm`.
    Jump,
    /// Stop fetching and end the simulation once it reaches Writeback.
    Halt,
}

/// Operand layout of an instruction record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// `OP,Rd,#imm`
    RdImm,
    /// `OP,Rd,Rs1,Rs2`
    RdRs1Rs2,
    /// `OP,Rd,Rs1,#imm`
    RdRs1Imm,
    /// `OP,Rs1,Rs2,#imm`
    Rs1Rs2Imm,
    /// `OP,Rs1,Rs2,Rs3`
    Rs1Rs2Rs3,
    /// `OP,Rs1,#imm`
    Rs1Imm,
    /// `OP,#imm`
    Imm,
    /// `OP`
    Bare,
}

impl Format {
    /// Number of comma-separated operands following the mnemonic.
    pub fn operand_count(self) -> usize {
        match self {
            Format::RdRs1Rs2 | Format::RdRs1Imm | Format::Rs1Rs2Imm | Format::Rs1Rs2Rs3 => 3,
            Format::RdImm | Format::Rs1Imm => 2,
            Format::Imm => 1,
            Format::Bare => 0,
        }
    }
}

impl Opcode {
    /// Operand layout used by the loader and the disassembler.
    pub fn format(self) -> Format {
        match self {
            Opcode::Movc => Format::RdImm,
            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::And
            | Opcode::Or
            | Opcode::ExOr
            | Opcode::Ldr => Format::RdRs1Rs2,
            Opcode::Addl | Opcode::Subl | Opcode::Load => Format::RdRs1Imm,
            Opcode::Store => Format::Rs1Rs2Imm,
            Opcode::Str => Format::Rs1Rs2Rs3,
            Opcode::Jump => Format::Rs1Imm,
            Opcode::Bz | Opcode::Bnz => Format::Imm,
            Opcode::Halt => Format::Bare,
        }
    }

    /// Number of source registers (taken in order rs1, rs2, rs3) that must be
    /// valid before Decode lets the instruction proceed.
    pub fn source_count(self) -> usize {
        match self {
            Opcode::Str => 3,
            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::And
            | Opcode::Or
            | Opcode::ExOr
            | Opcode::Ldr
            | Opcode::Store => 2,
            Opcode::Addl | Opcode::Subl | Opcode::Load | Opcode::Jump => 1,
            Opcode::Movc | Opcode::Bz | Opcode::Bnz | Opcode::Halt => 0,
        }
    }

    /// Whether the instruction commits a value to `rd` at Writeback.
    pub fn writes_register(self) -> bool {
        matches!(
            self,
            Opcode::Movc
                | Opcode::Add
                | Opcode::Sub
                | Opcode::Mul
                | Opcode::And
                | Opcode::Or
                | Opcode::ExOr
                | Opcode::Addl
                | Opcode::Subl
                | Opcode::Load
                | Opcode::Ldr
        )
    }

    /// Arithmetic-class opcodes: their Writeback also updates the condition code.
    pub fn sets_condition_code(self) -> bool {
        matches!(
            self,
            Opcode::Add | Opcode::Addl | Opcode::Sub | Opcode::Subl | Opcode::Mul
        )
    }

    /// Conditional branches (`BZ`, `BNZ`).
    pub fn is_branch(self) -> bool {
        matches!(self, Opcode::Bz | Opcode::Bnz)
    }

    /// Any instruction resolved in Execute2 that may redirect fetch.
    pub fn is_control_transfer(self) -> bool {
        matches!(self, Opcode::Bz | Opcode::Bnz | Opcode::Jump)
    }

    /// Load-class opcodes read data memory in Memory2.
    pub fn is_load(self) -> bool {
        matches!(self, Opcode::Load | Opcode::Ldr)
    }

    /// Store-class opcodes write data memory in Memory2.
    pub fn is_store(self) -> bool {
        matches!(self, Opcode::Store | Opcode::Str)
    }
}
