//! Instruction Disassembler for APEX.
//!
//! Converts a decoded [`Instruction`] back into its program-file mnemonic
//! form for the cycle trace, the code listing and test diagnostics.
//!
//! # Usage
//!
//! ```
//! use apex_sim::isa::{Instruction, Opcode};
//! use apex_sim::isa::disasm::disassemble;
//!
//! let inst = Instruction { rd: 1, imm: 5, ..Instruction::new(Opcode::Movc) };
//! assert_eq!(disassemble(&inst), "MOVC,R1,#5");
//! ```

use super::instruction::Instruction;
use super::opcode::Format;

/// Renders an instruction as `OPCODE,operands`, matching the loader syntax.
pub fn disassemble(inst: &Instruction) -> String {
    let op = inst.opcode;
    match op.format() {
        Format::RdImm => format!("{op},R{},#{}", inst.rd, inst.imm),
        Format::RdRs1Rs2 => format!("{op},R{},R{},R{}", inst.rd, inst.rs1, inst.rs2),
        Format::RdRs1Imm => format!("{op},R{},R{},#{}", inst.rd, inst.rs1, inst.imm),
        Format::Rs1Rs2Imm => format!("{op},R{},R{},#{}", inst.rs1, inst.rs2, inst.imm),
        Format::Rs1Rs2Rs3 => format!("{op},R{},R{},R{}", inst.rs1, inst.rs2, inst.rs3),
        Format::Rs1Imm => format!("{op},R{},#{}", inst.rs1, inst.imm),
        Format::Imm => format!("{op},#{}", inst.imm),
        Format::Bare => op.to_string(),
    }
}
