//! Arithmetic Logic Unit (ALU).
//!
//! Integer arithmetic and logical operations performed in Execute1. All
//! arithmetic wraps on 32-bit overflow.

use crate::isa::Opcode;

/// Arithmetic Logic Unit (ALU) for integer operations.
pub struct Alu;

impl Alu {
    /// Executes an integer ALU operation.
    ///
    /// # Arguments
    ///
    /// * `op` - Register-writing arithmetic or logical opcode
    /// * `a` - Value of the first source register
    /// * `b` - Value of the second source register (unused by literal forms)
    /// * `imm` - Literal operand of `ADDL`/`SUBL`
    ///
    /// # Returns
    ///
    /// The result, or `None` if `op` is not an ALU operation.
    pub fn execute(op: Opcode, a: i32, b: i32, imm: i32) -> Option<i32> {
        let result = match op {
            Opcode::Add => a.wrapping_add(b),
            Opcode::Sub => a.wrapping_sub(b),
            Opcode::Mul => a.wrapping_mul(b),
            Opcode::And => a & b,
            Opcode::Or => a | b,
            Opcode::ExOr => a ^ b,
            Opcode::Addl => a.wrapping_add(imm),
            Opcode::Subl => a.wrapping_sub(imm),
            Opcode::Movc
            | Opcode::Load
            | Opcode::Ldr
            | Opcode::Store
            | Opcode::Str
            | Opcode::Bz
            | Opcode::Bnz
            | Opcode::Jump
            | Opcode::Halt => return None,
        };
        Some(result)
    }
}
