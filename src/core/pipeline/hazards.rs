//! Decode-time hazard detection.
//!
//! APEX has no forwarding network. Decode stalls until every source register
//! is valid in the register file, and a conditional branch additionally waits
//! until no condition-code producer remains between Execute1 and Memory2.
//!
//! Decode runs after every stage below it, so the latches it inspects already
//! hold the instructions that will occupy those stages next cycle.

use super::latches::{Pipeline, Stage};
use crate::common::SimError;
use crate::core::arch::gpr::RegisterFile;
use crate::isa::{Instruction, Opcode};

/// Slots scanned for an in-flight condition-code producer.
pub const CC_LOOKAHEAD: [Stage; 4] = [
    Stage::Execute1,
    Stage::Execute2,
    Stage::Memory1,
    Stage::Memory2,
];

/// Slots scanned by a decoding HALT for an unresolved control transfer.
pub const HALT_CONTENTION: [Stage; 2] = [Stage::Execute2, Stage::Memory1];

/// Whether every source of `inst` is valid in the register file.
///
/// # Errors
///
/// [`SimError::RegisterOutOfRange`] if a source index is out of range.
pub fn operands_ready(regs: &RegisterFile, inst: &Instruction) -> Result<bool, SimError> {
    for src in inst.sources() {
        if !regs.is_valid(src)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Reads the source values of `inst` as `[rs1, rs2, rs3]`; unused slots are zero.
///
/// # Errors
///
/// [`SimError::RegisterOutOfRange`] if a source index is out of range.
pub fn read_operands(regs: &RegisterFile, inst: &Instruction) -> Result<[i32; 3], SimError> {
    let mut values = [0; 3];
    for (slot, src) in values.iter_mut().zip(inst.sources()) {
        *slot = regs.read(src)?;
    }
    Ok(values)
}

/// Whether a CC-setting instruction is still ahead of a decoding branch.
pub fn condition_code_pending(pipeline: &Pipeline) -> bool {
    CC_LOOKAHEAD
        .iter()
        .any(|&stage| pipeline[stage].holds(Opcode::sets_condition_code))
}

/// Whether a control transfer that may still redirect sits in the HALT contention window.
pub fn control_transfer_in_flight(pipeline: &Pipeline) -> bool {
    HALT_CONTENTION
        .iter()
        .any(|&stage| pipeline[stage].holds(Opcode::is_control_transfer))
}
