use tracing::{debug, trace};

use crate::common::SimError;
use crate::core::pipeline::{HaltSeverity, Signal, Stage, StageReport};
use crate::core::units::alu::Alu;
use crate::core::Cpu;
use crate::isa::Opcode;

/// `base + offset` as a code address.
fn branch_target(pc: u32, base: i64, offset: i64) -> Result<u32, SimError> {
    let target = base + offset;
    u32::try_from(target).map_err(|_| SimError::InvalidTarget { pc, target })
}

/// Execute1: claims the destination register and computes results and addresses.
pub fn execute1_stage(cpu: &mut Cpu) -> Result<StageReport, SimError> {
    let mut latch = cpu.pipeline[Stage::Execute1];
    if !latch.ready_at(Stage::Execute1) {
        return Ok(StageReport::idle());
    }

    if let Some(inst) = latch.inst {
        if let Some(rd) = inst.destination() {
            cpu.regs.invalidate(rd)?;
        }

        let (a, b, c) = (latch.rs1_value, latch.rs2_value, latch.rs3_value);
        match inst.opcode {
            Opcode::Store => latch.mem_address = b.wrapping_add(inst.imm),
            Opcode::Str => latch.mem_address = b.wrapping_add(c),
            Opcode::Load => latch.mem_address = a.wrapping_add(inst.imm),
            Opcode::Ldr => latch.mem_address = a.wrapping_add(b),
            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::And
            | Opcode::Or
            | Opcode::ExOr
            | Opcode::Addl
            | Opcode::Subl => {
                latch.buffer = Alu::execute(inst.opcode, a, b, inst.imm).unwrap_or_default();
            }
            Opcode::Jump => latch.buffer = a.wrapping_add(inst.imm),
            Opcode::Movc => latch.buffer = inst.imm,
            Opcode::Bz | Opcode::Bnz | Opcode::Halt => {}
        }
        trace!(pc = latch.pc, %inst, buffer = latch.buffer, addr = latch.mem_address, "EX1");
    }

    cpu.pipeline[Stage::Execute1] = latch;
    cpu.pipeline.forward(Stage::Execute1, Stage::Execute2);
    Ok(StageReport::advanced(&latch))
}

/// Execute2: resolves branches and jumps, and fires a deferred HALT.
pub fn execute2_stage(cpu: &mut Cpu) -> Result<StageReport, SimError> {
    let latch = cpu.pipeline[Stage::Execute2];
    if !latch.ready_at(Stage::Execute2) {
        return Ok(StageReport::idle());
    }

    let mut signal = None;
    if let Some(inst) = latch.inst {
        let pc = latch.pc;
        signal = match inst.opcode {
            Opcode::Bz | Opcode::Bnz => {
                let zero = cpu.regs.cc() == 1;
                let taken = if inst.opcode == Opcode::Bz { zero } else { !zero };
                if taken {
                    let target = branch_target(pc, i64::from(pc), i64::from(inst.imm))?;
                    debug!(pc, target, "branch taken");
                    Some(Signal::Redirect { target })
                } else {
                    None
                }
            }
            Opcode::Jump => {
                let target = branch_target(pc, i64::from(latch.buffer), 0)?;
                debug!(pc, target, "jump");
                Some(Signal::Redirect { target })
            }
            Opcode::Halt => latch
                .halt_deferred
                .then_some(Signal::Halt(HaltSeverity::Full)),
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
            | Opcode::Store
            | Opcode::Str => None,
        };
    }

    cpu.pipeline.forward(Stage::Execute2, Stage::Memory1);
    Ok(StageReport::advanced(&latch).with_signal(signal))
}
