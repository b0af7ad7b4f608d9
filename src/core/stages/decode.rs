use tracing::trace;

use crate::common::SimError;
use crate::core::pipeline::hazards;
use crate::core::pipeline::{HaltSeverity, Signal, Stage, StageReport};
use crate::core::Cpu;
use crate::isa::Opcode;

/// Decode/RF: checks hazards, reads source registers, forwards to Execute1.
///
/// Stalls when a source register is invalid, or when a conditional branch
/// would read a condition code that an instruction further down has yet to
/// produce. A decoded HALT squashes the front end unless a control transfer
/// that could still redirect sits just ahead of it, in which case the flush is
/// deferred until the HALT reaches Execute2.
pub fn decode_stage(cpu: &mut Cpu) -> Result<StageReport, SimError> {
    cpu.pipeline[Stage::Decode].stalled = false;
    let mut latch = cpu.pipeline[Stage::Decode];
    if !latch.ready_at(Stage::Decode) {
        return Ok(StageReport::idle());
    }

    let mut signal = None;
    if let Some(inst) = latch.inst {
        let stall = match inst.opcode {
            Opcode::Movc => false,
            Opcode::Add
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
            | Opcode::Str
            | Opcode::Jump => {
                if hazards::operands_ready(&cpu.regs, &inst)? {
                    let [a, b, c] = hazards::read_operands(&cpu.regs, &inst)?;
                    latch.rs1_value = a;
                    latch.rs2_value = b;
                    latch.rs3_value = c;
                    false
                } else {
                    cpu.stats.stalls_data += 1;
                    true
                }
            }
            Opcode::Bz | Opcode::Bnz => {
                let pending = hazards::condition_code_pending(&cpu.pipeline);
                if pending {
                    cpu.stats.stalls_control += 1;
                }
                pending
            }
            Opcode::Halt => {
                if hazards::control_transfer_in_flight(&cpu.pipeline) {
                    latch.halt_deferred = true;
                } else {
                    signal = Some(Signal::Halt(HaltSeverity::Frontend));
                }
                false
            }
        };

        if stall {
            latch.stalled = true;
            cpu.pipeline[Stage::Decode] = latch;
            trace!(pc = latch.pc, %inst, "ID  stall");
            return Ok(StageReport::stalled(&latch));
        }
        trace!(pc = latch.pc, %inst, "ID");
    }

    cpu.pipeline[Stage::Decode] = latch;
    cpu.pipeline.forward(Stage::Decode, Stage::Execute1);
    cpu.pipeline[Stage::Fetch].stalled = false;
    Ok(StageReport::advanced(&latch).with_signal(signal))
}
