use tracing::{debug, trace};

use crate::common::SimError;
use crate::core::pipeline::{PipelineLatch, Signal, Stage, StageReport, StopReason};
use crate::core::Cpu;
use crate::isa::Opcode;

/// Writeback: commits the result, releases the destination, and retires.
///
/// A retiring HALT or the end-of-program marker stops the run. The marker is
/// not an instruction and is not counted.
pub fn wb_stage(cpu: &mut Cpu) -> Result<StageReport, SimError> {
    let latch = cpu.pipeline[Stage::Writeback];
    let report = if !latch.ready_at(Stage::Writeback) {
        StageReport::idle()
    } else if let Some(inst) = latch.inst {
        let signal = match inst.opcode {
            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Addl | Opcode::Subl => {
                cpu.regs.write(inst.rd, latch.buffer)?;
                cpu.regs.validate(inst.rd)?;
                cpu.regs.set_cc(latch.buffer == 0);
                None
            }
            Opcode::Movc
            | Opcode::And
            | Opcode::Or
            | Opcode::ExOr
            | Opcode::Load
            | Opcode::Ldr => {
                cpu.regs.write(inst.rd, latch.buffer)?;
                cpu.regs.validate(inst.rd)?;
                None
            }
            Opcode::Store | Opcode::Str | Opcode::Bz | Opcode::Bnz | Opcode::Jump => None,
            Opcode::Halt => Some(Signal::Stop(StopReason::Halted)),
        };
        cpu.stats.retire(inst.opcode);
        trace!(pc = latch.pc, %inst, "WB");
        if signal.is_some() {
            debug!(pc = latch.pc, "HALT retired");
        }
        StageReport::advanced(&latch).with_signal(signal)
    } else {
        debug!(pc = latch.pc, "end of program reached writeback");
        StageReport::advanced(&latch).with_signal(Some(Signal::Stop(StopReason::Drained)))
    };
    cpu.pipeline[Stage::Writeback].flush();
    Ok(report)
}
