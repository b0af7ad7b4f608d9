use tracing::trace;

use crate::common::SimError;
use crate::core::pipeline::{PipelineLatch, Stage, StageReport};
use crate::core::Cpu;

/// Memory1: pure delay slot.
pub fn memory1_stage(cpu: &mut Cpu) -> Result<StageReport, SimError> {
    let latch = cpu.pipeline[Stage::Memory1];
    let report = if latch.ready_at(Stage::Memory1) {
        cpu.pipeline.forward(Stage::Memory1, Stage::Memory2);
        StageReport::advanced(&latch)
    } else {
        StageReport::idle()
    };
    cpu.pipeline[Stage::Memory1].flush();
    Ok(report)
}

/// Memory2: performs the data-memory access of loads and stores.
pub fn memory2_stage(cpu: &mut Cpu) -> Result<StageReport, SimError> {
    let mut latch = cpu.pipeline[Stage::Memory2];
    let report = if latch.ready_at(Stage::Memory2) {
        if let Some(inst) = latch.inst {
            if inst.opcode.is_store() {
                cpu.memory.write(latch.mem_address, latch.rs1_value)?;
                trace!(pc = latch.pc, addr = latch.mem_address, val = latch.rs1_value, "MEM store");
            } else if inst.opcode.is_load() {
                latch.buffer = cpu.memory.read(latch.mem_address)?;
                trace!(pc = latch.pc, addr = latch.mem_address, val = latch.buffer, "MEM load");
            }
        }
        cpu.pipeline[Stage::Memory2] = latch;
        cpu.pipeline.forward(Stage::Memory2, Stage::Writeback);
        StageReport::advanced(&latch)
    } else {
        StageReport::idle()
    };
    cpu.pipeline[Stage::Memory2].flush();
    Ok(report)
}
