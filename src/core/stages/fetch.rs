use tracing::trace;

use crate::common::SimError;
use crate::core::pipeline::{Latch, Stage, StageReport};
use crate::core::Cpu;

/// Fetch: reads code memory at `pc` and hands the instruction to Decode.
///
/// When Decode is stalled the fetched instruction is parked in the Fetch latch
/// and `pc` does not move; the parked latch is held until Decode advances.
pub fn fetch_stage(cpu: &mut Cpu) -> Result<StageReport, SimError> {
    let held = cpu.pipeline[Stage::Fetch];
    if held.busy || held.stalled {
        cpu.stats.stalls_fetch += 1;
        return Ok(StageReport::stalled(&held));
    }

    let inst = cpu.program.fetch(cpu.pc)?;
    cpu.pipeline[Stage::Fetch] = Latch::occupied(cpu.pc, inst);

    if cpu.pipeline[Stage::Decode].stalled {
        cpu.pipeline[Stage::Fetch].stalled = true;
        cpu.stats.stalls_fetch += 1;
        trace!(pc = cpu.pc, "IF  held behind stalled decode");
        return Ok(StageReport::stalled(&cpu.pipeline[Stage::Fetch]));
    }

    trace!(pc = cpu.pc, end = inst.is_none(), "IF");
    cpu.pipeline.forward(Stage::Fetch, Stage::Decode);
    cpu.pc = cpu.pc.wrapping_add(cpu.program.width());
    Ok(StageReport::advanced(&cpu.pipeline[Stage::Fetch]))
}
