use tracing::debug;

use super::arch::gpr::RegisterFile;
use super::arch::memory::DataMemory;
use super::pipeline::{
    CycleReport, CycleSignals, HaltSeverity, Pipeline, PipelineLatch, Stage, StageReport,
    NUM_STAGES,
};
use super::stages;
use crate::common::SimError;
use crate::config::Config;
use crate::isa::Program;
use crate::stats::SimStats;

/// Stages squashed by a taken branch or jump, and by a deferred HALT.
const BACK_FLUSH: [Stage; 4] = [
    Stage::Fetch,
    Stage::Decode,
    Stage::Execute1,
    Stage::Execute2,
];

/// Stages squashed by a HALT raised at Decode.
const FRONT_FLUSH: [Stage; 2] = [Stage::Fetch, Stage::Decode];

/// The APEX processor: architectural state plus the pipeline.
pub struct Cpu {
    /// Address of the next instruction to fetch.
    pub pc: u32,
    pub regs: RegisterFile,
    pub memory: DataMemory,
    pub pipeline: Pipeline,
    /// Code memory. Never modified.
    pub program: Program,
    pub stats: SimStats,
}

impl Cpu {
    /// Creates a CPU with zeroed state and `pc` at the start of `program`.
    pub fn new(program: Program, config: &Config) -> Self {
        Self {
            pc: program.base(),
            regs: RegisterFile::new(),
            memory: DataMemory::new(config.memory.data_words),
            pipeline: Pipeline::new(),
            program,
            stats: SimStats::default(),
        }
    }

    /// Instructions retired at Writeback so far.
    pub fn instructions_completed(&self) -> u64 {
        self.stats.instructions_retired
    }

    /// Simulates one clock cycle.
    ///
    /// Stages run from Writeback back to Fetch, so each one consumes its latch
    /// before the stage above overwrites it. Redirects and HALT flushes raised
    /// during the cycle are applied afterwards.
    ///
    /// # Errors
    ///
    /// Any [`SimError`] raised by a stage. Machine state is left as it was at
    /// the failing stage.
    pub fn tick(&mut self) -> Result<CycleReport, SimError> {
        self.stats.cycles += 1;

        let mut reports = [StageReport::idle(); NUM_STAGES];
        reports[Stage::Writeback.index()] = stages::wb_stage(self)?;
        reports[Stage::Memory2.index()] = stages::memory2_stage(self)?;
        reports[Stage::Memory1.index()] = stages::memory1_stage(self)?;
        reports[Stage::Execute2.index()] = stages::execute2_stage(self)?;
        reports[Stage::Execute1.index()] = stages::execute1_stage(self)?;
        reports[Stage::Decode.index()] = stages::decode_stage(self)?;
        reports[Stage::Fetch.index()] = stages::fetch_stage(self)?;

        let mut signals = CycleSignals::default();
        for report in &reports {
            signals.absorb(report.signal);
        }
        self.apply(&signals)?;

        Ok(CycleReport {
            cycle: self.stats.cycles,
            stages: reports,
            signals,
        })
    }

    fn apply(&mut self, signals: &CycleSignals) -> Result<(), SimError> {
        if let Some(target) = signals.redirect {
            debug!(cycle = self.stats.cycles, target, "redirect");
            self.pc = target;
            self.squash(&BACK_FLUSH)?;
            self.stats.flushes += 1;
        }
        if let Some(severity) = signals.halt {
            debug!(cycle = self.stats.cycles, ?severity, "halt flush");
            self.pc = self.program.end_pc();
            match severity {
                HaltSeverity::Frontend => self.squash(&FRONT_FLUSH)?,
                HaltSeverity::Full => self.squash(&BACK_FLUSH)?,
            }
            self.stats.halts += 1;
        }
        Ok(())
    }

    /// Resets `stages` to bubbles.
    ///
    /// An instruction that already passed Execute1 has claimed its destination
    /// register; squashing it gives the register back.
    fn squash(&mut self, stages: &[Stage]) -> Result<(), SimError> {
        for &stage in stages {
            let latch = self.pipeline[stage];
            if let Some(inst) = latch.inst.filter(|_| latch.is_occupied()) {
                if inst.completed >= Some(Stage::Execute1) {
                    if let Some(rd) = inst.destination() {
                        self.regs.validate(rd)?;
                    }
                }
            }
            self.pipeline[stage].flush();
        }
        Ok(())
    }
}
