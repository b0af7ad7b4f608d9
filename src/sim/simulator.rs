//! Cycle-loop driver.
//!
//! [`Simulator`] owns a [`Cpu`] and ticks it until a HALT or the end of the
//! program retires, or the cycle budget runs out.

use std::io::Write;

use tracing::info;

use super::report;
use crate::common::SimError;
use crate::config::Config;
use crate::core::pipeline::StopReason;
use crate::core::Cpu;
use crate::isa::Program;

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// HALT retired at Writeback.
    Halted { cycles: u64 },
    /// The end-of-program marker reached Writeback.
    Drained { cycles: u64 },
    /// The cycle budget was exhausted first.
    CycleLimit { cycles: u64 },
}

impl RunOutcome {
    /// Cycles simulated when the run ended.
    pub fn cycles(&self) -> u64 {
        match *self {
            RunOutcome::Halted { cycles }
            | RunOutcome::Drained { cycles }
            | RunOutcome::CycleLimit { cycles } => cycles,
        }
    }

    /// Whether the program ran to completion.
    pub fn is_complete(&self) -> bool {
        !matches!(self, RunOutcome::CycleLimit { .. })
    }
}

pub struct Simulator {
    pub cpu: Cpu,
}

impl Simulator {
    pub fn new(program: Program, config: &Config) -> Self {
        Self {
            cpu: Cpu::new(program, config),
        }
    }

    /// Runs silently until the program stops or `max_cycles` cycles have elapsed.
    ///
    /// # Errors
    ///
    /// The first [`SimError`] raised by a stage.
    pub fn run(&mut self, max_cycles: u64) -> Result<RunOutcome, SimError> {
        self.run_inner(max_cycles, None)
    }

    /// Like [`Simulator::run`], writing the per-cycle stage trace to `out`.
    ///
    /// # Errors
    ///
    /// The first [`SimError`] raised by a stage, or [`SimError::Io`] if the
    /// trace cannot be written.
    pub fn run_traced(
        &mut self,
        max_cycles: u64,
        out: &mut dyn Write,
    ) -> Result<RunOutcome, SimError> {
        self.run_inner(max_cycles, Some(out))
    }

    fn run_inner(
        &mut self,
        max_cycles: u64,
        mut trace: Option<&mut dyn Write>,
    ) -> Result<RunOutcome, SimError> {
        while self.cpu.stats.cycles < max_cycles {
            let cycle = self.cpu.tick()?;
            if let Some(out) = trace.as_deref_mut() {
                report::write_cycle(out, &cycle)?;
            }
            if let Some(reason) = cycle.signals.stop {
                let cycles = cycle.cycle;
                info!(
                    cycles,
                    retired = self.cpu.instructions_completed(),
                    ?reason,
                    "simulation complete"
                );
                return Ok(match reason {
                    StopReason::Halted => RunOutcome::Halted { cycles },
                    StopReason::Drained => RunOutcome::Drained { cycles },
                });
            }
        }
        info!(cycles = self.cpu.stats.cycles, "cycle limit reached");
        Ok(RunOutcome::CycleLimit {
            cycles: self.cpu.stats.cycles,
        })
    }
}
