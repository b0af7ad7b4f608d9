//! Stage reports and control signals.
//!
//! Stages never mutate state belonging to the stages above them. Anything
//! that must reach upstream (a redirect, a HALT flush, the end of simulation)
//! is raised as a [`Signal`] in the stage's [`StageReport`] and applied by the
//! CPU once all seven stages have run.

use super::latches::{Latch, Stage, NUM_STAGES};
use crate::isa::Instruction;

/// How much of the pipeline a HALT squashes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HaltSeverity {
    /// Raised at Decode: squash Fetch and Decode.
    Frontend,
    /// Raised at Execute2 by a deferred HALT: squash Fetch through Execute2.
    Full,
}

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// HALT reached Writeback.
    Halted,
    /// The end-of-program marker reached Writeback.
    Drained,
}

/// Request raised by a stage for the CPU to act on after the cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    /// Taken branch or jump: reload the PC and squash Fetch through Execute2.
    Redirect { target: u32 },
    /// HALT: point the PC at the end of code memory and squash.
    Halt(HaltSeverity),
    /// Stop the run.
    Stop(StopReason),
}

/// What a stage did this cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Activity {
    /// Nothing to process.
    #[default]
    Idle,
    /// Processed its latch and handed it on (or retired it).
    Advanced,
    /// Holding its latch.
    Stalled,
}

/// Per-stage outcome of one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StageReport {
    pub activity: Activity,
    pub pc: u32,
    pub inst: Option<Instruction>,
    pub signal: Option<Signal>,
}

impl StageReport {
    /// Nothing happened.
    pub fn idle() -> Self {
        Self::default()
    }

    /// The stage processed `latch`.
    pub fn advanced(latch: &Latch) -> Self {
        Self {
            activity: Activity::Advanced,
            pc: latch.pc,
            inst: latch.inst,
            signal: None,
        }
    }

    /// The stage is holding `latch`.
    pub fn stalled(latch: &Latch) -> Self {
        Self {
            activity: Activity::Stalled,
            ..Self::advanced(latch)
        }
    }

    pub fn with_signal(self, signal: Option<Signal>) -> Self {
        Self { signal, ..self }
    }

    /// Whether a real instruction was in the stage (the end marker shows as empty).
    pub fn is_active(&self) -> bool {
        self.activity != Activity::Idle && self.inst.is_some()
    }
}

/// Signals collected from all stages in one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CycleSignals {
    pub redirect: Option<u32>,
    pub halt: Option<HaltSeverity>,
    pub stop: Option<StopReason>,
}

impl CycleSignals {
    /// Records `signal`. A `Full` HALT outranks a `Frontend` one.
    pub fn absorb(&mut self, signal: Option<Signal>) {
        match signal {
            Some(Signal::Redirect { target }) => self.redirect = Some(target),
            Some(Signal::Halt(severity)) => {
                if self.halt != Some(HaltSeverity::Full) {
                    self.halt = Some(severity);
                }
            }
            Some(Signal::Stop(reason)) => self.stop = Some(reason),
            None => {}
        }
    }
}

/// Everything observable about one simulated cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CycleReport {
    /// 1-based cycle number.
    pub cycle: u64,
    /// Reports indexed by [`Stage::index`].
    pub stages: [StageReport; NUM_STAGES],
    pub signals: CycleSignals,
}

impl CycleReport {
    /// Report for `stage`.
    pub fn stage(&self, stage: Stage) -> &StageReport {
        &self.stages[stage.index()]
    }
}
