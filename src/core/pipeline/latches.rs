//! Pipeline latch structures for inter-stage communication.
//!
//! The pipeline is seven single-entry latches, one per stage. A latch is the
//! input register of its stage: Fetch fills its own latch and forwards it to
//! Decode, Decode forwards to Execute1, and so on down to Writeback.
//!
//! Stages run in reverse order each cycle, so a stage always forwards into a
//! slot whose owner has already run (and consumed its previous content) this
//! cycle. After forwarding, the source latch keeps a `Draining` copy purely
//! for display until it is overwritten or cleared.

use std::fmt;
use std::ops::{Index, IndexMut};

use strum::EnumIter;

use crate::isa::{Instruction, Opcode};

/// Number of pipeline stages.
pub const NUM_STAGES: usize = 7;

/// Pipeline stage identifier, in program-flow order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum Stage {
    Fetch,
    Decode,
    Execute1,
    Execute2,
    Memory1,
    Memory2,
    Writeback,
}

impl Stage {
    /// All stages in program-flow order.
    pub const ALL: [Stage; NUM_STAGES] = [
        Stage::Fetch,
        Stage::Decode,
        Stage::Execute1,
        Stage::Execute2,
        Stage::Memory1,
        Stage::Memory2,
        Stage::Writeback,
    ];

    /// Position in the latch array.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display name used by the cycle trace.
    pub fn name(self) -> &'static str {
        match self {
            Stage::Fetch => "Fetch",
            Stage::Decode => "Decode/RF",
            Stage::Execute1 => "Execute 1",
            Stage::Execute2 => "Execute 2",
            Stage::Memory1 => "Memory 1",
            Stage::Memory2 => "Memory 2",
            Stage::Writeback => "Writeback",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Occupancy of a latch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LatchState {
    /// Bubble.
    #[default]
    Empty,
    /// Holds an instruction (or end marker) the owning stage has yet to process.
    Occupied,
    /// Content already forwarded downstream; kept only until overwritten.
    Draining,
}

/// Single pipeline latch.
///
/// `inst == None` on a non-empty latch is the end-of-program marker produced
/// by fetching at or past the end of code memory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Latch {
    /// Occupancy.
    pub state: LatchState,
    /// Program counter of the held instruction.
    pub pc: u32,
    /// Held instruction; `None` marks end of program.
    pub inst: Option<Instruction>,
    /// Value read for the first source at Decode.
    pub rs1_value: i32,
    /// Value read for the second source at Decode.
    pub rs2_value: i32,
    /// Value read for the third source at Decode.
    pub rs3_value: i32,
    /// Result carried from Execute1 (or Memory2 for loads) to Writeback.
    pub buffer: i32,
    /// Effective address for memory operations.
    pub mem_address: i32,
    /// Multi-cycle occupancy. Checked by every stage, never set.
    pub busy: bool,
    /// Stage could not advance this cycle.
    pub stalled: bool,
    /// HALT whose flush is deferred to Execute2.
    pub halt_deferred: bool,
}

impl Latch {
    /// A freshly fetched latch.
    pub fn occupied(pc: u32, inst: Option<Instruction>) -> Self {
        Self {
            state: LatchState::Occupied,
            pc,
            inst,
            ..Self::default()
        }
    }

    /// Whether the owning stage has work in this latch.
    pub fn is_occupied(&self) -> bool {
        self.state == LatchState::Occupied
    }

    /// Whether this latch carries the end-of-program marker.
    pub fn is_end_marker(&self) -> bool {
        self.state != LatchState::Empty && self.inst.is_none()
    }

    /// Opcode of the held instruction, if any.
    pub fn opcode(&self) -> Option<Opcode> {
        self.inst.map(|inst| inst.opcode)
    }

    /// Whether this latch is occupied by an instruction whose opcode matches.
    pub fn holds(&self, pred: impl Fn(Opcode) -> bool) -> bool {
        self.is_occupied() && self.opcode().is_some_and(pred)
    }

    /// Whether `stage` should process this latch this cycle.
    pub fn ready_at(&self, stage: Stage) -> bool {
        self.is_occupied()
            && !self.busy
            && !self.stalled
            && self.inst.map_or(true, |inst| inst.pending_at(stage))
    }
}

/// The seven latches, indexed by [`Stage`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pipeline {
    latches: [Latch; NUM_STAGES],
}

impl Index<Stage> for Pipeline {
    type Output = Latch;

    fn index(&self, stage: Stage) -> &Latch {
        &self.latches[stage.index()]
    }
}

impl IndexMut<Stage> for Pipeline {
    fn index_mut(&mut self, stage: Stage) -> &mut Latch {
        &mut self.latches[stage.index()]
    }
}

impl Pipeline {
    /// An all-bubble pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands the content of `from` to `to`.
    ///
    /// The copy in `to` becomes `Occupied` with its completion marker set to
    /// `from`. The source keeps a `Draining` copy.
    pub fn forward(&mut self, from: Stage, to: Stage) {
        let mut moved = self[from];
        if let Some(inst) = moved.inst.as_mut() {
            inst.completed = Some(from);
        }
        moved.state = LatchState::Occupied;
        moved.stalled = false;
        self[to] = moved;
        self[from] = Latch {
            state: LatchState::Draining,
            ..moved
        };
    }

    /// Latches in program-flow order.
    pub fn iter(&self) -> impl Iterator<Item = (Stage, &Latch)> {
        Stage::ALL.into_iter().zip(self.latches.iter())
    }
}
