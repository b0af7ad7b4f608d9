//! Pipeline Latch Interface.
//!
//! Common behavior for anything that can be squashed by a flush: a single
//! stage latch or the whole pipeline.

use super::latches::{Latch, LatchState, Pipeline};

/// Represents a pipeline latch (inter-stage buffer).
///
/// Latches must support flushing (clearing contents on a branch, jump or HALT)
/// and checking for emptiness.
pub trait PipelineLatch {
    /// Resets to a bubble, clearing any stall or deferral flags.
    fn flush(&mut self);

    /// Checks if nothing is held.
    fn is_empty(&self) -> bool;
}

impl PipelineLatch for Latch {
    fn flush(&mut self) {
        *self = Latch::default();
    }

    fn is_empty(&self) -> bool {
        self.state == LatchState::Empty
    }
}

impl PipelineLatch for Pipeline {
    fn flush(&mut self) {
        *self = Pipeline::default();
    }

    fn is_empty(&self) -> bool {
        self.iter().all(|(_, latch)| latch.is_empty())
    }
}
