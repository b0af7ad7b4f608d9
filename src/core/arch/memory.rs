//! Data memory.
//!
//! A flat array of integer cells addressed by the effective address computed
//! in Execute1. Only Memory2 touches it; every access is range checked.

use crate::common::constants::DEFAULT_DATA_WORDS;
use crate::common::{AccessType, SimError};

/// Flat word-addressed data memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataMemory {
    cells: Vec<i32>,
}

impl Default for DataMemory {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_WORDS)
    }
}

impl DataMemory {
    /// Creates zero-filled memory with `words` cells.
    pub fn new(words: usize) -> Self {
        Self {
            cells: vec![0; words],
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether memory has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn slot(&self, addr: i32, access: AccessType) -> Result<usize, SimError> {
        usize::try_from(addr)
            .ok()
            .filter(|&idx| idx < self.cells.len())
            .ok_or(SimError::MemoryOutOfRange {
                addr: i64::from(addr),
                access,
            })
    }

    /// Reads the cell at `addr`.
    ///
    /// # Errors
    ///
    /// [`SimError::MemoryOutOfRange`] if `addr` is negative or past the end.
    pub fn read(&self, addr: i32) -> Result<i32, SimError> {
        let idx = self.slot(addr, AccessType::Read)?;
        Ok(self.cells[idx])
    }

    /// Writes `val` to the cell at `addr`.
    ///
    /// # Errors
    ///
    /// [`SimError::MemoryOutOfRange`] if `addr` is negative or past the end.
    pub fn write(&mut self, addr: i32, val: i32) -> Result<(), SimError> {
        let idx = self.slot(addr, AccessType::Write)?;
        self.cells[idx] = val;
        Ok(())
    }

    /// The first `count` cells (fewer if memory is smaller).
    pub fn window(&self, count: usize) -> &[i32] {
        &self.cells[..count.min(self.cells.len())]
    }
}
