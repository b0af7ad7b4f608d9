//! APEX Register File.
//!
//! This module implements the 17-slot register file: R0-R15 plus the
//! condition-code register at index 16. Every slot carries a validity bit.
//! A register is invalid exactly while an in-flight instruction has claimed it
//! as its destination (Execute1) and has not yet written it back.

use crate::common::constants::{NUM_GPRS, NUM_REGS, REG_CC};
use crate::common::SimError;

/// Register file with per-register validity bits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [i32; NUM_REGS],
    valid: [bool; NUM_REGS],
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    /// Creates a register file with every register zero and valid.
    pub fn new() -> Self {
        Self {
            regs: [0; NUM_REGS],
            valid: [true; NUM_REGS],
        }
    }

    fn check(idx: usize) -> Result<usize, SimError> {
        if idx < NUM_REGS {
            Ok(idx)
        } else {
            Err(SimError::RegisterOutOfRange { index: idx })
        }
    }

    /// Reads a register value.
    ///
    /// # Errors
    ///
    /// [`SimError::RegisterOutOfRange`] for an index past the condition code.
    pub fn read(&self, idx: usize) -> Result<i32, SimError> {
        Ok(self.regs[Self::check(idx)?])
    }

    /// Writes a register value. Validity is left untouched.
    ///
    /// # Errors
    ///
    /// [`SimError::RegisterOutOfRange`] for an index past the condition code.
    pub fn write(&mut self, idx: usize, val: i32) -> Result<(), SimError> {
        self.regs[Self::check(idx)?] = val;
        Ok(())
    }

    /// Whether no in-flight instruction holds a pending write to `idx`.
    ///
    /// # Errors
    ///
    /// [`SimError::RegisterOutOfRange`] for an index past the condition code.
    pub fn is_valid(&self, idx: usize) -> Result<bool, SimError> {
        Ok(self.valid[Self::check(idx)?])
    }

    /// Marks `idx` as claimed by an in-flight writer.
    ///
    /// # Errors
    ///
    /// [`SimError::RegisterOutOfRange`] for an index past the condition code.
    pub fn invalidate(&mut self, idx: usize) -> Result<(), SimError> {
        self.valid[Self::check(idx)?] = false;
        Ok(())
    }

    /// Releases the claim on `idx`.
    ///
    /// # Errors
    ///
    /// [`SimError::RegisterOutOfRange`] for an index past the condition code.
    pub fn validate(&mut self, idx: usize) -> Result<(), SimError> {
        self.valid[Self::check(idx)?] = true;
        Ok(())
    }

    /// Current condition code: 1 when the last committed arithmetic result was zero.
    pub fn cc(&self) -> i32 {
        self.regs[REG_CC]
    }

    /// Updates the condition code from an arithmetic result.
    pub fn set_cc(&mut self, zero: bool) {
        self.regs[REG_CC] = i32::from(zero);
    }

    /// General-purpose registers as `(index, value, valid)` triples.
    pub fn gprs(&self) -> impl Iterator<Item = (usize, i32, bool)> + '_ {
        (0..NUM_GPRS).map(move |i| (i, self.regs[i], self.valid[i]))
    }
}
