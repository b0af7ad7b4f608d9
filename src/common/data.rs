//! Memory Access Types.
//!
//! Classifies data memory accesses so that range violations raised by
//! the Memory2 stage can report which direction faulted.

use std::fmt;

/// Type of data memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Data read access, performed by `LOAD` and `LDR`.
    Read,

    /// Data write access, performed by `STORE` and `STR`.
    Write,
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessType::Read => write!(f, "read"),
            AccessType::Write => write!(f, "write"),
        }
    }
}
