//! Pipeline stage logic.
//!
//! One function per stage. Each reads its own latch, does its work, forwards
//! into the next latch and returns a [`StageReport`](crate::core::pipeline::StageReport).
//! The CPU calls them from Writeback back to Fetch.

mod decode;
mod execute;
mod fetch;
mod memory_access;
mod write_back;

pub use decode::decode_stage;
pub use execute::{execute1_stage, execute2_stage};
pub use fetch::fetch_stage;
pub use memory_access::{memory1_stage, memory2_stage};
pub use write_back::wb_stage;
