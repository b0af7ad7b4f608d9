//! Architectural constants.

/// Number of general-purpose registers (R0-R15).
pub const NUM_GPRS: usize = 16;

/// Index of the condition-code register inside the register file.
pub const REG_CC: usize = 16;

/// Total register file slots: 16 general-purpose + 1 condition code.
pub const NUM_REGS: usize = NUM_GPRS + 1;

/// Address of the first instruction in code memory.
pub const DEFAULT_CODE_BASE: u32 = 4000;

/// Size of one instruction in bytes; `pc` advances by this amount.
pub const DEFAULT_INSTRUCTION_WIDTH: u32 = 4;

/// Number of integer cells in data memory.
pub const DEFAULT_DATA_WORDS: usize = 4000;

/// Number of data memory cells included in the final report.
pub const DEFAULT_REPORT_WINDOW: usize = 100;
