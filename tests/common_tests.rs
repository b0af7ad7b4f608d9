//! Tests for the architectural state: register file and data memory.

use apex_sim::common::constants::{NUM_GPRS, NUM_REGS, REG_CC};
use apex_sim::common::{AccessType, SimError};
use apex_sim::core::arch::gpr::RegisterFile;
use apex_sim::core::arch::memory::DataMemory;

/// Tests that a fresh register file is zero and fully valid.
#[test]
fn test_register_file_reset_state() {
    let regs = RegisterFile::new();
    for i in 0..NUM_REGS {
        assert_eq!(regs.read(i).unwrap(), 0);
        assert!(regs.is_valid(i).unwrap());
    }
    assert_eq!(regs.gprs().count(), NUM_GPRS);
}

/// Tests register writes, including R0 which is an ordinary register in APEX.
#[test]
fn test_register_read_write() {
    let mut regs = RegisterFile::new();
    regs.write(0, 7).unwrap();
    regs.write(15, -3).unwrap();
    assert_eq!(regs.read(0).unwrap(), 7);
    assert_eq!(regs.read(15).unwrap(), -3);
}

/// Tests that validity is tracked independently of the value.
#[test]
fn test_register_validity() {
    let mut regs = RegisterFile::new();
    regs.invalidate(4).unwrap();
    assert!(!regs.is_valid(4).unwrap());
    regs.write(4, 9).unwrap();
    assert!(!regs.is_valid(4).unwrap());
    regs.validate(4).unwrap();
    assert!(regs.is_valid(4).unwrap());
    assert_eq!(regs.read(4).unwrap(), 9);
}

/// Tests the condition code lives at index 16.
#[test]
fn test_condition_code() {
    let mut regs = RegisterFile::new();
    assert_eq!(regs.cc(), 0);
    regs.set_cc(true);
    assert_eq!(regs.cc(), 1);
    assert_eq!(regs.read(REG_CC).unwrap(), 1);
    regs.set_cc(false);
    assert_eq!(regs.cc(), 0);
}

/// Tests out-of-range register indices are rejected.
#[test]
fn test_register_out_of_range() {
    let mut regs = RegisterFile::new();
    assert!(matches!(
        regs.read(NUM_REGS),
        Err(SimError::RegisterOutOfRange { index: 17 })
    ));
    assert!(regs.write(99, 1).is_err());
    assert!(regs.invalidate(17).is_err());
}

/// Tests data memory reads and writes within bounds.
#[test]
fn test_memory_read_write() {
    let mut mem = DataMemory::new(16);
    assert_eq!(mem.len(), 16);
    mem.write(0, 11).unwrap();
    mem.write(15, -1).unwrap();
    assert_eq!(mem.read(0).unwrap(), 11);
    assert_eq!(mem.read(15).unwrap(), -1);
    assert_eq!(mem.window(2), &[11, 0]);
    assert_eq!(mem.window(100).len(), 16);
}

/// Tests data memory bounds checking in both directions.
#[test]
fn test_memory_out_of_range() {
    let mut mem = DataMemory::new(16);
    match mem.read(16) {
        Err(SimError::MemoryOutOfRange { addr, access }) => {
            assert_eq!(addr, 16);
            assert_eq!(access, AccessType::Read);
        }
        other => panic!("expected MemoryOutOfRange, got {:?}", other),
    }
    match mem.write(-1, 0) {
        Err(SimError::MemoryOutOfRange { addr, access }) => {
            assert_eq!(addr, -1);
            assert_eq!(access, AccessType::Write);
        }
        other => panic!("expected MemoryOutOfRange, got {:?}", other),
    }
}

/// Tests error messages render the useful fields.
#[test]
fn test_error_display() {
    let err = SimError::MemoryOutOfRange {
        addr: 5000,
        access: AccessType::Write,
    };
    assert_eq!(err.to_string(), "data memory write at address 5000 out of range");
    let err = SimError::FetchOutOfRange { pc: 3996 };
    assert!(err.to_string().contains("3996"));
}
