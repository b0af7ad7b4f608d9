//! Trace and final-state rendering.
//!
//! Everything the simulator prints goes through these writers, so tests can
//! render into a `Vec<u8>` and inspect the text.

use std::io::{self, Write};

use strum::IntoEnumIterator;

use crate::common::constants::REG_CC;
use crate::core::arch::gpr::RegisterFile;
use crate::core::arch::memory::DataMemory;
use crate::core::pipeline::{CycleReport, Stage, StageReport};
use crate::core::Cpu;
use crate::isa::Program;

const RULE: &str = "--------------------------------";

/// Writes the code memory table printed before a traced run.
pub fn write_listing(out: &mut dyn Write, program: &Program) -> io::Result<()> {
    writeln!(out, "APEX_CPU: Initialized APEX CPU, loaded {} instructions", program.len())?;
    writeln!(out, "APEX_CPU: Printing Code Memory")?;
    write!(out, "{}", program.listing())
}

/// Writes one line per stage for `report`, in pipeline order.
pub fn write_cycle(out: &mut dyn Write, report: &CycleReport) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "Clock Cycle #: {}", report.cycle)?;
    writeln!(out, "{RULE}")?;
    for stage in Stage::iter() {
        write_stage(out, stage, report.stage(stage))?;
    }
    Ok(())
}

fn write_stage(out: &mut dyn Write, stage: Stage, report: &StageReport) -> io::Result<()> {
    match report.inst.filter(|_| report.is_active()) {
        Some(inst) => writeln!(out, "{:<15}: pc({}) {}", stage, report.pc, inst),
        None => writeln!(out, "{:<15}: EMPTY", stage),
    }
}

/// Writes the architectural register file with validity.
pub fn write_registers(out: &mut dyn Write, regs: &RegisterFile) -> io::Result<()> {
    writeln!(out, "=============== STATE OF ARCHITECTURAL REGISTER FILE ==========")?;
    for (i, value, valid) in regs.gprs() {
        let status = if valid { "VALID" } else { "INVALID" };
        writeln!(out, "| \t REG[{i}] \t | \t Value={value} \t | \t STATUS={status} \t |")?;
    }
    writeln!(out, "| \t CC[{REG_CC}] \t | \t Value={} \t |", regs.cc())
}

/// Writes the first `window` data-memory cells.
pub fn write_memory(out: &mut dyn Write, memory: &DataMemory, window: usize) -> io::Result<()> {
    writeln!(out, "============== STATE OF DATA MEMORY =============")?;
    for (addr, value) in memory.window(window).iter().enumerate() {
        writeln!(out, "| \t MEM[{addr}] \t | \t Data Value={value} \t |")?;
    }
    Ok(())
}

/// Writes the end-of-run dump: registers, data memory and statistics.
pub fn write_final_state(out: &mut dyn Write, cpu: &Cpu, window: usize) -> io::Result<()> {
    writeln!(out)?;
    write_registers(out, &cpu.regs)?;
    writeln!(out)?;
    write_memory(out, &cpu.memory, window)?;
    cpu.stats.write_to(out)
}
