//! Simulation statistics collection and reporting.
//!
//! Tracks cycle and instruction counts, the retired instruction mix, stall
//! cycles per cause, and pipeline flushes.

use std::io::{self, Write};
use std::time::Instant;

use crate::isa::Opcode;

/// Simulation statistics structure tracking all performance metrics.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    pub cycles: u64,
    pub instructions_retired: u64,

    pub inst_alu: u64,
    pub inst_load: u64,
    pub inst_store: u64,
    pub inst_branch: u64,
    pub inst_other: u64,

    /// Decode cycles lost waiting for a source register.
    pub stalls_data: u64,
    /// Decode cycles lost waiting for the condition code.
    pub stalls_control: u64,
    /// Fetch cycles spent holding an instruction behind Decode.
    pub stalls_fetch: u64,

    /// Redirects applied by taken branches and jumps.
    pub flushes: u64,
    /// HALT flushes applied.
    pub halts: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_retired: 0,
            inst_alu: 0,
            inst_load: 0,
            inst_store: 0,
            inst_branch: 0,
            inst_other: 0,
            stalls_data: 0,
            stalls_control: 0,
            stalls_fetch: 0,
            flushes: 0,
            halts: 0,
        }
    }
}

impl SimStats {
    /// Counts one instruction retired at Writeback.
    pub fn retire(&mut self, op: Opcode) {
        self.instructions_retired += 1;
        match op {
            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::And
            | Opcode::Or
            | Opcode::ExOr
            | Opcode::Addl
            | Opcode::Subl
            | Opcode::Movc => self.inst_alu += 1,
            Opcode::Load | Opcode::Ldr => self.inst_load += 1,
            Opcode::Store | Opcode::Str => self.inst_store += 1,
            Opcode::Bz | Opcode::Bnz | Opcode::Jump => self.inst_branch += 1,
            Opcode::Halt => self.inst_other += 1,
        }
    }

    /// Prints a formatted summary to stdout.
    pub fn print(&self) {
        let stdout = io::stdout();
        // Nothing useful to do if stdout is gone.
        let _ = self.write_to(&mut stdout.lock());
    }

    /// Writes a formatted summary of all simulation statistics.
    pub fn write_to(&self, out: &mut dyn Write) -> io::Result<()> {
        let seconds = self.start_time.elapsed().as_secs_f64();

        let cyc = if self.cycles == 0 { 1 } else { self.cycles };
        let instr = if self.instructions_retired == 0 {
            1
        } else {
            self.instructions_retired
        };

        let ipc = self.instructions_retired as f64 / cyc as f64;
        let cpi = cyc as f64 / instr as f64;
        let pct = |n: u64, of: u64| (n as f64 / of as f64) * 100.0;

        writeln!(out, "\n==========================================================")?;
        writeln!(out, "APEX PIPELINE SIMULATION STATISTICS")?;
        writeln!(out, "==========================================================")?;
        writeln!(out, "host_seconds             {:.4} s", seconds)?;
        writeln!(out, "sim_cycles               {}", self.cycles)?;
        writeln!(out, "sim_insts                {}", self.instructions_retired)?;
        writeln!(out, "sim_ipc                  {:.4}", ipc)?;
        writeln!(out, "sim_cpi                  {:.4}", cpi)?;
        writeln!(out, "----------------------------------------------------------")?;
        writeln!(out, "PIPELINE")?;
        writeln!(
            out,
            "  stalls.data            {} ({:.2}%)",
            self.stalls_data,
            pct(self.stalls_data, cyc)
        )?;
        writeln!(
            out,
            "  stalls.control         {} ({:.2}%)",
            self.stalls_control,
            pct(self.stalls_control, cyc)
        )?;
        writeln!(
            out,
            "  stalls.fetch           {} ({:.2}%)",
            self.stalls_fetch,
            pct(self.stalls_fetch, cyc)
        )?;
        writeln!(out, "  flushes.redirect       {}", self.flushes)?;
        writeln!(out, "  flushes.halt           {}", self.halts)?;
        writeln!(out, "----------------------------------------------------------")?;
        writeln!(out, "INSTRUCTION MIX")?;
        for (name, count) in [
            ("op.alu   ", self.inst_alu),
            ("op.load  ", self.inst_load),
            ("op.store ", self.inst_store),
            ("op.branch", self.inst_branch),
            ("op.other ", self.inst_other),
        ] {
            writeln!(out, "  {}              {} ({:.2}%)", name, count, pct(count, instr))?;
        }
        writeln!(out, "==========================================================")
    }
}
