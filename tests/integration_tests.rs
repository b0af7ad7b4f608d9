//! End-to-end pipeline tests.
//!
//! Each test loads a small APEX program and checks cycle counts, retired
//! instruction counts and the final architectural state.

use pretty_assertions::assert_eq;

use apex_sim::common::SimError;
use apex_sim::config::Config;
use apex_sim::core::pipeline::signals::Activity;
use apex_sim::core::pipeline::{HaltSeverity, LatchState, Stage, StopReason};
use apex_sim::core::Cpu;
use apex_sim::isa::Program;
use apex_sim::sim::loader::parse_program;
use apex_sim::sim::{RunOutcome, Simulator};

const SIMPLE: &str = "MOVC,R1,#5\nMOVC,R2,#10\nADD,R3,R1,R2\n";

const TAKEN_BRANCH: &str = "\
MOVC,R1,#0
ADDL,R2,R1,#0
BZ,#12
MOVC,R3,#99
MOVC,R4,#77
MOVC,R5,#1
HALT
";

fn program(src: &str) -> Program {
    Program::new(parse_program(src).unwrap())
}

fn cpu(src: &str) -> Cpu {
    Cpu::new(program(src), &Config::default())
}

fn run(src: &str, max_cycles: u64) -> (Simulator, RunOutcome) {
    let mut sim = Simulator::new(program(src), &Config::default());
    let outcome = sim.run(max_cycles).unwrap();
    (sim, outcome)
}

fn reg(sim: &Simulator, idx: usize) -> i32 {
    sim.cpu.regs.read(idx).unwrap()
}

fn assert_all_valid(sim: &Simulator) {
    for (i, _, valid) in sim.cpu.regs.gprs() {
        assert!(valid, "R{i} left invalid");
    }
}

/// Tests a straight-line program drains after the end marker reaches Writeback.
#[test]
fn test_straight_line_drains() {
    let (sim, outcome) = run(SIMPLE, 100);
    assert_eq!(outcome, RunOutcome::Drained { cycles: 14 });
    assert_eq!(sim.cpu.instructions_completed(), 3);
    assert_eq!(reg(&sim, 1), 5);
    assert_eq!(reg(&sim, 2), 10);
    assert_eq!(reg(&sim, 3), 15);
    assert_eq!(sim.cpu.regs.cc(), 0);
    assert_all_valid(&sim);
    assert_eq!(sim.cpu.stats.stalls_data, 4);
    assert_eq!(sim.cpu.stats.stalls_fetch, 4);
    assert_eq!(sim.cpu.stats.stalls_control, 0);
}

/// Tests the cycle bound stops the run with in-flight writers still pending.
#[test]
fn test_cycle_limit() {
    let (sim, outcome) = run(SIMPLE, 5);
    assert_eq!(outcome, RunOutcome::CycleLimit { cycles: 5 });
    assert!(!outcome.is_complete());
    assert_eq!(outcome.cycles(), 5);
    assert_eq!(sim.cpu.instructions_completed(), 0);
    assert!(!sim.cpu.regs.is_valid(1).unwrap());
    assert!(!sim.cpu.regs.is_valid(2).unwrap());
}

/// Tests a zero budget simulates nothing.
#[test]
fn test_zero_cycles() {
    let (sim, outcome) = run(SIMPLE, 0);
    assert_eq!(outcome, RunOutcome::CycleLimit { cycles: 0 });
    assert_eq!(sim.cpu.stats.cycles, 0);
}

/// Tests the register-validity window of a writer as seen by a dependent instruction.
///
/// The first MOVC claims R1 in Execute1 (cycle 3) and releases it at Writeback
/// (cycle 7). Writeback runs before Decode, so the dependent ADD reads R1 in
/// cycle 7 but still waits on R2 and leaves Decode in cycle 8.
#[test]
fn test_register_validity_window() {
    let mut cpu = cpu(SIMPLE);

    let first = cpu.tick().unwrap();
    assert_eq!(first.cycle, 1);
    assert_eq!(first.stage(Stage::Fetch).pc, 4000);
    assert!(first.stage(Stage::Fetch).is_active());
    assert!(!first.stage(Stage::Decode).is_active());

    cpu.tick().unwrap();
    assert!(cpu.regs.is_valid(1).unwrap());

    let third = cpu.tick().unwrap();
    assert_eq!(third.stage(Stage::Execute1).pc, 4000);
    assert!(!cpu.regs.is_valid(1).unwrap());

    for _ in 4..=6 {
        let report = cpu.tick().unwrap();
        assert_eq!(report.stage(Stage::Decode).pc, 4008);
        assert_eq!(report.stage(Stage::Decode).activity, Activity::Stalled);
        assert!(!cpu.regs.is_valid(1).unwrap());
        assert_eq!(cpu.pc, 4012);
    }

    let seventh = cpu.tick().unwrap();
    assert_eq!(seventh.stage(Stage::Writeback).pc, 4000);
    assert!(cpu.regs.is_valid(1).unwrap());
    assert!(!cpu.regs.is_valid(2).unwrap());
    assert!(cpu.pipeline[Stage::Decode].stalled);

    let eighth = cpu.tick().unwrap();
    assert_eq!(eighth.stage(Stage::Writeback).pc, 4004);
    assert_eq!(eighth.stage(Stage::Decode).pc, 4008);
    assert!(!cpu.pipeline[Stage::Decode].stalled);
    assert_eq!(cpu.pipeline[Stage::Execute1].rs1_value, 5);
    assert_eq!(cpu.pipeline[Stage::Execute1].rs2_value, 10);
}

/// Tests a stalled Decode holds Fetch without advancing the PC.
#[test]
fn test_fetch_back_pressure() {
    let mut cpu = cpu(SIMPLE);
    for _ in 0..4 {
        cpu.tick().unwrap();
    }
    assert!(cpu.pipeline[Stage::Fetch].stalled);
    assert_eq!(cpu.pipeline[Stage::Fetch].pc, 4012);
    assert!(cpu.pipeline[Stage::Fetch].is_end_marker());
    assert_eq!(cpu.pc, 4012);
}

/// Tests a taken branch flushes the younger instructions and redirects fetch.
#[test]
fn test_taken_branch() {
    let mut cpu = cpu(TAKEN_BRANCH);
    for _ in 0..12 {
        let report = cpu.tick().unwrap();
        assert_eq!(report.signals.redirect, None);
    }

    let report = cpu.tick().unwrap();
    assert_eq!(report.cycle, 13);
    assert_eq!(report.stage(Stage::Execute2).pc, 4008);
    assert_eq!(report.signals.redirect, Some(4020));
    assert_eq!(cpu.pc, 4020);
    for stage in [Stage::Fetch, Stage::Decode, Stage::Execute1, Stage::Execute2] {
        assert_eq!(cpu.pipeline[stage].state, LatchState::Empty, "{stage:?}");
    }
    assert_eq!(cpu.pipeline[Stage::Memory1].state, LatchState::Occupied);
    assert!(cpu.regs.is_valid(3).unwrap());
    assert!(cpu.regs.is_valid(4).unwrap());
}

/// Tests the full run of the taken-branch program.
#[test]
fn test_taken_branch_final_state() {
    let (sim, outcome) = run(TAKEN_BRANCH, 100);
    assert_eq!(outcome, RunOutcome::Halted { cycles: 21 });
    assert_eq!(sim.cpu.instructions_completed(), 5);
    assert_eq!(reg(&sim, 3), 0);
    assert_eq!(reg(&sim, 4), 0);
    assert_eq!(reg(&sim, 5), 1);
    assert_eq!(sim.cpu.regs.cc(), 1);
    assert_all_valid(&sim);
    assert_eq!(sim.cpu.stats.flushes, 1);
    assert_eq!(sim.cpu.stats.halts, 1);
    assert_eq!(sim.cpu.stats.stalls_data, 4);
    assert_eq!(sim.cpu.stats.stalls_control, 3);
    assert_eq!(sim.cpu.stats.inst_branch, 1);
}

/// Tests a branch that is not taken lets the fall-through path execute.
#[test]
fn test_branch_not_taken() {
    let src = "MOVC,R1,#1\nADDL,R2,R1,#0\nBZ,#8\nMOVC,R3,#3\nHALT\n";
    let (sim, outcome) = run(src, 100);
    assert!(matches!(outcome, RunOutcome::Halted { .. }));
    assert_eq!(sim.cpu.instructions_completed(), 5);
    assert_eq!(reg(&sim, 3), 3);
    assert_eq!(sim.cpu.stats.flushes, 0);
}

/// Tests a countdown loop with a backward BNZ.
#[test]
fn test_backward_branch_loop() {
    let src = "\
MOVC,R1,#3
MOVC,R2,#0
ADDL,R2,R2,#2
SUBL,R1,R1,#1
BNZ,#-8
HALT
";
    let (sim, outcome) = run(src, 500);
    assert_eq!(outcome, RunOutcome::Halted { cycles: 37 });
    assert_eq!(sim.cpu.instructions_completed(), 12);
    assert_eq!(reg(&sim, 1), 0);
    assert_eq!(reg(&sim, 2), 6);
    assert_eq!(sim.cpu.regs.cc(), 1);
    assert_eq!(sim.cpu.stats.flushes, 2);
    assert_all_valid(&sim);
}

/// Tests a store followed by a dependent load through data memory.
#[test]
fn test_store_then_load() {
    let src = "MOVC,R1,#42\nMOVC,R2,#10\nSTORE,R1,R2,#5\nLOAD,R3,R2,#5\nHALT\n";
    let mut sim = Simulator::new(program(src), &Config::default());
    loop {
        let report = sim.cpu.tick().unwrap();
        let wb = report.stage(Stage::Writeback);
        if wb.is_active() && wb.pc == 4012 {
            assert_eq!(reg(&sim, 3), 42);
            break;
        }
        assert_eq!(reg(&sim, 3), 0);
        assert!(report.cycle < 50);
    }
    let outcome = sim.run(100).unwrap();
    assert_eq!(outcome, RunOutcome::Halted { cycles: 15 });
    assert_eq!(sim.cpu.memory.read(15).unwrap(), 42);
    assert_eq!(sim.cpu.instructions_completed(), 5);
    assert_eq!(sim.cpu.stats.inst_load, 1);
    assert_eq!(sim.cpu.stats.inst_store, 1);
}

/// Tests the register-register ALU and memory forms.
#[test]
fn test_alu_and_indexed_memory() {
    let src = "\
MOVC,R1,#6
MOVC,R2,#3
MUL,R3,R1,R2
AND,R4,R1,R2
OR,R5,R1,R2
EX-OR,R6,R1,R2
SUB,R7,R2,R2
STR,R3,R1,R2
LDR,R8,R2,R1
HALT
";
    let (sim, outcome) = run(src, 500);
    assert_eq!(outcome, RunOutcome::Halted { cycles: 20 });
    assert_eq!(sim.cpu.instructions_completed(), 10);
    let values: Vec<i32> = (1..=8).map(|i| reg(&sim, i)).collect();
    assert_eq!(values, vec![6, 3, 18, 2, 7, 5, 0, 18]);
    assert_eq!(sim.cpu.memory.read(9).unwrap(), 18);
    assert_eq!(sim.cpu.regs.cc(), 1);
}

/// Tests HALT squashes the instructions fetched behind it.
#[test]
fn test_halt_drains_older_instructions() {
    let src = "MOVC,R1,#1\nMOVC,R2,#2\nHALT\nMOVC,R3,#3\nMOVC,R4,#4\n";
    let mut cpu = cpu(src);
    for _ in 0..3 {
        cpu.tick().unwrap();
    }
    let report = cpu.tick().unwrap();
    assert_eq!(report.signals.halt, Some(HaltSeverity::Frontend));
    assert_eq!(cpu.pc, 4020);
    assert_eq!(cpu.pipeline[Stage::Fetch].state, LatchState::Empty);
    assert_eq!(cpu.pipeline[Stage::Decode].state, LatchState::Empty);

    let mut sim = Simulator { cpu };
    let outcome = sim.run(100).unwrap();
    assert_eq!(outcome, RunOutcome::Halted { cycles: 9 });
    assert_eq!(sim.cpu.instructions_completed(), 3);
    assert_eq!(reg(&sim, 1), 1);
    assert_eq!(reg(&sim, 2), 2);
    assert_eq!(reg(&sim, 3), 0);
    assert_eq!(reg(&sim, 4), 0);
    assert_all_valid(&sim);
}

/// Tests JUMP redirects to a register-relative target.
#[test]
fn test_jump() {
    let src = "\
MOVC,R1,#4016
JUMP,R1,#4
MOVC,R2,#2
MOVC,R3,#3
MOVC,R4,#4
MOVC,R5,#8
HALT
";
    let (sim, outcome) = run(src, 100);
    assert_eq!(outcome, RunOutcome::Halted { cycles: 17 });
    assert_eq!(sim.cpu.instructions_completed(), 4);
    assert_eq!(reg(&sim, 5), 8);
    for i in 2..=4 {
        assert_eq!(reg(&sim, i), 0, "R{i}");
    }
    assert_all_valid(&sim);
    assert_eq!(sim.cpu.stats.flushes, 1);
}

/// Tests a HALT right behind an unresolved branch that falls through.
#[test]
fn test_halt_behind_untaken_branch() {
    let src = "MOVC,R1,#1\nADDL,R2,R1,#0\nBZ,#8\nHALT\nMOVC,R3,#3\n";
    let mut sim = Simulator::new(program(src), &Config::default());
    let mut full_halt_cycle = None;
    let outcome = loop {
        let report = sim.cpu.tick().unwrap();
        if report.signals.halt == Some(HaltSeverity::Full) {
            full_halt_cycle = Some(report.cycle);
        }
        if let Some(reason) = report.signals.stop {
            assert_eq!(reason, StopReason::Halted);
            break report.cycle;
        }
    };
    assert_eq!(full_halt_cycle, Some(14));
    assert_eq!(outcome, 17);
    assert_eq!(sim.cpu.instructions_completed(), 4);
    assert_eq!(reg(&sim, 3), 0);
    assert_all_valid(&sim);
}

/// Tests a taken branch overrides the HALT queued behind it.
#[test]
fn test_halt_behind_taken_branch() {
    let src = "MOVC,R1,#0\nADDL,R2,R1,#0\nBZ,#8\nHALT\nMOVC,R3,#3\nHALT\n";
    let (sim, outcome) = run(src, 100);
    assert_eq!(outcome, RunOutcome::Halted { cycles: 21 });
    assert_eq!(sim.cpu.instructions_completed(), 5);
    assert_eq!(reg(&sim, 3), 3);
    assert_all_valid(&sim);
}

/// Tests degenerate programs.
#[test]
fn test_empty_and_halt_only_programs() {
    let (sim, outcome) = run("", 100);
    assert_eq!(outcome, RunOutcome::Drained { cycles: 7 });
    assert_eq!(sim.cpu.instructions_completed(), 0);

    let (sim, outcome) = run("HALT\n", 100);
    assert_eq!(outcome, RunOutcome::Halted { cycles: 7 });
    assert_eq!(sim.cpu.instructions_completed(), 1);
    assert_eq!(sim.cpu.stats.inst_other, 1);
}

/// Tests a store past the end of data memory is reported.
#[test]
fn test_memory_fault() {
    let src = "MOVC,R1,#4000\nSTORE,R1,R1,#0\nHALT\n";
    let mut sim = Simulator::new(program(src), &Config::default());
    let err = sim.run(100).unwrap_err();
    assert!(matches!(err, SimError::MemoryOutOfRange { addr: 4000, .. }));
}

/// Tests a configured data memory size is honoured.
#[test]
fn test_configured_memory_size() {
    let src = "MOVC,R1,#20\nLOAD,R2,R1,#0\nHALT\n";
    let mut config = Config::default();
    config.memory.data_words = 16;
    let mut sim = Simulator::new(program(src), &config);
    assert_eq!(sim.cpu.memory.len(), 16);
    assert!(matches!(
        sim.run(100),
        Err(SimError::MemoryOutOfRange { addr: 20, .. })
    ));
}

/// Tests control transfers to addresses outside code memory.
#[test]
fn test_bad_jump_targets() {
    let mut sim = Simulator::new(program("MOVC,R1,#-100\nJUMP,R1,#0\n"), &Config::default());
    assert!(matches!(
        sim.run(100),
        Err(SimError::InvalidTarget { pc: 4004, target: -100 })
    ));

    let mut sim = Simulator::new(program("MOVC,R1,#3996\nJUMP,R1,#0\n"), &Config::default());
    assert!(matches!(
        sim.run(100),
        Err(SimError::FetchOutOfRange { pc: 3996 })
    ));
}

/// Tests a traced run produces the same outcome and one header per cycle.
#[test]
fn test_traced_run_matches_silent_run() {
    let mut sim = Simulator::new(program(SIMPLE), &Config::default());
    let mut trace = Vec::new();
    let outcome = sim.run_traced(100, &mut trace).unwrap();
    assert_eq!(outcome, RunOutcome::Drained { cycles: 14 });

    let text = String::from_utf8(trace).unwrap();
    assert_eq!(text.matches("Clock Cycle #:").count(), 14);
    assert!(text.contains("Clock Cycle #: 14"));
}
