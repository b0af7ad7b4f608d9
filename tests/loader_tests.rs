//! Tests for the program loader.

use std::io::Write;

use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::NamedTempFile;

use apex_sim::common::LoadError;
use apex_sim::config::Config;
use apex_sim::isa::{Instruction, Opcode};
use apex_sim::sim::loader::{load_program, parse_instruction, parse_program};

/// Tests parsing a record of every format.
#[test]
fn test_parse_all_formats() {
    let text = "\
MOVC,R1,#5
ADD,R3,R1,R2
ADDL,R4,R3,#-2
STORE,R1,R2,#8
STR,R1,R2,R3
JUMP,R5,#4
BZ,#-8
HALT
";
    let program = parse_program(text).unwrap();
    assert_eq!(
        program,
        vec![
            Instruction { rd: 1, imm: 5, ..Instruction::new(Opcode::Movc) },
            Instruction { rd: 3, rs1: 1, rs2: 2, ..Instruction::new(Opcode::Add) },
            Instruction { rd: 4, rs1: 3, imm: -2, ..Instruction::new(Opcode::Addl) },
            Instruction { rs1: 1, rs2: 2, imm: 8, ..Instruction::new(Opcode::Store) },
            Instruction { rs1: 1, rs2: 2, rs3: 3, ..Instruction::new(Opcode::Str) },
            Instruction { rs1: 5, imm: 4, ..Instruction::new(Opcode::Jump) },
            Instruction { imm: -8, ..Instruction::new(Opcode::Bz) },
            Instruction::new(Opcode::Halt),
        ]
    );
}

/// Tests whitespace, comments, blank lines and lower-case mnemonics.
#[test]
fn test_parse_lenient_syntax() {
    let text = "; setup\n\n  movc, R1 , #5  \r\n// done\nEX-OR,R2,R1,R1\nhalt,\n";
    let program = parse_program(text).unwrap();
    assert_eq!(program.len(), 3);
    assert_eq!(program[0].opcode, Opcode::Movc);
    assert_eq!(program[0].imm, 5);
    assert_eq!(program[1].opcode, Opcode::ExOr);
    assert_eq!(program[2].opcode, Opcode::Halt);
}

/// Tests an empty file loads as an empty program.
#[test]
fn test_parse_empty() {
    assert!(parse_program("").unwrap().is_empty());
    assert!(parse_program("\n; nothing\n").unwrap().is_empty());
}

/// Tests error variants and their line numbers.
#[rstest]
#[case("NOP", "unknown opcode")]
#[case("MOVC,R1", "expects 2 operand(s), found 1")]
#[case("ADD,R1,R2,R3,R4", "expects 3 operand(s), found 4")]
#[case("MOVC,R1,5", "malformed operand '5'")]
#[case("MOVC,X1,#5", "malformed operand 'X1'")]
#[case("ADDL,R1,R2,#abc", "malformed operand '#abc'")]
#[case("MOVC,R16,#1", "register R16 out of range")]
fn test_parse_errors(#[case] record: &str, #[case] message: &str) {
    let err = parse_instruction(7, record).unwrap_err();
    let text = err.to_string();
    assert!(text.starts_with("line 7:"), "{text}");
    assert!(text.contains(message), "{text}");
}

/// Tests the reported line number counts skipped lines.
#[test]
fn test_parse_error_line_number() {
    let err = parse_program("MOVC,R1,#1\n\n; c\nBOGUS,R1\n").unwrap_err();
    match err {
        LoadError::UnknownOpcode { line, opcode } => {
            assert_eq!(line, 4);
            assert_eq!(opcode, "BOGUS");
        }
        other => panic!("expected UnknownOpcode, got {:?}", other),
    }
}

/// Tests loading from disk with the default layout.
#[test]
fn test_load_program_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "MOVC,R1,#5").unwrap();
    writeln!(file, "HALT").unwrap();

    let program = load_program(file.path(), &Config::default()).unwrap();
    assert_eq!(program.len(), 2);
    assert_eq!(program.base(), 4000);
    assert_eq!(program.end_pc(), 4008);
}

/// Tests the configured code layout is applied.
#[test]
fn test_load_program_custom_layout() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "HALT").unwrap();

    let mut config = Config::default();
    config.pipeline.code_base = 100;
    config.pipeline.instruction_width = 2;
    let program = load_program(file.path(), &config).unwrap();
    assert_eq!(program.base(), 100);
    assert_eq!(program.end_pc(), 102);
}

/// Tests a missing file yields an I/O load error naming the path.
#[test]
fn test_load_program_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.asm");
    let err = load_program(&path, &Config::default()).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert!(err.to_string().contains("missing.asm"));
}
