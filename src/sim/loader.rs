//! Program Loader.
//!
//! Reads an APEX assembly file into code memory. Each non-blank line is one
//! instruction record: a mnemonic followed by comma-separated operands, where
//! registers are written `R<n>` and literals `#<n>`:
//!
//! ```text
//! MOVC,R1,#5
//! ADD,R3,R1,R2
//! BZ,#-8
//! HALT
//! ```
//!
//! Lines starting with `;` or `//` are comments.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::common::constants::NUM_GPRS;
use crate::common::LoadError;
use crate::config::Config;
use crate::isa::{Format, Instruction, Opcode, Program};

/// Loads a program file using the code layout from `config`.
///
/// # Errors
///
/// [`LoadError::Io`] if the file cannot be read; any parse error from
/// [`parse_program`].
pub fn load_program(path: impl AsRef<Path>, config: &Config) -> Result<Program, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let instructions = parse_program(&text)?;
    info!(
        path = %path.display(),
        count = instructions.len(),
        base = config.pipeline.code_base,
        "[Loader] program loaded"
    );
    Ok(Program::with_layout(
        instructions,
        config.pipeline.code_base,
        config.pipeline.instruction_width,
    ))
}

/// Parses program text into instructions, in file order.
///
/// # Errors
///
/// The first malformed record, with its 1-based line number.
pub fn parse_program(text: &str) -> Result<Vec<Instruction>, LoadError> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with(';') && !line.starts_with("//"))
        .map(|(line, record)| parse_instruction(line, record))
        .collect()
}

/// Parses one instruction record.
///
/// # Errors
///
/// [`LoadError::UnknownOpcode`], [`LoadError::OperandCount`],
/// [`LoadError::MalformedOperand`] or [`LoadError::RegisterOutOfRange`].
pub fn parse_instruction(line: usize, record: &str) -> Result<Instruction, LoadError> {
    let mut tokens: Vec<&str> = record.split(',').map(str::trim).collect();
    while tokens.len() > 1 && tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }

    let mnemonic = tokens[0];
    let opcode: Opcode = mnemonic
        .to_ascii_uppercase()
        .parse()
        .map_err(|_| LoadError::UnknownOpcode {
            line,
            opcode: mnemonic.to_string(),
        })?;

    let operands = &tokens[1..];
    let format = opcode.format();
    if operands.len() != format.operand_count() {
        return Err(LoadError::OperandCount {
            line,
            opcode: opcode.to_string(),
            expected: format.operand_count(),
            found: operands.len(),
        });
    }

    let reg = |i: usize| parse_register(line, operands[i]);
    let lit = |i: usize| parse_literal(line, operands[i]);

    let mut inst = Instruction::new(opcode);
    match format {
        Format::RdImm => {
            inst.rd = reg(0)?;
            inst.imm = lit(1)?;
        }
        Format::RdRs1Rs2 => {
            inst.rd = reg(0)?;
            inst.rs1 = reg(1)?;
            inst.rs2 = reg(2)?;
        }
        Format::RdRs1Imm => {
            inst.rd = reg(0)?;
            inst.rs1 = reg(1)?;
            inst.imm = lit(2)?;
        }
        Format::Rs1Rs2Imm => {
            inst.rs1 = reg(0)?;
            inst.rs2 = reg(1)?;
            inst.imm = lit(2)?;
        }
        Format::Rs1Rs2Rs3 => {
            inst.rs1 = reg(0)?;
            inst.rs2 = reg(1)?;
            inst.rs3 = reg(2)?;
        }
        Format::Rs1Imm => {
            inst.rs1 = reg(0)?;
            inst.imm = lit(1)?;
        }
        Format::Imm => inst.imm = lit(0)?,
        Format::Bare => {}
    }
    Ok(inst)
}

fn parse_register(line: usize, token: &str) -> Result<usize, LoadError> {
    let malformed = || LoadError::MalformedOperand {
        line,
        token: token.to_string(),
    };
    let digits = token
        .strip_prefix('R')
        .or_else(|| token.strip_prefix('r'))
        .ok_or_else(malformed)?;
    let index: usize = digits.parse().map_err(|_| malformed())?;
    if index >= NUM_GPRS {
        return Err(LoadError::RegisterOutOfRange { line, index });
    }
    Ok(index)
}

fn parse_literal(line: usize, token: &str) -> Result<i32, LoadError> {
    token
        .strip_prefix('#')
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(|| LoadError::MalformedOperand {
            line,
            token: token.to_string(),
        })
}
