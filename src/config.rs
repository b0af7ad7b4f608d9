//! Simulator configuration.
//!
//! All settings have defaults matching the classic APEX machine, so a missing
//! file section or key falls back silently. A configuration file is optional.
//!
//! ```toml
//! [general]
//! trace = false
//!
//! [memory]
//! data_words = 4000
//! report_window = 100
//!
//! [pipeline]
//! code_base = 4000
//! instruction_width = 4
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::common::constants::{
    DEFAULT_CODE_BASE, DEFAULT_DATA_WORDS, DEFAULT_INSTRUCTION_WIDTH, DEFAULT_REPORT_WINDOW,
};

/// Errors from reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GeneralConfig {
    /// Print the per-cycle trace regardless of the CLI mode.
    #[serde(default)]
    pub trace: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MemoryConfig {
    /// Number of data-memory cells.
    #[serde(default = "default_data_words")]
    pub data_words: usize,

    /// Cells shown by the final memory dump.
    #[serde(default = "default_report_window")]
    pub report_window: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            data_words: default_data_words(),
            report_window: default_report_window(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PipelineConfig {
    /// Address of the first instruction.
    #[serde(default = "default_code_base")]
    pub code_base: u32,

    /// Bytes per instruction slot.
    #[serde(default = "default_instruction_width")]
    pub instruction_width: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            code_base: default_code_base(),
            instruction_width: default_instruction_width(),
        }
    }
}

impl Config {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on malformed TOML, [`ConfigError::Invalid`] when
    /// the instruction width is zero.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        if config.pipeline.instruction_width == 0 {
            return Err(ConfigError::Invalid("instruction_width must be non-zero"));
        }
        Ok(config)
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Config::from_toml`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }
}

fn default_data_words() -> usize {
    DEFAULT_DATA_WORDS
}

fn default_report_window() -> usize {
    DEFAULT_REPORT_WINDOW
}

fn default_code_base() -> u32 {
    DEFAULT_CODE_BASE
}

fn default_instruction_width() -> u32 {
    DEFAULT_INSTRUCTION_WIDTH
}
