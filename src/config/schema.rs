//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a logger.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::level::Level;

/// Preset selector used by the global facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Human-readable console output with colorized levels.
    Development,
    /// Machine-oriented JSON output.
    Production,
}

impl Mode {
    /// `true` selects development, `false` production.
    pub fn from_debug(debug: bool) -> Self {
        if debug {
            Mode::Development
        } else {
            Mode::Production
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Mode::Development)
    }
}

/// Record encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Tab-separated human-readable lines.
    Console,
    /// One JSON object per line.
    Json,
}

/// How level labels are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelEncoding {
    Capital,
    CapitalColor,
    Lowercase,
    LowercaseColor,
}

/// How record timestamps are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeEncoding {
    /// `2026-10-18T12:00:00.000+0000`
    Iso8601,
    /// `2026-10-18T12:00:00+00:00`
    Rfc3339,
    EpochMillis,
    EpochSeconds,
}

/// Root configuration for a logger.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Minimum enabled level.
    pub level: Level,

    /// Development flag; informational, carried into the facade's debug flag
    /// when the config is installed with `setup_with`.
    pub development: bool,

    /// Record encoding.
    pub encoding: Encoding,

    /// Omit the call site from records.
    pub disable_caller: bool,

    /// Never attach stack traces.
    pub disable_stacktrace: bool,

    /// Lowest level that gets a stack trace attached.
    pub stacktrace_level: Level,

    /// Sinks for records below `Error`.
    pub output_paths: Vec<String>,

    /// Sinks for `Error` and `Fatal` records and for internal write failures.
    pub error_output_paths: Vec<String>,

    /// Fields attached to every record.
    pub initial_fields: BTreeMap<String, serde_json::Value>,

    /// Encoder key names and value renderings.
    pub encoder: EncoderConfig,
}

impl LoggerConfig {
    /// Console output on stderr, every level enabled, stack traces only for
    /// fatal records.
    pub fn development() -> Self {
        Self {
            level: Level::Debug,
            development: true,
            encoding: Encoding::Console,
            disable_caller: true,
            disable_stacktrace: false,
            stacktrace_level: Level::Fatal,
            output_paths: vec!["stderr".to_string()],
            error_output_paths: vec!["stderr".to_string()],
            initial_fields: BTreeMap::new(),
            encoder: EncoderConfig::development(),
        }
    }

    /// JSON output, info and above, errors split onto stderr.
    pub fn production() -> Self {
        Self {
            level: Level::Info,
            development: false,
            encoding: Encoding::Json,
            disable_caller: true,
            disable_stacktrace: false,
            stacktrace_level: Level::Error,
            output_paths: vec!["stdout".to_string()],
            error_output_paths: vec!["stderr".to_string()],
            initial_fields: BTreeMap::new(),
            encoder: EncoderConfig::production(),
        }
    }

    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Development => Self::development(),
            Mode::Production => Self::production(),
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::production()
    }
}

/// Encoder key names and value renderings.
///
/// An empty key omits that entry from JSON records.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub message_key: String,
    pub level_key: String,
    pub time_key: String,
    pub name_key: String,
    pub caller_key: String,
    pub stacktrace_key: String,
    pub level_encoding: LevelEncoding,
    pub time_encoding: TimeEncoding,
}

impl EncoderConfig {
    pub fn development() -> Self {
        Self {
            message_key: "M".to_string(),
            level_key: "L".to_string(),
            time_key: "T".to_string(),
            name_key: "N".to_string(),
            caller_key: "C".to_string(),
            stacktrace_key: "S".to_string(),
            level_encoding: LevelEncoding::CapitalColor,
            time_encoding: TimeEncoding::Iso8601,
        }
    }

    pub fn production() -> Self {
        Self {
            message_key: "msg".to_string(),
            level_key: "level".to_string(),
            time_key: "ts".to_string(),
            name_key: "logger".to_string(),
            caller_key: "caller".to_string(),
            stacktrace_key: "stacktrace".to_string(),
            level_encoding: LevelEncoding::Capital,
            time_encoding: TimeEncoding::Iso8601,
        }
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self::production()
    }
}
