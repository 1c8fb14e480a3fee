//! Record encoding.
//!
//! # Data Flow
//! ```text
//! Logger call (level, message, fields)
//!     → Record (borrowed view, timestamp and caller resolved)
//!     → Encoder::encode (console.rs or json.rs)
//!     → one newline-terminated line in a private buffer
//!     → sink
//! ```
//!
//! # Design Decisions
//! - Encoders are pure: they only append to the buffer they are given
//! - Key names and renderings come from `EncoderConfig`; an empty key omits
//!   that element
//! - Field values are JSON values in both encodings

pub mod console;
pub mod json;

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde_json::Value;

use crate::config::schema::{EncoderConfig, Encoding, LevelEncoding, TimeEncoding};
use crate::field::Field;
use crate::level::Level;

pub use console::ConsoleEncoder;
pub use json::JsonEncoder;

/// Turns a record into bytes.
pub trait Encoder: Send + Sync {
    /// Append exactly one encoded record, including the trailing newline.
    fn encode(&self, record: &Record<'_>, buf: &mut Vec<u8>);
}

/// Everything an encoder needs to render one record.
#[derive(Debug, Clone)]
pub struct Record<'a> {
    pub time: DateTime<FixedOffset>,
    pub level: Level,
    pub name: Option<&'a str>,
    pub caller: Option<&'a Caller>,
    pub message: &'a str,
    pub stacktrace: Option<&'a str>,
    /// Fields attached to the logger.
    pub context: &'a [Field],
    /// Fields passed with this call.
    pub fields: &'a [Field],
}

impl Record<'_> {
    /// Context fields followed by call fields.
    pub fn all_fields(&self) -> impl Iterator<Item = &Field> {
        self.context.iter().chain(self.fields.iter())
    }
}

/// Source location of a logging call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub file: Cow<'static, str>,
    pub line: u32,
}

impl Caller {
    pub fn new(file: impl Into<Cow<'static, str>>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// `dir/file.rs:line`, keeping only the last two path segments.
    pub fn short(&self) -> String {
        let file = self.file.as_ref();
        let trimmed = file
            .rmatch_indices(|c: char| c == '/' || c == '\\')
            .nth(1)
            .map(|(i, _)| &file[i + 1..])
            .unwrap_or(file);
        format!("{}:{}", trimmed, self.line)
    }
}

impl From<&'static Location<'static>> for Caller {
    fn from(loc: &'static Location<'static>) -> Self {
        Self::new(loc.file(), loc.line())
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short())
    }
}

const RESET: &str = "\x1b[0m";

fn level_color(level: Level) -> &'static str {
    match level {
        Level::Debug => "\x1b[35m",
        Level::Info => "\x1b[34m",
        Level::Warn => "\x1b[33m",
        Level::Error | Level::Fatal => "\x1b[31m",
    }
}

/// Render a level label.
pub fn encode_level(level: Level, encoding: LevelEncoding) -> Cow<'static, str> {
    match encoding {
        LevelEncoding::Capital => Cow::Borrowed(level.as_capital_str()),
        LevelEncoding::Lowercase => Cow::Borrowed(level.as_str()),
        LevelEncoding::CapitalColor => Cow::Owned(format!(
            "{}{}{}",
            level_color(level),
            level.as_capital_str(),
            RESET
        )),
        LevelEncoding::LowercaseColor => {
            Cow::Owned(format!("{}{}{}", level_color(level), level.as_str(), RESET))
        }
    }
}

/// Render a timestamp as a JSON value: strings for calendar formats, numbers
/// for epoch formats.
pub fn encode_time(time: &DateTime<FixedOffset>, encoding: TimeEncoding) -> Value {
    match encoding {
        TimeEncoding::Iso8601 => {
            Value::String(time.format("%Y-%m-%dT%H:%M:%S%.3f%z").to_string())
        }
        TimeEncoding::Rfc3339 => Value::String(time.to_rfc3339_opts(SecondsFormat::Secs, false)),
        TimeEncoding::EpochMillis => Value::from(time.timestamp_millis()),
        TimeEncoding::EpochSeconds => {
            let secs = time.timestamp_micros() as f64 / 1_000_000.0;
            serde_json::Number::from_f64(secs)
                .map(Value::Number)
                .unwrap_or_else(|| Value::from(time.timestamp()))
        }
    }
}

/// Build the encoder selected by a config.
pub fn build_encoder(encoding: Encoding, config: &EncoderConfig) -> Box<dyn Encoder> {
    match encoding {
        Encoding::Console => Box::new(ConsoleEncoder::new(config.clone())),
        Encoding::Json => Box::new(JsonEncoder::new(config.clone())),
    }
}
