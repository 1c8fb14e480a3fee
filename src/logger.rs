//! Structured logger core.
//!
//! # Responsibilities
//! - Filter records against the shared minimum level
//! - Resolve timestamp, caller and stack trace for each record
//! - Encode into a private buffer and hand the whole line to one sink
//! - Route `Error` and `Fatal` records to the error sink
//!
//! # Design Decisions
//! - `Logger` is a cheap clone over an `Arc`'d core; children created with
//!   `with`/`named` share the core and its level
//! - Logging never returns an error; write failures are reported once on the
//!   error sink and otherwise dropped
//! - `fatal` does not exit; it returns a `Terminate` signal for the caller

use std::backtrace::Backtrace;
use std::fmt;
use std::io;
use std::panic::Location;
use std::process::ExitCode;
use std::sync::Arc;

use crate::config::schema::{LoggerConfig, TimeEncoding};
use crate::config::validation::validate_config;
use crate::config::ConfigError;
use crate::encoding::{build_encoder, encode_time, Caller, Encoder, Record};
use crate::field::Field;
use crate::level::{AtomicLevel, Level};
use crate::sink::{self, SharedSink};

struct Core {
    encoder: Box<dyn Encoder>,
    out: SharedSink,
    err_out: SharedSink,
    level: AtomicLevel,
    add_caller: bool,
    stacktrace_level: Option<Level>,
}

impl Core {
    fn sink_for(&self, level: Level) -> &SharedSink {
        if level >= Level::Error {
            &self.err_out
        } else {
            &self.out
        }
    }

    fn report_write_error(&self, err: &io::Error) {
        let now = chrono::Local::now().fixed_offset();
        let line = format!(
            "{} write error: {}\n",
            encode_time(&now, TimeEncoding::Iso8601).as_str().unwrap_or_default(),
            err
        );
        let _ = self.err_out.write_record(line.as_bytes());
    }
}

/// Handle to a configured structured logger.
#[derive(Clone)]
pub struct Logger {
    core: Arc<Core>,
    name: Option<Arc<str>>,
    context: Arc<[Field]>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.core.level.level())
            .field("context", &self.context)
            .finish()
    }
}

/// Signal returned by [`Logger::fatal`]: the record is written and flushed,
/// and the process should now end with a non-zero status.
#[must_use = "a fatal record was logged; call `exit()` or return it from `main`"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terminate {
    code: u8,
}

impl Terminate {
    pub const EXIT_CODE: u8 = 1;

    pub fn code(&self) -> u8 {
        self.code
    }

    /// End the process.
    pub fn exit(self) -> ! {
        std::process::exit(i32::from(self.code))
    }
}

impl Default for Terminate {
    fn default() -> Self {
        Self {
            code: Self::EXIT_CODE,
        }
    }
}

impl From<Terminate> for ExitCode {
    fn from(t: Terminate) -> Self {
        ExitCode::from(t.code)
    }
}

impl Logger {
    /// Validate `config`, open its sinks and build a logger.
    pub fn from_config(config: &LoggerConfig) -> Result<Self, ConfigError> {
        validate_config(config).map_err(ConfigError::Validation)?;
        let out = sink::open_all(&config.output_paths)?;
        let err_out = sink::open_all(&config.error_output_paths)?;
        Ok(Self::with_sinks(config, out, err_out))
    }

    /// Build a logger that writes to the given sinks instead of the paths
    /// named in `config`.
    pub fn with_sinks(config: &LoggerConfig, out: SharedSink, err_out: SharedSink) -> Self {
        let context: Vec<Field> = config
            .initial_fields
            .iter()
            .map(|(k, v)| Field::new(k.clone(), v.clone()))
            .collect();

        let core = Core {
            encoder: build_encoder(config.encoding, &config.encoder),
            out,
            err_out,
            level: AtomicLevel::new(config.level),
            add_caller: !config.disable_caller,
            stacktrace_level: (!config.disable_stacktrace).then_some(config.stacktrace_level),
        };

        Self {
            core: Arc::new(core),
            name: None,
            context: context.into(),
        }
    }

    /// Child logger that prepends `fields` to every record.
    pub fn with(&self, fields: &[Field]) -> Self {
        let context: Vec<Field> = self.context.iter().chain(fields).cloned().collect();
        Self {
            core: Arc::clone(&self.core),
            name: self.name.clone(),
            context: context.into(),
        }
    }

    /// Child logger with `name` appended to this logger's dotted name.
    pub fn named(&self, name: &str) -> Self {
        let full = match &self.name {
            Some(parent) if !name.is_empty() => format!("{parent}.{name}"),
            Some(parent) => parent.to_string(),
            None => name.to_string(),
        };
        Self {
            core: Arc::clone(&self.core),
            name: (!full.is_empty()).then(|| Arc::from(full)),
            context: Arc::clone(&self.context),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn level(&self) -> Level {
        self.core.level.level()
    }

    /// Change the minimum level for this logger and everything sharing its core.
    pub fn set_level(&self, level: Level) {
        self.core.level.set(level);
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.core.level.enabled(level)
    }

    #[track_caller]
    pub fn log(&self, level: Level, msg: &str, fields: &[Field]) {
        self.emit(level, msg, fields, self.caller(Location::caller()));
    }

    #[track_caller]
    pub fn debug(&self, msg: &str, fields: &[Field]) {
        self.emit(Level::Debug, msg, fields, self.caller(Location::caller()));
    }

    #[track_caller]
    pub fn info(&self, msg: &str, fields: &[Field]) {
        self.emit(Level::Info, msg, fields, self.caller(Location::caller()));
    }

    #[track_caller]
    pub fn warn(&self, msg: &str, fields: &[Field]) {
        self.emit(Level::Warn, msg, fields, self.caller(Location::caller()));
    }

    #[track_caller]
    pub fn error(&self, msg: &str, fields: &[Field]) {
        self.emit(Level::Error, msg, fields, self.caller(Location::caller()));
    }

    /// Write a `Fatal` record, flush every sink and return the termination
    /// signal.
    #[track_caller]
    pub fn fatal(&self, msg: &str, fields: &[Field]) -> Terminate {
        self.emit(Level::Fatal, msg, fields, self.caller(Location::caller()));
        let _ = self.sync();
        Terminate::default()
    }

    /// Flush every sink. Both sinks are attempted; the first error is returned.
    pub fn sync(&self) -> io::Result<()> {
        let out = self.core.out.sync();
        let err = self.core.err_out.sync();
        out.and(err)
    }

    /// Entry point for records whose call site is already known, such as
    /// events arriving from `tracing`.
    pub(crate) fn log_with_caller(
        &self,
        level: Level,
        msg: &str,
        fields: &[Field],
        caller: Option<Caller>,
    ) {
        self.emit(level, msg, fields, caller.filter(|_| self.core.add_caller));
    }

    fn caller(&self, loc: &'static Location<'static>) -> Option<Caller> {
        self.core.add_caller.then(|| Caller::from(loc))
    }

    fn emit(&self, level: Level, msg: &str, fields: &[Field], caller: Option<Caller>) {
        let core = &self.core;
        if !core.level.enabled(level) {
            return;
        }

        let stacktrace = match core.stacktrace_level {
            Some(min) if level >= min => Some(Backtrace::force_capture().to_string()),
            _ => None,
        };

        let record = Record {
            time: chrono::Local::now().fixed_offset(),
            level,
            name: self.name.as_deref(),
            caller: caller.as_ref(),
            message: msg,
            stacktrace: stacktrace.as_deref(),
            context: &self.context,
            fields,
        };

        let mut buf = Vec::with_capacity(256);
        core.encoder.encode(&record, &mut buf);

        if let Err(e) = core.sink_for(level).write_record(&buf) {
            core.report_write_error(&e);
        }
    }
}
