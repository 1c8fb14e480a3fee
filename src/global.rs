//! Process-wide logging facade.
//!
//! # Data Flow
//! ```text
//! setup(debug) / setup_with(config) / replace(logger)
//!     → build logger (outside the snapshot, under SETUP_LOCK)
//!     → best-effort flush
//!     → atomic swap of Arc<Installed>
//!
//! info/warn/debug/error/fatal
//!     → single atomic load of the current snapshot
//!     → Logger (or no-op when nothing is installed yet)
//! ```
//!
//! # Design Decisions
//! - Readers never lock; they see either the old or the new snapshot
//! - Writers are serialized so a slow build cannot be overtaken by an older one
//! - A failed build leaves the installed logger untouched
//! - Logging before the first successful setup is a silent no-op

use std::io;
use std::panic::Location;
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwapOption;

use crate::config::schema::{LoggerConfig, Mode};
use crate::config::ConfigError;
use crate::encoding::Caller;
use crate::field::Field;
use crate::level::Level;
use crate::logger::{Logger, Terminate};

/// Immutable snapshot of the facade state.
#[derive(Debug)]
struct Installed {
    logger: Logger,
    debug: bool,
}

static CURRENT: ArcSwapOption<Installed> = ArcSwapOption::const_empty();
static SETUP_LOCK: Mutex<()> = Mutex::new(());

fn install(logger: Logger, debug: bool) {
    let _ = logger.sync();
    CURRENT.store(Some(Arc::new(Installed { logger, debug })));
}

/// Build the development (`true`) or production (`false`) preset and install it.
pub fn setup(debug_enabled: bool) -> Result<(), ConfigError> {
    let mode = Mode::from_debug(debug_enabled);
    let _guard = SETUP_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    let logger = Logger::from_config(&LoggerConfig::for_mode(mode))?;
    install(logger, debug_enabled);

    tracing::debug!(target: "logshim::global", mode = ?mode, "logger installed");
    Ok(())
}

/// Build `config` and install it. The debug flag follows `config.development`.
pub fn setup_with(config: &LoggerConfig) -> Result<(), ConfigError> {
    let _guard = SETUP_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    let logger = Logger::from_config(config)?;
    install(logger, config.development);

    tracing::debug!(
        target: "logshim::global",
        level = %config.level,
        encoding = ?config.encoding,
        "logger installed from config"
    );
    Ok(())
}

/// Install an already built logger.
pub fn replace(logger: Logger, debug: bool) {
    let _guard = SETUP_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    install(logger, debug);
}

/// Whether a logger has been installed.
pub fn is_initialized() -> bool {
    CURRENT.load().is_some()
}

/// Debug flag of the installed logger; `false` before setup.
pub fn is_debug() -> bool {
    CURRENT.load_full().map(|s| s.debug).unwrap_or(false)
}

/// Clone of the installed logger.
pub fn logger() -> Option<Logger> {
    CURRENT.load_full().map(|s| s.logger.clone())
}

/// Minimum level of the installed logger.
pub fn level() -> Option<Level> {
    CURRENT.load_full().map(|s| s.logger.level())
}

/// Change the installed logger's minimum level in place. No-op before setup.
pub fn set_level(level: Level) {
    if let Some(state) = &*CURRENT.load() {
        state.logger.set_level(level);
    }
}

/// Flush the installed logger.
pub fn sync() -> io::Result<()> {
    match &*CURRENT.load() {
        Some(state) => state.logger.sync(),
        None => Ok(()),
    }
}

#[track_caller]
pub fn debug(msg: &str, fields: &[Field]) {
    log_at(Level::Debug, msg, fields, Location::caller());
}

#[track_caller]
pub fn info(msg: &str, fields: &[Field]) {
    log_at(Level::Info, msg, fields, Location::caller());
}

#[track_caller]
pub fn warn(msg: &str, fields: &[Field]) {
    log_at(Level::Warn, msg, fields, Location::caller());
}

#[track_caller]
pub fn error(msg: &str, fields: &[Field]) {
    log_at(Level::Error, msg, fields, Location::caller());
}

/// Log at `Fatal` and return the termination signal.
///
/// Before setup nothing is written, but the signal is still returned.
#[track_caller]
pub fn fatal(msg: &str, fields: &[Field]) -> Terminate {
    let caller = Caller::from(Location::caller());
    if let Some(state) = &*CURRENT.load() {
        state
            .logger
            .log_with_caller(Level::Fatal, msg, fields, Some(caller));
        let _ = state.logger.sync();
    }
    Terminate::default()
}

fn log_at(level: Level, msg: &str, fields: &[Field], loc: &'static Location<'static>) {
    if let Some(state) = &*CURRENT.load() {
        state
            .logger
            .log_with_caller(level, msg, fields, Some(Caller::from(loc)));
    }
}

/// Forward a record with an explicit call site.
pub(crate) fn log_event(level: Level, msg: &str, fields: &[Field], caller: Option<Caller>) {
    if let Some(state) = &*CURRENT.load() {
        state.logger.log_with_caller(level, msg, fields, caller);
    }
}
