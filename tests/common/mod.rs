//! Shared utilities for facade integration tests.

use std::sync::{Arc, Mutex, MutexGuard};

use logshim::sink::MemorySink;
use logshim::{Logger, LoggerConfig, Mode};

static GLOBAL: Mutex<()> = Mutex::new(());

/// Serialize tests that install loggers into the process-wide facade.
#[allow(dead_code)]
pub fn lock_global() -> MutexGuard<'static, ()> {
    GLOBAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A logger writing into memory, with handles to both of its sinks.
pub struct Observed {
    pub logger: Logger,
    pub out: MemorySink,
    pub err: MemorySink,
}

/// Observed logger using one of the presets.
#[allow(dead_code)]
pub fn observed(mode: Mode) -> Observed {
    observed_with(&LoggerConfig::for_mode(mode))
}

/// Observed logger using an arbitrary config; its sink paths are ignored.
pub fn observed_with(config: &LoggerConfig) -> Observed {
    let out = MemorySink::new();
    let err = MemorySink::new();
    let logger = Logger::with_sinks(config, Arc::new(out.clone()), Arc::new(err.clone()));
    Observed { logger, out, err }
}
