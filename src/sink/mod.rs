//! Output sinks.
//!
//! # Data Flow
//! ```text
//! encoded record (one line, owned buffer)
//!     → WriteSyncer::write_record (single write under the sink's lock)
//!     → stdout / stderr / file / memory
//! ```
//!
//! # Design Decisions
//! - A record is written with one `write_all` while the sink is locked, so
//!   concurrent records never interleave
//! - Several paths fan out through `Tee`
//! - `sync` flushes; for files it also asks the OS to persist the data

pub mod memory;

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::config::ConfigError;

pub use memory::MemorySink;

/// A destination for encoded records.
pub trait WriteSyncer: Send + Sync {
    /// Write one complete record.
    fn write_record(&self, buf: &[u8]) -> io::Result<()>;

    /// Flush buffered output.
    fn sync(&self) -> io::Result<()>;
}

/// Shared sink handle.
pub type SharedSink = Arc<dyn WriteSyncer>;

/// Process standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stdout;

impl WriteSyncer for Stdout {
    fn write_record(&self, buf: &[u8]) -> io::Result<()> {
        io::stdout().lock().write_all(buf)
    }

    fn sync(&self) -> io::Result<()> {
        io::stdout().lock().flush()
    }
}

/// Process standard error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stderr;

impl WriteSyncer for Stderr {
    fn write_record(&self, buf: &[u8]) -> io::Result<()> {
        io::stderr().lock().write_all(buf)
    }

    fn sync(&self) -> io::Result<()> {
        io::stderr().lock().flush()
    }
}

/// Append-only log file.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSink {
    /// Open (creating if needed) `path` for appending.
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, File> {
        // Poisoning is ignored: the lock only guards whole-record writes.
        self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl WriteSyncer for FileSink {
    fn write_record(&self, buf: &[u8]) -> io::Result<()> {
        self.lock().write_all(buf)
    }

    fn sync(&self) -> io::Result<()> {
        let mut file = self.lock();
        file.flush()?;
        file.sync_data()
    }
}

/// Fan-out to several sinks. Every sink is attempted; the first error wins.
pub struct Tee {
    sinks: Vec<SharedSink>,
}

impl Tee {
    pub fn new(sinks: Vec<SharedSink>) -> Self {
        Self { sinks }
    }
}

impl WriteSyncer for Tee {
    fn write_record(&self, buf: &[u8]) -> io::Result<()> {
        let mut result = Ok(());
        for sink in &self.sinks {
            if let Err(e) = sink.write_record(buf) {
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }

    fn sync(&self) -> io::Result<()> {
        let mut result = Ok(());
        for sink in &self.sinks {
            if let Err(e) = sink.sync() {
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }
}

/// Resolve one path: `"stdout"`, `"stderr"`, or a file.
pub fn open(path: &str) -> Result<SharedSink, ConfigError> {
    match path {
        "stdout" => Ok(Arc::new(Stdout)),
        "stderr" => Ok(Arc::new(Stderr)),
        _ => {
            let sink = FileSink::open(path).map_err(|source| ConfigError::Sink {
                path: PathBuf::from(path),
                source,
            })?;
            Ok(Arc::new(sink))
        }
    }
}

/// Resolve every path; a single path is returned without a `Tee` wrapper.
pub fn open_all(paths: &[String]) -> Result<SharedSink, ConfigError> {
    let mut sinks = paths
        .iter()
        .map(|p| open(p))
        .collect::<Result<Vec<_>, _>>()?;

    if sinks.len() == 1 {
        if let Some(sink) = sinks.pop() {
            return Ok(sink);
        }
    }
    Ok(Arc::new(Tee::new(sinks)))
}
