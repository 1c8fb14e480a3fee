//! Hot reload of the logger configuration file.
//!
//! # Data Flow
//! ```text
//! file modified/created (notify)
//!     → reload(path)
//!         → load_config (parse + validate)
//!         → global::setup_with (swap under SETUP_LOCK)
//!     → Reload outcome sent on the channel
//! ```
//!
//! # Design Decisions
//! - The watcher installs what it loads; the channel only reports outcomes
//! - A rejected file is logged through the logger that stays installed, so
//!   the report lands in the same sinks the operator is already reading

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::LoggerConfig;
use crate::{field, global};

/// Outcome of one reload attempt.
#[derive(Debug)]
pub enum Reload {
    /// The file was loaded and its logger is now installed.
    Applied(LoggerConfig),
    /// The file could not be loaded or built; the previous logger is kept.
    Rejected(ConfigError),
}

impl Reload {
    pub fn is_applied(&self) -> bool {
        matches!(self, Reload::Applied(_))
    }
}

/// Load `path` and install it as the global logger.
///
/// Failures are written to the currently installed logger at error level.
pub fn reload(path: &Path) -> Reload {
    let source = field::string("path", path.display().to_string());

    let installed = load_config(path).and_then(|config| {
        global::setup_with(&config)?;
        Ok(config)
    });

    match installed {
        Ok(config) => {
            global::info(
                "logger reconfigured",
                &[source, field::string("level", config.level.to_string())],
            );
            Reload::Applied(config)
        }
        Err(e) => {
            global::error(
                "config reload failed, keeping current logger",
                &[source, field::error(&e)],
            );
            Reload::Rejected(e)
        }
    }
}

/// Watches the logger configuration file and reinstalls the global logger
/// whenever it changes.
pub struct ConfigWatcher {
    path: PathBuf,
    outcome_tx: mpsc::UnboundedSender<Reload>,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver for reload outcomes.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<Reload>) {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            outcome_tx,
        };
        (watcher, outcome_rx)
    }

    /// Start watching. The returned watcher must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self { path, outcome_tx } = self;
        let watched = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    tracing::debug!(target: "logshim::config", path = ?watched, "config file changed");
                    // Nobody listening is fine; the outcome was already logged.
                    let _ = outcome_tx.send(reload(&watched));
                }
                Ok(_) => {}
                Err(e) => global::warn("config watch error", &[field::error(&e)]),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&path, RecursiveMode::NonRecursive)?;
        tracing::info!(target: "logshim::config", path = ?path, "config watcher started");
        Ok(watcher)
    }
}
