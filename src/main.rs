//! logshim demo host.
//!
//! A small long-running application wired the way a service would use the
//! facade: the `--debug` flag (or a config file) picks the logger, a
//! heartbeat produces records, and the config file can be hot-reloaded.
//!
//! ```text
//! logshim --debug                      # colorized console on stderr
//! logshim                              # JSON on stdout, errors on stderr
//! logshim --config logshim.toml --watch
//! logshim --fail                       # fatal record, exit status 1
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use logshim::bridge::install_tracing_bridge;
use logshim::config::load_config;
use logshim::config::watcher::{ConfigWatcher, Reload};
use logshim::{field, global};

#[derive(Parser)]
#[command(name = "logshim")]
#[command(about = "Demo host application for the logshim logging facade", long_about = None)]
struct Cli {
    /// Development output: colorized console, debug level
    #[arg(short, long)]
    debug: bool,

    /// TOML logger configuration (takes precedence over --debug)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reinstall the logger whenever the config file changes
    #[arg(short, long, requires = "config")]
    watch: bool,

    /// Route `tracing` events through the facade instead of printing them
    /// with the plain `tracing` formatter (filtered by RUST_LOG)
    #[arg(long)]
    bridge: bool,

    /// Heartbeat interval in seconds
    #[arg(long, default_value_t = 5)]
    interval: u64,

    /// Log a fatal record and exit instead of running
    #[arg(long)]
    fail: bool,
}

async fn next_reload(rx: &mut Option<mpsc::UnboundedReceiver<Reload>>) -> Option<Reload> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.config {
        Some(path) => global::setup_with(&load_config(path)?)?,
        None => global::setup(cli.debug)?,
    }

    if cli.bridge {
        install_tracing_bridge()?;
    } else {
        tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "logshim=info".into()))
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    }

    global::info(
        "logshim demo starting",
        &[
            field::string("version", env!("CARGO_PKG_VERSION")),
            field::bool("debug", global::is_debug()),
        ],
    );

    if cli.fail {
        let term = global::fatal("startup aborted", &[field::string("reason", "--fail given")]);
        return Ok(term.into());
    }

    let (_watcher, mut reloads) = match (&cli.config, cli.watch) {
        (Some(path), true) => {
            let (watcher, rx) = ConfigWatcher::new(path);
            (Some(watcher.run()?), Some(rx))
        }
        _ => (None, None),
    };

    let mut ticker = tokio::time::interval(Duration::from_secs(cli.interval.max(1)));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let mut beats: u64 = 0;
    let mut rejected: u64 = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                beats += 1;
                if let Some(worker) = global::logger() {
                    worker
                        .named("heartbeat")
                        .debug("tick", &[field::uint("beat", beats)]);
                }
                if beats % 10 == 0 {
                    global::info("still running", &[field::uint("beats", beats)]);
                }
                if cli.bridge {
                    tracing::info!(beat = beats, "heartbeat seen by tracing");
                }
            }
            Some(outcome) = next_reload(&mut reloads) => {
                if !outcome.is_applied() {
                    rejected += 1;
                }
            }
            _ = &mut shutdown => {
                global::info(
                    "shutdown requested",
                    &[field::uint("beats", beats), field::uint("rejected_reloads", rejected)],
                );
                break;
            }
        }
    }

    let _ = global::sync();
    Ok(ExitCode::SUCCESS)
}
