//! Integration tests for the process-wide facade.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use logshim::sink::WriteSyncer;
use logshim::{field, global, ConfigError, Level, Logger, LoggerConfig, Mode};

mod common;

#[test]
fn presets_install_and_logging_does_not_panic() {
    let _guard = common::lock_global();

    for debug in [true, false] {
        global::setup(debug).unwrap();
        assert!(global::is_initialized());
        assert_eq!(global::is_debug(), debug);

        global::debug("preset check", &[field::bool("debug", debug)]);
        global::info("preset check", &[]);
        global::warn("preset check", &[]);
        global::error("preset check", &[]);
    }
}

#[test]
fn production_suppresses_debug() {
    let _guard = common::lock_global();
    let obs = common::observed(Mode::Production);
    global::replace(obs.logger.clone(), false);

    global::debug("x", &[]);
    assert!(obs.out.contents().is_empty());

    global::info("x", &[]);
    let records = obs.out.json_lines();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["msg"], "x");
    assert_eq!(records[0]["level"], "INFO");
}

#[test]
fn development_emits_debug() {
    let _guard = common::lock_global();
    let obs = common::observed(Mode::Development);
    global::replace(obs.logger.clone(), true);

    global::debug("x", &[]);
    let lines = obs.out.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("\tx"));
}

#[test]
fn single_thread_preserves_call_order() {
    let _guard = common::lock_global();
    let obs = common::observed(Mode::Production);
    global::replace(obs.logger.clone(), false);

    global::info("hello", &[field::string("k", "v")]);
    global::warn("world", &[]);

    let records = obs.out.json_lines();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["msg"], "hello");
    assert_eq!(records[0]["k"], "v");
    assert_eq!(records[1]["msg"], "world");
    assert_eq!(records[1]["level"], "WARN");
}

#[test]
fn failed_setup_keeps_previous_logger() {
    let _guard = common::lock_global();
    let obs = common::observed(Mode::Production);
    global::replace(obs.logger.clone(), false);

    let mut config = LoggerConfig::development();
    config.output_paths = vec!["/nonexistent-dir/logshim/out.log".to_string()];
    let err = global::setup_with(&config).unwrap_err();
    assert!(matches!(err, ConfigError::Sink { .. }));

    assert!(!global::is_debug());
    global::info("still here", &[]);
    assert_eq!(obs.out.json_lines()[0]["msg"], "still here");
}

#[test]
fn fatal_logs_and_returns_signal() {
    let _guard = common::lock_global();
    let obs = common::observed(Mode::Production);
    global::replace(obs.logger.clone(), false);

    let term = global::fatal("bye", &[field::int("attempts", 3)]);
    assert_eq!(term.code(), 1);

    assert!(obs.out.contents().is_empty());
    let records = obs.err.json_lines();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["level"], "FATAL");
    assert_eq!(records[0]["attempts"], 3);
}

/// Sink that records the order of writes and flushes it receives.
#[derive(Clone, Default)]
struct Recording(Arc<Mutex<Vec<&'static str>>>);

impl Recording {
    fn take(&self) -> Vec<&'static str> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

impl WriteSyncer for Recording {
    fn write_record(&self, _buf: &[u8]) -> io::Result<()> {
        self.0.lock().unwrap().push("write");
        Ok(())
    }

    fn sync(&self) -> io::Result<()> {
        self.0.lock().unwrap().push("sync");
        Ok(())
    }
}

#[test]
fn fatal_flushes_the_logger_it_wrote_to() {
    let _guard = common::lock_global();
    let out = Recording::default();
    let err = Recording::default();
    let logger = Logger::with_sinks(
        &LoggerConfig::production(),
        Arc::new(out.clone()),
        Arc::new(err.clone()),
    );
    global::replace(logger, false);
    out.take();
    err.take();

    let _ = global::fatal("bye", &[]);
    assert_eq!(err.take(), vec!["write", "sync"]);
    assert_eq!(out.take(), vec!["sync"]);
}

#[test]
fn level_can_change_at_runtime() {
    let _guard = common::lock_global();
    let obs = common::observed(Mode::Production);
    global::replace(obs.logger.clone(), false);

    global::set_level(Level::Debug);
    assert_eq!(global::level(), Some(Level::Debug));
    global::debug("now visible", &[]);

    global::set_level(Level::Error);
    global::warn("now hidden", &[]);

    let records = obs.out.json_lines();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["level"], "DEBUG");
}

#[test]
fn caller_points_at_call_site() {
    let _guard = common::lock_global();
    let mut config = LoggerConfig::production();
    config.disable_caller = false;
    let obs = common::observed_with(&config);
    global::replace(obs.logger.clone(), false);

    global::info("where", &[]);
    let caller = obs.out.json_lines()[0]["caller"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(caller.starts_with("tests/facade.rs:"), "caller was {caller}");
}

#[test]
fn setup_with_writes_to_configured_file() {
    let _guard = common::lock_global();
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("app.log");

    let mut config = LoggerConfig::production();
    config.development = true;
    config.output_paths = vec![path.to_string_lossy().into_owned()];
    config.error_output_paths = config.output_paths.clone();
    config
        .initial_fields
        .insert("service".to_string(), serde_json::json!("billing"));

    global::setup_with(&config).unwrap();
    assert!(global::is_debug());
    global::info("to file", &[]);
    global::error("also to file", &[]);
    global::sync().unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let records: Vec<serde_json::Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["service"], "billing");
    assert_eq!(records[1]["msg"], "also to file");

    // Detach the file logger before the temp dir is removed.
    global::replace(common::observed(Mode::Production).logger, false);
}

#[test]
fn concurrent_reconfiguration_never_tears_records() {
    let _guard = common::lock_global();

    const THREADS: usize = 8;
    const PER_THREAD: usize = 500;

    let loggers: Vec<_> = (0..4)
        .map(|i| {
            let mode = if i % 2 == 0 { Mode::Production } else { Mode::Development };
            let mut config = LoggerConfig::for_mode(mode);
            config.encoding = logshim::config::Encoding::Json;
            config.level = Level::Info;
            common::observed_with(&config)
        })
        .collect();
    global::replace(loggers[0].logger.clone(), false);

    let done = Arc::new(AtomicBool::new(false));
    let workers: Vec<_> = (0..THREADS)
        .map(|t| {
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    global::info(
                        "work",
                        &[field::uint("thread", t as u64), field::uint("seq", i as u64)],
                    );
                }
            })
        })
        .collect();

    let swapper = {
        let done = Arc::clone(&done);
        let handles: Vec<_> = loggers.iter().map(|o| o.logger.clone()).collect();
        thread::spawn(move || {
            let mut n = 0usize;
            while !done.load(Ordering::Relaxed) {
                global::replace(handles[n % handles.len()].clone(), n % 2 == 1);
                n += 1;
                thread::yield_now();
            }
        })
    };

    for w in workers {
        w.join().unwrap();
    }
    done.store(true, Ordering::Relaxed);
    swapper.join().unwrap();

    let mut total = 0;
    for obs in &loggers {
        for line in obs.out.lines() {
            let record: serde_json::Value =
                serde_json::from_str(&line).expect("every line is one complete record");
            assert_eq!(record["msg"], "work");
            total += 1;
        }
    }
    assert_eq!(total, THREADS * PER_THREAD);
}

#[test]
fn concurrent_setup_never_tears_records() {
    let _guard = common::lock_global();

    const THREADS: usize = 8;
    const PER_THREAD: usize = 500;

    let dir = tempfile::TempDir::new().unwrap();
    let memory = common::observed(Mode::Production);
    global::replace(memory.logger.clone(), false);

    let done = Arc::new(AtomicBool::new(false));
    let workers: Vec<_> = (0..THREADS)
        .map(|t| {
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    global::info(
                        "work",
                        &[field::uint("thread", t as u64), field::uint("seq", i as u64)],
                    );
                }
            })
        })
        .collect();

    let swapper = {
        let done = Arc::clone(&done);
        let dir = dir.path().to_path_buf();
        let memory = memory.logger.clone();
        thread::spawn(move || {
            let mut n = 0usize;
            while !done.load(Ordering::Relaxed) {
                if n % 2 == 0 {
                    let path = dir.join(format!("swap-{n}.log"));
                    let mut config = LoggerConfig::production();
                    config.output_paths = vec![path.to_string_lossy().into_owned()];
                    config.error_output_paths = config.output_paths.clone();
                    global::setup_with(&config).unwrap();
                } else {
                    global::replace(memory.clone(), false);
                }
                n += 1;
                thread::yield_now();
            }
        })
    };

    for w in workers {
        w.join().unwrap();
    }
    done.store(true, Ordering::Relaxed);
    swapper.join().unwrap();
    global::replace(common::observed(Mode::Production).logger, false);

    let mut lines = memory.out.lines();
    for entry in std::fs::read_dir(dir.path()).unwrap() {
        let content = std::fs::read_to_string(entry.unwrap().path()).unwrap();
        lines.extend(content.lines().map(str::to_owned));
    }

    for line in &lines {
        let record: serde_json::Value =
            serde_json::from_str(line).expect("every line is one complete record");
        assert_eq!(record["msg"], "work");
    }
    assert_eq!(lines.len(), THREADS * PER_THREAD);
}
