//! Process-wide structured logging facade.
//!
//! ```no_run
//! use logshim::{field, global};
//!
//! global::setup(false)?;
//! global::info("listening", &[field::string("addr", "0.0.0.0:8080")]);
//! global::debug("suppressed in production", &[]);
//! # Ok::<(), logshim::ConfigError>(())
//! ```

// Core
pub mod encoding;
pub mod field;
pub mod level;
pub mod logger;
pub mod sink;

// Process-wide surface
pub mod bridge;
pub mod global;

// Cross-cutting concerns
pub mod config;

pub use config::{ConfigError, LoggerConfig, Mode};
pub use field::Field;
pub use level::Level;
pub use logger::{Logger, Terminate};
