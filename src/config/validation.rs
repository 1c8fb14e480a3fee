//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Every sink list names at least one non-empty path
//! - Encoder key names are usable and do not collide
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LoggerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::LoggerConfig;

/// A single semantic problem in a config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must list at least one sink")]
    NoSinks(&'static str),

    #[error("{0} contains an empty path")]
    EmptySinkPath(&'static str),

    #[error("encoder.message_key must not be empty")]
    EmptyMessageKey,

    #[error("encoder key {0:?} is used more than once")]
    DuplicateKey(String),
}

/// Check a config without touching the filesystem.
pub fn validate_config(config: &LoggerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (name, paths) in [
        ("output_paths", &config.output_paths),
        ("error_output_paths", &config.error_output_paths),
    ] {
        if paths.is_empty() {
            errors.push(ValidationError::NoSinks(name));
        } else if paths.iter().any(|p| p.trim().is_empty()) {
            errors.push(ValidationError::EmptySinkPath(name));
        }
    }

    let enc = &config.encoder;
    if enc.message_key.is_empty() {
        errors.push(ValidationError::EmptyMessageKey);
    }

    let mut seen = HashSet::new();
    for key in [
        &enc.message_key,
        &enc.level_key,
        &enc.time_key,
        &enc.name_key,
        &enc.caller_key,
        &enc.stacktrace_key,
    ] {
        if !key.is_empty() && !seen.insert(key.as_str()) {
            errors.push(ValidationError::DuplicateKey(key.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        assert!(validate_config(&LoggerConfig::development()).is_ok());
        assert!(validate_config(&LoggerConfig::production()).is_ok());
    }

    #[test]
    fn reports_every_problem() {
        let mut config = LoggerConfig::production();
        config.output_paths.clear();
        config.error_output_paths = vec![" ".to_string()];
        config.encoder.message_key.clear();
        config.encoder.caller_key = "level".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::NoSinks("output_paths"),
                ValidationError::EmptySinkPath("error_output_paths"),
                ValidationError::EmptyMessageKey,
                ValidationError::DuplicateKey("level".to_string()),
            ]
        );
    }

    #[test]
    fn empty_keys_do_not_collide() {
        let mut config = LoggerConfig::production();
        config.encoder.name_key.clear();
        config.encoder.caller_key.clear();
        assert!(validate_config(&config).is_ok());
    }
}
