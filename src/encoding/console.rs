//! Human-readable console encoding.
//!
//! ```text
//! 2026-10-18T12:00:00.000+0000	INFO	db	store/pool.rs:88	connected	{"peers": 3}
//! ```

use std::io::Write;

use serde_json::Value;

use super::{encode_level, encode_time, Encoder, Record};
use crate::config::schema::EncoderConfig;

/// Tab-separated lines; fields trail as a compact JSON object.
#[derive(Debug, Clone)]
pub struct ConsoleEncoder {
    config: EncoderConfig,
}

impl ConsoleEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }
}

impl Encoder for ConsoleEncoder {
    fn encode(&self, record: &Record<'_>, buf: &mut Vec<u8>) {
        let cfg = &self.config;
        let mut elements: Vec<String> = Vec::with_capacity(6);

        if !cfg.time_key.is_empty() {
            elements.push(match encode_time(&record.time, cfg.time_encoding) {
                Value::String(s) => s,
                other => other.to_string(),
            });
        }
        if !cfg.level_key.is_empty() {
            elements.push(encode_level(record.level, cfg.level_encoding).into_owned());
        }
        if let Some(name) = record.name.filter(|_| !cfg.name_key.is_empty()) {
            elements.push(name.to_string());
        }
        if let Some(caller) = record.caller.filter(|_| !cfg.caller_key.is_empty()) {
            elements.push(caller.short());
        }
        elements.push(record.message.to_string());

        let mut fields = record.all_fields().peekable();
        if fields.peek().is_some() {
            let mut obj = Vec::new();
            obj.push(b'{');
            for (i, field) in fields.enumerate() {
                if i > 0 {
                    obj.extend_from_slice(b", ");
                }
                write_json(&mut obj, &Value::String(field.key.to_string()));
                obj.extend_from_slice(b": ");
                write_json(&mut obj, &field.value);
            }
            obj.push(b'}');
            elements.push(String::from_utf8_lossy(&obj).into_owned());
        }

        buf.extend_from_slice(elements.join("\t").as_bytes());
        buf.push(b'\n');

        if let Some(stack) = record.stacktrace.filter(|_| !cfg.stacktrace_key.is_empty()) {
            let _ = writeln!(buf, "{}", stack.trim_end());
        }
    }
}

fn write_json(buf: &mut Vec<u8>, value: &Value) {
    // Serializing a Value into a Vec cannot fail.
    let _ = serde_json::to_writer(&mut *buf, value);
}
