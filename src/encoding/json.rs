//! JSON line encoding.

use serde_json::Value;

use super::{encode_level, encode_time, Encoder, Record};
use crate::config::schema::EncoderConfig;

/// One JSON object per line. Keys are written in a fixed order (level, time,
/// name, caller, message, stack trace) followed by fields in insertion order.
#[derive(Debug, Clone)]
pub struct JsonEncoder {
    config: EncoderConfig,
}

impl JsonEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }
}

struct ObjectWriter<'b> {
    buf: &'b mut Vec<u8>,
    first: bool,
}

impl<'b> ObjectWriter<'b> {
    fn open(buf: &'b mut Vec<u8>) -> Self {
        buf.push(b'{');
        Self { buf, first: true }
    }

    fn entry(&mut self, key: &str, value: &Value) {
        if key.is_empty() {
            return;
        }
        if !self.first {
            self.buf.push(b',');
        }
        self.first = false;
        // Writing into a Vec cannot fail.
        let _ = serde_json::to_writer(&mut *self.buf, key);
        self.buf.push(b':');
        let _ = serde_json::to_writer(&mut *self.buf, value);
    }

    fn close(self) {
        self.buf.extend_from_slice(b"}\n");
    }
}

impl Encoder for JsonEncoder {
    fn encode(&self, record: &Record<'_>, buf: &mut Vec<u8>) {
        let cfg = &self.config;
        let mut obj = ObjectWriter::open(buf);

        obj.entry(
            &cfg.level_key,
            &Value::String(encode_level(record.level, cfg.level_encoding).into_owned()),
        );
        obj.entry(&cfg.time_key, &encode_time(&record.time, cfg.time_encoding));
        if let Some(name) = record.name {
            obj.entry(&cfg.name_key, &Value::String(name.to_string()));
        }
        if let Some(caller) = record.caller {
            obj.entry(&cfg.caller_key, &Value::String(caller.short()));
        }
        obj.entry(&cfg.message_key, &Value::String(record.message.to_string()));
        if let Some(stack) = record.stacktrace {
            obj.entry(&cfg.stacktrace_key, &Value::String(stack.to_string()));
        }
        for field in record.all_fields() {
            obj.entry(&field.key, &field.value);
        }

        obj.close();
    }
}
