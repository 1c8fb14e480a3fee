//! `tracing` integration.
//!
//! `FacadeLayer` forwards events recorded with the `tracing` macros to the
//! installed global logger, so libraries that log through `tracing` end up in
//! the same sinks and format as direct facade calls.

use std::fmt::Write as FmtWrite;

use serde_json::Value;
use tracing::field::{Field as TracingField, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::config::ConfigError;
use crate::encoding::Caller;
use crate::field::{self, Field};
use crate::global;
use crate::level::Level;

/// Install notices from the facade itself. They describe the logger swap and
/// are not forwarded into the logger being swapped. Other `logshim::` targets,
/// such as config reload failures, are forwarded like any other event.
const FACADE_TARGET: &str = "logshim::global";

/// A tracing layer that writes events through the global facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct FacadeLayer;

impl FacadeLayer {
    pub fn new() -> Self {
        Self
    }
}

/// Map a tracing level onto a facade severity. TRACE folds into Debug.
pub fn map_level(level: &tracing::Level) -> Level {
    match *level {
        tracing::Level::ERROR => Level::Error,
        tracing::Level::WARN => Level::Warn,
        tracing::Level::INFO => Level::Info,
        _ => Level::Debug,
    }
}

fn is_facade_target(target: &str) -> bool {
    target == FACADE_TARGET
        || target
            .strip_prefix(FACADE_TARGET)
            .is_some_and(|rest| rest.starts_with("::"))
}

impl<S> Layer<S> for FacadeLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_facade_target(metadata.target()) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let caller = match (metadata.file(), metadata.line()) {
            (Some(file), Some(line)) => Some(Caller::new(file.to_string(), line)),
            _ => None,
        };

        global::log_event(
            map_level(metadata.level()),
            visitor.message.as_deref().unwrap_or_default(),
            &visitor.fields,
            caller,
        );
    }
}

/// Collects the message and fields of one event in declaration order.
#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Vec<Field>,
}

impl FieldVisitor {
    fn push(&mut self, field: &TracingField, value: Value) {
        self.fields.push(Field::new(field.name(), value));
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &TracingField, value: &dyn std::fmt::Debug) {
        let mut buf = String::new();
        let _ = write!(&mut buf, "{:?}", value);

        if field.name() == "message" {
            self.message = Some(buf);
        } else {
            self.push(field, Value::String(buf));
        }
    }

    fn record_str(&mut self, field: &TracingField, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.push(field, Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &TracingField, value: i64) {
        self.push(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &TracingField, value: u64) {
        self.push(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &TracingField, value: bool) {
        self.push(field, Value::Bool(value));
    }

    fn record_f64(&mut self, tf: &TracingField, value: f64) {
        self.fields.push(field::float(tf.name(), value));
    }

    fn record_error(&mut self, field: &TracingField, value: &(dyn std::error::Error + 'static)) {
        self.push(field, Value::String(value.to_string()));
    }
}

/// Register `FacadeLayer` as the process-wide `tracing` subscriber.
pub fn install_tracing_bridge() -> Result<(), ConfigError> {
    tracing_subscriber::registry().with(FacadeLayer::new()).try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_mapping() {
        assert_eq!(map_level(&tracing::Level::TRACE), Level::Debug);
        assert_eq!(map_level(&tracing::Level::DEBUG), Level::Debug);
        assert_eq!(map_level(&tracing::Level::INFO), Level::Info);
        assert_eq!(map_level(&tracing::Level::WARN), Level::Warn);
        assert_eq!(map_level(&tracing::Level::ERROR), Level::Error);
    }

    #[test]
    fn only_facade_targets_are_skipped() {
        assert!(is_facade_target("logshim::global"));
        assert!(!is_facade_target("logshim::globals"));
        assert!(!is_facade_target("logshim::config"));
        assert!(!is_facade_target("logshim"));
        assert!(!is_facade_target("app::db"));
    }

    #[test]
    fn visitor_keeps_message_and_field_order() {
        use tracing_subscriber::prelude::*;

        struct Capture(std::sync::Arc<std::sync::Mutex<Vec<(Option<String>, Vec<Field>)>>>);

        impl<S: Subscriber> Layer<S> for Capture {
            fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
                let mut visitor = FieldVisitor::default();
                event.record(&mut visitor);
                self.0.lock().unwrap().push((visitor.message, visitor.fields));
            }
        }

        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(Capture(seen.clone()));
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(peer = "10.0.0.7", attempts = 3u64, ok = false, "retrying");
        });

        let seen = seen.lock().unwrap();
        let (message, fields) = &seen[0];
        assert_eq!(message.as_deref(), Some("retrying"));
        let keys: Vec<_> = fields.iter().map(|f| &*f.key).collect();
        assert_eq!(keys, vec!["peer", "attempts", "ok"]);
        assert_eq!(fields[1].value, serde_json::json!(3));
    }
}
