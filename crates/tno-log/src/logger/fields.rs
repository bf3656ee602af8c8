use std::{fmt, sync::Arc};

use serde_json::{Map, Value};
use tracing::field::{Field, Visit};

/// Keys owned by the record itself; static fields never replace them.
pub(crate) const RESERVED_KEYS: &[&str] = &["time", "level", "msg", "func", "file", "line", "target"];

/// Fixed key/value pairs injected into every record a logger emits.
#[derive(Debug, Clone, Default)]
pub struct StaticFields(Arc<Map<String, Value>>);

impl StaticFields {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(Arc::new(fields))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge into `record`, overwriting event fields with the same key.
    /// Reserved record keys are left alone.
    pub fn inject(&self, record: &mut Map<String, Value>) {
        for (k, v) in self.0.iter() {
            if RESERVED_KEYS.contains(&k.as_str()) {
                continue;
            }
            record.insert(k.clone(), v.clone());
        }
    }
}

/// Collects event fields into a JSON map; the `message` field lands under `msg`.
#[derive(Default)]
pub(crate) struct FieldVisitor {
    pub(crate) message: Option<String>,
    pub(crate) fields: Map<String, Value>,
}

impl FieldVisitor {
    fn put(&mut self, field: &Field, value: Value) {
        if field.name() == "message" {
            self.message = Some(match value {
                Value::String(s) => s,
                other => other.to_string(),
            });
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.put(field, Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.put(field, Value::from(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, Value::from(format!("{value:?}")));
    }
}
