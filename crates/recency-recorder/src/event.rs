//! Recorded event definitions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single log event captured by the recorder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedEvent {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,

    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Target module (e.g., "recency_buffer::registry")
    pub target: String,

    /// Primary message
    pub message: String,

    /// Structured fields from the tracing event
    pub fields: HashMap<String, String>,
}

impl RecordedEvent {
    /// Create a new RecordedEvent from a tracing event.
    pub fn from_tracing_event(event: &tracing::Event<'_>) -> Self {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        Self {
            timestamp: chrono::Utc::now().timestamp_millis(),
            level: event.metadata().level().to_string(),
            target: event.metadata().target().to_string(),
            message: visitor.message,
            fields: visitor.fields,
        }
    }

    /// Estimate the size of this event in bytes, for memory diagnostics.
    pub fn estimate_size(&self) -> usize {
        let base_size = std::mem::size_of::<Self>();
        let string_sizes = self.target.len() + self.message.len() + self.level.len();
        let fields_size: usize = self.fields.iter().map(|(k, v)| k.len() + v.len()).sum();

        base_size + string_sizes + fields_size
    }
}

/// Visitor for extracting fields from tracing events. Only record_debug is
/// implemented; all field types route through it via tracing's default
/// implementations.
#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: HashMap<String, String>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields
                .insert(field.name().to_string(), format!("{:?}", value));
        }
    }
}
