//! Tracing subscriber layer feeding per-target recency windows.

use std::{collections::HashMap, sync::Arc};

use recency_buffer::BufferRegistry;
use tracing::{Event, Subscriber};
use tracing_subscriber::{layer::Context, Layer};

use crate::{RecordedEvent, RecorderConfig, RecorderError, Result};

/// A tracing subscriber layer that captures log events into bounded
/// per-target windows.
///
/// The layer intercepts all tracing events and files each one into the
/// recency window for its target, so every module keeps its own fixed
/// number of recent events. Events from the `recency_recorder` target are
/// filtered out to prevent infinite recursion.
pub struct RecorderLayer {
    registry: Arc<BufferRegistry<RecordedEvent>>,
}

impl std::fmt::Debug for RecorderLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecorderLayer")
            .field("registry", &self.registry)
            .finish()
    }
}

impl RecorderLayer {
    /// Create a new RecorderLayer with the given configuration.
    pub fn new(config: RecorderConfig) -> Self {
        let registry = Arc::new(BufferRegistry::new(config.max_events));

        Self { registry }
    }

    /// Get a handle to the underlying registry of per-target windows.
    ///
    /// This can be used to read or resize the windows directly.
    pub fn registry(&self) -> Arc<BufferRegistry<RecordedEvent>> {
        Arc::clone(&self.registry)
    }

    /// Returns up to the `n` most recent events recorded for the given
    /// target, newest first. An unknown target yields an empty `Vec`.
    pub fn recent(&self, target: &str, n: usize) -> Vec<RecordedEvent> {
        self.registry
            .get_all()
            .get(target)
            .map(|buffer| buffer.take(n))
            .unwrap_or_default()
    }

    /// Exports up to the `n` most recent events for the given target as a
    /// JSON array, newest first.
    ///
    /// Fails with [`RecorderError::UnknownTarget`] if nothing has been
    /// recorded for the target.
    pub fn export_recent(&self, target: &str, n: usize) -> Result<String> {
        let buffers = self.registry.get_all();
        let buffer = buffers
            .get(target)
            .ok_or_else(|| RecorderError::UnknownTarget(target.to_string()))?;
        Ok(serde_json::to_string(&buffer.take(n))?)
    }

    /// Exports every recorded window as a JSON object keyed by target, each
    /// holding its events newest first.
    pub fn export_all(&self) -> Result<String> {
        let mut all: HashMap<String, Vec<RecordedEvent>> = HashMap::new();
        for (target, buffer) in self.registry.get_all() {
            let len = buffer.len();
            all.insert(target, buffer.take(len));
        }
        Ok(serde_json::to_string(&all)?)
    }
}

impl<S> Layer<S> for RecorderLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        // Filter out our own logging to prevent recursion.
        let target = event.metadata().target();
        if target.starts_with("recency_recorder") {
            return;
        }

        let recorded = RecordedEvent::from_tracing_event(event);
        self.registry.get_or_create(target).push(recorded);
    }
}
