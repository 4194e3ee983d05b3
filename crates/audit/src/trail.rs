//! Fan-out over audit sinks.

use std::sync::Arc;

use quizgen_core::audit::{AuditRecord, AuditSink};
use tracing::warn;

/// A set of sinks that every record is written to.
///
/// Cloning is cheap; all clones share the same sinks.
#[derive(Clone, Default)]
pub struct AuditTrail {
    sinks: Vec<Arc<dyn AuditSink>>,
}

impl std::fmt::Debug for AuditTrail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditTrail")
            .field(
                "sinks",
                &self.sinks.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl AuditTrail {
    pub fn new(sinks: Vec<Arc<dyn AuditSink>>) -> Self {
        Self { sinks }
    }

    /// A trail that drops everything.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn is_enabled(&self) -> bool {
        !self.sinks.is_empty()
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Write `record` to every sink. Failures are logged and swallowed.
    pub async fn record(&self, record: AuditRecord) {
        for sink in &self.sinks {
            if let Err(e) = sink.write(&record).await {
                warn!(
                    sink = sink.name(),
                    event = record.event.label(),
                    session_id = %record.session_id,
                    error = %e,
                    "Audit write failed"
                );
            }
        }
    }
}
