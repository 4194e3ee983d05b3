//! Simple sinks: tracing, in-memory, no-op.

use async_trait::async_trait;
use quizgen_core::audit::{AuditEvent, AuditRecord, AuditSink};
use quizgen_core::error::AuditError;

/// Logs each record via `tracing::info!`.
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    fn name(&self) -> &str {
        "tracing"
    }

    async fn write(&self, record: &AuditRecord) -> Result<(), AuditError> {
        match &record.event {
            AuditEvent::ItemGenerated { kind, index, item } => tracing::info!(
                session_id = %record.session_id,
                source_id = %record.source_id,
                kind = %kind,
                index,
                item_id = %item.item_id,
                "AUDIT {}",
                record.event.label()
            ),
            AuditEvent::Outcome { status, error, .. } => tracing::info!(
                session_id = %record.session_id,
                source_id = %record.source_id,
                status = ?status,
                error = ?error,
                "AUDIT {}",
                record.event.label()
            ),
            _ => tracing::info!(
                session_id = %record.session_id,
                source_id = %record.source_id,
                "AUDIT {}",
                record.event.label()
            ),
        }
        Ok(())
    }
}

/// Keeps records in memory, mostly for tests.
#[derive(Default)]
pub struct MemoryAuditSink {
    records: std::sync::Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Records whose event label matches `label` (e.g. `"OUTCOME"`).
    pub fn records_labelled(&self, label: &str) -> Vec<AuditRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.event.label() == label)
            .collect()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    fn name(&self) -> &str {
        "memory"
    }

    async fn write(&self, record: &AuditRecord) -> Result<(), AuditError> {
        self.records
            .lock()
            .map_err(|e| AuditError::Write(e.to_string()))?
            .push(record.clone());
        Ok(())
    }
}

/// Discards everything.
pub struct NoopAuditSink;

#[async_trait]
impl AuditSink for NoopAuditSink {
    fn name(&self) -> &str {
        "none"
    }

    async fn write(&self, _record: &AuditRecord) -> Result<(), AuditError> {
        Ok(())
    }
}
