//! JSON-lines audit sink.
//!
//! Appends one JSON-encoded [`AuditRecord`] per line. The file and its parent
//! directory are created on first write. Default location:
//! `~/.quizgen/audit/audit.jsonl`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quizgen_core::audit::{AuditRecord, AuditSink};
use quizgen_core::error::AuditError;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

pub struct JsonlAuditSink {
    path: PathBuf,
    // Serializes appends so concurrent requests never interleave lines.
    lock: Mutex<()>,
}

impl JsonlAuditSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AuditSink for JsonlAuditSink {
    fn name(&self) -> &str {
        "jsonl"
    }

    async fn write(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let mut line =
            serde_json::to_string(record).map_err(|e| AuditError::Serialize(e.to_string()))?;
        line.push('\n');

        let _guard = self.lock.lock().await;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AuditError::Write(format!("{}: {e}", parent.display())))?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| AuditError::Write(format!("{}: {e}", self.path.display())))?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| AuditError::Write(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| AuditError::Write(e.to_string()))?;

        tracing::trace!(path = %self.path.display(), event = record.event.label(), "Audit record appended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizgen_core::audit::AuditEvent;

    fn sent(total: usize) -> AuditRecord {
        AuditRecord::new(
            "s-9",
            "dev_app",
            AuditEvent::ResponseSent {
                total_count: total,
                kinds: vec!["mcq".into()],
                artifact_names: vec!["ch01_mcqs.json".into()],
            },
        )
    }

    #[tokio::test]
    async fn appends_one_line_per_record() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("audit.jsonl");
        let sink = JsonlAuditSink::new(&path);

        sink.write(&sent(3)).await.unwrap();
        sink.write(&sent(4)).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let second: AuditRecord = serde_json::from_str(lines[1]).unwrap();
        assert!(matches!(
            second.event,
            AuditEvent::ResponseSent { total_count: 4, .. }
        ));
    }

    #[tokio::test]
    async fn unwritable_path_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending.
        let sink = JsonlAuditSink::new(tmp.path());
        let err = sink.write(&sent(1)).await.unwrap_err();
        assert!(matches!(err, AuditError::Write(_)));
    }
}
