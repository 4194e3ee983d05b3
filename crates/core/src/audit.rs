//! Audit side channel: records of requests, produced items, and outcomes.
//!
//! Writes are best effort: a failing sink must never change what the caller
//! of a generation request sees.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AuditError;
use crate::request::{GenerationRequest, Status};
use crate::synthesis::GeneratedItem;

/// A single audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
    pub source_id: String,
    pub event: AuditEvent,
}

impl AuditRecord {
    pub fn new(session_id: &str, source_id: &str, event: AuditEvent) -> Self {
        Self {
            timestamp: Utc::now(),
            session_id: session_id.into(),
            source_id: source_id.into(),
            event,
        }
    }
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEvent {
    /// A request was accepted and is being processed.
    RequestReceived { request: GenerationRequest },
    /// Final outcome of a request, written for success and failure alike.
    Outcome {
        status: Status,
        artifact_names: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error_code: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    /// One item of a successful response.
    ItemGenerated {
        kind: String,
        index: usize,
        item: GeneratedItem,
    },
    /// A success response was returned.
    ResponseSent {
        total_count: usize,
        kinds: Vec<String>,
        artifact_names: Vec<String>,
    },
}

impl AuditEvent {
    /// Short name used in log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RequestReceived { .. } => "REQUEST",
            Self::Outcome { .. } => "OUTCOME",
            Self::ItemGenerated { .. } => "QUESTION_GENERATED",
            Self::ResponseSent { .. } => "RESPONSE",
        }
    }
}

/// Where audit records are written.
///
/// Implementations: JSONL file, tracing, in-memory, none.
#[async_trait]
pub trait AuditSink: Send + Sync {
    fn name(&self) -> &str;

    async fn write(&self, record: &AuditRecord) -> std::result::Result<(), AuditError>;
}
