//! Audit side channel for quizgen.
//!
//! The [`AuditTrail`] fans every record out to its sinks and never lets a
//! sink failure reach the request path: failures are logged and dropped.

pub mod jsonl;
pub mod sinks;
pub mod trail;

use std::sync::Arc;

use quizgen_config::AuditConfig;
use quizgen_core::audit::AuditSink;

pub use jsonl::JsonlAuditSink;
pub use sinks::{MemoryAuditSink, NoopAuditSink, TracingAuditSink};
pub use trail::AuditTrail;

/// Build the audit trail named in `[audit]`.
///
/// `"none"` (or anything unrecognized) yields a trail with no sinks.
pub fn build_from_config(config: &AuditConfig) -> AuditTrail {
    let sink: Option<Arc<dyn AuditSink>> = match config.backend.as_str() {
        "jsonl" => Some(Arc::new(JsonlAuditSink::new(config.resolved_path()))),
        "tracing" => Some(Arc::new(TracingAuditSink)),
        "none" => None,
        other => {
            tracing::warn!(backend = other, "Unknown audit backend, auditing disabled");
            None
        }
    };

    match sink {
        Some(sink) => {
            tracing::info!(sink = sink.name(), "Audit trail ready");
            AuditTrail::new(vec![sink])
        }
        None => AuditTrail::disabled(),
    }
}
