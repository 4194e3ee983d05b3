//! Per-kind item synthesis boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::context::SharedContext;
use crate::distribution::Distribution;
use crate::error::SynthesisError;
use crate::quota::CellShare;
use crate::request::ObjectiveFilter;

/// One generated assessment item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedItem {
    /// Unique id (UUID v4).
    pub item_id: String,
    /// Item kind (`mcq`, `fib`, `tf`).
    pub kind: String,
    /// Assigned difficulty.
    pub difficulty: String,
    /// Assigned cognitive level.
    pub level: String,
    /// Question text shown to the learner.
    pub prompt: String,
    /// Answer choices (multiple choice only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Accepted answers.
    pub answers: Vec<String>,
    #[serde(default)]
    pub explanation: String,
}

/// Input for one worker's synthesis call.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub kind: String,
    /// Shared context, the same `Arc` for every worker of a request.
    pub context: Arc<SharedContext>,
    /// Difficulty sub-distribution for this kind.
    pub difficulty_mix: Distribution,
    /// Cognitive-level sub-distribution for this kind.
    pub level_mix: Distribution,
    /// Joint (difficulty, level) sub-distribution for this kind.
    pub cells: Vec<CellShare>,
    /// Number of items to return. Implementations must return exactly this many.
    pub count: usize,
    pub content_locator: String,
    pub objectives: Option<ObjectiveFilter>,
}

/// Produces the items for one kind.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Name for logs (e.g. "template").
    fn name(&self) -> &str;

    /// Whether this synthesizer can produce items of `kind`.
    fn supports(&self, kind: &str) -> bool;

    /// Produce exactly `request.count` items.
    async fn synthesize(
        &self,
        request: SynthesisRequest,
    ) -> std::result::Result<Vec<GeneratedItem>, SynthesisError>;
}

/// The output of one successful worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerResult {
    pub kind: String,
    pub items: Vec<GeneratedItem>,
    /// Deterministic name used as an addressing key by external storage.
    pub artifact_name: String,
}
