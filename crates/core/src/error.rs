//! Error types for the quizgen domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each collaborator boundary has its own error type; [`GenerationError`] is
//! what a request as a whole fails with.

use thiserror::Error;

use crate::distribution::Axis;

/// The top-level error for one generation request.
///
/// Exactly one of these is surfaced per failed request. There is no
/// partial-success variant.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A distribution was empty, had a non-positive sum, or held a negative
    /// or non-finite weight. Raised before any work starts.
    #[error("Invalid {axis} distribution: {reason}")]
    InvalidDistribution { axis: Axis, reason: String },

    /// The request failed validation at the service boundary.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The shared context could not be produced; no worker was spawned.
    #[error("Context unavailable: {0}")]
    ContextUnavailable(#[from] ContextError),

    /// A per-kind worker failed; sibling results were discarded.
    #[error("Synthesis failed for {kind}: {source}")]
    Synthesis {
        kind: String,
        #[source]
        source: SynthesisError,
    },

    /// A worker returned a different number of items than it was asked for.
    /// `kind` is `"*"` when the grand total is off.
    #[error("Count mismatch for {kind}: expected {expected} items, got {actual}")]
    CountMismatch {
        kind: String,
        expected: usize,
        actual: usize,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GenerationError {
    /// Short machine-readable tag for logs and audit records.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDistribution { .. } => "invalid_distribution",
            Self::InvalidRequest(_) => "invalid_request",
            Self::ContextUnavailable(_) => "context_unavailable",
            Self::Synthesis { .. } => "synthesis_error",
            Self::CountMismatch { .. } => "count_mismatch",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias using [`GenerationError`].
pub type Result<T> = std::result::Result<T, GenerationError>;

// --- Collaborator errors ---

#[derive(Debug, Clone, Error)]
pub enum ContextError {
    #[error("content locator must not be empty")]
    EmptyLocator,

    #[error("no content found for {0}")]
    NotFound(String),

    #[error("lookup request failed: {0}")]
    Transport(String),

    #[error("lookup response could not be decoded: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("unsupported context backend: {0}")]
    UnsupportedBackend(String),
}

#[derive(Debug, Clone, Error)]
pub enum SynthesisError {
    #[error("unsupported item kind: {0}")]
    UnsupportedKind(String),

    #[error("{0}")]
    Failed(String),

    #[error("worker panicked: {0}")]
    Panicked(String),
}

/// A write to the audit side channel failed. Never fatal to a request.
#[derive(Debug, Clone, Error)]
pub enum AuditError {
    #[error("audit write failed: {0}")]
    Write(String),

    #[error("audit record could not be serialized: {0}")]
    Serialize(String),
}
