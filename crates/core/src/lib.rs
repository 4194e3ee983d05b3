//! # quizgen core
//!
//! Domain types, collaborator traits, and error definitions for the quizgen
//! question generation service. This crate has **no runtime or framework
//! dependencies**: it defines the model that every other crate builds on.
//!
//! ## Layout
//!
//! - [`distribution`]: weighted label maps and the three allocation axes
//! - [`quota`]: per-combination and per-kind quotas
//! - [`context`]: the shared context and the trait that produces it
//! - [`synthesis`]: generated items and the per-kind synthesizer trait
//! - [`request`]: inbound request and outbound response shapes
//! - [`audit`]: audit records and the sink trait for the side channel
//!
//! Collaborators (context retrieval, synthesis, audit) are traits here so the
//! pipeline can be driven by real backends or by test doubles alike.

pub mod audit;
pub mod context;
pub mod distribution;
pub mod error;
pub mod quota;
pub mod request;
pub mod synthesis;

// Re-export key types at crate root for ergonomics
pub use audit::{AuditRecord, AuditSink};
pub use context::{ContextProvider, SharedContext};
pub use distribution::{Axis, Distribution};
pub use error::{AuditError, ContextError, GenerationError, Result, SynthesisError};
pub use quota::{CellShare, KindQuota, Quota};
pub use request::{
    AggregatedResponse, GenerationRequest, GenerationResponse, ObjectiveFilter, Status,
};
pub use synthesis::{GeneratedItem, SynthesisRequest, Synthesizer, WorkerResult};
