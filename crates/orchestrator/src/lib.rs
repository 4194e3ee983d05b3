//! Request orchestration for quizgen.
//!
//! # Architecture
//!
//! ```text
//! GenerationRequest
//!       │
//!       ▼
//! ┌──────────────┐   allocate + group_by_kind
//! │   Service    │──────────────────────────────┐
//! └──────┬───────┘                              │
//!        │ ContextProvider::fetch (once)        │ Vec<KindQuota>
//!        ▼                                      ▼
//! ┌──────────────────────────────────────────────────┐
//! │ FanOutOrchestrator  ← one task per kind, bounded  │
//! └──┬──────────┬──────────┬─────────────────────────┘
//!    ▼          ▼          ▼
//! ┌──────┐  ┌──────┐  ┌──────┐
//! │ fib  │  │ mcq  │  │  tf  │  ← Synthesizer::synthesize, shared Arc context
//! └──┬───┘  └──┬───┘  └──┬───┘
//!    └─────────┴────┬────┘
//!                   ▼
//!               assemble  → AggregatedResponse
//! ```

pub mod assemble;
pub mod fanout;
pub mod naming;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

pub use assemble::assemble;
pub use fanout::{FanOutOrchestrator, RequestScope};
pub use naming::{artifact_name, format_distribution};
pub use service::GenerationService;
