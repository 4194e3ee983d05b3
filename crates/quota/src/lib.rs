//! Quota allocation for quizgen.
//!
//! Turns three fractional distributions (kind, difficulty, level) and a total
//! `N` into exact integer counts per combination, then regroups those counts
//! per kind for the fan-out workers.
//!
//! ```text
//!  kind × difficulty × level ──allocate──▶ Vec<Quota>  (Σ count == N)
//!                                            │
//!                                      group_by_kind
//!                                            ▼
//!                                     Vec<KindQuota>  (one per worker)
//! ```
//!
//! Everything here is pure: no I/O, no concurrency, deterministic output.

pub mod allocator;
pub mod grouper;
pub mod remainder;

pub use allocator::allocate;
pub use grouper::group_by_kind;
pub use remainder::{expand_cells, expand_mix, largest_remainder};
