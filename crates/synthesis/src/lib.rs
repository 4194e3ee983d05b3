//! Item synthesis for quizgen.
//!
//! A synthesizer turns one kind's quota plus the shared context into exactly
//! `count` items. [`plan`] decides which (difficulty, level) each item gets;
//! [`guidelines`] holds the authoring guidance per kind, difficulty and level;
//! [`TemplateSynthesizer`] is the built-in offline synthesizer.

pub mod brief;
pub mod guidelines;
pub mod plan;
pub mod template;

pub use brief::render_brief;
pub use plan::assignment_sequence;
pub use template::TemplateSynthesizer;

/// Kinds the built-in synthesizer knows how to produce.
pub const SUPPORTED_KINDS: &[&str] = &["fib", "mcq", "tf"];
