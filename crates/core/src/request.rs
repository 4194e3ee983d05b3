//! Inbound request and outbound response shapes.
//!
//! Field names are camelCase on the wire. The snake_case names used by the
//! earlier question-bank API (`total_questions`, `question_type_distribution`,
//! `blooms_taxonomy_distribution`, `chapter_id`, `learning_objectives`, ...)
//! are accepted as aliases so existing clients keep working.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::distribution::Distribution;
use crate::synthesis::GeneratedItem;

/// Optional learning-objective filter: a single objective or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObjectiveFilter {
    One(String),
    Many(Vec<String>),
}

impl ObjectiveFilter {
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::One(value) => vec![value.as_str()],
            Self::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// True when the filter carries no usable objective.
    pub fn is_empty(&self) -> bool {
        self.values().iter().all(|v| v.trim().is_empty())
    }

    /// Tag used in artifact names: `lo` followed by the non-blank objectives,
    /// trimmed and joined with `_`.
    pub fn tag(&self) -> Option<String> {
        let values: Vec<&str> = self
            .values()
            .into_iter()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect();
        if values.is_empty() {
            return None;
        }
        Some(format!("lo{}", values.join("_")))
    }
}

/// A request for `total_count` items split across three axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default = "default_total", alias = "total_questions", alias = "total_count")]
    pub total_count: usize,

    #[serde(
        default = "default_kind_distribution",
        alias = "question_type_distribution",
        alias = "kind_distribution"
    )]
    pub kind_distribution: Distribution,

    #[serde(
        default = "default_difficulty_distribution",
        alias = "difficulty_distribution"
    )]
    pub difficulty_distribution: Distribution,

    #[serde(
        default = "default_level_distribution",
        alias = "blooms_taxonomy_distribution",
        alias = "level_distribution"
    )]
    pub level_distribution: Distribution,

    /// Chapter / content identifier the shared context is derived from.
    #[serde(alias = "chapter_id", alias = "content_locator")]
    pub content_locator: String,

    #[serde(
        default,
        alias = "learning_objectives",
        alias = "objective_filter",
        skip_serializing_if = "Option::is_none"
    )]
    pub objective_filter: Option<ObjectiveFilter>,

    /// Caller-supplied session id; a new one is assigned when absent.
    #[serde(default, alias = "session_id", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

fn default_total() -> usize {
    10
}
fn default_kind_distribution() -> Distribution {
    Distribution::from([("mcq", 0.4), ("fib", 0.3), ("tf", 0.3)])
}
fn default_difficulty_distribution() -> Distribution {
    Distribution::from([("basic", 0.3), ("intermediate", 0.3), ("advanced", 0.4)])
}
fn default_level_distribution() -> Distribution {
    Distribution::from([("remember", 0.3), ("apply", 0.4), ("analyze", 0.3)])
}

impl GenerationRequest {
    /// A request with the default mix for `content_locator`.
    pub fn new(content_locator: impl Into<String>, total_count: usize) -> Self {
        Self {
            total_count,
            kind_distribution: default_kind_distribution(),
            difficulty_distribution: default_difficulty_distribution(),
            level_distribution: default_level_distribution(),
            content_locator: content_locator.into(),
            objective_filter: None,
            session_id: None,
        }
    }

    /// The objective filter, if it carries anything.
    pub fn objectives(&self) -> Option<&ObjectiveFilter> {
        self.objective_filter.as_ref().filter(|f| !f.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Merged output of every worker of a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedResponse {
    /// One artifact name per kind, in canonical kind order.
    pub artifact_names: Vec<String>,
    pub items_by_kind: BTreeMap<String, Vec<GeneratedItem>>,
}

impl AggregatedResponse {
    pub fn total_items(&self) -> usize {
        self.items_by_kind.values().map(Vec::len).sum()
    }
}

/// The success body returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    pub status: Status,
    pub message: String,
    pub session_id: String,
    pub source_id: String,
    pub content_locator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective_filter: Option<ObjectiveFilter>,
    pub total_count: usize,
    pub kind_distribution: Distribution,
    pub difficulty_distribution: Distribution,
    pub level_distribution: Distribution,
    #[serde(flatten)]
    pub result: AggregatedResponse,
}
