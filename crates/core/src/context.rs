//! Shared context: the text every worker of a request reads from.
//!
//! Fetching it is the slowest step of a request, so the pipeline calls the
//! [`ContextProvider`] once, wraps the result in an `Arc`, and hands the same
//! object to every per-kind worker.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ContextError;
use crate::request::ObjectiveFilter;

/// Read-only context derived from the requested content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedContext {
    /// The content locator (chapter id) the text was derived from.
    pub locator: String,
    /// Bounded summary text.
    pub text: String,
    /// Whether the source text was cut to fit the configured caps.
    #[serde(default)]
    pub truncated: bool,
}

impl SharedContext {
    pub fn new(locator: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            text: text.into(),
            truncated: false,
        }
    }

    /// Length of the text in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Produces the shared context for a content locator.
///
/// Implementations: search index (HTTP), local files, static text.
/// The provider itself does not deduplicate calls; callers are expected to
/// invoke it at most once per request.
#[async_trait]
pub trait ContextProvider: Send + Sync {
    /// Backend name for logs (e.g. "search", "file", "static").
    fn name(&self) -> &str;

    /// Fetch a bounded text payload for `locator`.
    async fn fetch(
        &self,
        locator: &str,
        objectives: Option<&ObjectiveFilter>,
    ) -> std::result::Result<SharedContext, ContextError>;
}
