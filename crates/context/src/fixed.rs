//! Fixed-text context provider for demos and tests.

use async_trait::async_trait;
use quizgen_core::context::{ContextProvider, SharedContext};
use quizgen_core::error::ContextError;
use quizgen_core::request::ObjectiveFilter;

use crate::ContextLimits;

pub(crate) const DEFAULT_TEXT: &str = "Photosynthesis converts light energy into chemical \
energy stored in glucose. Chlorophyll in the chloroplast absorbs light, water is split \
to release oxygen, and carbon dioxide is fixed in the Calvin cycle.";

/// Returns the same text for every locator.
pub struct StaticContextProvider {
    text: String,
    limits: ContextLimits,
}

impl StaticContextProvider {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            limits: ContextLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ContextLimits) -> Self {
        self.limits = limits;
        self
    }
}

impl Default for StaticContextProvider {
    fn default() -> Self {
        Self::new(DEFAULT_TEXT)
    }
}

#[async_trait]
impl ContextProvider for StaticContextProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(
        &self,
        locator: &str,
        _objectives: Option<&ObjectiveFilter>,
    ) -> Result<SharedContext, ContextError> {
        crate::check_locator(locator)?;
        self.limits.bound(locator, &self.text)
    }
}
