//! Shared context providers for quizgen.
//!
//! All providers implement `quizgen_core::ContextProvider`. The pipeline
//! calls exactly one of them once per request; [`build_from_config`] picks
//! the backend named in `[context]`.

pub mod file;
pub mod fixed;
pub mod search;
pub mod truncate;

use std::sync::Arc;

use quizgen_config::ContextConfig;
use quizgen_core::context::{ContextProvider, SharedContext};
use quizgen_core::error::ContextError;

pub use file::FileContextProvider;
pub use fixed::StaticContextProvider;
pub use search::{SearchClient, SearchContextProvider};
pub use truncate::{CONTENT_MARKER, SUMMARY_MARKER, truncate_with_marker};

/// Size caps applied to every fetched payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextLimits {
    /// Cap on the raw content, in characters.
    pub max_chars: usize,
    /// Cap on the summary handed to workers, in characters.
    pub summary_chars: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            max_chars: 100_000,
            summary_chars: 2_000,
        }
    }
}

impl From<&ContextConfig> for ContextLimits {
    fn from(config: &ContextConfig) -> Self {
        Self {
            max_chars: config.max_chars,
            summary_chars: config.summary_chars,
        }
    }
}

impl ContextLimits {
    /// Turn raw content into the bounded [`SharedContext`] for `locator`.
    ///
    /// Blank content is treated as missing.
    pub fn bound(&self, locator: &str, raw: &str) -> Result<SharedContext, ContextError> {
        if raw.trim().is_empty() {
            return Err(ContextError::NotFound(locator.to_string()));
        }

        let (content, content_cut) = truncate_with_marker(raw, self.max_chars, CONTENT_MARKER);
        if content_cut {
            tracing::debug!(
                locator,
                max_chars = self.max_chars,
                "Content too large, truncated"
            );
        }
        let (summary, summary_cut) =
            truncate_with_marker(&content, self.summary_chars, SUMMARY_MARKER);

        Ok(SharedContext {
            locator: locator.to_string(),
            text: summary,
            truncated: content_cut || summary_cut,
        })
    }
}

/// Reject empty locators before touching any backend.
pub(crate) fn check_locator(locator: &str) -> Result<(), ContextError> {
    if locator.trim().is_empty() {
        Err(ContextError::EmptyLocator)
    } else {
        Ok(())
    }
}

/// Build the configured context provider.
///
/// The search backend gets a single [`SearchClient`] that is reused for the
/// lifetime of the process.
pub fn build_from_config(config: &ContextConfig) -> Result<Arc<dyn ContextProvider>, ContextError> {
    let limits = ContextLimits::from(config);

    let provider: Arc<dyn ContextProvider> = match config.backend.as_str() {
        "search" => {
            let client = SearchClient::new(&config.search)?;
            Arc::new(SearchContextProvider::new(client, &config.search, limits))
        }
        "file" => {
            let dir = config
                .file_dir
                .clone()
                .ok_or_else(|| ContextError::UnsupportedBackend("file backend needs file_dir".into()))?;
            Arc::new(FileContextProvider::new(dir, limits))
        }
        "static" => {
            let text = config
                .static_text
                .clone()
                .unwrap_or_else(|| fixed::DEFAULT_TEXT.to_string());
            Arc::new(StaticContextProvider::new(text).with_limits(limits))
        }
        other => return Err(ContextError::UnsupportedBackend(other.to_string())),
    };

    tracing::info!(backend = provider.name(), "Context provider ready");
    Ok(provider)
}
