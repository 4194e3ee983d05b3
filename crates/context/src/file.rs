//! Local-file context provider.
//!
//! Reads `{dir}/{locator}.txt`. Useful offline and in development, where no
//! search index is running.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quizgen_core::context::{ContextProvider, SharedContext};
use quizgen_core::error::ContextError;
use quizgen_core::request::ObjectiveFilter;
use tracing::debug;

use crate::ContextLimits;

pub struct FileContextProvider {
    dir: PathBuf,
    limits: ContextLimits,
}

impl FileContextProvider {
    pub fn new(dir: impl Into<PathBuf>, limits: ContextLimits) -> Self {
        Self {
            dir: dir.into(),
            limits,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, locator: &str) -> Option<PathBuf> {
        // Locators name a file inside `dir`, never a path.
        if locator.contains(['/', '\\']) || locator.starts_with('.') {
            return None;
        }
        Some(self.dir.join(format!("{locator}.txt")))
    }
}

#[async_trait]
impl ContextProvider for FileContextProvider {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch(
        &self,
        locator: &str,
        _objectives: Option<&ObjectiveFilter>,
    ) -> Result<SharedContext, ContextError> {
        crate::check_locator(locator)?;
        let path = self
            .path_for(locator)
            .ok_or_else(|| ContextError::NotFound(locator.to_string()))?;

        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ContextError::NotFound(locator.to_string()));
            }
            Err(e) => return Err(ContextError::Io(format!("{}: {e}", path.display()))),
        };

        debug!(path = %path.display(), chars = raw.chars().count(), "Read context file");
        self.limits.bound(locator, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_locator_file() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("bio_ch03.txt"), "The cell membrane is selectively permeable.")
            .unwrap();

        let provider = FileContextProvider::new(tmp.path(), ContextLimits::default());
        let ctx = provider.fetch("bio_ch03", None).await.unwrap();
        assert_eq!(ctx.text, "The cell membrane is selectively permeable.");
        assert!(!ctx.truncated);
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let provider = FileContextProvider::new(tmp.path(), ContextLimits::default());
        let err = provider.fetch("nope", None).await.unwrap_err();
        assert!(matches!(err, ContextError::NotFound(ref l) if l == "nope"));
    }

    #[tokio::test]
    async fn path_like_locator_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let provider = FileContextProvider::new(tmp.path(), ContextLimits::default());
        assert!(provider.fetch("../etc/passwd", None).await.is_err());
        assert!(provider.fetch("a/b", None).await.is_err());
    }

    #[tokio::test]
    async fn large_file_is_truncated() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("big.txt"), "a".repeat(500)).unwrap();
        let limits = ContextLimits {
            max_chars: 300,
            summary_chars: 100,
        };
        let provider = FileContextProvider::new(tmp.path(), limits);
        let ctx = provider.fetch("big", None).await.unwrap();
        assert!(ctx.truncated);
        assert!(ctx.text.ends_with(crate::SUMMARY_MARKER));
    }
}
