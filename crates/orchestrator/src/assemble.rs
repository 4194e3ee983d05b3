//! Merge worker results into one response.

use std::collections::BTreeMap;

use quizgen_core::error::{GenerationError, Result};
use quizgen_core::quota::KindQuota;
use quizgen_core::request::AggregatedResponse;
use quizgen_core::synthesis::WorkerResult;

/// Check counts and merge `results` into an [`AggregatedResponse`].
///
/// Every kind must have produced exactly its quota and the grand total must
/// equal `expected_total`; a mismatch is [`GenerationError::CountMismatch`]
/// (kind `"*"` for the grand total). Items are never truncated or padded.
pub fn assemble(
    groups: &[KindQuota],
    results: Vec<WorkerResult>,
    expected_total: usize,
) -> Result<AggregatedResponse> {
    let mut by_kind: BTreeMap<String, WorkerResult> = BTreeMap::new();
    for result in results {
        if !groups.iter().any(|g| g.kind == result.kind) {
            return Err(GenerationError::Internal(format!(
                "result for unexpected kind '{}'",
                result.kind
            )));
        }
        if by_kind.insert(result.kind.clone(), result).is_some() {
            return Err(GenerationError::Internal("duplicate worker result".into()));
        }
    }

    let mut response = AggregatedResponse::default();
    for group in groups {
        let result = by_kind.remove(&group.kind);
        let actual = result.as_ref().map_or(0, |r| r.items.len());
        if actual != group.total {
            return Err(GenerationError::CountMismatch {
                kind: group.kind.clone(),
                expected: group.total,
                actual,
            });
        }
        if let Some(result) = result {
            response.artifact_names.push(result.artifact_name);
            response.items_by_kind.insert(result.kind, result.items);
        }
    }

    let actual = response.total_items();
    if actual != expected_total {
        return Err(GenerationError::CountMismatch {
            kind: "*".into(),
            expected: expected_total,
            actual,
        });
    }

    Ok(response)
}
