//! Regroup a flat allocation into one bucket per kind.

use std::collections::BTreeMap;

use quizgen_core::distribution::Distribution;
use quizgen_core::error::{GenerationError, Result};
use quizgen_core::quota::{KindQuota, Quota};

/// Partition `quotas` by kind and derive each kind's sub-distributions.
///
/// The difficulty and level mixes are the count-weighted marginals within the
/// kind. Kinds come out in canonical order. A kind whose counts add up to zero,
/// or a grand total that differs from `expected_total`, means the allocation
/// was corrupted and is reported as [`GenerationError::Internal`].
pub fn group_by_kind(quotas: &[Quota], expected_total: usize) -> Result<Vec<KindQuota>> {
    let mut buckets: BTreeMap<&str, Vec<Quota>> = BTreeMap::new();
    for quota in quotas {
        buckets
            .entry(quota.kind.as_str())
            .or_default()
            .push(quota.clone());
    }

    let mut groups = Vec::with_capacity(buckets.len());
    let mut grand_total = 0usize;

    for (kind, mut members) in buckets {
        members.sort();
        let total: usize = members.iter().map(|q| q.count).sum();
        if total == 0 {
            return Err(GenerationError::Internal(format!(
                "kind '{kind}' was allocated zero items"
            )));
        }

        let mut difficulty_mix = Distribution::new();
        let mut level_mix = Distribution::new();
        for q in &members {
            let share = q.count as f64 / total as f64;
            difficulty_mix.accumulate(&q.difficulty, share);
            level_mix.accumulate(&q.level, share);
        }

        grand_total += total;
        groups.push(KindQuota {
            kind: kind.to_string(),
            quotas: members,
            total,
            difficulty_mix,
            level_mix,
        });
    }

    if grand_total != expected_total {
        return Err(GenerationError::Internal(format!(
            "grouped {grand_total} items, expected {expected_total}"
        )));
    }

    Ok(groups)
}
