//! Global quota allocation across kind × difficulty × level.

use quizgen_core::distribution::{Axis, Distribution};
use quizgen_core::error::Result;
use quizgen_core::quota::Quota;
use tracing::debug;

type Cell = (String, String, String);

/// Allocate `total` items over the product of the three distributions.
///
/// Each axis is normalized first, so weights need not sum to 1.0. The exact
/// share of a combination is `total * p_kind * p_difficulty * p_level`; the
/// integer counts come from a single largest-remainder pass over all
/// combinations, which keeps the grand total exact.
///
/// Returns only combinations with a non-zero count, in canonical
/// (kind, difficulty, level) order. `total == 0` yields an empty list.
pub fn allocate(
    total: usize,
    kinds: &Distribution,
    difficulties: &Distribution,
    levels: &Distribution,
) -> Result<Vec<Quota>> {
    let kinds = kinds.normalized(Axis::Kind)?;
    let difficulties = difficulties.normalized(Axis::Difficulty)?;
    let levels = levels.normalized(Axis::Level)?;

    if total == 0 {
        return Ok(Vec::new());
    }

    let mut shares: Vec<(Cell, f64)> =
        Vec::with_capacity(kinds.len() * difficulties.len() * levels.len());
    for (kind, pk) in kinds.iter() {
        for (difficulty, pd) in difficulties.iter() {
            for (level, pl) in levels.iter() {
                shares.push((
                    (kind.to_string(), difficulty.to_string(), level.to_string()),
                    pk * pd * pl,
                ));
            }
        }
    }

    let quotas: Vec<Quota> = crate::largest_remainder(total, &shares)
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|((kind, difficulty, level), count)| Quota {
            kind,
            difficulty,
            level,
            count,
        })
        .collect();

    debug!(
        total,
        combinations = shares.len(),
        allocated = quotas.len(),
        "Allocated quotas"
    );

    Ok(quotas)
}
