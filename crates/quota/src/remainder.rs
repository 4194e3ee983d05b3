//! Largest-remainder apportionment.
//!
//! Shared by the global allocator and by the per-kind expansions, so a
//! sub-distribution expanded locally follows exactly the same rules as the
//! allocation it was derived from.

use quizgen_core::distribution::Distribution;
use quizgen_core::quota::CellShare;

/// Shares within this distance of an integer are treated as that integer.
const SNAP_EPSILON: f64 = 1e-9;

/// Fractional parts are compared on a fixed grid so float noise cannot
/// reorder equal remainders.
const FRACTION_SCALE: f64 = 1e9;

struct Slot<K> {
    key: K,
    count: usize,
    fraction: u64,
}

/// Apportion `total` across `shares` (proportions summing to 1.0).
///
/// Each key receives `floor(total * share)`; the leftover units go to the
/// keys with the largest fractional parts, ties broken by ascending key.
/// Returns one `(key, count)` per input in input order, zero counts
/// included. The counts always sum to `total`.
pub fn largest_remainder<K: Ord + Clone>(total: usize, shares: &[(K, f64)]) -> Vec<(K, usize)> {
    if shares.is_empty() {
        return Vec::new();
    }

    let mut slots: Vec<Slot<K>> = shares
        .iter()
        .map(|(key, share)| {
            let mut exact = total as f64 * share;
            let nearest = exact.round();
            if (exact - nearest).abs() < SNAP_EPSILON {
                exact = nearest;
            }
            let floor = exact.floor().max(0.0);
            Slot {
                key: key.clone(),
                count: floor as usize,
                fraction: ((exact - floor) * FRACTION_SCALE).round() as u64,
            }
        })
        .collect();

    let mut ranked: Vec<usize> = (0..slots.len()).collect();
    ranked.sort_by(|&a, &b| {
        slots[b]
            .fraction
            .cmp(&slots[a].fraction)
            .then_with(|| slots[a].key.cmp(&slots[b].key))
    });

    let assigned: usize = slots.iter().map(|s| s.count).sum();
    if assigned <= total {
        // The leftover is below the number of slots for proportions that sum
        // to 1.0; cycling keeps the total exact even for inputs that do not.
        for &i in ranked.iter().cycle().take(total - assigned) {
            slots[i].count += 1;
        }
    } else {
        let mut excess = assigned - total;
        for &i in ranked.iter().rev() {
            if excess == 0 {
                break;
            }
            let take = slots[i].count.min(excess);
            slots[i].count -= take;
            excess -= take;
        }
    }

    debug_assert_eq!(slots.iter().map(|s| s.count).sum::<usize>(), total);

    slots.into_iter().map(|s| (s.key, s.count)).collect()
}

/// Expand a distribution into integer counts summing to `total`.
///
/// Labels with a zero count are omitted.
pub fn expand_mix(total: usize, mix: &Distribution) -> Vec<(String, usize)> {
    let shares: Vec<(String, f64)> = mix.iter().map(|(l, w)| (l.to_string(), w)).collect();
    largest_remainder(total, &shares)
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .collect()
}

/// Expand a joint (difficulty, level) sub-distribution into a `total`-long
/// assignment sequence.
///
/// Cells appear in canonical order, each repeated by its count, so the
/// sequence is identical for identical input.
pub fn expand_cells(total: usize, cells: &[CellShare]) -> Vec<(String, String)> {
    let shares: Vec<((String, String), f64)> = cells
        .iter()
        .map(|c| ((c.difficulty.clone(), c.level.clone()), c.share))
        .collect();

    let mut counts = largest_remainder(total, &shares);
    counts.sort_by(|a, b| a.0.cmp(&b.0));

    counts
        .into_iter()
        .flat_map(|(cell, count)| std::iter::repeat_n(cell, count))
        .collect()
}
