//! Quotas: how many items each combination and each kind must produce.

use serde::{Deserialize, Serialize};

use crate::distribution::Distribution;

/// Item count for one (kind, difficulty, level) combination.
///
/// Created by the allocator and never mutated afterwards; downstream code only
/// filters and re-aggregates these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Quota {
    pub kind: String,
    pub difficulty: String,
    pub level: String,
    pub count: usize,
}

impl Quota {
    pub fn new(
        kind: impl Into<String>,
        difficulty: impl Into<String>,
        level: impl Into<String>,
        count: usize,
    ) -> Self {
        Self {
            kind: kind.into(),
            difficulty: difficulty.into(),
            level: level.into(),
            count,
        }
    }
}

/// Share of one (difficulty, level) cell within a single kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellShare {
    pub difficulty: String,
    pub level: String,
    pub share: f64,
}

/// Everything one worker needs to know about its kind's allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindQuota {
    /// The item kind this bucket belongs to.
    pub kind: String,
    /// Non-zero combinations of this kind, in canonical order.
    pub quotas: Vec<Quota>,
    /// Sum of `quotas[*].count`.
    pub total: usize,
    /// Difficulty proportions within this kind (sums to 1.0).
    pub difficulty_mix: Distribution,
    /// Cognitive-level proportions within this kind (sums to 1.0).
    pub level_mix: Distribution,
}

impl KindQuota {
    /// The joint (difficulty, level) sub-distribution for this kind.
    ///
    /// Expanding these shares against `total` with largest remainder yields
    /// the per-combination counts back exactly.
    pub fn cells(&self) -> Vec<CellShare> {
        if self.total == 0 {
            return Vec::new();
        }
        self.quotas
            .iter()
            .map(|q| CellShare {
                difficulty: q.difficulty.clone(),
                level: q.level.clone(),
                share: q.count as f64 / self.total as f64,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_are_count_over_total() {
        let kq = KindQuota {
            kind: "mcq".into(),
            quotas: vec![
                Quota::new("mcq", "basic", "apply", 1),
                Quota::new("mcq", "advanced", "remember", 3),
            ],
            total: 4,
            difficulty_mix: Distribution::from([("basic", 0.25), ("advanced", 0.75)]),
            level_mix: Distribution::from([("apply", 0.25), ("remember", 0.75)]),
        };
        let cells = kq.cells();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].difficulty, "basic");
        assert!((cells[0].share - 0.25).abs() < 1e-12);
        assert!((cells[1].share - 0.75).abs() < 1e-12);
    }

    #[test]
    fn quotas_order_by_key() {
        let mut quotas = vec![
            Quota::new("tf", "basic", "apply", 1),
            Quota::new("fib", "basic", "apply", 1),
            Quota::new("fib", "advanced", "remember", 1),
        ];
        quotas.sort();
        assert_eq!(quotas[0].kind, "fib");
        assert_eq!(quotas[0].difficulty, "advanced");
        assert_eq!(quotas[2].kind, "tf");
    }
}
