//! Weighted label distributions.
//!
//! A [`Distribution`] maps a label (`"mcq"`, `"basic"`, `"apply"`, ...) to a
//! non-negative weight. Weights do not have to sum to 1.0; callers normalize
//! with [`Distribution::normalized`] before using them as proportions.
//!
//! Labels are stored in a `BTreeMap`, so every iteration is in canonical
//! (lexicographic) order regardless of how the distribution was built.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::GenerationError;

/// The three independent axes a request is broken down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Item kind (`mcq`, `fib`, `tf`).
    Kind,
    /// Difficulty (`basic`, `intermediate`, `advanced`).
    Difficulty,
    /// Cognitive level (`remember`, `apply`, `analyze`).
    Level,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Kind => "kind",
            Self::Difficulty => "difficulty",
            Self::Level => "level",
        })
    }
}

/// A label → weight mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distribution(BTreeMap<String, f64>);

impl Distribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the weight for a label, replacing any previous weight.
    pub fn insert(&mut self, label: impl Into<String>, weight: f64) {
        self.0.insert(label.into(), weight);
    }

    /// Add to the weight of a label (starting from 0).
    pub fn accumulate(&mut self, label: &str, weight: f64) {
        *self.0.entry(label.to_string()).or_insert(0.0) += weight;
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(label, weight)` pairs in canonical label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(label, weight)| (label.as_str(), *weight))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Return a copy whose weights sum to 1.0.
    ///
    /// Fails with [`GenerationError::InvalidDistribution`] if the distribution
    /// is empty, holds a negative or non-finite weight, or sums to zero.
    pub fn normalized(&self, axis: Axis) -> Result<Self, GenerationError> {
        let invalid = |reason: String| GenerationError::InvalidDistribution { axis, reason };

        if self.0.is_empty() {
            return Err(invalid("no labels given".into()));
        }

        if let Some((label, weight)) = self
            .0
            .iter()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(invalid(format!("weight for '{label}' is {weight}")));
        }

        let total = self.total();
        if total <= 0.0 || !total.is_finite() {
            return Err(invalid(format!("weights sum to {total}")));
        }

        Ok(Self(
            self.0
                .iter()
                .map(|(label, weight)| (label.clone(), weight / total))
                .collect(),
        ))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Distribution {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, w)| (k.into(), w)).collect())
    }
}

impl<K: Into<String>, const N: usize> From<[(K, f64); N]> for Distribution {
    fn from(pairs: [(K, f64); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_unscaled_weights() {
        let dist = Distribution::from([("a", 2.0), ("b", 6.0)]);
        let norm = dist.normalized(Axis::Kind).unwrap();
        assert!((norm.get("a").unwrap() - 0.25).abs() < 1e-12);
        assert!((norm.get("b").unwrap() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn empty_is_invalid() {
        let err = Distribution::new().normalized(Axis::Level).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::InvalidDistribution { axis: Axis::Level, .. }
        ));
    }

    #[test]
    fn zero_sum_is_invalid() {
        let dist = Distribution::from([("a", 0.0), ("b", 0.0)]);
        assert!(dist.normalized(Axis::Kind).is_err());
    }

    #[test]
    fn negative_weight_is_invalid() {
        let dist = Distribution::from([("a", 1.5), ("b", -0.5)]);
        let err = dist.normalized(Axis::Difficulty).unwrap_err();
        assert!(err.to_string().contains("'b'"));
    }

    #[test]
    fn nan_weight_is_invalid() {
        let dist = Distribution::from([("a", f64::NAN)]);
        assert!(dist.normalized(Axis::Kind).is_err());
    }

    #[test]
    fn iteration_is_canonical() {
        let dist = Distribution::from([("tf", 0.3), ("mcq", 0.4), ("fib", 0.3)]);
        let labels: Vec<&str> = dist.labels().collect();
        assert_eq!(labels, vec!["fib", "mcq", "tf"]);
    }

    #[test]
    fn deserializes_from_json_object() {
        let dist: Distribution = serde_json::from_str(r#"{"basic": 0.3, "advanced": 0.7}"#).unwrap();
        assert_eq!(dist.len(), 2);
        assert_eq!(dist.get("advanced"), Some(0.7));
    }
}
