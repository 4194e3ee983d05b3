//! `quizgen allocate`: Print the quota table for a request.

use std::fmt::Write as _;

use quizgen_config::AppConfig;
use quizgen_core::distribution::Distribution;
use quizgen_core::quota::KindQuota;
use quizgen_quota::{allocate, group_by_kind};

pub fn run(
    total: usize,
    kinds: &str,
    difficulties: &str,
    levels: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    check_total(total, config.generation.max_total_items)?;

    let kinds = parse_weights(kinds)?;
    let difficulties = parse_weights(difficulties)?;
    let levels = parse_weights(levels)?;

    let quotas = allocate(total, &kinds, &difficulties, &levels)?;
    let groups = group_by_kind(&quotas, total)?;

    print!("{}", render(total, &groups));
    Ok(())
}

/// Same ceiling the service applies to `totalCount`.
fn check_total(total: usize, limit: usize) -> Result<(), String> {
    if total > limit {
        return Err(format!("totalCount {total} exceeds the limit of {limit}"));
    }
    Ok(())
}

/// Parse `label=weight,label=weight,...` into a [`Distribution`].
///
/// Weights are not normalized here; the allocator does that and rejects
/// empty or non-positive distributions.
pub fn parse_weights(weights: &str) -> Result<Distribution, String> {
    let mut dist = Distribution::new();
    for pair in weights.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (label, weight) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected label=weight, got '{pair}'"))?;
        let label = label.trim();
        if label.is_empty() {
            return Err(format!("missing label in '{pair}'"));
        }
        let weight: f64 = weight
            .trim()
            .parse()
            .map_err(|_| format!("weight for '{label}' is not a number: '{}'", weight.trim()))?;
        dist.insert(label, weight);
    }
    Ok(dist)
}

fn render(total: usize, groups: &[KindQuota]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Allocation of {total} items");
    let _ = writeln!(out);
    let _ = writeln!(out, "  {:<8} {:<14} {:<10} {:>5}", "kind", "difficulty", "level", "count");

    for group in groups {
        for q in &group.quotas {
            let _ = writeln!(
                out,
                "  {:<8} {:<14} {:<10} {:>5}",
                q.kind, q.difficulty, q.level, q.count
            );
        }
    }

    for group in groups {
        let _ = writeln!(out);
        let _ = writeln!(out, "{} ({} items)", group.kind, group.total);
        let _ = writeln!(out, "  difficulty: {}", format_mix(&group.difficulty_mix));
        let _ = writeln!(out, "  level:      {}", format_mix(&group.level_mix));
    }

    let sum: usize = groups.iter().map(|g| g.total).sum();
    let _ = writeln!(out);
    let _ = writeln!(out, "Total: {sum}");
    out
}

fn format_mix(mix: &Distribution) -> String {
    mix.iter()
        .map(|(label, w)| format!("{label}={w:.3}"))
        .collect::<Vec<_>>()
        .join(", ")
}
