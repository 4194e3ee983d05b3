//! Deterministic artifact names.
//!
//! External storage uses the name as an addressing key, so it must be a pure
//! function of what the caller declared: same locator, difficulty and level
//! distributions, objectives and kind give the same name on every run,
//! whatever the item count.

use quizgen_core::distribution::Distribution;
use quizgen_core::request::ObjectiveFilter;

/// `label{pct}` per entry, joined with `_`, in canonical label order.
///
/// `pct` is the weight in percent, rounded to the nearest integer.
pub fn format_distribution(mix: &Distribution) -> String {
    mix.iter()
        .map(|(label, weight)| format!("{label}{}", (weight * 100.0).round() as i64))
        .collect::<Vec<_>>()
        .join("_")
}

fn kind_suffix(kind: &str) -> &str {
    match kind {
        "mcq" => "mcqs",
        other => other,
    }
}

/// `{locator}_{difficulty}_{level}[_lo{objectives}]_{suffix}.json`
pub fn artifact_name(
    locator: &str,
    difficulty_mix: &Distribution,
    level_mix: &Distribution,
    objectives: Option<&ObjectiveFilter>,
    kind: &str,
) -> String {
    let mut parts = vec![
        locator.to_string(),
        format_distribution(difficulty_mix),
        format_distribution(level_mix),
    ];
    if let Some(tag) = objectives.and_then(ObjectiveFilter::tag) {
        parts.push(tag);
    }
    parts.push(kind_suffix(kind).to_string());
    format!("{}.json", parts.join("_"))
}
