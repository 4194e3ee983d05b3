//! Authoring brief: the instructions a synthesizer works from.
//!
//! One block per (difficulty, level) combination, with its count and the
//! matching guidance, followed by the shared context. Model-backed
//! synthesizers send this as their prompt; the template synthesizer logs it
//! at trace level.

use std::fmt::Write as _;

use quizgen_core::synthesis::SynthesisRequest;

use crate::guidelines::{difficulty_description, kind_name, level_guidelines};

/// Render the brief for `request` given its assignment sequence.
pub fn render_brief(request: &SynthesisRequest, sequence: &[(String, String)]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Write {} {} items for content '{}'.",
        request.count,
        kind_name(&request.kind),
        request.content_locator
    );
    if let Some(objectives) = request.objectives.as_ref().filter(|o| !o.is_empty()) {
        let _ = writeln!(
            out,
            "Restrict items to learning objectives: {}.",
            objectives.values().join(", ")
        );
    }

    // Sequence is grouped by cell, so consecutive runs are the combinations.
    let mut i = 0;
    while i < sequence.len() {
        let cell = &sequence[i];
        let run = sequence[i..].iter().take_while(|c| *c == cell).count();
        let (difficulty, level) = cell;
        let _ = write!(
            out,
            "\nFor {run} items at {} difficulty and {} level:\n\
             - Difficulty: {}\n\
             - Level guidelines: {}\n",
            difficulty.to_uppercase(),
            level.to_uppercase(),
            difficulty_description(difficulty),
            level_guidelines(level, &request.kind),
        );
        i += run;
    }

    let _ = write!(out, "\nContent:\n{}\n", request.context.text);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizgen_core::context::SharedContext;
    use quizgen_core::distribution::Distribution;
    use quizgen_core::request::ObjectiveFilter;
    use std::sync::Arc;

    #[test]
    fn one_block_per_combination() {
        let request = SynthesisRequest {
            kind: "fib".into(),
            context: Arc::new(SharedContext::new("ch02", "Mitochondria make ATP.")),
            difficulty_mix: Distribution::from([("basic", 1.0)]),
            level_mix: Distribution::from([("remember", 0.5), ("apply", 0.5)]),
            cells: Vec::new(),
            count: 3,
            content_locator: "ch02".into(),
            objectives: Some(ObjectiveFilter::One("LO_2.1".into())),
        };
        let sequence = vec![
            ("basic".to_string(), "apply".to_string()),
            ("basic".to_string(), "remember".to_string()),
            ("basic".to_string(), "remember".to_string()),
        ];
        let brief = render_brief(&request, &sequence);
        assert!(brief.contains("Write 3 fill-in-the-blank items"));
        assert!(brief.contains("For 1 items at BASIC difficulty and APPLY level"));
        assert!(brief.contains("For 2 items at BASIC difficulty and REMEMBER level"));
        assert!(brief.contains("LO_2.1"));
        assert!(brief.ends_with("Mitochondria make ATP.\n"));
    }
}
