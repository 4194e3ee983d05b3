//! Per-item (difficulty, level) assignment.

use quizgen_core::synthesis::SynthesisRequest;
use quizgen_quota::{expand_cells, expand_mix};

/// The (difficulty, level) of each of the `request.count` items, in order.
///
/// Built from the joint cells when present, which reproduces the allocated
/// per-combination counts exactly. Without cells the two marginals are
/// expanded independently and paired position by position.
pub fn assignment_sequence(request: &SynthesisRequest) -> Vec<(String, String)> {
    if !request.cells.is_empty() {
        return expand_cells(request.count, &request.cells);
    }

    let difficulties = block_expand(expand_mix(request.count, &request.difficulty_mix));
    let levels = block_expand(expand_mix(request.count, &request.level_mix));
    difficulties.into_iter().zip(levels).collect()
}

fn block_expand(counts: Vec<(String, usize)>) -> Vec<String> {
    counts
        .into_iter()
        .flat_map(|(label, n)| std::iter::repeat_n(label, n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizgen_core::context::SharedContext;
    use quizgen_core::distribution::Distribution;
    use quizgen_core::quota::CellShare;
    use std::sync::Arc;

    fn request(count: usize, cells: Vec<CellShare>) -> SynthesisRequest {
        SynthesisRequest {
            kind: "mcq".into(),
            context: Arc::new(SharedContext::new("ch01", "text")),
            difficulty_mix: Distribution::from([("basic", 0.5), ("advanced", 0.5)]),
            level_mix: Distribution::from([("apply", 1.0)]),
            cells,
            count,
            content_locator: "ch01".into(),
            objectives: None,
        }
    }

    #[test]
    fn uses_cells_when_present() {
        let cells = vec![
            CellShare {
                difficulty: "advanced".into(),
                level: "remember".into(),
                share: 0.2,
            },
            CellShare {
                difficulty: "basic".into(),
                level: "apply".into(),
                share: 0.8,
            },
        ];
        let seq = assignment_sequence(&request(5, cells));
        assert_eq!(seq.len(), 5);
        assert_eq!(seq[0], ("advanced".to_string(), "remember".to_string()));
        assert!(seq[1..].iter().all(|(d, l)| d == "basic" && l == "apply"));
    }

    #[test]
    fn falls_back_to_marginals() {
        let seq = assignment_sequence(&request(4, Vec::new()));
        assert_eq!(seq.len(), 4);
        assert_eq!(seq.iter().filter(|(d, _)| d == "basic").count(), 2);
        assert!(seq.iter().all(|(_, l)| l == "apply"));
    }
}
