//! Authoring guidance per difficulty, cognitive level and kind.

/// What a difficulty level asks of the learner.
pub fn difficulty_description(difficulty: &str) -> &'static str {
    match difficulty {
        "basic" => "recall of facts and basic understanding of concepts",
        "intermediate" => "application of concepts and analysis of relationships",
        "advanced" => "synthesis of multiple concepts and evaluation of complex scenarios",
        _ => "appropriate college-level understanding",
    }
}

/// How to write an item of `kind` at cognitive `level`.
pub fn level_guidelines(level: &str, kind: &str) -> &'static str {
    match (kind, level) {
        ("mcq", "remember") => {
            "Focus on direct recall of facts, definitions, and basic concepts. Stem should ask \
             for specific information covered in the material."
        }
        ("mcq", "apply") => {
            "Present a scenario or problem that requires applying learned concepts. Stem should \
             describe a situation where students must use their knowledge."
        }
        ("mcq", "analyze") => {
            "Present complex scenarios requiring analysis of multiple variables. Stem should \
             require students to examine, compare, or evaluate information."
        }
        ("tf", "remember") => {
            "State facts, definitions, or basic concepts clearly. Focus on information directly \
             covered in the material."
        }
        ("tf", "apply") => {
            "Present statements about applying concepts to situations. Focus on whether \
             procedures or principles are correctly applied."
        }
        ("tf", "analyze") => {
            "Present statements requiring analysis of complex relationships. Focus on \
             evaluations, comparisons, or synthesis of information."
        }
        ("fib", "remember") => {
            "Remove key terms, definitions, or factual information. Focus on vocabulary, names, \
             dates, and basic concepts."
        }
        ("fib", "apply") => {
            "Remove answers that require applying formulas or procedures. Focus on results of \
             calculations or applications."
        }
        ("fib", "analyze") => {
            "Remove conclusions, evaluations, or synthesis results. Focus on analytical outcomes \
             or judgments."
        }
        _ => "appropriate cognitive level thinking",
    }
}

/// Short description of a cognitive level.
pub fn level_description(level: &str) -> &'static str {
    match level {
        "remember" => {
            "Remember/Understand: recall basic information or show understanding of basic \
             concepts (definitions, key terms, components, steps)."
        }
        "apply" => {
            "Apply: use knowledge of a concept to solve a problem or handle a new situation \
             (calculations, procedures, worked cases)."
        }
        "analyze" => {
            "Analyze/Evaluate/Create: examine information by parts, make decisions, compare \
             approaches, or build new solutions."
        }
        _ => "appropriate cognitive level thinking",
    }
}

/// Human-readable name of a kind.
pub fn kind_name(kind: &str) -> &str {
    match kind {
        "mcq" => "multiple-choice",
        "fib" => "fill-in-the-blank",
        "tf" => "true/false",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_levels_have_specific_guidance() {
        for kind in crate::SUPPORTED_KINDS {
            for level in ["remember", "apply", "analyze"] {
                assert_ne!(
                    level_guidelines(level, kind),
                    "appropriate cognitive level thinking",
                    "{kind}/{level}"
                );
            }
        }
    }

    #[test]
    fn unknown_values_fall_back() {
        assert_eq!(difficulty_description("legendary"), "appropriate college-level understanding");
        assert_eq!(level_guidelines("create", "mcq"), "appropriate cognitive level thinking");
        assert_eq!(kind_name("essay"), "essay");
    }
}
