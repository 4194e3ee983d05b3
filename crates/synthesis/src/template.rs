//! Offline template synthesizer.
//!
//! Builds items straight from the shared context without a model: each item
//! takes one sentence of the context and hides or swaps its key term. Good
//! enough for demos, local runs and tests; a model-backed synthesizer plugs
//! into the same trait.

use async_trait::async_trait;
use quizgen_core::error::SynthesisError;
use quizgen_core::synthesis::{GeneratedItem, SynthesisRequest, Synthesizer};
use tracing::{Level, debug, trace};

use crate::guidelines::{difficulty_description, level_description};
use crate::{SUPPORTED_KINDS, assignment_sequence, render_brief};

const BLANK: &str = "________";
const MIN_WORDS: usize = 4;
const MIN_TERM_CHARS: usize = 4;
const MCQ_OPTIONS: usize = 4;
const FILLER_OPTIONS: &[&str] = &["None of the above", "All of the above", "Not stated"];

/// One usable sentence and its key term.
#[derive(Debug, Clone)]
struct Fact {
    sentence: String,
    term: String,
}

impl Fact {
    fn blanked(&self) -> String {
        self.sentence.replacen(&self.term, BLANK, 1)
    }
}

#[derive(Debug, Default)]
pub struct TemplateSynthesizer;

impl TemplateSynthesizer {
    pub fn new() -> Self {
        Self
    }
}

/// Split the context into sentences that carry a usable key term.
fn extract_facts(text: &str, locator: &str) -> Vec<Fact> {
    let facts: Vec<Fact> = text
        .split(['.', '!', '?', '\n'])
        .map(str::trim)
        .filter(|s| !s.starts_with('[') && s.split_whitespace().count() >= MIN_WORDS)
        .filter_map(|s| {
            key_term(s).map(|term| Fact {
                sentence: s.to_string(),
                term,
            })
        })
        .collect();

    if facts.is_empty() {
        return vec![Fact {
            sentence: format!("The material in {locator} introduces its central concepts"),
            term: "concepts".into(),
        }];
    }
    facts
}

/// The longest alphabetic word of a sentence, first one on ties.
fn key_term(sentence: &str) -> Option<String> {
    sentence
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| w.chars().count() >= MIN_TERM_CHARS && w.chars().all(char::is_alphabetic))
        .fold(None::<&str>, |best, w| match best {
            Some(b) if b.chars().count() >= w.chars().count() => Some(b),
            _ => Some(w),
        })
        .map(str::to_string)
}

/// Key terms of other facts, usable as distractors for `fact`.
fn distractors<'a>(facts: &'a [Fact], fact: &Fact) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::new();
    for f in facts {
        let t = f.term.as_str();
        if !t.eq_ignore_ascii_case(&fact.term) && !out.iter().any(|o| o.eq_ignore_ascii_case(t)) {
            out.push(t);
        }
    }
    out
}

fn build_item(
    kind: &str,
    index: usize,
    fact: &Fact,
    facts: &[Fact],
    difficulty: &str,
    level: &str,
) -> GeneratedItem {
    let mut options = Vec::new();
    let (prompt, answers) = match kind {
        "mcq" => {
            let mut choices: Vec<String> = distractors(facts, fact)
                .into_iter()
                .take(MCQ_OPTIONS - 1)
                .map(str::to_string)
                .collect();
            for filler in FILLER_OPTIONS {
                if choices.len() >= MCQ_OPTIONS - 1 {
                    break;
                }
                choices.push((*filler).to_string());
            }
            choices.insert(index % MCQ_OPTIONS, fact.term.clone());
            options = choices;
            (
                format!("Which term best completes the statement: \"{}\"?", fact.blanked()),
                vec![fact.term.clone()],
            )
        }
        "tf" => {
            // Odd items swap in another fact's term to produce a false statement.
            let swap = distractors(facts, fact).into_iter().nth(index / 2 % facts.len().max(1));
            match swap.filter(|_| index % 2 == 1) {
                Some(other) => (
                    format!("True or false: {}.", fact.sentence.replacen(&fact.term, other, 1)),
                    vec!["False".to_string()],
                ),
                None => (
                    format!("True or false: {}.", fact.sentence),
                    vec!["True".to_string()],
                ),
            }
        }
        _ => (format!("{}.", fact.blanked()), vec![fact.term.clone()]),
    };

    GeneratedItem {
        item_id: uuid::Uuid::new_v4().to_string(),
        kind: kind.to_string(),
        difficulty: difficulty.to_string(),
        level: level.to_string(),
        prompt,
        options,
        answers,
        explanation: format!(
            "Based on: \"{}\". Targets {} Expects {}.",
            fact.sentence,
            level_description(level),
            difficulty_description(difficulty)
        ),
    }
}

#[async_trait]
impl Synthesizer for TemplateSynthesizer {
    fn name(&self) -> &str {
        "template"
    }

    fn supports(&self, kind: &str) -> bool {
        SUPPORTED_KINDS.contains(&kind)
    }

    async fn synthesize(
        &self,
        request: SynthesisRequest,
    ) -> Result<Vec<GeneratedItem>, SynthesisError> {
        if !self.supports(&request.kind) {
            return Err(SynthesisError::UnsupportedKind(request.kind));
        }

        let sequence = assignment_sequence(&request);
        if sequence.len() != request.count {
            return Err(SynthesisError::Failed(format!(
                "planned {} assignments for {} items",
                sequence.len(),
                request.count
            )));
        }

        debug!(kind = %request.kind, count = request.count, "Synthesizing");
        if tracing::enabled!(Level::TRACE) {
            let brief = render_brief(&request, &sequence);
            trace!(kind = %request.kind, brief = %brief, "Authoring brief");
        }

        let facts = extract_facts(&request.context.text, &request.content_locator);
        let items = sequence
            .iter()
            .enumerate()
            .map(|(i, (difficulty, level))| {
                build_item(&request.kind, i, &facts[i % facts.len()], &facts, difficulty, level)
            })
            .collect();

        Ok(items)
    }
}
