//! Test doubles shared by the orchestrator tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use quizgen_core::context::{ContextProvider, SharedContext};
use quizgen_core::error::{ContextError, SynthesisError};
use quizgen_core::request::ObjectiveFilter;
use quizgen_core::synthesis::{GeneratedItem, SynthesisRequest, Synthesizer};
use quizgen_synthesis::assignment_sequence;

/// Context provider that counts calls and optionally fails.
pub struct CountingContext {
    pub calls: AtomicUsize,
    fail: bool,
}

impl CountingContext {
    pub fn ok() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContextProvider for CountingContext {
    fn name(&self) -> &str {
        "counting"
    }

    async fn fetch(
        &self,
        locator: &str,
        _objectives: Option<&ObjectiveFilter>,
    ) -> Result<SharedContext, ContextError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ContextError::NotFound(locator.to_string()));
        }
        Ok(SharedContext::new(locator, "Shared chapter text."))
    }
}

/// How [`ScriptedSynthesizer`] behaves for one kind.
#[derive(Debug, Clone)]
pub enum Behavior {
    Succeed,
    Fail,
    Panic,
    /// Succeed after a delay.
    Slow(Duration),
    /// Return this many items regardless of the requested count.
    WrongCount(usize),
}

/// Synthesizer whose behavior is scripted per kind. Records every request.
pub struct ScriptedSynthesizer {
    script: Vec<(String, Behavior)>,
    pub seen: Mutex<Vec<SynthesisRequest>>,
    pub completed: Mutex<Vec<String>>,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl ScriptedSynthesizer {
    pub fn new(script: &[(&str, Behavior)]) -> Self {
        Self {
            script: script
                .iter()
                .map(|(k, b)| (k.to_string(), b.clone()))
                .collect(),
            seen: Mutex::new(Vec::new()),
            completed: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Every kind succeeds.
    pub fn succeeding() -> Self {
        Self::new(&[])
    }

    fn behavior(&self, kind: &str) -> Behavior {
        self.script
            .iter()
            .find(|(k, _)| k == kind)
            .map(|(_, b)| b.clone())
            .unwrap_or(Behavior::Succeed)
    }

    pub fn seen_kinds(&self) -> Vec<String> {
        self.seen.lock().unwrap().iter().map(|r| r.kind.clone()).collect()
    }
}

pub fn items_for(request: &SynthesisRequest, n: usize) -> Vec<GeneratedItem> {
    let sequence = assignment_sequence(request);
    (0..n)
        .map(|i| {
            let (difficulty, level) = sequence
                .get(i)
                .cloned()
                .unwrap_or_else(|| ("basic".into(), "remember".into()));
            GeneratedItem {
                item_id: format!("{}-{i}", request.kind),
                kind: request.kind.clone(),
                difficulty,
                level,
                prompt: format!("{} item {i}", request.kind),
                options: Vec::new(),
                answers: vec!["answer".into()],
                explanation: String::new(),
            }
        })
        .collect()
}

#[async_trait]
impl Synthesizer for ScriptedSynthesizer {
    fn name(&self) -> &str {
        "scripted"
    }

    fn supports(&self, kind: &str) -> bool {
        ["fib", "mcq", "tf"].contains(&kind)
    }

    async fn synthesize(
        &self,
        request: SynthesisRequest,
    ) -> Result<Vec<GeneratedItem>, SynthesisError> {
        self.seen.lock().unwrap().push(request.clone());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        // Yield so sibling workers get a chance to overlap.
        tokio::time::sleep(Duration::from_millis(10)).await;

        let result = match self.behavior(&request.kind) {
            Behavior::Succeed => Ok(items_for(&request, request.count)),
            Behavior::Fail => Err(SynthesisError::Failed("model refused".into())),
            Behavior::Panic => panic!("synthesizer blew up on {}", request.kind),
            Behavior::Slow(delay) => {
                tokio::time::sleep(delay).await;
                Ok(items_for(&request, request.count))
            }
            Behavior::WrongCount(n) => Ok(items_for(&request, n)),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if result.is_ok() {
            self.completed.lock().unwrap().push(request.kind.clone());
        }
        result
    }
}
