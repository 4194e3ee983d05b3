//! Fan-out over kinds.
//!
//! One tokio task per kind, at most `max_workers` running at once. The first
//! failure wins: the remaining tasks are aborted and their output dropped.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use quizgen_core::context::SharedContext;
use quizgen_core::distribution::{Axis, Distribution};
use quizgen_core::error::{GenerationError, Result, SynthesisError};
use quizgen_core::quota::KindQuota;
use quizgen_core::request::{GenerationRequest, ObjectiveFilter};
use quizgen_core::synthesis::{GeneratedItem, SynthesisRequest, Synthesizer, WorkerResult};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::naming::artifact_name;

pub const DEFAULT_MAX_WORKERS: usize = 3;

/// Request-level inputs shared by every worker of one request.
///
/// Artifact names are derived from these, never from a kind's allocated
/// counts, so a name depends only on what the caller declared.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestScope {
    pub content_locator: String,
    /// Declared difficulty distribution, normalized.
    pub difficulty_distribution: Distribution,
    /// Declared cognitive-level distribution, normalized.
    pub level_distribution: Distribution,
    pub objectives: Option<ObjectiveFilter>,
}

impl RequestScope {
    pub fn from_request(request: &GenerationRequest) -> Result<Self> {
        Ok(Self {
            content_locator: request.content_locator.clone(),
            difficulty_distribution: request.difficulty_distribution.normalized(Axis::Difficulty)?,
            level_distribution: request.level_distribution.normalized(Axis::Level)?,
            objectives: request.objectives().cloned(),
        })
    }

    /// Artifact name for `kind` within this request.
    pub fn artifact_name(&self, kind: &str) -> String {
        artifact_name(
            &self.content_locator,
            &self.difficulty_distribution,
            &self.level_distribution,
            self.objectives.as_ref(),
            kind,
        )
    }
}

/// Runs one synthesis worker per [`KindQuota`].
#[derive(Clone)]
pub struct FanOutOrchestrator {
    synthesizer: Arc<dyn Synthesizer>,
    max_workers: usize,
}

impl std::fmt::Debug for FanOutOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanOutOrchestrator")
            .field("synthesizer", &self.synthesizer.name())
            .field("max_workers", &self.max_workers)
            .finish()
    }
}

impl FanOutOrchestrator {
    pub fn new(synthesizer: Arc<dyn Synthesizer>) -> Self {
        Self {
            synthesizer,
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }

    /// Cap on concurrently running workers (minimum 1).
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    pub fn synthesizer(&self) -> &Arc<dyn Synthesizer> {
        &self.synthesizer
    }

    /// Run every kind and collect the results in canonical kind order.
    ///
    /// All-or-nothing: on the first failure, outstanding workers are aborted
    /// and the error is returned tagged with the failing kind.
    pub async fn run(
        &self,
        groups: &[KindQuota],
        context: Arc<SharedContext>,
        scope: &RequestScope,
    ) -> Result<Vec<WorkerResult>> {
        let permits = Arc::new(Semaphore::new(self.max_workers));
        let mut set = JoinSet::new();

        info!(
            workers = groups.len(),
            max_workers = self.max_workers,
            synthesizer = self.synthesizer.name(),
            "Fanning out"
        );

        for group in groups {
            let request = SynthesisRequest {
                kind: group.kind.clone(),
                context: Arc::clone(&context),
                difficulty_mix: group.difficulty_mix.clone(),
                level_mix: group.level_mix.clone(),
                cells: group.cells(),
                count: group.total,
                content_locator: scope.content_locator.clone(),
                objectives: scope.objectives.clone(),
            };
            let name = scope.artifact_name(&group.kind);
            let synthesizer = Arc::clone(&self.synthesizer);
            let permits = Arc::clone(&permits);

            set.spawn(async move {
                let kind = request.kind.clone();
                let outcome = run_worker(synthesizer, permits, request, name).await;
                (kind, outcome)
            });
        }

        let mut results = Vec::with_capacity(groups.len());
        let mut failure = None;

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((_, Ok(result))) => results.push(result),
                Ok((kind, Err(source))) => {
                    failure = Some(GenerationError::Synthesis { kind, source });
                    break;
                }
                Err(e) if e.is_cancelled() => {}
                Err(e) => {
                    failure = Some(GenerationError::Internal(format!("worker task failed: {e}")));
                    break;
                }
            }
        }

        if let Some(err) = failure {
            let outstanding = set.len();
            set.abort_all();
            while set.join_next().await.is_some() {}
            warn!(error = %err, aborted = outstanding, "Fan-out failed, discarding sibling results");
            return Err(err);
        }

        results.sort_by(|a, b| a.kind.cmp(&b.kind));
        Ok(results)
    }
}

/// One worker: wait for a permit, synthesize, attach the artifact name.
async fn run_worker(
    synthesizer: Arc<dyn Synthesizer>,
    permits: Arc<Semaphore>,
    request: SynthesisRequest,
    name: String,
) -> std::result::Result<WorkerResult, SynthesisError> {
    let _permit = permits
        .acquire_owned()
        .await
        .map_err(|_| SynthesisError::Failed("worker pool closed".into()))?;

    let kind = request.kind.clone();

    let started = Instant::now();
    let items: Vec<GeneratedItem> = match AssertUnwindSafe(synthesizer.synthesize(request))
        .catch_unwind()
        .await
    {
        Ok(result) => result?,
        Err(panic) => return Err(SynthesisError::Panicked(panic_message(&panic))),
    };

    debug!(
        kind = %kind,
        items = items.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Worker finished"
    );

    Ok(WorkerResult {
        kind,
        items,
        artifact_name: name,
    })
}

fn panic_message(panic: &Box<dyn std::any::Any + Send>) -> String {
    panic
        .downcast_ref::<String>()
        .map(|s| s.as_str())
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Behavior, ScriptedSynthesizer};
    use quizgen_core::distribution::Distribution;
    use quizgen_core::quota::Quota;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn group(kind: &str, total: usize) -> KindQuota {
        KindQuota {
            kind: kind.into(),
            quotas: vec![Quota::new(kind, "basic", "remember", total)],
            total,
            difficulty_mix: Distribution::from([("basic", 1.0)]),
            level_mix: Distribution::from([("remember", 1.0)]),
        }
    }

    fn groups() -> Vec<KindQuota> {
        vec![group("fib", 3), group("mcq", 4), group("tf", 3)]
    }

    fn context() -> Arc<SharedContext> {
        Arc::new(SharedContext::new("ch01", "text"))
    }

    fn scope() -> RequestScope {
        RequestScope {
            content_locator: "ch01".into(),
            difficulty_distribution: Distribution::from([("basic", 1.0)]),
            level_distribution: Distribution::from([("remember", 1.0)]),
            objectives: None,
        }
    }

    #[tokio::test]
    async fn all_kinds_succeed_in_canonical_order() {
        // tf finishes first, fib last; output order must not follow completion.
        let synth = Arc::new(ScriptedSynthesizer::new(&[
            ("fib", Behavior::Slow(Duration::from_millis(60))),
            ("mcq", Behavior::Slow(Duration::from_millis(30))),
        ]));
        let orchestrator = FanOutOrchestrator::new(synth.clone());

        let results = orchestrator
            .run(&groups(), context(), &scope())
            .await
            .unwrap();

        let kinds: Vec<&str> = results.iter().map(|r| r.kind.as_str()).collect();
        assert_eq!(kinds, vec!["fib", "mcq", "tf"]);
        assert_eq!(results[1].items.len(), 4);
        assert_eq!(
            results[0].artifact_name,
            "ch01_basic100_remember100_fib.json"
        );
        assert_eq!(synth.completed.lock().unwrap().first().map(String::as_str), Some("tf"));
    }

    #[tokio::test]
    async fn every_worker_shares_one_context() {
        let synth = Arc::new(ScriptedSynthesizer::succeeding());
        let ctx = context();
        FanOutOrchestrator::new(synth.clone())
            .run(&groups(), Arc::clone(&ctx), &scope())
            .await
            .unwrap();

        let seen = synth.seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|r| Arc::ptr_eq(&r.context, &ctx)));
    }

    #[tokio::test]
    async fn one_failure_fails_everything() {
        let synth = Arc::new(ScriptedSynthesizer::new(&[("mcq", Behavior::Fail)]));
        let err = FanOutOrchestrator::new(synth)
            .run(&groups(), context(), &scope())
            .await
            .unwrap_err();

        match err {
            GenerationError::Synthesis { kind, source } => {
                assert_eq!(kind, "mcq");
                assert!(matches!(source, SynthesisError::Failed(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn failure_aborts_slow_siblings() {
        let synth = Arc::new(ScriptedSynthesizer::new(&[
            ("fib", Behavior::Slow(Duration::from_secs(30))),
            ("tf", Behavior::Fail),
        ]));
        let started = Instant::now();
        let result = FanOutOrchestrator::new(synth.clone())
            .run(&groups(), context(), &scope())
            .await;

        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(!synth.completed.lock().unwrap().contains(&"fib".to_string()));
    }

    #[tokio::test]
    async fn panic_becomes_synthesis_error() {
        let synth = Arc::new(ScriptedSynthesizer::new(&[("fib", Behavior::Panic)]));
        let err = FanOutOrchestrator::new(synth)
            .run(&groups(), context(), &scope())
            .await
            .unwrap_err();

        match err {
            GenerationError::Synthesis {
                kind,
                source: SynthesisError::Panicked(msg),
            } => {
                assert_eq!(kind, "fib");
                assert!(msg.contains("blew up"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn concurrency_is_bounded() {
        let many: Vec<KindQuota> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|k| group(k, 1))
            .collect();
        let synth = Arc::new(ScriptedSynthesizer::succeeding());
        // ScriptedSynthesizer only claims fib/mcq/tf, but the orchestrator
        // does not check support; the service does.
        let results = FanOutOrchestrator::new(synth.clone())
            .with_max_workers(2)
            .run(&many, context(), &scope())
            .await
            .unwrap();

        assert_eq!(results.len(), 5);
        assert!(synth.max_in_flight.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn no_groups_no_workers() {
        let synth = Arc::new(ScriptedSynthesizer::succeeding());
        let results = FanOutOrchestrator::new(synth.clone())
            .run(&[], context(), &scope())
            .await
            .unwrap();
        assert!(results.is_empty());
        assert!(synth.seen_kinds().is_empty());
    }

    #[tokio::test]
    async fn names_come_from_the_scope_not_the_kind_mix() {
        // The group's own mix is basic/remember; the declared one differs.
        let scope = RequestScope {
            difficulty_distribution: Distribution::from([("advanced", 0.4), ("basic", 0.6)]),
            ..scope()
        };
        let results = FanOutOrchestrator::new(Arc::new(ScriptedSynthesizer::succeeding()))
            .run(&groups(), context(), &scope)
            .await
            .unwrap();
        assert_eq!(
            results[2].artifact_name,
            "ch01_advanced40_basic60_remember100_tf.json"
        );
    }

    #[test]
    fn scope_normalizes_declared_distributions() {
        let mut request = GenerationRequest::new("ch01", 10);
        request.difficulty_distribution = Distribution::from([("basic", 3.0), ("advanced", 1.0)]);
        let scope = RequestScope::from_request(&request).unwrap();
        assert_eq!(scope.difficulty_distribution.get("basic"), Some(0.75));
        assert_eq!(scope.level_distribution.len(), 3);

        request.level_distribution = Distribution::new();
        assert!(RequestScope::from_request(&request).is_err());
    }

    #[test]
    fn panic_message_variants() {
        let s: Box<dyn std::any::Any + Send> = Box::new("static str");
        assert_eq!(panic_message(&s), "static str");
        let owned: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(&owned), "owned");
        let other: Box<dyn std::any::Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(&other), "unknown panic");
    }
}
