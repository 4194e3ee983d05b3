//! The generation pipeline.
//!
//! validate → allocate → group → fetch context (once) → fan out → assemble,
//! with an audit record at the start and end of every request.

use std::sync::Arc;
use std::time::Instant;

use quizgen_audit::AuditTrail;
use quizgen_config::AppConfig;
use quizgen_core::audit::{AuditEvent, AuditRecord};
use quizgen_core::context::ContextProvider;
use quizgen_core::error::{ContextError, GenerationError, Result};
use quizgen_core::request::{GenerationRequest, GenerationResponse, Status};
use quizgen_core::synthesis::Synthesizer;
use quizgen_quota::{allocate, group_by_kind};
use quizgen_synthesis::TemplateSynthesizer;
use tracing::{debug, info, warn};

use crate::assemble::assemble;
use crate::fanout::{FanOutOrchestrator, RequestScope};

pub const DEFAULT_MAX_TOTAL_ITEMS: usize = 500;

/// Runs generation requests end to end.
///
/// Holds the process-wide collaborators; build it once and share it.
pub struct GenerationService {
    context: Arc<dyn ContextProvider>,
    orchestrator: FanOutOrchestrator,
    audit: AuditTrail,
    max_total_items: usize,
}

impl std::fmt::Debug for GenerationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationService")
            .field("context", &self.context.name())
            .field("orchestrator", &self.orchestrator)
            .field("audit", &self.audit)
            .field("max_total_items", &self.max_total_items)
            .finish()
    }
}

impl GenerationService {
    pub fn new(
        context: Arc<dyn ContextProvider>,
        synthesizer: Arc<dyn Synthesizer>,
        audit: AuditTrail,
    ) -> Self {
        Self {
            context,
            orchestrator: FanOutOrchestrator::new(synthesizer),
            audit,
            max_total_items: DEFAULT_MAX_TOTAL_ITEMS,
        }
    }

    /// Build the service from configuration, with the built-in template
    /// synthesizer.
    pub fn from_config(config: &AppConfig) -> std::result::Result<Self, ContextError> {
        let context = quizgen_context::build_from_config(&config.context)?;
        let audit = quizgen_audit::build_from_config(&config.audit);
        Ok(Self::new(context, Arc::new(TemplateSynthesizer::new()), audit)
            .with_max_workers(config.generation.max_workers)
            .with_max_total_items(config.generation.max_total_items))
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.orchestrator = self.orchestrator.with_max_workers(max_workers);
        self
    }

    pub fn with_max_total_items(mut self, max_total_items: usize) -> Self {
        self.max_total_items = max_total_items;
        self
    }

    pub fn context_name(&self) -> &str {
        self.context.name()
    }

    pub fn synthesizer_name(&self) -> &str {
        self.orchestrator.synthesizer().name()
    }

    /// Reject requests the pipeline cannot serve.
    ///
    /// Distribution problems are left to the allocator, which reports them
    /// per axis.
    pub fn validate(&self, request: &GenerationRequest) -> Result<()> {
        if request.content_locator.trim().is_empty() {
            return Err(GenerationError::InvalidRequest(
                "contentLocator must not be empty".into(),
            ));
        }
        if request.total_count > self.max_total_items {
            return Err(GenerationError::InvalidRequest(format!(
                "totalCount {} exceeds the limit of {}",
                request.total_count, self.max_total_items
            )));
        }
        let synthesizer = self.orchestrator.synthesizer();
        if let Some((kind, _)) = request
            .kind_distribution
            .iter()
            .find(|(kind, weight)| *weight > 0.0 && !synthesizer.supports(kind))
        {
            return Err(GenerationError::InvalidRequest(format!(
                "unsupported item kind '{kind}'"
            )));
        }
        Ok(())
    }

    /// Run one request and write its audit trail.
    pub async fn generate(
        &self,
        source_id: &str,
        request: GenerationRequest,
    ) -> Result<GenerationResponse> {
        let started = Instant::now();
        let session_id = request
            .session_id
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        info!(
            session_id = %session_id,
            source_id,
            locator = %request.content_locator,
            total = request.total_count,
            "Generation request received"
        );
        self.audit
            .record(AuditRecord::new(
                &session_id,
                source_id,
                AuditEvent::RequestReceived {
                    request: request.clone(),
                },
            ))
            .await;

        let outcome = self.run(&session_id, source_id, &request).await;

        match &outcome {
            Ok(response) => {
                self.record_success(&session_id, source_id, response).await;
                info!(
                    session_id = %session_id,
                    items = response.result.total_items(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Generation complete"
                );
            }
            Err(e) => {
                self.audit
                    .record(AuditRecord::new(
                        &session_id,
                        source_id,
                        AuditEvent::Outcome {
                            status: Status::Error,
                            artifact_names: Vec::new(),
                            error_code: Some(e.code().to_string()),
                            error: Some(e.to_string()),
                        },
                    ))
                    .await;
                warn!(
                    session_id = %session_id,
                    error = %e,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Generation failed"
                );
            }
        }

        outcome
    }

    async fn run(
        &self,
        session_id: &str,
        source_id: &str,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse> {
        self.validate(request)?;

        let quotas = allocate(
            request.total_count,
            &request.kind_distribution,
            &request.difficulty_distribution,
            &request.level_distribution,
        )?;
        let groups = group_by_kind(&quotas, request.total_count)?;
        debug!(
            combinations = quotas.len(),
            kinds = groups.len(),
            "Allocation ready"
        );

        let objectives = request.objectives();
        let scope = RequestScope::from_request(request)?;
        let results = if groups.is_empty() {
            Vec::new()
        } else {
            let fetch_started = Instant::now();
            let context = self
                .context
                .fetch(&request.content_locator, objectives)
                .await?;
            info!(
                provider = self.context.name(),
                chars = context.char_len(),
                truncated = context.truncated,
                elapsed_ms = fetch_started.elapsed().as_millis() as u64,
                "Shared context ready"
            );

            let fan_started = Instant::now();
            let results = self
                .orchestrator
                .run(&groups, Arc::new(context), &scope)
                .await?;
            info!(
                elapsed_ms = fan_started.elapsed().as_millis() as u64,
                "Fan-out complete"
            );
            results
        };

        let result = assemble(&groups, results, request.total_count)?;

        Ok(GenerationResponse {
            status: Status::Success,
            message: format!(
                "Successfully generated {} items across {} kinds",
                result.total_items(),
                result.items_by_kind.len()
            ),
            session_id: session_id.to_string(),
            source_id: source_id.to_string(),
            content_locator: request.content_locator.clone(),
            objective_filter: objectives.cloned(),
            total_count: request.total_count,
            kind_distribution: request.kind_distribution.clone(),
            difficulty_distribution: request.difficulty_distribution.clone(),
            level_distribution: request.level_distribution.clone(),
            result,
        })
    }

    async fn record_success(&self, session_id: &str, source_id: &str, response: &GenerationResponse) {
        let names = response.result.artifact_names.clone();
        self.audit
            .record(AuditRecord::new(
                session_id,
                source_id,
                AuditEvent::Outcome {
                    status: Status::Success,
                    artifact_names: names.clone(),
                    error_code: None,
                    error: None,
                },
            ))
            .await;

        for (kind, items) in &response.result.items_by_kind {
            for (index, item) in items.iter().enumerate() {
                self.audit
                    .record(AuditRecord::new(
                        session_id,
                        source_id,
                        AuditEvent::ItemGenerated {
                            kind: kind.clone(),
                            index,
                            item: item.clone(),
                        },
                    ))
                    .await;
            }
        }

        self.audit
            .record(AuditRecord::new(
                session_id,
                source_id,
                AuditEvent::ResponseSent {
                    total_count: response.result.total_items(),
                    kinds: response.result.items_by_kind.keys().cloned().collect(),
                    artifact_names: names,
                },
            ))
            .await;
    }
}
