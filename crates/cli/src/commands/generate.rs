//! `quizgen generate`: Run one request through the pipeline and print the result.

use std::path::PathBuf;

use quizgen_config::AppConfig;
use quizgen_core::request::GenerationRequest;
use quizgen_orchestrator::GenerationService;

pub async fn run(
    request_path: Option<PathBuf>,
    source_id: &str,
    locator: Option<String>,
    total: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let body = match &request_path {
        Some(path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| format!("Failed to read {}: {e}", path.display()))?,
        ),
        None => None,
    };
    let request = build_request(body.as_deref(), locator, total)?;

    let service = GenerationService::from_config(&config)?;
    tracing::debug!(service = ?service, "Service built");

    let response = service.generate(source_id, request).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// Combine an optional JSON request body with command-line overrides.
///
/// Without a body the request starts from the default mix; a locator is then
/// mandatory.
pub fn build_request(
    body: Option<&str>,
    locator: Option<String>,
    total: Option<usize>,
) -> Result<GenerationRequest, String> {
    let mut request = match body {
        Some(json) => serde_json::from_str::<GenerationRequest>(json)
            .map_err(|e| format!("Invalid request JSON: {e}"))?,
        None => {
            let locator = locator
                .clone()
                .ok_or("either --request or --locator is required")?;
            GenerationRequest::new(locator, 10)
        }
    };

    if let Some(locator) = locator {
        request.content_locator = locator;
    }
    if let Some(total) = total {
        request.total_count = total;
    }
    Ok(request)
}
