//! HTTP API gateway for quizgen.
//!
//! Exposes the question-bank generation endpoint plus banner and health
//! routes. Built on Axum; every request goes through the shared
//! [`GenerationService`].

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Path};
use axum::{
    Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode},
    response::Json,
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use quizgen_config::{AppConfig, GatewayConfig};
use quizgen_core::error::GenerationError;
use quizgen_core::request::{GenerationRequest, GenerationResponse, Status};
use quizgen_orchestrator::GenerationService;

/// Path of the generation endpoint.
pub const GENERATE_PATH: &str = "/questionBankService/source/{source_id}/questions/generate";

/// Shared application state for the gateway.
pub struct GatewayState {
    pub service: Arc<GenerationService>,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
///
/// Layers applied:
/// - CORS (any origin when `allowed_origins` contains `"*"`)
/// - Request body size limit
/// - HTTP trace logging
pub fn build_router(state: SharedState, config: &GatewayConfig) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route(GENERATE_PATH, post(generate_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors_layer(&config.allowed_origins))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    if allowed_origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}

/// Start the gateway HTTP server.
///
/// Builds the generation service (context provider, synthesizer, audit trail)
/// once and shares it across all requests.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let service = GenerationService::from_config(&config)?;
    info!(
        context = service.context_name(),
        synthesizer = service.synthesizer_name(),
        "Generation service ready"
    );

    let state = Arc::new(GatewayState {
        service: Arc::new(service),
    });
    let app = build_router(state, &config.gateway);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Error mapping ---

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: Status,
    pub message: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn status_for(error: &GenerationError) -> StatusCode {
    match error {
        GenerationError::InvalidDistribution { .. } | GenerationError::InvalidRequest(_) => {
            StatusCode::BAD_REQUEST
        }
        GenerationError::ContextUnavailable(_) => StatusCode::BAD_GATEWAY,
        GenerationError::Synthesis { .. }
        | GenerationError::CountMismatch { .. }
        | GenerationError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn api_error(status: StatusCode, message: String) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            status: Status::Error,
            message,
        }),
    )
}

// --- Handlers ---

#[derive(Serialize)]
struct BannerResponse {
    service: &'static str,
    version: &'static str,
    endpoints: Vec<&'static str>,
}

async fn root_handler() -> Json<BannerResponse> {
    Json(BannerResponse {
        service: "quizgen question generation service",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: vec!["GET /health", "POST /questionBankService/source/{sourceId}/questions/generate"],
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    features: Vec<String>,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        features: vec![
            "largest_remainder_allocation".into(),
            "parallel_generation".into(),
            "shared_context".into(),
            format!("context:{}", state.service.context_name()),
            format!("synthesizer:{}", state.service.synthesizer_name()),
        ],
    })
}

async fn generate_handler(
    State(state): State<SharedState>,
    Path(source_id): Path<String>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<GenerationResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        warn!(source_id = %source_id, error = %e, "Rejected malformed generation request");
        api_error(StatusCode::BAD_REQUEST, e.body_text())
    })?;

    match state.service.generate(&source_id, request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                tracing::error!(source_id = %source_id, code = e.code(), error = %e, "Generation failed");
            }
            Err(api_error(status, e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use quizgen_audit::AuditTrail;
    use quizgen_context::StaticContextProvider;
    use quizgen_core::error::ContextError;
    use quizgen_synthesis::TemplateSynthesizer;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const TEXT: &str = "Enzymes lower the activation energy of reactions. \
        Temperature changes alter enzyme shape and activity. \
        Competitive inhibitors bind the active site directly.";

    fn test_app() -> Router {
        let service = GenerationService::new(
            Arc::new(StaticContextProvider::new(TEXT)),
            Arc::new(TemplateSynthesizer::new()),
            AuditTrail::disabled(),
        );
        let state = Arc::new(GatewayState {
            service: Arc::new(service),
        });
        build_router(state, &GatewayConfig::default())
    }

    fn generate_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/questionBankService/source/dev_app/questions/generate")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert!(json["features"].as_array().unwrap().len() >= 3);
    }

    #[tokio::test]
    async fn root_banner() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = test_app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["version"].is_string());
    }

    #[tokio::test]
    async fn generate_ten_items() {
        let response = test_app()
            .oneshot(generate_request(json!({
                "contentLocator": "bio_ch07",
                "totalCount": 10
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "success");
        assert_eq!(json["sourceId"], "dev_app");
        assert_eq!(json["artifactNames"].as_array().unwrap().len(), 3);
        let total: usize = json["itemsByKind"]
            .as_object()
            .unwrap()
            .values()
            .map(|v| v.as_array().unwrap().len())
            .sum();
        assert_eq!(total, 10);
    }

    #[tokio::test]
    async fn legacy_body_accepted() {
        let response = test_app()
            .oneshot(generate_request(json!({
                "chapter_id": "bio_ch07",
                "total_questions": 3,
                "question_type_distribution": { "tf": 1.0 }
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["itemsByKind"]["tf"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn invalid_distribution_is_400() {
        let response = test_app()
            .oneshot(generate_request(json!({
                "contentLocator": "bio_ch07",
                "difficultyDistribution": { "basic": 0.0 }
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["status"], "error");
        assert!(json["message"].as_str().unwrap().contains("difficulty"));
    }

    #[tokio::test]
    async fn malformed_body_is_400() {
        let req = Request::builder()
            .method("POST")
            .uri("/questionBankService/source/dev_app/questions/generate")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = test_app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["status"], "error");
    }

    #[tokio::test]
    async fn empty_context_is_502() {
        let service = GenerationService::new(
            Arc::new(StaticContextProvider::new("")),
            Arc::new(TemplateSynthesizer::new()),
            AuditTrail::disabled(),
        );
        let app = build_router(
            Arc::new(GatewayState {
                service: Arc::new(service),
            }),
            &GatewayConfig::default(),
        );
        let response = app
            .oneshot(generate_request(json!({ "contentLocator": "ch01" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn error_status_mapping() {
        assert_eq!(
            status_for(&GenerationError::InvalidRequest("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&GenerationError::ContextUnavailable(ContextError::EmptyLocator)),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&GenerationError::CountMismatch {
                kind: "*".into(),
                expected: 1,
                actual: 0
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn explicit_cors_origin() {
        let config = GatewayConfig {
            allowed_origins: vec!["http://localhost:3000".into()],
            ..GatewayConfig::default()
        };
        let service = GenerationService::new(
            Arc::new(StaticContextProvider::new(TEXT)),
            Arc::new(TemplateSynthesizer::new()),
            AuditTrail::disabled(),
        );
        let app = build_router(
            Arc::new(GatewayState {
                service: Arc::new(service),
            }),
            &config,
        );
        let req = Request::builder()
            .uri("/health")
            .header("origin", "http://localhost:3000")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://localhost:3000"
        );
    }
}
