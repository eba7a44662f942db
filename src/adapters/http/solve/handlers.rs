//! HTTP handlers for the solving endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use super::dto::{
    DebugRequest, ErrorResponse, ExtractRequest, GenerateRequest, HealthResponse, McqRequest,
};
use crate::application::handlers::solve::{
    AnswerMcqCommand, AnswerMcqHandler, DebugSolutionCommand, DebugSolutionHandler,
    ExtractProblemCommand, ExtractProblemHandler, GenerateSolutionCommand,
    GenerateSolutionHandler, SolveError,
};
use crate::config::{AiConfig, FlowSettings};
use crate::domain::normalization::{ExtractRecord, McqAnswerRecord, SolutionRecord};
use crate::ports::{AIError, AIProvider, OcrEngine};

/// Header carrying the per-request trace id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub type ApiError = (StatusCode, Json<ErrorResponse>);

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Per-flow generation settings.
#[derive(Debug, Clone, Default)]
pub struct FlowSettingsSet {
    pub extract: FlowSettings,
    pub generate: FlowSettings,
    pub debug: FlowSettings,
    pub mcq: FlowSettings,
}

impl From<&AiConfig> for FlowSettingsSet {
    fn from(config: &AiConfig) -> Self {
        Self {
            extract: config.extract.clone(),
            generate: config.generate.clone(),
            debug: config.debug.clone(),
            mcq: config.mcq.clone(),
        }
    }
}

/// Shared state for the solving routes.
#[derive(Clone)]
pub struct SolveAppState {
    pub ai_provider: Arc<dyn AIProvider>,
    pub ocr: Arc<dyn OcrEngine>,
    pub flows: Arc<FlowSettingsSet>,
}

impl SolveAppState {
    pub fn new(
        ai_provider: Arc<dyn AIProvider>,
        ocr: Arc<dyn OcrEngine>,
        flows: FlowSettingsSet,
    ) -> Self {
        Self {
            ai_provider,
            ocr,
            flows: Arc::new(flows),
        }
    }

    pub fn extract_handler(&self) -> ExtractProblemHandler {
        ExtractProblemHandler::new(
            self.ai_provider.clone(),
            self.ocr.clone(),
            self.flows.extract.clone(),
        )
    }

    pub fn generate_handler(&self) -> GenerateSolutionHandler {
        GenerateSolutionHandler::new(
            self.ai_provider.clone(),
            self.ocr.clone(),
            self.flows.generate.clone(),
        )
    }

    pub fn debug_handler(&self) -> DebugSolutionHandler {
        DebugSolutionHandler::new(
            self.ai_provider.clone(),
            self.ocr.clone(),
            self.flows.debug.clone(),
        )
    }

    pub fn mcq_handler(&self) -> AnswerMcqHandler {
        AnswerMcqHandler::new(
            self.ai_provider.clone(),
            self.ocr.clone(),
            self.flows.mcq.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/extract
pub async fn extract_problem(
    State(state): State<SolveAppState>,
    headers: HeaderMap,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<ExtractRecord>, ApiError> {
    let Json(req) = payload.map_err(rejection_response)?;
    let trace_id = trace_id(&headers);
    tracing::info!(
        trace_id = %trace_id,
        images = req.image_data_list.len(),
        "handling extract request"
    );

    let cmd = ExtractProblemCommand {
        images: req.image_data_list,
        text: req.text,
        trace_id,
    };

    state
        .extract_handler()
        .handle(cmd)
        .await
        .map(Json)
        .map_err(error_response)
}

/// POST /api/generate
pub async fn generate_solution(
    State(state): State<SolveAppState>,
    headers: HeaderMap,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<SolutionRecord>, ApiError> {
    let Json(req) = payload.map_err(rejection_response)?;
    let trace_id = trace_id(&headers);
    tracing::info!(
        trace_id = %trace_id,
        language = req.language.as_deref().unwrap_or("default"),
        "handling generate request"
    );

    let cmd = GenerateSolutionCommand {
        problem: req.problem_info,
        language: req.language,
        trace_id,
    };

    state
        .generate_handler()
        .handle(cmd)
        .await
        .map(Json)
        .map_err(error_response)
}

/// POST /api/debug
pub async fn debug_solution(
    State(state): State<SolveAppState>,
    headers: HeaderMap,
    payload: Result<Json<DebugRequest>, JsonRejection>,
) -> Result<Json<SolutionRecord>, ApiError> {
    let Json(req) = payload.map_err(rejection_response)?;
    let trace_id = trace_id(&headers);
    tracing::info!(
        trace_id = %trace_id,
        images = req.image_data_list.len(),
        "handling debug request"
    );

    let cmd = DebugSolutionCommand {
        problem: req.problem_info,
        images: req.image_data_list,
        language: req.language,
        trace_id,
    };

    state
        .debug_handler()
        .handle(cmd)
        .await
        .map(Json)
        .map_err(error_response)
}

/// POST /api/mcq
pub async fn answer_mcq(
    State(state): State<SolveAppState>,
    headers: HeaderMap,
    payload: Result<Json<McqRequest>, JsonRejection>,
) -> Result<Json<McqAnswerRecord>, ApiError> {
    let Json(req) = payload.map_err(rejection_response)?;
    let trace_id = trace_id(&headers);
    tracing::info!(
        trace_id = %trace_id,
        images = req.image_data_list.len(),
        "handling mcq request"
    );

    let cmd = AnswerMcqCommand {
        images: req.image_data_list,
        text: req.text,
        trace_id,
    };

    state
        .mcq_handler()
        .handle(cmd)
        .await
        .map(Json)
        .map_err(error_response)
}

/// GET /health
pub async fn health(State(state): State<SolveAppState>) -> Json<HealthResponse> {
    let info = state.ai_provider.provider_info();
    Json(HealthResponse {
        status: "ok".to_string(),
        provider: info.name,
        model: info.model,
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════════

/// Request id set by the request-id layer, or a fresh one when called directly.
fn trace_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// Malformed bodies are 400s; oversized ones keep their 413.
fn rejection_response(rejection: JsonRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(ErrorResponse::payload_too_large(rejection.body_text())),
        );
    }
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request(rejection.body_text())),
    )
}

/// Maps a solving failure to its HTTP status and error body.
pub fn error_response(err: SolveError) -> ApiError {
    let message = err.to_string();
    match err {
        SolveError::InvalidInput(_) | SolveError::Image { .. } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(message)),
        ),
        SolveError::Ocr(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::ocr_failed(message)),
        ),
        SolveError::Upstream(AIError::AuthenticationFailed) => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::invalid_api_key()),
        ),
        SolveError::Upstream(AIError::RateLimited { retry_after_secs }) => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse::rate_limited(retry_after_secs)),
        ),
        SolveError::Upstream(AIError::Timeout { .. }) => (
            StatusCode::GATEWAY_TIMEOUT,
            Json(ErrorResponse::upstream_timeout(message)),
        ),
        SolveError::Upstream(_) => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse::upstream_error(message)),
        ),
    }
}
