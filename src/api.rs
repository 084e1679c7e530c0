//! HTTP JSON API over the analyzer.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::analyzer::{AnalysisMode, Analyzer};
use crate::error::AnalysisError;
use crate::models::{Batch, BatchSummary, Keyword, ScoreDistribution, Sentiment, SentimentResult};
use crate::scheduler::Scheduler;
use crate::state::StateSnapshot;

#[derive(OpenApi)]
#[openapi(
    paths(
        analyze,
        create_batch,
        list_results,
        list_batches,
        batch_results,
        delete_result,
        delete_batch,
        clear_all,
        get_state,
        get_progress
    ),
    components(
        schemas(
            AnalyzeRequest,
            BatchRequest,
            StateResponse,
            ErrorResponse,
            SentimentResult,
            Batch,
            BatchSummary,
            Keyword,
            ScoreDistribution,
            Sentiment,
            StateSnapshot,
            AnalysisMode
        )
    ),
    tags(
        (name = "analysis", description = "Sentiment analysis"),
        (name = "store", description = "Stored results and batches")
    )
)]
pub struct ApiDoc;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/analyze", post(analyze))
        .route("/batches", post(create_batch).get(list_batches))
        .route("/batches/:batch_id", delete(delete_batch))
        .route("/batches/:batch_id/results", get(batch_results))
        .route("/results", get(list_results))
        .route("/results/:result_id", delete(delete_result))
        .route("/data", delete(clear_all))
        .route("/state", get(get_state))
        .route("/progress", get(get_progress))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub struct AppState {
    pub analyzer: Mutex<Analyzer>,
    pub progress: watch::Receiver<StateSnapshot>,
    pub mode: AnalysisMode,
    pub scheduler: Option<Scheduler>,
}

impl AppState {
    pub fn new(analyzer: Analyzer) -> Self {
        let progress = analyzer.subscribe();
        let mode = analyzer.mode();
        let scheduler = analyzer.scheduler().cloned();
        Self { analyzer: Mutex::new(analyzer), progress, mode, scheduler }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    #[schema(example = "This is an amazing and wonderful product")]
    pub text: String,
    #[serde(default)]
    pub use_simulation: bool,
}

#[derive(Deserialize, ToSchema)]
pub struct BatchRequest {
    #[schema(example = "product reviews")]
    pub name: String,
    pub texts: Vec<String>,
    #[serde(default)]
    pub use_simulation: bool,
}

#[derive(Serialize, ToSchema)]
pub struct StateResponse {
    pub mode: AnalysisMode,
    /// Live requests queued or in flight
    pub pending_requests: usize,
    #[serde(flatten)]
    pub state: StateSnapshot,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let status = match &self {
            AnalysisError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AnalysisError::Auth { .. } => StatusCode::UNAUTHORIZED,
            AnalysisError::RateLimit => StatusCode::TOO_MANY_REQUESTS,
            AnalysisError::ModelLoading { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AnalysisError::ModelUnavailable { .. }
            | AnalysisError::ResponseFormat(_)
            | AnalysisError::Network(_)
            | AnalysisError::Request { .. } => StatusCode::BAD_GATEWAY,
            AnalysisError::Configuration(_)
            | AnalysisError::Storage(_)
            | AnalysisError::SchedulerClosed => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

/// Analyze a single text
#[utoipa::path(
    post,
    path = "/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Analysis result", body = SentimentResult),
        (status = 400, description = "Empty text", body = ErrorResponse),
        (status = 503, description = "Remote model is loading", body = ErrorResponse)
    ),
    tag = "analysis"
)]
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<SentimentResult>, AnalysisError> {
    let mut analyzer = state.analyzer.lock().await;
    analyzer.analyze_one(&req.text, req.use_simulation).await.map(Json)
}

/// Analyze a named batch of texts, one at a time
#[utoipa::path(
    post,
    path = "/batches",
    request_body = BatchRequest,
    responses(
        (status = 200, description = "Completed batch", body = Batch),
        (status = 400, description = "No non-blank texts", body = ErrorResponse)
    ),
    tag = "analysis"
)]
pub async fn create_batch(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<Batch>, AnalysisError> {
    let mut analyzer = state.analyzer.lock().await;
    analyzer
        .analyze_batch(req.texts.as_slice(), &req.name, req.use_simulation)
        .await
        .map(Json)
}

/// List stored results, most recent first
#[utoipa::path(get, path = "/results", responses((status = 200, description = "Stored results", body = [SentimentResult])), tag = "store")]
pub async fn list_results(State(state): State<Arc<AppState>>) -> Json<Vec<SentimentResult>> {
    let analyzer = state.analyzer.lock().await;
    Json(analyzer.state().results.clone())
}

/// List stored batches, most recent first
#[utoipa::path(get, path = "/batches", responses((status = 200, description = "Stored batches", body = [Batch])), tag = "store")]
pub async fn list_batches(State(state): State<Arc<AppState>>) -> Json<Vec<Batch>> {
    let analyzer = state.analyzer.lock().await;
    Json(analyzer.state().batches.clone())
}

/// Member results of a batch, in processing order
#[utoipa::path(
    get,
    path = "/batches/{batch_id}/results",
    params(("batch_id" = String, Path, description = "Batch ID")),
    responses(
        (status = 200, description = "Member results", body = [SentimentResult]),
        (status = 404, description = "Unknown batch")
    ),
    tag = "store"
)]
pub async fn batch_results(
    State(state): State<Arc<AppState>>,
    Path(batch_id): Path<String>,
) -> Result<Json<Vec<SentimentResult>>, StatusCode> {
    let analyzer = state.analyzer.lock().await;
    analyzer
        .state()
        .batch_results(&batch_id)
        .map(|results| Json(results.into_iter().cloned().collect()))
        .ok_or(StatusCode::NOT_FOUND)
}

/// Delete one result
#[utoipa::path(
    delete,
    path = "/results/{result_id}",
    params(("result_id" = String, Path, description = "Result ID")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not found")),
    tag = "store"
)]
pub async fn delete_result(
    State(state): State<Arc<AppState>>,
    Path(result_id): Path<String>,
) -> Result<StatusCode, AnalysisError> {
    let mut analyzer = state.analyzer.lock().await;
    Ok(if analyzer.delete_result(&result_id)? {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    })
}

/// Delete a batch and its member results
#[utoipa::path(
    delete,
    path = "/batches/{batch_id}",
    params(("batch_id" = String, Path, description = "Batch ID")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not found")),
    tag = "store"
)]
pub async fn delete_batch(
    State(state): State<Arc<AppState>>,
    Path(batch_id): Path<String>,
) -> Result<StatusCode, AnalysisError> {
    let mut analyzer = state.analyzer.lock().await;
    Ok(if analyzer.delete_batch(&batch_id)? {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    })
}

/// Wipe all results, batches and persisted files
#[utoipa::path(delete, path = "/data", responses((status = 204, description = "Cleared")), tag = "store")]
pub async fn clear_all(State(state): State<Arc<AppState>>) -> Result<StatusCode, AnalysisError> {
    state.analyzer.lock().await.clear_all()?;
    Ok(StatusCode::NO_CONTENT)
}

/// State summary with the live queue length; readable while a batch is running
#[utoipa::path(get, path = "/state", responses((status = 200, description = "State summary", body = StateResponse)), tag = "analysis")]
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    Json(StateResponse {
        mode: state.mode,
        pending_requests: state.scheduler.as_ref().map_or(0, Scheduler::pending),
        state: state.progress.borrow().clone(),
    })
}

/// Latest progress snapshot; readable while a batch is running
#[utoipa::path(get, path = "/progress", responses((status = 200, description = "Progress snapshot", body = StateSnapshot)), tag = "analysis")]
pub async fn get_progress(State(state): State<Arc<AppState>>) -> Json<StateSnapshot> {
    Json(state.progress.borrow().clone())
}
