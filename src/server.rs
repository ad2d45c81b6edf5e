use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::analysis::{benchmark_tender, compute_metrics, AnalysisMetrics, HistoricalComparison};
use crate::config::Config;
use crate::criteria::{CriteriaWeights, ScoringWeights};
use crate::error::TenderError;
use crate::ingestion::{import_tender, AnalysisService, AnalyzeRequest, HttpAnalysisService};
use crate::optimizer::{optimize_with, OptimizationResult};
use crate::scoring::{score_batch, ScoredTender};
use crate::types::TenderOffer;
use crate::workset::TenderSet;

#[derive(Clone)]
pub struct ApiState {
    config: Config,
    analysis: Arc<dyn AnalysisService>,
}

impl ApiState {
    pub fn new(config: Config, analysis: Arc<dyn AnalysisService>) -> Self {
        Self { config, analysis }
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let service = HttpAnalysisService::new(&config.analysis_service)
            .context("failed to configure analysis service client")?;
        Ok(Self::new(config, Arc::new(service)))
    }
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<TenderError> for ApiError {
    fn from(error: TenderError) -> Self {
        let status = match &error {
            TenderError::UnknownTender(_) => StatusCode::NOT_FOUND,
            TenderError::ExternalSource(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::BAD_REQUEST,
        };
        if !error.is_input_error() {
            warn!("request failed upstream: {error}");
        }
        Self {
            status,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Clone, Default, Deserialize)]
struct BatchRequest {
    #[serde(default)]
    tenders: Vec<TenderOffer>,
    weights: Option<ScoringWeights>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct OptimizeRequest {
    #[serde(flatten)]
    batch: BatchRequest,
    criteria: Option<CriteriaWeights>,
}

#[derive(Debug, Clone, Deserialize)]
struct BenchmarkRequest {
    tender_id: String,
    #[serde(default)]
    tenders: Vec<TenderOffer>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct ScoreResponse {
    scored_tenders: Vec<ScoredTender>,
}

pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/v1/config", get(show_config))
        .route("/v1/score", post(score))
        .route("/v1/optimize", post(optimize))
        .route("/v1/analysis", post(analysis))
        .route("/v1/benchmark", post(benchmark))
        .route("/v1/import", post(import))
        .layer(cors)
        .with_state(state)
}

pub async fn run_server(config: Config, bind: SocketAddr) -> Result<()> {
    let state = ApiState::from_config(config)?;
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health() -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn show_config(State(state): State<ApiState>) -> Json<ApiResponse<Config>> {
    ok(state.config)
}

async fn score(
    State(state): State<ApiState>,
    Json(request): Json<BatchRequest>,
) -> ApiResult<ScoreResponse> {
    let set = tender_set(request.tenders)?;
    let weights = request.weights.unwrap_or(state.config.scoring);
    let mut scored_tenders = score_batch(set.tenders(), &weights)?;
    scored_tenders.sort_by(|a, b| b.total_score().total_cmp(&a.total_score()));
    Ok(ok(ScoreResponse { scored_tenders }))
}

async fn optimize(
    State(state): State<ApiState>,
    Json(request): Json<OptimizeRequest>,
) -> ApiResult<OptimizationResult> {
    let set = tender_set(request.batch.tenders)?;
    let criteria = request.criteria.unwrap_or(state.config.criteria);
    let weights = request.batch.weights.unwrap_or(state.config.scoring);
    Ok(ok(optimize_with(set.tenders(), &criteria, &weights)?))
}

async fn analysis(Json(request): Json<BatchRequest>) -> ApiResult<AnalysisMetrics> {
    let set = tender_set(request.tenders)?;
    Ok(ok(compute_metrics(set.tenders())?))
}

async fn benchmark(Json(request): Json<BenchmarkRequest>) -> ApiResult<HistoricalComparison> {
    let set = tender_set(request.tenders)?;
    let tender = set
        .get(&request.tender_id)
        .ok_or_else(|| TenderError::UnknownTender(request.tender_id.clone()))?;
    Ok(ok(benchmark_tender(tender)?))
}

async fn import(
    State(state): State<ApiState>,
    Json(request): Json<AnalyzeRequest>,
) -> ApiResult<TenderOffer> {
    if request.title.trim().is_empty() {
        return Err(ApiError::bad_request("title is required"));
    }
    let offer = import_tender(state.analysis.as_ref(), &request).await?;
    Ok(ok(offer))
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}

fn tender_set(tenders: Vec<TenderOffer>) -> std::result::Result<TenderSet, ApiError> {
    if tenders.is_empty() {
        return Err(TenderError::EmptyBatch.into());
    }
    Ok(TenderSet::from_tenders(tenders)?)
}
