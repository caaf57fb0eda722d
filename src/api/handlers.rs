//! HTTP API handlers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::arbitrage::{self, ArbitrageResult, EvaluationRequest, Opportunity};
use crate::bookmaker::{BookmakerCatalog, BookmakerLimits, BookmakerProfile};
use crate::config::Config;
use crate::error::EngineError;
use crate::market::{EventOdds, Outcome};
use crate::metrics::record_http_latency;

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Whether the service is ready to take requests.
    pub ready: Arc<AtomicBool>,
    /// Bookmaker metadata for limits.
    pub catalog: Arc<BookmakerCatalog>,
    /// Engine defaults.
    pub config: Arc<Config>,
    /// Prometheus render handle, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state.
    pub fn new(config: Config, catalog: BookmakerCatalog) -> Self {
        Self {
            ready: Arc::new(AtomicBool::new(false)),
            catalog: Arc::new(catalog),
            config: Arc::new(config),
            metrics: None,
        }
    }

    /// Create state from configuration, loading the bookmaker catalog it names.
    pub fn from_config(config: Config) -> crate::Result<Self> {
        let catalog = BookmakerCatalog::load_or_builtin(config.bookmakers_file.as_deref())?;
        Ok(Self::new(config, catalog))
    }

    /// Attach a Prometheus handle for `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Set ready state.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Check if ready.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("ready", &self.is_ready())
            .field("bookmakers", &self.catalog.len())
            .field("config", &self.config)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default(), BookmakerCatalog::builtin().clone())
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// Whether service is ready.
    pub ready: bool,
    /// Number of bookmakers loaded.
    pub bookmakers: usize,
}

/// Error body for rejected requests.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

/// Body of `POST /api/v1/evaluate`.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateBody {
    /// Priced outcomes.
    pub outcomes: Vec<Outcome>,
    /// Stake to split; configured default when absent.
    #[serde(default)]
    pub total_stake: Option<Decimal>,
    /// Explicit limits; overrides `use_catalog_limits`.
    #[serde(default)]
    pub limits: Option<Vec<BookmakerLimits>>,
    /// Apply limits from the bookmaker catalog.
    #[serde(default)]
    pub use_catalog_limits: bool,
}

impl EvaluateBody {
    fn into_request(self, state: &AppState) -> EvaluationRequest {
        let total_stake = self.total_stake.unwrap_or(state.config.default_total_stake);
        let limits = match self.limits {
            Some(limits) => limits,
            None if self.use_catalog_limits => state.catalog.limits(),
            None => Vec::new(),
        };
        EvaluationRequest::new(self.outcomes, total_stake).with_limits(limits)
    }
}

/// Successful evaluation response.
#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    /// When the evaluation ran (RFC 3339).
    #[serde(with = "time::serde::rfc3339")]
    pub evaluated_at: OffsetDateTime,
    /// Engine output.
    pub result: ArbitrageResult,
}

/// Body of `POST /api/v1/evaluate/batch`.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchBody {
    /// Independent markets.
    pub requests: Vec<EvaluateBody>,
}

/// One entry of a batch response.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchItem {
    /// Evaluated market.
    Ok {
        /// Engine output.
        result: ArbitrageResult,
    },
    /// Rejected market.
    Err {
        /// Validation error.
        error: String,
    },
}

impl From<Result<ArbitrageResult, EngineError>> for BatchItem {
    fn from(result: Result<ArbitrageResult, EngineError>) -> Self {
        match result {
            Ok(result) => BatchItem::Ok { result },
            Err(e) => BatchItem::Err {
                error: e.to_string(),
            },
        }
    }
}

/// Batch evaluation response.
#[derive(Debug, Serialize)]
pub struct BatchResponse {
    /// When the batch ran (RFC 3339).
    #[serde(with = "time::serde::rfc3339")]
    pub evaluated_at: OffsetDateTime,
    /// One entry per request, in request order.
    pub results: Vec<BatchItem>,
}

/// Body of `POST /api/v1/scan`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanBody {
    /// Events with their bookmaker offers.
    pub events: Vec<EventOdds>,
    /// Stake to split; configured default when absent.
    #[serde(default)]
    pub total_stake: Option<Decimal>,
    /// Minimum profit percentage; configured default when absent.
    #[serde(default)]
    pub min_profit_percent: Option<Decimal>,
}

/// Scan response.
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    /// When the scan ran (RFC 3339).
    #[serde(with = "time::serde::rfc3339")]
    pub evaluated_at: OffsetDateTime,
    /// Opportunities, most profitable first.
    pub opportunities: Vec<Opportunity>,
}

fn unprocessable(message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Readiness check handler - returns 200 if ready, 503 otherwise.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let is_ready = state.is_ready();
    let response = ReadyResponse {
        ready: is_ready,
        bookmakers: state.catalog.len(),
    };

    if is_ready {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// Prometheus scrape handler.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed".to_string()),
    }
}

/// List the bookmaker catalog.
pub async fn bookmakers(State(state): State<AppState>) -> impl IntoResponse {
    let profiles: Vec<BookmakerProfile> = state.catalog.iter().cloned().collect();
    Json(profiles)
}

/// Evaluate one market.
pub async fn evaluate(
    State(state): State<AppState>,
    Json(body): Json<EvaluateBody>,
) -> Result<Json<EvaluateResponse>, (StatusCode, Json<ErrorResponse>)> {
    let start = Instant::now();
    let request = body.into_request(&state);
    let outcome = arbitrage::evaluate(&request);
    record_http_latency(start, "evaluate");

    let result = outcome.map_err(|e| unprocessable(e.to_string()))?;
    Ok(Json(EvaluateResponse {
        evaluated_at: OffsetDateTime::now_utc(),
        result,
    }))
}

/// Evaluate many independent markets.
pub async fn evaluate_batch(
    State(state): State<AppState>,
    Json(body): Json<BatchBody>,
) -> Result<Json<BatchResponse>, (StatusCode, Json<ErrorResponse>)> {
    let max = state.config.max_batch_size;
    if body.requests.len() > max {
        return Err(unprocessable(format!(
            "batch of {} exceeds maximum of {}",
            body.requests.len(),
            max
        )));
    }

    let start = Instant::now();
    let requests: Vec<EvaluationRequest> = body
        .requests
        .into_iter()
        .map(|b| b.into_request(&state))
        .collect();
    let results = arbitrage::evaluate_batch(&requests)
        .into_iter()
        .map(BatchItem::from)
        .collect();
    record_http_latency(start, "evaluate_batch");

    Ok(Json(BatchResponse {
        evaluated_at: OffsetDateTime::now_utc(),
        results,
    }))
}

/// Scan events for arbitrage at their best odds.
pub async fn scan(
    State(state): State<AppState>,
    Json(body): Json<ScanBody>,
) -> Result<Json<ScanResponse>, (StatusCode, Json<ErrorResponse>)> {
    let total_stake = body.total_stake.unwrap_or(state.config.default_total_stake);
    if total_stake <= Decimal::ZERO {
        return Err(unprocessable(EngineError::InvalidStake(total_stake).to_string()));
    }
    let min_profit = body
        .min_profit_percent
        .unwrap_or(state.config.min_profit_percent);

    let start = Instant::now();
    let opportunities = arbitrage::scan_events(&body.events, total_stake, min_profit, &state.catalog);
    record_http_latency(start, "scan");

    Ok(Json(ScanResponse {
        evaluated_at: OffsetDateTime::now_utc(),
        opportunities,
    }))
}
