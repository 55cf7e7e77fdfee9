//! HTTP API: prediction, static frontend, health checks and Prometheus metrics

use crate::error::ApiError;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use iris_lib::{
    health::{components, ComponentStatus, HealthRegistry},
    observability::{ServiceMetrics, StructuredLogger},
    Classifier, PredictRequest, PredictResponse, SampleInput,
};
use prometheus::{Encoder, TextEncoder};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The single model loaded at startup, read-only for the process lifetime
    pub model: Arc<dyn Classifier>,
    pub health_registry: HealthRegistry,
    pub metrics: ServiceMetrics,
    pub logger: StructuredLogger,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(
        model: Arc<dyn Classifier>,
        health_registry: HealthRegistry,
        metrics: ServiceMetrics,
        logger: StructuredLogger,
        static_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            model,
            health_registry,
            metrics,
            logger,
            static_dir: static_dir.into(),
        }
    }
}

/// Normalize `data` to a sample matrix and classify every row
pub fn run_prediction(
    model: &dyn Classifier,
    data: &serde_json::Value,
) -> Result<Vec<usize>, ApiError> {
    let samples = SampleInput::from_value(data)?.into_matrix()?;
    Ok(model.predict(&samples)?)
}

async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let start = Instant::now();

    let outcome = payload
        .map_err(ApiError::from)
        .and_then(|Json(request)| run_prediction(state.model.as_ref(), &request.data));

    match outcome {
        Ok(predictions) => {
            let elapsed = start.elapsed();
            state
                .metrics
                .observe_prediction(elapsed.as_secs_f64(), predictions.len());
            state
                .logger
                .log_prediction(predictions.len(), elapsed.as_micros());
            Ok(Json(PredictResponse { predictions }))
        }
        Err(e) => {
            state.metrics.inc_prediction_errors(e.kind());
            Err(e)
        }
    }
}

/// Returns 200 if healthy or degraded, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Returns 200 once the model is loaded, 503 before
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            Vec::new(),
        );
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let static_dir: &Path = &state.static_dir;
    let index = ServeFile::new(static_dir.join("index.html"));
    let assets = ServeDir::new(static_dir);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/predict", post(predict))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route_service("/", index)
        .nest_service("/static", assets)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Start the API server, returning once `shutdown` resolves.
///
/// The `http` health component tracks the listener: healthy once bound,
/// unhealthy if binding or serving fails.
pub async fn serve(
    addr: &str,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let health_registry = state.health_registry.clone();
    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            health_registry
                .set_unhealthy(components::HTTP, format!("Failed to bind {}: {}", addr, e))
                .await;
            return Err(e.into());
        }
    };
    health_registry.set_healthy(components::HTTP).await;
    info!(addr = %addr, "Starting API server");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
    {
        health_registry
            .set_unhealthy(components::HTTP, format!("Server error: {}", e))
            .await;
        return Err(e.into());
    }

    Ok(())
}
