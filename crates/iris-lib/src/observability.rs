//! Observability infrastructure for the prediction service
//!
//! Provides:
//! - Prometheus metrics (prediction latency, request and sample counts, errors, model info)
//! - Structured JSON logging with tracing

use crate::predictor::ModelSource;
use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, register_int_counter_vec,
    GaugeVec, Histogram, IntCounter, IntCounterVec,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for inference latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00005, 0.0001, 0.00025, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ServiceMetricsInner> = OnceLock::new();

struct ServiceMetricsInner {
    prediction_latency_seconds: Histogram,
    prediction_requests: IntCounter,
    samples_predicted: IntCounter,
    prediction_errors: IntCounterVec,
    model_info: GaugeVec,
}

impl ServiceMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "iris_prediction_latency_seconds",
                "Time spent running the classifier for one request",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            prediction_requests: register_int_counter!(
                "iris_prediction_requests_total",
                "Prediction requests answered successfully"
            )
            .expect("Failed to register prediction_requests_total"),

            samples_predicted: register_int_counter!(
                "iris_samples_predicted_total",
                "Samples classified across all requests"
            )
            .expect("Failed to register samples_predicted_total"),

            prediction_errors: register_int_counter_vec!(
                "iris_prediction_errors_total",
                "Rejected or failed prediction requests",
                &["kind"]
            )
            .expect("Failed to register prediction_errors_total"),

            model_info: register_gauge_vec!(
                "iris_model_info",
                "Information about the served model",
                &["source", "trees"]
            )
            .expect("Failed to register model_info"),
        }
    }
}

/// Handle to the process-wide Prometheus metrics.
///
/// Clones share the same underlying metrics.
#[derive(Clone)]
pub struct ServiceMetrics {
    _private: (),
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ServiceMetricsInner {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new)
    }

    /// Record a successful prediction request
    pub fn observe_prediction(&self, duration_secs: f64, samples: usize) {
        let inner = self.inner();
        inner.prediction_latency_seconds.observe(duration_secs);
        inner.prediction_requests.inc();
        inner.samples_predicted.inc_by(samples as u64);
    }

    /// Count a failed request; `kind` is `client` or `internal`
    pub fn inc_prediction_errors(&self, kind: &str) {
        self.inner()
            .prediction_errors
            .with_label_values(&[kind])
            .inc();
    }

    pub fn set_model_info(&self, source: &str, trees: usize) {
        self.inner().model_info.reset();
        self.inner()
            .model_info
            .with_label_values(&[source, &trees.to_string()])
            .set(1.0);
    }
}

/// Structured logger for service lifecycle events
#[derive(Clone)]
pub struct StructuredLogger {
    instance: String,
}

impl StructuredLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    pub fn log_startup(&self, version: &str, addr: &str) {
        info!(
            event = "service_started",
            instance = %self.instance,
            service_version = %version,
            addr = %addr,
            "Iris prediction service started"
        );
    }

    pub fn log_model_ready(&self, source: &ModelSource, trees: usize) {
        match source {
            ModelSource::Artifact { path, checksum } => {
                info!(
                    event = "model_loaded",
                    instance = %self.instance,
                    source = "artifact",
                    path = %path.display(),
                    checksum = %checksum,
                    trees = trees,
                    "Serving persisted model"
                );
            }
            ModelSource::Fallback {
                train_samples,
                holdout_samples,
            } => {
                warn!(
                    event = "model_fallback",
                    instance = %self.instance,
                    source = "fallback",
                    train_samples = train_samples,
                    holdout_samples = holdout_samples,
                    trees = trees,
                    "Serving fallback model trained at startup"
                );
            }
        }
    }

    pub fn log_prediction(&self, samples: usize, elapsed_us: u128) {
        info!(
            event = "prediction_served",
            instance = %self.instance,
            samples = samples,
            elapsed_us = elapsed_us as u64,
            "Prediction served"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            instance = %self.instance,
            reason = %reason,
            "Iris prediction service shutting down"
        );
    }
}
