//! Artifact operation metrics.
//!
//! The manager reports through the [`ArtifactReporter`] trait so it can run
//! without a metrics backend. [`PrometheusReporter`] forwards to counters
//! and histograms in a process-wide registry that `/metrics` exposes.
//!
//! # Security Note
//!
//! The `/metrics` endpoint is unauthenticated. Metrics carry no dataset or
//! artifact identifiers, only aggregate counts and latencies, but the
//! endpoint should still be network-restricted to the Prometheus scrapers.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounter, Registry, TextEncoder,
};
use std::sync::{LazyLock, Once};
use std::time::Duration;

/// Artifact manager call being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Get,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Get => "get",
        }
    }
}

/// Points at which the artifact manager reports progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactEvent {
    ValidationFailed,
    CreateSucceeded,
    CreateFailed,
    CreateDataSucceeded,
    CreateDataFailed,
    GetSucceeded,
    GetFailed,
    TransformFailed,
}

/// Sink for artifact manager events and timings.
pub trait ArtifactReporter: Send + Sync {
    fn record(&self, event: ArtifactEvent);

    fn observe_duration(&self, operation: Operation, elapsed: Duration);
}

/// Reporter that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl ArtifactReporter for NoopReporter {
    fn record(&self, _event: ArtifactEvent) {}

    fn observe_duration(&self, _operation: Operation, _elapsed: Duration) {}
}

/// Global Prometheus registry for all metrics.
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

pub static CREATE_ARTIFACT_SUCCESS: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "catalog_create_artifact_success_total",
        "Number of artifacts created",
    )
    .expect("metric creation failed")
});

pub static CREATE_ARTIFACT_FAILURE: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "catalog_create_artifact_failure_total",
        "Number of artifact creates that failed after validation",
    )
    .expect("metric creation failed")
});

pub static CREATE_ARTIFACT_DATA_SUCCESS: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "catalog_create_artifact_data_success_total",
        "Number of artifact data parts offloaded",
    )
    .expect("metric creation failed")
});

pub static CREATE_ARTIFACT_DATA_FAILURE: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "catalog_create_artifact_data_failure_total",
        "Number of artifact data parts that failed to offload",
    )
    .expect("metric creation failed")
});

pub static GET_ARTIFACT_SUCCESS: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "catalog_get_artifact_success_total",
        "Number of artifacts fetched",
    )
    .expect("metric creation failed")
});

pub static GET_ARTIFACT_FAILURE: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "catalog_get_artifact_failure_total",
        "Number of artifact fetches that failed after validation",
    )
    .expect("metric creation failed")
});

pub static TRANSFORMER_FAILURES: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "catalog_transformer_failed_total",
        "Number of times converting between artifacts and records failed",
    )
    .expect("metric creation failed")
});

pub static VALIDATION_FAILURES: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "catalog_validation_failed_total",
        "Number of artifact requests rejected by validation",
    )
    .expect("metric creation failed")
});

pub static ARTIFACT_OPERATION_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "catalog_artifact_operation_duration_seconds",
            "Duration of artifact manager calls by operation",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["operation"],
    )
    .expect("metric creation failed")
});

/// Guard to ensure metrics are only registered once.
static REGISTER_ONCE: Once = Once::new();

/// Register all metrics with the global registry.
///
/// Idempotent, so tests and embedded routers can call it freely.
pub fn register_metrics() {
    REGISTER_ONCE.call_once(|| {
        let collectors: [Box<dyn prometheus::core::Collector>; 9] = [
            Box::new(CREATE_ARTIFACT_SUCCESS.clone()),
            Box::new(CREATE_ARTIFACT_FAILURE.clone()),
            Box::new(CREATE_ARTIFACT_DATA_SUCCESS.clone()),
            Box::new(CREATE_ARTIFACT_DATA_FAILURE.clone()),
            Box::new(GET_ARTIFACT_SUCCESS.clone()),
            Box::new(GET_ARTIFACT_FAILURE.clone()),
            Box::new(TRANSFORMER_FAILURES.clone()),
            Box::new(VALIDATION_FAILURES.clone()),
            Box::new(ARTIFACT_OPERATION_DURATION.clone()),
        ];
        for collector in collectors {
            REGISTRY
                .register(collector)
                .expect("metric registration failed");
        }
    });
}

/// Reporter backed by the global Prometheus registry.
#[derive(Debug, Clone, Copy)]
pub struct PrometheusReporter;

impl PrometheusReporter {
    /// Create the reporter, registering metrics on first use.
    pub fn new() -> Self {
        register_metrics();
        Self
    }
}

impl Default for PrometheusReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactReporter for PrometheusReporter {
    fn record(&self, event: ArtifactEvent) {
        let counter = match event {
            ArtifactEvent::ValidationFailed => &VALIDATION_FAILURES,
            ArtifactEvent::CreateSucceeded => &CREATE_ARTIFACT_SUCCESS,
            ArtifactEvent::CreateFailed => &CREATE_ARTIFACT_FAILURE,
            ArtifactEvent::CreateDataSucceeded => &CREATE_ARTIFACT_DATA_SUCCESS,
            ArtifactEvent::CreateDataFailed => &CREATE_ARTIFACT_DATA_FAILURE,
            ArtifactEvent::GetSucceeded => &GET_ARTIFACT_SUCCESS,
            ArtifactEvent::GetFailed => &GET_ARTIFACT_FAILURE,
            ArtifactEvent::TransformFailed => &TRANSFORMER_FAILURES,
        };
        counter.inc();
    }

    fn observe_duration(&self, operation: Operation, elapsed: Duration) {
        ARTIFACT_OPERATION_DURATION
            .with_label_values(&[operation.as_str()])
            .observe(elapsed.as_secs_f64());
    }
}

/// GET /metrics - Prometheus metrics endpoint.
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {e}").into_bytes(),
        ),
    }
}
