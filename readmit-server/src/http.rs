//! Readmission risk HTTP app
//!
//! Axum-based HTTP server that renders the prediction form and exposes the
//! prediction endpoint the form submits to.
//!
//! Architecture: each endpoint has a thin axum handler that delegates to a pure
//! inner function. The inner functions are directly testable without axum dispatch
//! machinery, which improves coverage accuracy under tarpaulin.
//!
//! Endpoints:
//! - `GET /` renders the single-page prediction form
//! - `GET /health` health check with model status
//! - `GET /version` server version info
//! - `POST /predict` readmission probability for one patient

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use readmit_core::{PatientFeatures, ReadmitConfig, RiskAssessment, RiskModel};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

/// Shared state for all HTTP handlers
#[derive(Clone)]
pub struct HttpState {
    pub model: Arc<dyn RiskModel>,
    pub config: ReadmitConfig,
}

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/", get(page_handler))
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .route("/predict", post(predict_handler))
        .with_state(state)
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    model: Arc<dyn RiskModel>,
    config: ReadmitConfig,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", config.http.host, config.http.port);
    let state = Arc::new(HttpState { model, config });

    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Readmission risk app listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Inner (directly testable) business logic functions
// ============================================================================

/// Inner predict. Validates the patient row, runs the model, and shapes the
/// response the form consumes.
pub async fn predict_inner(
    model: &dyn RiskModel,
    patient: PatientFeatures,
) -> (StatusCode, serde_json::Value) {
    if let Err(e) = patient.validate() {
        return (
            StatusCode::BAD_REQUEST,
            serde_json::json!({
                "error": e.to_string(),
                "status": "error",
            }),
        );
    }

    let start = Instant::now();

    match model.predict_probability(&patient).await {
        Ok(probability) => {
            let assessment = RiskAssessment::from_probability(probability);
            let took_ms = start.elapsed().as_millis() as u64;
            (
                StatusCode::OK,
                serde_json::json!({
                    "probability": assessment.probability,
                    "formatted": assessment.formatted(),
                    "risk": assessment.level,
                    "banner": assessment.level.banner(),
                    "advisory": assessment.level.advisory(),
                    "model": model.name(),
                    "took_ms": took_ms,
                }),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "Prediction failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({
                    "error": e.to_string(),
                    "status": "error",
                }),
            )
        }
    }
}

/// Inner health check (pure, no IO once the model is loaded).
pub fn health_inner(model_name: &str) -> (StatusCode, serde_json::Value) {
    (
        StatusCode::OK,
        serde_json::json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "model": model_name,
        }),
    )
}

/// Inner version handler, pure and IO-free.
pub fn version_inner() -> serde_json::Value {
    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "protocol": "readmit/1",
    })
}

// ============================================================================
// Axum handler wrappers (thin, delegate to inner functions)
// ============================================================================

pub async fn page_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    Html(crate::page::render_page(state.model.name()))
}

pub async fn health_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = health_inner(state.model.name());
    (status, Json(body))
}

pub async fn version_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(version_inner()))
}

pub async fn predict_handler(
    State(state): State<Arc<HttpState>>,
    Json(patient): Json<PatientFeatures>,
) -> impl IntoResponse {
    let (status, body) = predict_inner(state.model.as_ref(), patient).await;
    (status, Json(body))
}

// ============================================================================
// Unit Tests: call inner functions directly for reliable tarpaulin coverage
// ============================================================================
