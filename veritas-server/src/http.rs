//! Veritas HTTP REST API
//!
//! Axum-based HTTP server that exposes claim and article verification over HTTP.
//! Runs alongside the Unix socket IPC server on port 8770 (configurable).
//!
//! Each endpoint has a thin axum handler that delegates to an inner function,
//! so the logic can be tested without axum dispatch.
//!
//! Endpoints:
//! - GET  /health       collaborator status
//! - GET  /version      server version info
//! - POST /verify/text  verify a free-text claim
//! - POST /verify/url   extract and classify a news article

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use veritas_core::{Claim, Outcome, VerificationRouter, VeritasConfig, VerifyError};

use crate::router;

/// Shared state for all HTTP handlers
#[derive(Clone)]
pub struct HttpState {
    pub verifier: Arc<VerificationRouter>,
    pub config: VeritasConfig,
}

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .route("/verify/text", post(verify_text_handler))
        .route("/verify/url", post(verify_url_handler))
        .with_state(state)
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    verifier: Arc<VerificationRouter>,
    config: VeritasConfig,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", config.http.host, config.http.port);
    let state = Arc::new(HttpState { verifier, config });

    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Veritas HTTP API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Request / Response DTOs
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct VerifyTextRequest {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct VerifyUrlRequest {
    pub url: Option<String>,
}

/// Standard HTTP error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            status: "error".to_string(),
        }
    }

    fn into_value(self) -> serde_json::Value {
        serde_json::json!({
            "error": self.error,
            "status": self.status,
        })
    }
}

// ============================================================================
// Inner (directly testable) business logic functions
// ============================================================================

pub fn health_inner(verifier: &VerificationRouter, socket_path: &str) -> (StatusCode, serde_json::Value) {
    let mut body = router::health_json(verifier);
    if let Some(obj) = body.as_object_mut() {
        obj.insert("socket".to_string(), serde_json::json!(socket_path));
    }
    (StatusCode::OK, body)
}

/// Inner version: pure, no IO.
pub fn version_inner() -> serde_json::Value {
    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "protocol": "veritas/1",
    })
}

pub async fn verify_text_inner(
    verifier: &VerificationRouter,
    req: VerifyTextRequest,
) -> (StatusCode, serde_json::Value) {
    let start = Instant::now();
    let claim = Claim::new(req.text.unwrap_or_default());

    match verifier.verify_text(&claim).await {
        Ok(verdict) => {
            let status = status_for(verdict.outcome);
            let body = with_took_ms(router::verdict_json(&verdict), start);
            (status, body)
        }
        Err(e) => classifier_failure(e),
    }
}

pub async fn verify_url_inner(
    verifier: &VerificationRouter,
    req: VerifyUrlRequest,
) -> (StatusCode, serde_json::Value) {
    let start = Instant::now();
    let url = req.url.unwrap_or_default();

    match verifier.verify_url(&url).await {
        Ok(report) => {
            let status = status_for(report.verdict.outcome);
            let body = with_took_ms(router::url_report_json(&report), start);
            (status, body)
        }
        Err(e) => classifier_failure(e),
    }
}

// ============================================================================
// Axum handler wrappers (thin, delegate to inner functions)
// ============================================================================

pub async fn health_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = health_inner(&state.verifier, &state.config.service.socket_path);
    (status, Json(body))
}

pub async fn version_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(version_inner()))
}

pub async fn verify_text_handler(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<VerifyTextRequest>,
) -> impl IntoResponse {
    let (status, body) = verify_text_inner(&state.verifier, req).await;
    (status, Json(body))
}

pub async fn verify_url_handler(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<VerifyUrlRequest>,
) -> impl IntoResponse {
    let (status, body) = verify_url_inner(&state.verifier, req).await;
    (status, Json(body))
}

// ============================================================================
// Helpers
// ============================================================================

/// Blank input is the caller's fault; every other outcome is a normal answer.
pub fn status_for(outcome: Outcome) -> StatusCode {
    match outcome {
        Outcome::EmptyInput => StatusCode::BAD_REQUEST,
        _ => StatusCode::OK,
    }
}

fn with_took_ms(mut data: serde_json::Value, start: Instant) -> serde_json::Value {
    let took_ms = start.elapsed().as_millis() as u64;
    if let Some(obj) = data.as_object_mut() {
        obj.insert("took_ms".to_string(), serde_json::json!(took_ms));
    }
    data
}

fn classifier_failure(e: VerifyError) -> (StatusCode, serde_json::Value) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorResponse::new(e.to_string()).into_value(),
    )
}

// ============================================================================
// Unit Tests
// ============================================================================
