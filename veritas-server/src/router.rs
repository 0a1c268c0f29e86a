use chrono::Utc;
use uuid::Uuid;
use veritas_core::ipc::{VeritasRequest, VeritasResponse};
use veritas_core::models::{UrlReport, Verdict};
use veritas_core::{Claim, VerificationRouter, VerifyError};

pub async fn handle_request(
    request: VeritasRequest,
    verifier: &VerificationRouter,
) -> VeritasResponse {
    match request {
        VeritasRequest::Ping => VeritasResponse::pong(),
        VeritasRequest::Health => VeritasResponse::ok(health_json(verifier)),
        VeritasRequest::VerifyText { text } => match verify_text_json(verifier, &text).await {
            Ok(data) => VeritasResponse::ok(data),
            Err(e) => VeritasResponse::err(e.to_string()),
        },
        VeritasRequest::VerifyUrl { url } => match verify_url_json(verifier, &url).await {
            Ok(data) => VeritasResponse::ok(data),
            Err(e) => VeritasResponse::err(e.to_string()),
        },
    }
}

/// Collaborator status. The classifier is always loaded by the time this runs.
pub fn health_json(verifier: &VerificationRouter) -> serde_json::Value {
    serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "classifier": verifier.classifier().name(),
        "features": verifier.classifier().n_features(),
        "search": verifier.search().name(),
        "search_configured": verifier.search().is_configured(),
    })
}

/// Wire shape of a verdict, shared by the HTTP and IPC front ends.
pub fn verdict_json(verdict: &Verdict) -> serde_json::Value {
    serde_json::json!({
        "outcome": verdict.outcome,
        "message": verdict.message(),
        "classification": verdict.classification,
        "evidence": verdict.evidence,
        "request_id": Uuid::new_v4(),
        "checked_at": Utc::now().to_rfc3339(),
    })
}

pub fn url_report_json(report: &UrlReport) -> serde_json::Value {
    let mut data = verdict_json(&report.verdict);
    if let Some(obj) = data.as_object_mut() {
        obj.insert("url".to_string(), serde_json::json!(report.url));
        obj.insert("preview".to_string(), serde_json::json!(report.preview));
    }
    data
}

pub async fn verify_text_json(
    verifier: &VerificationRouter,
    text: &str,
) -> Result<serde_json::Value, VerifyError> {
    let verdict = verifier.verify_text(&Claim::new(text)).await?;
    Ok(verdict_json(&verdict))
}

pub async fn verify_url_json(
    verifier: &VerificationRouter,
    url: &str,
) -> Result<serde_json::Value, VerifyError> {
    let report = verifier.verify_url(url).await?;
    Ok(url_report_json(&report))
}
