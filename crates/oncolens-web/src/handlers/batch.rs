//! POST /api/ner/batch — entity extraction over many documents at once.

use std::time::Instant;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use oncolens_ner::NerResult;

use crate::handlers::analyze::{resolve_model, ApiResponse};
use crate::error::{ApiError, ApiResult};
use crate::state::{AppEvent, SharedState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    pub texts: Option<Vec<String>>,
    pub model: Option<String>,
    pub confidence_threshold: Option<f64>,
}

/// Per-document outcome, mirroring the top-level envelope.
#[derive(Debug, Serialize)]
pub struct BatchItem {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<NerResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchData {
    pub results: Vec<BatchItem>,
    pub document_count: usize,
    pub failed_count: usize,
}

pub async fn ner_batch(
    State(state): State<SharedState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<BatchData>>> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let texts = request
        .texts
        .ok_or_else(|| ApiError::BadRequest("Missing required field: texts".to_string()))?;
    let model = resolve_model(request.model.as_deref(), state.default_model)?;
    let threshold = request.confidence_threshold.unwrap_or(state.default_threshold);

    let started = Instant::now();
    let engine = state.engine.clone();
    let outcomes = tokio::task::spawn_blocking(move || engine.extract_batch(&texts, model, threshold))
        .await
        .map_err(|e| ApiError::Internal(format!("Batch worker failed: {}", e)))??;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    let results: Vec<BatchItem> = outcomes
        .into_iter()
        .map(|outcome| match outcome {
            Ok(result) => BatchItem { success: true, data: Some(result), error: None },
            Err(e) => BatchItem { success: false, data: None, error: Some(e.to_string()) },
        })
        .collect();
    let failed_count = results.iter().filter(|item| !item.success).count();
    let document_count = results.len();

    info!(
        "Batch extraction: {} documents ({} failed) with {} in {:.2}ms",
        document_count, failed_count, model, elapsed_ms
    );
    state.publish(AppEvent::BatchCompleted {
        documents: document_count,
        failed: failed_count,
        elapsed_ms,
    });

    Ok(ApiResponse::ok(BatchData {
        results,
        document_count,
        failed_count,
    }))
}
