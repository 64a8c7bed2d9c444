//! POST /api/analyze — the single entry point for all four analyses.

use std::time::Instant;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use oncolens_ner::{ModelComparison, ModelVariant, NerResult, QaResult, SummaryResult};

use crate::error::{ApiError, ApiResult};
use crate::state::{AppEvent, SharedState};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(rename = "type")]
    pub analysis_type: Option<String>,
    pub text: Option<String>,
    pub model: Option<String>,
    pub question: Option<String>,
    pub confidence_threshold: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisType {
    Ner,
    Summarization,
    Qa,
    Comparison,
}

impl AnalysisType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ner" => Some(AnalysisType::Ner),
            "summarization" => Some(AnalysisType::Summarization),
            "qa" => Some(AnalysisType::Qa),
            "comparison" => Some(AnalysisType::Comparison),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Ner => "ner",
            AnalysisType::Summarization => "summarization",
            AnalysisType::Qa => "qa",
            AnalysisType::Comparison => "comparison",
        }
    }
}

/// Success envelope: `{"success": true, "data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self { success: true, data })
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AnalysisData {
    Ner(NerResult),
    Summary(SummaryResult),
    Qa(QaResult),
    Comparison(ModelComparison),
}

impl AnalysisData {
    fn result_count(&self) -> usize {
        match self {
            AnalysisData::Ner(r) => r.entity_count,
            AnalysisData::Summary(_) => 1,
            AnalysisData::Qa(r) => usize::from(r.confidence > 0.0),
            AnalysisData::Comparison(r) => r.models.len(),
        }
    }
}

/// Optional model name, falling back to the configured default.
pub fn resolve_model(requested: Option<&str>, default: ModelVariant) -> ApiResult<ModelVariant> {
    match requested {
        Some(name) => Ok(name.parse::<ModelVariant>()?),
        None => Ok(default),
    }
}

pub fn required<'a>(value: Option<&'a str>, field: &str) -> ApiResult<&'a str> {
    value.ok_or_else(|| ApiError::BadRequest(format!("Missing required field: {}", field)))
}

pub async fn analyze(
    State(state): State<SharedState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<AnalysisData>>> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let analysis_type = request
        .analysis_type
        .as_deref()
        .and_then(AnalysisType::parse)
        .ok_or_else(|| ApiError::BadRequest("Invalid analysis type".to_string()))?;
    let text = required(request.text.as_deref(), "text")?;
    let model = resolve_model(request.model.as_deref(), state.default_model)?;

    let started = Instant::now();
    let data = match analysis_type {
        AnalysisType::Ner => {
            let threshold = request.confidence_threshold.unwrap_or(state.default_threshold);
            AnalysisData::Ner(state.engine.extract(text, model, threshold)?)
        }
        AnalysisType::Summarization => AnalysisData::Summary(state.engine.summarize(text, model)?),
        AnalysisType::Qa => {
            let question = required(request.question.as_deref(), "question")?;
            AnalysisData::Qa(state.engine.answer(text, question, model)?)
        }
        AnalysisType::Comparison => AnalysisData::Comparison(state.engine.compare(text)?),
    };
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    let result_count = data.result_count();
    info!(
        "{} analysis over {} chars: {} result(s) in {:.2}ms",
        analysis_type.as_str(),
        text.chars().count(),
        result_count,
        elapsed_ms
    );
    state.publish(AppEvent::AnalysisCompleted {
        analysis_type: analysis_type.as_str().to_string(),
        model: (analysis_type != AnalysisType::Comparison).then(|| model.name().to_string()),
        result_count,
        elapsed_ms,
    });

    Ok(ApiResponse::ok(data))
}
