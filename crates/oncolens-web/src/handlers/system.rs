//! Health check and rule-table introspection.

use axum::{extract::State, http::Uri, Json};
use serde::Serialize;

use oncolens_ner::{rules::rule_table, EntityCategory, ModelVariant};

use crate::handlers::analyze::ApiResponse;
use crate::error::{ApiError, ApiResult};
use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct RuleInfo {
    pub category: EntityCategory,
    pub pattern: String,
}

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub name: &'static str,
    pub bonus: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesOverview {
    pub rules: Vec<RuleInfo>,
    pub categories: Vec<EntityCategory>,
    pub models: Vec<ModelInfo>,
    pub default_model: ModelVariant,
    pub default_threshold: f64,
    pub max_text_length: usize,
}

/// GET /api/health
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// GET /api/rules — the active rule table and model bonuses
pub async fn rules(State(state): State<SharedState>) -> ApiResult<Json<ApiResponse<RulesOverview>>> {
    let rules = rule_table()?
        .iter()
        .map(|rule| RuleInfo {
            category: rule.category,
            pattern: rule.pattern.as_str().to_string(),
        })
        .collect();

    let models = ModelVariant::ALL
        .iter()
        .map(|m| ModelInfo { name: m.name(), bonus: m.bonus() })
        .collect();

    Ok(ApiResponse::ok(RulesOverview {
        rules,
        categories: EntityCategory::ALL.to_vec(),
        models,
        default_model: state.default_model,
        default_threshold: state.default_threshold,
        max_text_length: state.engine.max_text_length(),
    }))
}

/// Fallback for unmatched paths, keeping the error envelope consistent.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
