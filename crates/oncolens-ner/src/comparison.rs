//! Side-by-side extraction across the three model variants.

use serde::{Deserialize, Serialize};

use crate::confidence::ConfidenceSource;
use crate::entity_types::{EntityCategory, ModelVariant};
use crate::extractor::{extract_entities, NerResult, DEFAULT_THRESHOLD};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelScore {
    pub model: ModelVariant,
    pub entity_count: usize,
    pub avg_confidence: f64,
    pub entity_types: Vec<EntityCategory>,
}

impl ModelScore {
    fn from_result(model: ModelVariant, result: &NerResult) -> Self {
        Self {
            model,
            entity_count: result.entity_count,
            avg_confidence: result.avg_confidence,
            entity_types: result.entity_types.clone(),
        }
    }

    /// `entityCount * avgConfidence`, the quantity the recommendation maximises.
    pub fn weighted_score(&self) -> f64 {
        self.entity_count as f64 * self.avg_confidence
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub model: ModelVariant,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelComparison {
    pub models: Vec<ModelScore>,
    pub recommendation: Recommendation,
}

/// Run extraction for every variant at the default threshold and recommend
/// the one with the highest `entityCount * avgConfidence`.
pub fn compare_models(text: &str, source: &mut dyn ConfidenceSource) -> Result<ModelComparison> {
    let mut models = Vec::with_capacity(ModelVariant::ALL.len());
    for model in ModelVariant::ALL {
        let result = extract_entities(text, model, DEFAULT_THRESHOLD, &mut *source)?;
        models.push(ModelScore::from_result(model, &result));
    }

    let recommendation = recommend(&models);
    Ok(ModelComparison { models, recommendation })
}

/// First strictly-best entry wins, so ties go to the earlier variant.
pub fn recommend(models: &[ModelScore]) -> Recommendation {
    let best = models.iter().fold(None::<&ModelScore>, |best, candidate| match best {
        Some(current) if candidate.weighted_score() <= current.weighted_score() => Some(current),
        _ => Some(candidate),
    });

    match best {
        Some(best) => Recommendation {
            model: best.model,
            reason: format!(
                "{} identified {} entities with {:.1}% average confidence",
                best.model,
                best.entity_count,
                best.avg_confidence * 100.0
            ),
        },
        None => Recommendation {
            model: ModelVariant::default(),
            reason: "No models were evaluated".to_string(),
        },
    }
}
