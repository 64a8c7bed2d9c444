//! Rule-driven entity extraction with simulated confidence.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::confidence::{jittered_confidence, ConfidenceSource};
use crate::entity_types::{EntityCategory, ModelVariant};
use crate::rules::rule_table;
use crate::Result;

pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// A tagged span of the source text. `start..end` are byte offsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMatch {
    pub text: String,
    #[serde(rename = "type")]
    pub category: EntityCategory,
    pub confidence: f64,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NerResult {
    /// Rule order first, then left-to-right within a rule.
    pub entities: Vec<EntityMatch>,
    pub entity_count: usize,
    pub avg_confidence: f64,
    /// Distinct categories in first-seen order.
    pub entity_types: Vec<EntityCategory>,
}

impl NerResult {
    pub fn from_entities(entities: Vec<EntityMatch>) -> Self {
        let entity_count = entities.len();
        let avg_confidence = if entity_count == 0 {
            0.0
        } else {
            entities.iter().map(|e| e.confidence).sum::<f64>() / entity_count as f64
        };

        let mut seen = AHashSet::new();
        let entity_types = entities
            .iter()
            .map(|e| e.category)
            .filter(|category| seen.insert(*category))
            .collect();

        Self {
            entities,
            entity_count,
            avg_confidence,
            entity_types,
        }
    }

    pub fn empty() -> Self {
        Self::from_entities(Vec::new())
    }

    /// Entities ordered by start offset, longer spans first on ties.
    pub fn sorted_by_position(&self) -> Vec<&EntityMatch> {
        let mut sorted: Vec<&EntityMatch> = self.entities.iter().collect();
        sorted.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| b.end.cmp(&a.end)));
        sorted
    }
}

/// Scan `text` with every rule and keep matches whose drawn confidence reaches
/// `threshold`. The threshold is not range-checked.
pub fn extract_entities(
    text: &str,
    model: ModelVariant,
    threshold: f64,
    source: &mut dyn ConfidenceSource,
) -> Result<NerResult> {
    if !(0.0..=1.0).contains(&threshold) {
        warn!("Confidence threshold {} is outside [0, 1]; applying as given", threshold);
    }
    if text.is_empty() {
        return Ok(NerResult::empty());
    }

    let mut entities = Vec::new();
    for rule in rule_table()? {
        let before = entities.len();
        for m in rule.pattern.find_iter(text) {
            let confidence = jittered_confidence(source.next_unit(), model);
            if confidence >= threshold {
                entities.push(EntityMatch {
                    text: m.as_str().to_string(),
                    category: rule.category,
                    confidence,
                    start: m.start(),
                    end: m.end(),
                });
            }
        }
        if entities.len() > before {
            debug!("{}: {} match(es)", rule.category, entities.len() - before);
        }
    }

    Ok(NerResult::from_entities(entities))
}
