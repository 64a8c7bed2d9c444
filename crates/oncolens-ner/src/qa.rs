//! Keyword-routed question answering over the rule table.
//!
//! The question is lowercased and checked against each route in turn. Routes
//! are independent: when several fire and find a match, the last one wins.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity_types::{EntityCategory, ModelVariant};
use crate::rules::rule_for;
use crate::Result;

pub const UNANSWERED: &str = "Unable to find a specific answer in the provided text.";

const CONTEXT_BEFORE: usize = 50;
const CONTEXT_AFTER: usize = 100;
const FALLBACK_CONTEXT: usize = 150;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaResult {
    pub question: String,
    pub answer: String,
    pub confidence: f64,
    pub context: String,
    pub model: ModelVariant,
}

struct QuestionRoute {
    keywords: &'static [&'static str],
    category: EntityCategory,
    confidence: f64,
}

// Substring checks, so "er" also fires for words like "therapy".
const ROUTES: &[QuestionRoute] = &[
    QuestionRoute {
        keywords: &["size", "large"],
        category: EntityCategory::TumorSize,
        confidence: 0.92,
    },
    QuestionRoute {
        keywords: &["receptor", "er", "her2"],
        category: EntityCategory::ReceptorStatus,
        confidence: 0.89,
    },
    QuestionRoute {
        keywords: &["stage"],
        category: EntityCategory::Stage,
        confidence: 0.87,
    },
    QuestionRoute {
        keywords: &["treatment", "therapy"],
        category: EntityCategory::Treatment,
        confidence: 0.85,
    },
];

pub fn answer_question(text: &str, question: &str, model: ModelVariant) -> Result<QaResult> {
    let lowered = question.to_lowercase();
    let mut found: Option<(usize, usize, f64)> = None;

    for route in ROUTES {
        if !route.keywords.iter().any(|k| lowered.contains(k)) {
            continue;
        }
        if let Some(m) = rule_for(route.category)?.pattern.find(text) {
            if found.is_some() {
                debug!("{} answer replaces an earlier route's answer", route.category);
            }
            found = Some((m.start(), m.end(), route.confidence));
        }
    }

    let result = match found {
        Some((start, end, confidence)) => QaResult {
            question: question.to_string(),
            answer: text[start..end].to_string(),
            confidence,
            context: context_window(text, start, end),
            model,
        },
        None => QaResult {
            question: question.to_string(),
            answer: UNANSWERED.to_string(),
            confidence: 0.0,
            context: format!("{}...", text.chars().take(FALLBACK_CONTEXT).collect::<String>()),
            model,
        },
    };
    Ok(result)
}

/// Up to 50 characters before and 100 after `start..end`, trimmed.
fn context_window(text: &str, start: usize, end: usize) -> String {
    let from = text[..start]
        .char_indices()
        .rev()
        .nth(CONTEXT_BEFORE - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let to = text[end..]
        .char_indices()
        .nth(CONTEXT_AFTER)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    text[from..to].trim().to_string()
}
