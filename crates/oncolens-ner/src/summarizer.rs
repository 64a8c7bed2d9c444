//! Extractive summarisation by sentence truncation.

use serde::{Deserialize, Serialize};

use crate::entity_types::ModelVariant;

const SUMMARY_FRACTION: f64 = 0.3;
const MIN_SUMMARY_SENTENCES: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResult {
    pub summary: String,
    /// Character counts.
    pub original_length: usize,
    pub summary_length: usize,
    pub original_words: usize,
    pub summary_words: usize,
    /// e.g. `"42.5%"`
    pub compression_ratio: String,
}

/// Sentences split on runs of `.`, `!` or `?`, trimmed, empty fragments dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Number of leading sentences kept out of `sentence_count`.
pub fn summary_sentence_count(sentence_count: usize) -> usize {
    let wanted = ((sentence_count as f64) * SUMMARY_FRACTION).floor() as usize;
    wanted.max(MIN_SUMMARY_SENTENCES).min(sentence_count)
}

/// Keep the leading 30% of sentences (at least two). The model does not
/// influence the output.
pub fn summarize(text: &str, _model: ModelVariant) -> SummaryResult {
    let sentences = split_sentences(text);
    let keep = summary_sentence_count(sentences.len());

    let summary = if keep == 0 {
        String::new()
    } else {
        format!("{}.", sentences[..keep].join(". "))
    };

    let original_words = text.split_whitespace().count();
    let summary_words = summary.split_whitespace().count();

    SummaryResult {
        original_length: text.chars().count(),
        summary_length: summary.chars().count(),
        original_words,
        summary_words,
        compression_ratio: compression_ratio(original_words, summary_words),
        summary,
    }
}

fn compression_ratio(original_words: usize, summary_words: usize) -> String {
    if original_words == 0 {
        return "0.0%".to_string();
    }
    let ratio = (1.0 - summary_words as f64 / original_words as f64) * 100.0;
    format!("{:.1}%", ratio)
}
