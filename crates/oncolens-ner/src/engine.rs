//! Entry point used by callers: the four operations behind an input guard.

use tracing::debug;

use crate::comparison::{compare_models, ModelComparison};
use crate::confidence::{ConfidenceSource, ThreadRngSource};
use crate::entity_types::ModelVariant;
use crate::extractor::{extract_entities, NerResult};
use crate::qa::{answer_question, QaResult};
use crate::summarizer::{summarize, SummaryResult};
use crate::{NerError, Result};

pub const DEFAULT_MAX_TEXT_LENGTH: usize = 100_000;
pub const DEFAULT_MAX_BATCH_SIZE: usize = 64;

/// Batches at or below this size run sequentially.
#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 4;

/// Stateless apart from its limits; cheap to clone and share.
#[derive(Debug, Clone)]
pub struct AnalysisEngine {
    max_text_length: usize,
    max_batch_size: usize,
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TEXT_LENGTH, DEFAULT_MAX_BATCH_SIZE)
    }
}

impl AnalysisEngine {
    pub fn new(max_text_length: usize, max_batch_size: usize) -> Self {
        Self {
            max_text_length,
            max_batch_size,
        }
    }

    pub fn max_text_length(&self) -> usize {
        self.max_text_length
    }

    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Reject oversized input before any pattern runs over it.
    pub fn check_length(&self, text: &str) -> Result<()> {
        // byte length is an upper bound on char count
        if text.len() <= self.max_text_length {
            return Ok(());
        }
        let length = text.chars().count();
        if length > self.max_text_length {
            return Err(NerError::TextTooLong {
                length,
                max: self.max_text_length,
            });
        }
        Ok(())
    }

    pub fn extract(&self, text: &str, model: ModelVariant, threshold: f64) -> Result<NerResult> {
        self.extract_with(text, model, threshold, &mut ThreadRngSource)
    }

    pub fn extract_with(
        &self,
        text: &str,
        model: ModelVariant,
        threshold: f64,
        source: &mut dyn ConfidenceSource,
    ) -> Result<NerResult> {
        self.check_length(text)?;
        extract_entities(text, model, threshold, source)
    }

    /// Extract from many documents. Each document draws independently; a
    /// failure in one does not affect the others.
    pub fn extract_batch<S>(&self, texts: &[S], model: ModelVariant, threshold: f64) -> Result<Vec<Result<NerResult>>>
    where
        S: AsRef<str> + Sync,
    {
        if texts.len() > self.max_batch_size {
            return Err(NerError::BatchTooLarge {
                size: texts.len(),
                max: self.max_batch_size,
            });
        }

        #[cfg(feature = "parallel")]
        {
            if texts.len() > PARALLEL_THRESHOLD {
                use rayon::prelude::*;
                debug!("Extracting {} documents in parallel", texts.len());
                return Ok(texts
                    .par_iter()
                    .map(|text| self.extract(text.as_ref(), model, threshold))
                    .collect());
            }
        }

        debug!("Extracting {} documents sequentially", texts.len());
        Ok(texts
            .iter()
            .map(|text| self.extract(text.as_ref(), model, threshold))
            .collect())
    }

    pub fn summarize(&self, text: &str, model: ModelVariant) -> Result<SummaryResult> {
        self.check_length(text)?;
        Ok(summarize(text, model))
    }

    pub fn answer(&self, text: &str, question: &str, model: ModelVariant) -> Result<QaResult> {
        self.check_length(text)?;
        answer_question(text, question, model)
    }

    pub fn compare(&self, text: &str) -> Result<ModelComparison> {
        self.compare_with(text, &mut ThreadRngSource)
    }

    pub fn compare_with(&self, text: &str, source: &mut dyn ConfidenceSource) -> Result<ModelComparison> {
        self.check_length(text)?;
        compare_models(text, source)
    }
}
