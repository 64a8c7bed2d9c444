//! Pattern-based clinical entity extraction.
//!
//! A fixed table of tagged regular expressions drives four operations:
//! entity extraction with simulated model confidence, sentence-truncation
//! summaries, keyword-routed question answering and a three-model comparison.
//! No statistical inference happens anywhere in this crate.

pub mod comparison;
pub mod confidence;
pub mod engine;
pub mod entity_types;
pub mod extractor;
pub mod qa;
pub mod rules;
pub mod summarizer;


pub use comparison::{ModelComparison, ModelScore, Recommendation};
pub use confidence::{ConfidenceSource, FixedSource, SeededSource, SequenceSource, ThreadRngSource};
pub use engine::{AnalysisEngine, DEFAULT_MAX_BATCH_SIZE, DEFAULT_MAX_TEXT_LENGTH};
pub use entity_types::{EntityCategory, ModelVariant};
pub use extractor::{EntityMatch, NerResult, DEFAULT_THRESHOLD};
pub use qa::QaResult;
pub use summarizer::SummaryResult;

pub type Result<T> = std::result::Result<T, NerError>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum NerError {
    #[error("Text exceeds maximum length of {max} characters")]
    TextTooLong { length: usize, max: usize },

    #[error("Batch of {size} documents exceeds maximum of {max}")]
    BatchTooLarge { size: usize, max: usize },

    #[error("Unknown model variant: {0}")]
    UnknownModel(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Rule compilation failed for {category}: {message}")]
    Pattern { category: &'static str, message: String },
}
