//! Clinical entity categories and the simulated model variants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::NerError;

/// Clinical category tag attached to every extracted entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityCategory {
    TumorSize,
    TumorType,
    TumorClassification,
    ReceptorStatus,
    Stage,
    Grade,
    TnmStage,
    Treatment,
    Medication,
    Age,
    Gender,
}

impl EntityCategory {
    pub const ALL: [EntityCategory; 11] = [
        EntityCategory::TumorSize,
        EntityCategory::TumorType,
        EntityCategory::TumorClassification,
        EntityCategory::ReceptorStatus,
        EntityCategory::Stage,
        EntityCategory::Grade,
        EntityCategory::TnmStage,
        EntityCategory::Treatment,
        EntityCategory::Medication,
        EntityCategory::Age,
        EntityCategory::Gender,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityCategory::TumorSize => "TUMOR_SIZE",
            EntityCategory::TumorType => "TUMOR_TYPE",
            EntityCategory::TumorClassification => "TUMOR_CLASSIFICATION",
            EntityCategory::ReceptorStatus => "RECEPTOR_STATUS",
            EntityCategory::Stage => "STAGE",
            EntityCategory::Grade => "GRADE",
            EntityCategory::TnmStage => "TNM_STAGE",
            EntityCategory::Treatment => "TREATMENT",
            EntityCategory::Medication => "MEDICATION",
            EntityCategory::Age => "AGE",
            EntityCategory::Gender => "GENDER",
        }
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named model configuration. Variants differ only by a fixed confidence bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ModelVariant {
    #[default]
    BioBERT,
    ClinicalBERT,
    PubMedBERT,
}

impl ModelVariant {
    /// Fixed comparison order. Ties in model comparison go to the earlier entry.
    pub const ALL: [ModelVariant; 3] = [
        ModelVariant::BioBERT,
        ModelVariant::ClinicalBERT,
        ModelVariant::PubMedBERT,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ModelVariant::BioBERT => "BioBERT",
            ModelVariant::ClinicalBERT => "ClinicalBERT",
            ModelVariant::PubMedBERT => "PubMedBERT",
        }
    }

    /// Additive confidence bonus applied to every draw.
    pub fn bonus(&self) -> f64 {
        match self {
            ModelVariant::BioBERT => 0.05,
            ModelVariant::ClinicalBERT => 0.08,
            ModelVariant::PubMedBERT => 0.03,
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelVariant {
    type Err = NerError;

    /// Accepts the display name case-insensitively, with or without separators
    /// (`"clinical-bert"`, `"pubmed_bert"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();

        match key.as_str() {
            "biobert" => Ok(ModelVariant::BioBERT),
            "clinicalbert" => Ok(ModelVariant::ClinicalBERT),
            "pubmedbert" => Ok(ModelVariant::PubMedBERT),
            _ => Err(NerError::UnknownModel(s.to_string())),
        }
    }
}
