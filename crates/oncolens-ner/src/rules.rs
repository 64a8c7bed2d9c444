//! The ordered table of tagged extraction patterns.
//!
//! Rules are plain data: each entry pairs a category with a regular expression.
//! The table is compiled once per process and applied in declaration order, so
//! adding a category means adding a row here and nothing else.

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::entity_types::EntityCategory;
use crate::{NerError, Result};

/// Declarative rule source. Order is significant: extraction output follows it.
pub const RULE_SPECS: &[(EntityCategory, &str)] = &[
    (
        EntityCategory::TumorSize,
        r"\b\d+(?:\.\d+)?\s*(?:x\s*\d+(?:\.\d+)?\s*)?(?:cm|mm)\b",
    ),
    (
        EntityCategory::TumorType,
        r"\b(?:(?:invasive|infiltrating)\s+)?(?:ductal|lobular|mucinous|medullary|tubular|papillary|metaplastic)\s+carcinoma(?:\s+in\s+situ)?\b|\badenocarcinoma\b|\b(?:DCIS|LCIS)\b",
    ),
    (
        EntityCategory::TumorClassification,
        r"\b(?:triple[- ]negative|luminal\s+[ab]|her2[- ]enriched|basal[- ]like)\b",
    ),
    (
        EntityCategory::ReceptorStatus,
        concat!(
            r"\b(?:ER|PR|PgR|HER-?2(?:/neu)?)(?:\s+status)?(?:\s*[:=]\s*|\s+|-)?(?i:positive|negative|equivocal)\b",
            r"|\bHER-?2\s*[0-3]\+|\b(?:ER|PR|HER2)[+-]",
            // lowercase shorthand only counts with an explicit result word
            r"|\b(?i:(?:er|pr|her-?2)(?:\s+status)?(?:\s*[:=]\s*|\s+|-)(?:positive|negative|equivocal))\b",
        ),
    ),
    (
        EntityCategory::Stage,
        r"\bstage\s+(?:IV|I{1,3}|[0-4])[a-c]?\b",
    ),
    (
        EntityCategory::Grade,
        r"\bnottingham\s+grade\s+[1-3]\b|\bgrade\s+(?:[1-3]|I{1,3})\b|\b(?:well|moderately|poorly)[- ]differentiated\b",
    ),
    (
        EntityCategory::TnmStage,
        r"\b[cpy]?T(?:[0-4][a-d]?|is|x)\s*N(?:[0-3][a-c]?|x)\s*M(?:[01]|x)\b",
    ),
    (
        EntityCategory::Treatment,
        r"\b(?:(?:neo)?adjuvant\s+(?:chemotherapy|therapy)|chemotherapy|radiation\s+therapy|radiotherapy|(?:hormone|endocrine|targeted)\s+therapy|immunotherapy|lumpectomy|mastectomy|sentinel\s+(?:lymph\s+)?node\s+biopsy|surgery)\b",
    ),
    (
        EntityCategory::Medication,
        r"\b(?:tamoxifen|letrozole|anastrozole|exemestane|trastuzumab|herceptin|pertuzumab|doxorubicin|cyclophosphamide|paclitaxel|docetaxel|carboplatin|capecitabine|palbociclib|ribociclib|olaparib|pembrolizumab)\b",
    ),
    (
        EntityCategory::Age,
        r"\b\d{1,3}[- ]year[- ]old\b|\baged?\s*:?\s*\d{1,3}\b",
    ),
    (
        EntityCategory::Gender,
        r"\b(?:female|male|woman|women|man|men)\b",
    ),
];

/// Categories whose patterns stay case-sensitive. Receptor and TNM notation
/// depends on capitalisation: a bare "er" is not a receptor, but "er positive" is.
const CASE_SENSITIVE: &[EntityCategory] = &[EntityCategory::ReceptorStatus, EntityCategory::TnmStage];

/// A compiled rule.
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    pub category: EntityCategory,
    pub pattern: Regex,
}

impl ExtractionRule {
    pub fn compile(category: EntityCategory, pattern: &str) -> Result<Self> {
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(!CASE_SENSITIVE.contains(&category))
            .build()
            .map_err(|e| NerError::Pattern {
                category: category.as_str(),
                message: e.to_string(),
            })?;
        Ok(Self { category, pattern })
    }
}

fn compile_table() -> Result<Vec<ExtractionRule>> {
    let rules = RULE_SPECS
        .iter()
        .map(|(category, pattern)| ExtractionRule::compile(*category, pattern))
        .collect::<Result<Vec<_>>>()?;
    debug!("Compiled {} extraction rules", rules.len());
    Ok(rules)
}

/// The shared rule table, compiled on first use.
pub fn rule_table() -> Result<&'static [ExtractionRule]> {
    static TABLE: OnceLock<std::result::Result<Vec<ExtractionRule>, NerError>> = OnceLock::new();
    match TABLE.get_or_init(compile_table) {
        Ok(rules) => Ok(rules.as_slice()),
        Err(e) => Err(e.clone()),
    }
}

/// First rule tagged with `category`.
pub fn rule_for(category: EntityCategory) -> Result<&'static ExtractionRule> {
    rule_table()?
        .iter()
        .find(|rule| rule.category == category)
        .ok_or_else(|| NerError::InvalidInput(format!("no rule registered for {}", category)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches_of(category: EntityCategory, text: &str) -> Vec<String> {
        rule_for(category)
            .unwrap()
            .pattern
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    #[test]
    fn test_table_compiles_every_category() {
        let rules = rule_table().unwrap();
        assert_eq!(rules.len(), RULE_SPECS.len());
        for category in EntityCategory::ALL {
            assert!(rules.iter().any(|r| r.category == category), "missing {}", category);
        }
    }

    #[test]
    fn test_tumor_size() {
        assert_eq!(matches_of(EntityCategory::TumorSize, "a 2.3 cm mass and 15mm node"), vec!["2.3 cm", "15mm"]);
        assert_eq!(matches_of(EntityCategory::TumorSize, "measuring 2.1 x 1.8 cm"), vec!["2.1 x 1.8 cm"]);
        assert!(matches_of(EntityCategory::TumorSize, "2.3 cmh").is_empty());
    }

    #[test]
    fn test_tumor_type_prefers_full_phrase() {
        assert_eq!(
            matches_of(EntityCategory::TumorType, "an Invasive Ductal Carcinoma with DCIS"),
            vec!["Invasive Ductal Carcinoma", "DCIS"]
        );
        assert_eq!(matches_of(EntityCategory::TumorType, "lobular carcinoma in situ"), vec!["lobular carcinoma in situ"]);
    }

    #[test]
    fn test_classification() {
        assert_eq!(matches_of(EntityCategory::TumorClassification, "Triple-negative disease"), vec!["Triple-negative"]);
        assert_eq!(matches_of(EntityCategory::TumorClassification, "luminal B subtype"), vec!["luminal B"]);
    }

    #[test]
    fn test_receptor_status() {
        assert_eq!(
            matches_of(EntityCategory::ReceptorStatus, "ER-positive, PR negative, HER2 3+"),
            vec!["ER-positive", "PR negative", "HER2 3+"]
        );
        assert_eq!(matches_of(EntityCategory::ReceptorStatus, "ER+/PR+"), vec!["ER+", "PR+"]);
        assert_eq!(matches_of(EntityCategory::ReceptorStatus, "HER2 status: Negative"), vec!["HER2 status: Negative"]);
    }

    #[test]
    fn test_receptor_ignores_lowercase_words() {
        assert!(matches_of(EntityCategory::ReceptorStatus, "her negative outlook, per-positive").is_empty());
    }

    #[test]
    fn test_receptor_lowercase_with_result() {
        assert_eq!(
            matches_of(EntityCategory::ReceptorStatus, "tumour is er positive, her2 negative, pr-equivocal"),
            vec!["er positive", "her2 negative", "pr-equivocal"]
        );
        assert!(matches_of(EntityCategory::ReceptorStatus, "er, well, her2 pending").is_empty());
    }

    #[test]
    fn test_stage_and_grade() {
        assert_eq!(matches_of(EntityCategory::Stage, "Stage IIA disease, stage 3"), vec!["Stage IIA", "stage 3"]);
        assert!(matches_of(EntityCategory::Stage, "the stage is set").is_empty());
        assert_eq!(
            matches_of(EntityCategory::Grade, "Nottingham grade 2, poorly differentiated"),
            vec!["Nottingham grade 2", "poorly differentiated"]
        );
    }

    #[test]
    fn test_tnm() {
        assert_eq!(matches_of(EntityCategory::TnmStage, "staged pT2N1M0 and T1c N0 M0"), vec!["pT2N1M0", "T1c N0 M0"]);
    }

    #[test]
    fn test_treatment_and_medication() {
        assert_eq!(
            matches_of(EntityCategory::Treatment, "neoadjuvant chemotherapy then lumpectomy"),
            vec!["neoadjuvant chemotherapy", "lumpectomy"]
        );
        assert_eq!(matches_of(EntityCategory::Medication, "Tamoxifen and trastuzumab"), vec!["Tamoxifen", "trastuzumab"]);
    }

    #[test]
    fn test_age_and_gender() {
        assert_eq!(matches_of(EntityCategory::Age, "A 58-year-old, age: 58"), vec!["58-year-old", "age: 58"]);
        assert_eq!(matches_of(EntityCategory::Gender, "female patient, male sibling"), vec!["female", "male"]);
    }
}
