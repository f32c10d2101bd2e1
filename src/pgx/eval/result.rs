//! Result data structures for the risk-prediction pipeline.

use std::collections::BTreeMap;

use crate::pgx::ds::{AnnotatedAllele, EvidenceStrength, Gene, Phenotype, RiskLabel, Severity};

/// Per-gene analysis of the observed variants.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct GeneResult {
    /// The analyzed gene.
    pub gene: Gene,
    /// rsIDs occupying the diploid slots; a homozygous variant appears twice.
    pub detected_rsids: Vec<String>,
    /// Annotated alleles occupying the diploid slots.
    pub annotated_variants: Vec<AnnotatedAllele>,
    /// Total diploid activity score.
    pub total_activity_score: f64,
    /// Diplotype label, e.g. `CYP2D6:*4/*1`.
    pub diplotype: String,
    /// Classified phenotype.
    pub phenotype: Phenotype,
    /// Plain-English reasoning for the classification.
    pub phenotype_reasoning: String,
}

/// Risk prediction for one drug.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct DrugRiskResult {
    /// The drug as named by the caller.
    pub drug: String,
    /// Gene whose phenotype drove the decision; serialized as `"N/A"` when
    /// no gene was usable.
    #[serde(with = "gene_or_na")]
    pub gene_used: Option<Gene>,
    /// Phenotype the decision keys on.
    pub phenotype: Phenotype,
    /// Risk category.
    pub risk_label: RiskLabel,
    /// Urgency of the finding.
    pub severity: Severity,
    /// Confidence on `[0.0, 1.0]`, rounded to three decimals.
    pub confidence_score: f64,
    /// Recommended clinical action.
    pub clinical_action: String,
    /// Guideline citation.
    pub cpic_guideline: String,
    /// rsIDs of the variants supporting the call.
    pub supporting_variants: Vec<String>,
    /// Plain-English reasoning for the prediction.
    pub reasoning: String,
    /// Weakest evidence level among the supporting variants, or the
    /// inferred/none states.
    pub evidence_strength: EvidenceStrength,
}

/// Everything a multi-drug request produces.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct RiskBundle {
    /// Per-gene analysis, keyed in gene reporting order.
    pub gene_profiles: BTreeMap<Gene, GeneResult>,
    /// Per-drug predictions; unsupported drugs appear as Unknown stubs.
    pub drug_results: Vec<DrugRiskResult>,
    /// Names of the requested drugs without curated rules.
    pub skipped_drugs: Vec<String>,
}

/// Condensed single-drug response.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct RiskSummary {
    /// Risk category.
    pub label: RiskLabel,
    /// Urgency of the finding.
    pub severity: Severity,
    /// Confidence on `[0.0, 1.0]`.
    pub confidence: f64,
    /// The full prediction; `None` for unsupported drugs.
    pub full_result: Option<DrugRiskResult>,
}

/// Serde support for `gene_used`, mapping `None` to the literal `"N/A"`.
mod gene_or_na {
    use std::str::FromStr as _;

    use crate::pgx::ds::Gene;

    pub fn serialize<S>(value: &Option<Gene>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match value {
            Some(gene) => serializer.collect_str(gene),
            None => serializer.serialize_str("N/A"),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Gene>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw: String = serde::Deserialize::deserialize(deserializer)?;
        if raw == "N/A" {
            Ok(None)
        } else {
            Gene::from_str(&raw)
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}
