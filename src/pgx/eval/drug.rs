//! Drug-level risk resolution over the per-gene analysis results.

use std::collections::BTreeMap;

use crate::pgx::data::drugs::{normalize, ClinicalRule};
use crate::pgx::ds::{EvidenceStrength, Gene, Phenotype, RiskLabel, Severity};

use super::confidence;
use super::result::{DrugRiskResult, GeneResult};

/// Base confidence of the synthesized default rule.
const DEFAULT_RULE_CONFIDENCE: f64 = 0.70;

/// A clinical rule resolved for one drug/phenotype pair, either curated or
/// synthesized.
struct ResolvedRule {
    label: RiskLabel,
    severity: Severity,
    confidence_base: f64,
    cpic_guideline: String,
    clinical_action: String,
}

impl From<&ClinicalRule> for ResolvedRule {
    fn from(rule: &ClinicalRule) -> Self {
        Self {
            label: rule.label,
            severity: rule.severity,
            confidence_base: rule.confidence_base,
            cpic_guideline: rule.cpic_guideline.to_string(),
            clinical_action: rule.clinical_action.to_string(),
        }
    }
}

/// Synthesized Safe default for phenotypes without a curated rule.
fn default_safe_rule(drug_name: &str, gene: Gene, phenotype: Phenotype) -> ResolvedRule {
    ResolvedRule {
        label: RiskLabel::Safe,
        severity: Severity::None,
        confidence_base: DEFAULT_RULE_CONFIDENCE,
        cpic_guideline: String::from("No specific CPIC guidance"),
        clinical_action: format!(
            "No specific {} recommendation for {} {} phenotype. \
            Use standard dosing with caution.",
            drug_name, phenotype, gene
        ),
    }
}

/// Evaluator resolving drug risk from the per-gene results.
pub struct Evaluator<'a> {
    /// The parent evaluator holding the reference tables.
    parent: &'a super::Evaluator,
}

impl<'a> Evaluator<'a> {
    /// Create a new `Evaluator` borrowing from the parent.
    pub fn with_parent(parent: &'a super::Evaluator) -> Self {
        Self { parent }
    }

    /// Resolve the risk prediction for one drug.
    ///
    /// Walks the drug's genes in priority order and keys the prediction on
    /// the first gene with a usable phenotype. Unknown drugs and drugs whose
    /// genes all lack a usable phenotype yield the respective fallback
    /// results.
    pub fn evaluate(
        &self,
        drug_name: &str,
        gene_results: &BTreeMap<Gene, GeneResult>,
    ) -> DrugRiskResult {
        let drug_key = normalize(drug_name);
        tracing::debug!("resolving risk for drug {:?} (key {:?})", drug_name, drug_key);

        let rules = match self.parent.data().rules_for_drug(&drug_key) {
            Some(rules) => rules,
            None => {
                tracing::warn!("drug {:?} is not in the rule table", drug_name);
                return unknown_drug_result(drug_name);
            }
        };

        for block in rules.genes {
            let gene_result = match gene_results.get(&block.gene) {
                Some(gene_result) => gene_result,
                None => {
                    tracing::debug!("{}: no analysis result, trying next gene", block.gene);
                    continue;
                }
            };
            if gene_result.phenotype == Phenotype::Indeterminate {
                tracing::debug!("{}: phenotype indeterminate, trying next gene", block.gene);
                continue;
            }

            let rule = match block.rule_for(gene_result.phenotype) {
                Some(rule) => ResolvedRule::from(rule),
                None => {
                    tracing::debug!(
                        "{}: no curated rule for {}, synthesizing Safe default",
                        block.gene,
                        gene_result.phenotype
                    );
                    default_safe_rule(drug_name, block.gene, gene_result.phenotype)
                }
            };

            let annotated = &gene_result.annotated_variants;
            let has_variants = !annotated.is_empty();
            let confidence_score = confidence::confidence(
                rule.confidence_base,
                annotated.len(),
                confidence::evidence_factor(annotated),
                has_variants,
            );
            let evidence_strength = confidence::weakest_evidence(annotated)
                .map(EvidenceStrength::from)
                .unwrap_or(EvidenceStrength::Inferred);

            tracing::info!(
                "{}: {} via {} gives {} (severity {}, confidence {:.3})",
                drug_name,
                gene_result.phenotype,
                block.gene,
                rule.label,
                rule.severity,
                confidence_score
            );

            let reasoning = risk_reasoning(drug_name, block.gene, gene_result, &rule);
            return DrugRiskResult {
                drug: drug_name.to_string(),
                gene_used: Some(block.gene),
                phenotype: gene_result.phenotype,
                risk_label: rule.label,
                severity: rule.severity,
                confidence_score,
                clinical_action: rule.clinical_action,
                cpic_guideline: rule.cpic_guideline,
                supporting_variants: gene_result.detected_rsids.clone(),
                reasoning,
                evidence_strength,
            };
        }

        tracing::warn!("no usable gene result for drug {:?}", drug_name);
        insufficient_data_result(drug_name)
    }
}

/// Render the plain-English risk reasoning.
fn risk_reasoning(
    drug_name: &str,
    gene: Gene,
    gene_result: &GeneResult,
    rule: &ResolvedRule,
) -> String {
    format!(
        "{} risk assessment based on {} phenotype ({}, activity score {:.2}). \
        CPIC classification: '{}' (severity: {}).",
        crate::common::capitalize(drug_name),
        gene,
        gene_result.phenotype,
        gene_result.total_activity_score,
        rule.label,
        rule.severity
    )
}

/// Result for a drug without any entry in the rule table.
pub(crate) fn unknown_drug_result(drug_name: &str) -> DrugRiskResult {
    DrugRiskResult {
        drug: drug_name.to_string(),
        gene_used: None,
        phenotype: Phenotype::Indeterminate,
        risk_label: RiskLabel::Unknown,
        severity: Severity::Unknown,
        confidence_score: 0.0,
        clinical_action: format!(
            "No pharmacogenomic data available for '{}'. \
            Proceed per standard clinical guidelines.",
            drug_name
        ),
        cpic_guideline: String::from("N/A"),
        supporting_variants: vec![],
        reasoning: format!("Drug '{}' is not in the current CPIC rule set.", drug_name),
        evidence_strength: EvidenceStrength::None,
    }
}

/// Result for a supported drug whose relevant genes all lack a usable
/// phenotype.
fn insufficient_data_result(drug_name: &str) -> DrugRiskResult {
    DrugRiskResult {
        drug: drug_name.to_string(),
        gene_used: None,
        phenotype: Phenotype::Indeterminate,
        risk_label: RiskLabel::Unknown,
        severity: Severity::Unknown,
        confidence_score: 0.40,
        clinical_action: format!(
            "Insufficient genomic data to assess {} risk. \
            No variants detected in relevant genes. Proceed with standard care.",
            drug_name
        ),
        cpic_guideline: String::from("N/A"),
        supporting_variants: vec![],
        reasoning: format!(
            "Relevant genes for {} were not detected in the VCF. Risk set to Unknown.",
            drug_name
        ),
        evidence_strength: EvidenceStrength::None,
    }
}

/// Stub appended to multi-drug results for requested but unsupported drugs.
pub(crate) fn unsupported_stub(drug_name: &str) -> DrugRiskResult {
    DrugRiskResult {
        drug: drug_name.to_string(),
        gene_used: None,
        phenotype: Phenotype::Indeterminate,
        risk_label: RiskLabel::Unknown,
        severity: Severity::Unknown,
        confidence_score: 0.0,
        clinical_action: format!("'{}' is not in the supported drug list.", drug_name),
        cpic_guideline: String::from("N/A"),
        supporting_variants: vec![],
        reasoning: format!(
            "Drug '{}' is not supported by this version of starfish.",
            drug_name
        ),
        evidence_strength: EvidenceStrength::None,
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;

    use crate::pgx::ds::{
        EvidenceStrength, Gene, Phenotype, RiskLabel, Severity, VariantObservation,
    };
    use crate::pgx::eval::result::GeneResult;
    use crate::pgx::eval::Evaluator;

    fn observation(gene: &str, rsid: &str, gt: &str) -> VariantObservation {
        VariantObservation {
            gene: gene.to_string(),
            chrom: String::from("10"),
            pos: 94_781_859,
            rsid: vec![rsid.to_string()],
            reference: String::from("G"),
            alt: vec![String::from("A")],
            gt: gt.to_string(),
        }
    }

    fn bare_gene_result(gene: Gene, phenotype: Phenotype, score: f64) -> GeneResult {
        GeneResult {
            gene,
            detected_rsids: vec![],
            annotated_variants: vec![],
            total_activity_score: score,
            diplotype: format!("{}:*1/*1", gene),
            phenotype,
            phenotype_reasoning: String::new(),
        }
    }

    #[test]
    fn unknown_drug_yields_zero_confidence() -> Result<(), anyhow::Error> {
        let evaluator = Evaluator::new()?;
        let gene_results = evaluator.analyze_genes(&[]);
        let result =
            super::Evaluator::with_parent(&evaluator).evaluate("aspirin", &gene_results);

        assert_eq!(result.gene_used, None);
        assert_eq!(result.phenotype, Phenotype::Indeterminate);
        assert_eq!(result.risk_label, RiskLabel::Unknown);
        assert_eq!(result.severity, Severity::Unknown);
        assert_eq!(result.confidence_score, 0.0);
        assert_eq!(result.evidence_strength, EvidenceStrength::None);
        assert!(result
            .clinical_action
            .contains("No pharmacogenomic data available for 'aspirin'"));
        Ok(())
    }

    #[test]
    fn missing_gene_results_yield_insufficient_data() -> Result<(), anyhow::Error> {
        let evaluator = Evaluator::new()?;
        let result =
            super::Evaluator::with_parent(&evaluator).evaluate("warfarin", &BTreeMap::new());

        assert_eq!(result.gene_used, None);
        assert_eq!(result.risk_label, RiskLabel::Unknown);
        assert_eq!(result.confidence_score, 0.40);
        assert!(result
            .clinical_action
            .contains("Insufficient genomic data to assess warfarin risk"));
        assert!(result
            .reasoning
            .contains("Relevant genes for warfarin were not detected"));
        Ok(())
    }

    #[test]
    fn priority_walk_skips_indeterminate_genes() -> Result<(), anyhow::Error> {
        let evaluator = Evaluator::new()?;
        let observations = vec![observation("CYP2C19", "rs4244285", "1/1")];
        let mut gene_results = evaluator.analyze_genes(&observations);
        gene_results.insert(
            Gene::Cyp2d6,
            bare_gene_result(Gene::Cyp2d6, Phenotype::Indeterminate, 0.0),
        );

        let result =
            super::Evaluator::with_parent(&evaluator).evaluate("amitriptyline", &gene_results);

        assert_eq!(result.gene_used, Some(Gene::Cyp2c19));
        assert_eq!(result.phenotype, Phenotype::PoorMetabolizer);
        assert_eq!(result.risk_label, RiskLabel::Toxic);
        assert_eq!(result.severity, Severity::High);
        Ok(())
    }

    #[test]
    fn priority_walk_prefers_the_first_usable_gene() -> Result<(), anyhow::Error> {
        let evaluator = Evaluator::new()?;
        let observations = vec![observation("CYP2C19", "rs4244285", "1/1")];
        let gene_results = evaluator.analyze_genes(&observations);

        // CYP2D6 carries a valid reference-inferred phenotype, so it wins
        // over the variant-backed CYP2C19 result.
        let result =
            super::Evaluator::with_parent(&evaluator).evaluate("amitriptyline", &gene_results);

        assert_eq!(result.gene_used, Some(Gene::Cyp2d6));
        assert_eq!(result.phenotype, Phenotype::NormalMetabolizer);
        assert_eq!(result.evidence_strength, EvidenceStrength::Inferred);
        Ok(())
    }

    #[test]
    fn synthesized_default_covers_uncurated_phenotypes() -> Result<(), anyhow::Error> {
        let evaluator = Evaluator::new()?;
        let mut gene_results = BTreeMap::new();
        gene_results.insert(
            Gene::Cyp2d6,
            bare_gene_result(Gene::Cyp2d6, Phenotype::RapidMetabolizer, 2.5),
        );

        let result =
            super::Evaluator::with_parent(&evaluator).evaluate("tramadol", &gene_results);

        assert_eq!(result.gene_used, Some(Gene::Cyp2d6));
        assert_eq!(result.risk_label, RiskLabel::Safe);
        assert_eq!(result.severity, Severity::None);
        // 0.70 * 0.6 * 0.85 without variant support
        assert_eq!(result.confidence_score, 0.357);
        assert_eq!(result.cpic_guideline, "No specific CPIC guidance");
        assert_eq!(
            result.clinical_action,
            "No specific tramadol recommendation for Rapid Metabolizer CYP2D6 phenotype. \
            Use standard dosing with caution."
        );
        Ok(())
    }

    #[test]
    fn weakest_evidence_is_reported() -> Result<(), anyhow::Error> {
        let evaluator = Evaluator::new()?;
        let observations = vec![
            observation("CYP2D6", "rs16947", "0/1"),
            observation("CYP2D6", "rs1135840", "0/1"),
        ];
        let gene_results = evaluator.analyze_genes(&observations);
        let result = super::Evaluator::with_parent(&evaluator).evaluate("codeine", &gene_results);

        assert_eq!(result.gene_used, Some(Gene::Cyp2d6));
        assert_eq!(result.phenotype, Phenotype::NormalMetabolizer);
        assert_eq!(result.risk_label, RiskLabel::Safe);
        // rs1135840 carries moderate evidence, dragging the level down
        assert_eq!(result.evidence_strength, EvidenceStrength::Moderate);
        // (0.9 + 2 * 0.02) * 0.85
        assert_eq!(result.confidence_score, 0.799);
        assert_eq!(result.supporting_variants, vec!["rs16947", "rs1135840"]);
        Ok(())
    }

    #[test]
    fn reasoning_capitalizes_the_drug_name() -> Result<(), anyhow::Error> {
        let evaluator = Evaluator::new()?;
        let observations = vec![observation("CYP2C19", "rs4244285", "1/1")];
        let gene_results = evaluator.analyze_genes(&observations);
        let result =
            super::Evaluator::with_parent(&evaluator).evaluate("clopidogrel", &gene_results);

        assert_eq!(
            result.reasoning,
            "Clopidogrel risk assessment based on CYP2C19 phenotype (Poor Metabolizer, \
            activity score 0.00). CPIC classification: 'Ineffective' (severity: high)."
        );
        Ok(())
    }
}
