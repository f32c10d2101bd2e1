//! Risk evaluation of variant observations against the reference tables.

pub mod confidence;
pub mod drug;
pub mod gene;
pub mod result;

use std::collections::BTreeMap;

use strum::IntoEnumIterator as _;

use super::data;
use super::data::drugs::normalize;
use super::ds::{Gene, RiskLabel, Severity, VariantObservation};

use self::result::{GeneResult, RiskBundle, RiskSummary};

/// Facade for the full risk-prediction pipeline.
pub struct Evaluator {
    /// The validated reference tables.
    data: data::Data,
}

impl Evaluator {
    /// Construct a new `Evaluator` over the compiled-in reference tables.
    ///
    /// # Returns
    ///
    /// A new `Evaluator`.
    ///
    /// # Errors
    ///
    /// If anything goes wrong, it returns a generic `anyhow::Error`.
    pub fn new() -> Result<Self, anyhow::Error> {
        Ok(Self {
            data: data::Data::new()
                .map_err(|e| anyhow::anyhow!("problem loading reference tables: {}", e))?,
        })
    }

    /// Access to the reference tables.
    pub fn data(&self) -> &data::Data {
        &self.data
    }

    /// Run the gene analyzer for every covered gene.
    ///
    /// Genes without observations still produce a result, carrying the
    /// reference-inferred phenotype.
    pub fn analyze_genes(
        &self,
        observations: &[VariantObservation],
    ) -> BTreeMap<Gene, GeneResult> {
        let gene_evaluator = gene::Evaluator::with_parent(self);
        Gene::iter()
            .map(|g| (g, gene_evaluator.evaluate(g, observations)))
            .collect()
    }

    /// Predict the risk of a single drug.
    ///
    /// Unsupported drugs short-circuit to an Unknown summary without running
    /// any gene analysis.
    ///
    /// # Arguments
    ///
    /// * `observations` - The variant observations to analyze.
    /// * `drug_name` - The drug to assess, in any letter case.
    ///
    /// # Returns
    ///
    /// The condensed risk summary.
    pub fn predict(&self, observations: &[VariantObservation], drug_name: &str) -> RiskSummary {
        if !self.data.is_supported(&normalize(drug_name)) {
            tracing::warn!("drug {:?} is not supported", drug_name);
            return RiskSummary {
                label: RiskLabel::Unknown,
                severity: Severity::Unknown,
                confidence: 0.0,
                full_result: None,
            };
        }

        let gene_results = self.analyze_genes(observations);
        let result = drug::Evaluator::with_parent(self).evaluate(drug_name, &gene_results);
        RiskSummary {
            label: result.risk_label,
            severity: result.severity,
            confidence: result.confidence_score,
            full_result: Some(result),
        }
    }

    /// Predict the risk of several drugs over one shared gene analysis.
    ///
    /// Unsupported drugs are reported twice: as Unknown stubs appended to
    /// the drug results and by name in the skipped list.
    ///
    /// # Arguments
    ///
    /// * `observations` - The variant observations to analyze.
    /// * `drug_names` - The drugs to assess, in any letter case.
    ///
    /// # Returns
    ///
    /// The analysis bundle.
    pub fn predict_multi(
        &self,
        observations: &[VariantObservation],
        drug_names: &[String],
    ) -> RiskBundle {
        let mut supported = Vec::new();
        let mut skipped_drugs = Vec::new();
        for name in drug_names {
            if self.data.is_supported(&normalize(name)) {
                supported.push(name.as_str());
            } else {
                tracing::warn!("drug {:?} is not supported; skipping", name);
                skipped_drugs.push(name.clone());
            }
        }

        let gene_profiles = self.analyze_genes(observations);

        let drug_evaluator = drug::Evaluator::with_parent(self);
        let mut drug_results = Vec::with_capacity(drug_names.len());
        for name in &supported {
            drug_results.push(drug_evaluator.evaluate(name, &gene_profiles));
        }
        for name in &skipped_drugs {
            drug_results.push(drug::unsupported_stub(name));
        }

        RiskBundle {
            gene_profiles,
            drug_results,
            skipped_drugs,
        }
    }
}
