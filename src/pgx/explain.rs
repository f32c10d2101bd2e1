//! Deterministic clinical narratives for drug-risk predictions.

use crate::common::capitalize;

use super::ds::{Phenotype, Severity, VariantObservation};
use super::eval::result::{DrugRiskResult, GeneResult};

/// Generate the clinical narrative for one drug-risk prediction.
///
/// When no observations were supplied at all, a short note replaces the
/// full narrative.
///
/// # Arguments
///
/// * `observations` - All observations that went into the analysis.
/// * `result` - The prediction to explain.
/// * `gene_profile` - The profile of the gene the prediction keys on, if
///   any.
///
/// # Returns
///
/// The narrative string.
pub fn explain(
    observations: &[VariantObservation],
    result: &DrugRiskResult,
    gene_profile: Option<&GeneResult>,
) -> String {
    if observations.is_empty() {
        return format!(
            "No pharmacogenomic variants relevant to {} were detected in the uploaded \
            VCF file. In the absence of known risk variants, standard {} dosing is \
            generally appropriate. Clinical judgment should guide prescribing decisions.",
            capitalize(&result.drug),
            capitalize(&result.drug)
        );
    }

    let gene_label = gene_profile
        .map(|profile| profile.gene.to_string())
        .unwrap_or_else(|| String::from("Unknown gene"));
    let diplotype = gene_profile
        .map(|profile| profile.diplotype.as_str())
        .unwrap_or("Unknown");
    let phenotype = gene_profile
        .map(|profile| profile.phenotype)
        .unwrap_or(Phenotype::Indeterminate);
    let rsids = gene_profile
        .map(|profile| profile.detected_rsids.as_slice())
        .unwrap_or(&[]);

    let variant_text = if rsids.is_empty() {
        format!(
            "No annotated variants found in {}; reference diplotype {} assumed.",
            gene_label, diplotype
        )
    } else {
        format!(
            "Detected variants ({}) mapped to diplotype {}.",
            rsids.join(", "),
            diplotype
        )
    };

    let mut parts = vec![
        format!(
            "Pharmacogenomic analysis of {} based on {} genotyping:",
            capitalize(&result.drug),
            gene_label
        ),
        format!(
            "The patient {} ({}). {}",
            phenotype_description(phenotype),
            phenotype,
            variant_text
        ),
        format!(
            "Risk classification: '{}'. {}",
            result.risk_label,
            severity_context(result.severity)
        ),
    ];
    if !result.clinical_action.is_empty() {
        parts.push(format!("Clinical recommendation: {}", result.clinical_action));
    }
    parts.push(String::from(
        "This assessment follows CPIC (Clinical Pharmacogenomics Implementation \
        Consortium) guidelines and should be interpreted alongside the patient's \
        full clinical context.",
    ));
    parts.join(" ")
}

/// How the patient handles the drug, phrased for the narrative.
fn phenotype_description(phenotype: Phenotype) -> &'static str {
    match phenotype {
        Phenotype::PoorMetabolizer => {
            "cannot efficiently metabolize this drug due to severely reduced enzyme activity"
        }
        Phenotype::IntermediateMetabolizer => {
            "has partially reduced enzyme activity, leading to slower drug metabolism than normal"
        }
        Phenotype::NormalMetabolizer => {
            "metabolizes this drug at a standard rate with no expected pharmacogenomic interaction"
        }
        Phenotype::RapidMetabolizer => {
            "metabolizes this drug faster than average, which may affect drug plasma levels"
        }
        Phenotype::UltrarapidMetabolizer => {
            "metabolizes this drug at an exceptionally high rate, risking sub-therapeutic \
            levels or toxicity"
        }
        Phenotype::PoorFunction => {
            "has severely reduced transporter function, impairing hepatic drug uptake"
        }
        Phenotype::DecreasedFunction => {
            "has partially reduced transporter function, which can raise systemic drug exposure"
        }
        Phenotype::NormalFunction => {
            "has standard transporter function with no expected pharmacogenomic interaction"
        }
        Phenotype::Indeterminate => {
            "has an uncertain metabolizer status based on the available genomic data"
        }
    }
}

/// Clinical context sentence for a severity level.
fn severity_context(severity: Severity) -> &'static str {
    match severity {
        Severity::None => "No clinically significant pharmacogenomic interaction is expected.",
        Severity::Low => "A minor pharmacogenomic interaction is noted; routine monitoring is advised.",
        Severity::Moderate => {
            "A clinically significant interaction exists; dose adjustment is recommended."
        }
        Severity::High => {
            "A serious pharmacogenomic interaction is identified; immediate clinical action \
            is required."
        }
        Severity::Unknown => "The interaction risk is uncertain due to insufficient genomic data.",
    }
}
