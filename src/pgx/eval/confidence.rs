//! Evidence-weighted confidence scoring.

use crate::pgx::ds::{AnnotatedAllele, Evidence};

/// Multiplier applied to a rule's base confidence when no variant supports
/// the phenotype call.
const NO_EVIDENCE_FACTOR: f64 = 0.6;

/// Deduction applied when the phenotype was inferred from the absence of
/// variants rather than from observed alleles.
const INFERRED_PENALTY: f64 = 0.85;

/// Weakest evidence level among the supporting variants, if any.
pub fn weakest_evidence(annotated: &[AnnotatedAllele]) -> Option<Evidence> {
    annotated.iter().map(|allele| allele.evidence_strength).max()
}

/// Confidence multiplier derived from the weakest evidence level among the
/// supporting variants, or [`NO_EVIDENCE_FACTOR`] when there are none.
pub fn evidence_factor(annotated: &[AnnotatedAllele]) -> f64 {
    weakest_evidence(annotated)
        .map(Evidence::weight)
        .unwrap_or(NO_EVIDENCE_FACTOR)
}

/// Compute the final confidence score on `[0.0, 1.0]`.
///
/// With variant support, the rule's base confidence earns a small bonus per
/// supporting variant (capped at 0.05) before the evidence factor is applied.
/// Without support, the weighted base takes the inferred-phenotype deduction
/// instead.
///
/// # Arguments
///
/// * `base` - Base confidence of the matched clinical rule.
/// * `n_variants` - Number of alleles supporting the phenotype call.
/// * `evidence_factor` - Multiplier from [`evidence_factor`].
/// * `has_variants` - Whether any allele supports the call.
///
/// # Returns
///
/// The confidence score, rounded to three decimals.
pub fn confidence(base: f64, n_variants: usize, evidence_factor: f64, has_variants: bool) -> f64 {
    if !has_variants {
        return round3((base * evidence_factor * INFERRED_PENALTY).min(1.0));
    }
    let variant_bonus = (n_variants as f64 * 0.02).min(0.05);
    round3(((base + variant_bonus) * evidence_factor).min(1.0))
}

/// Round half away from zero to three decimals.
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod test {
    use crate::pgx::ds::{AnnotatedAllele, Evidence, Gene};

    fn allele(evidence: Evidence) -> AnnotatedAllele {
        AnnotatedAllele {
            rsid: String::from("rs4244285"),
            gene: Gene::Cyp2c19,
            star_allele: String::from("*2"),
            function: crate::pgx::ds::AlleleFunction::Lof,
            activity_score: 0.0,
            evidence_strength: evidence,
            chrom: String::from("10"),
            pos: 94_781_859,
            reference: String::from("G"),
            alt: vec![String::from("A")],
        }
    }

    #[test]
    fn evidence_factor_uses_weakest_level() {
        let annotated = vec![allele(Evidence::High), allele(Evidence::Moderate)];
        assert_eq!(super::weakest_evidence(&annotated), Some(Evidence::Moderate));
        assert_eq!(super::evidence_factor(&annotated), 0.85);
    }

    #[test]
    fn evidence_factor_without_variants() {
        assert_eq!(super::weakest_evidence(&[]), None);
        assert_eq!(super::evidence_factor(&[]), 0.6);
    }

    #[rstest::rstest]
    // (0.95 + 2 * 0.02) * 1.0 = 0.99
    #[case(0.95, 2, 1.0, true, 0.99)]
    // bonus capped at 0.05 even for three or more variants
    #[case(0.95, 3, 1.0, true, 1.0)]
    // 0.9 * 0.6 * 0.85 = 0.459, the no-variant warfarin path
    #[case(0.9, 0, 0.6, false, 0.459)]
    // (0.85 + 0.02) * 1.0 = 0.87, the heterozygous simvastatin path
    #[case(0.85, 1, 1.0, true, 0.87)]
    // moderate evidence drags the weighted product down
    #[case(0.9, 2, 0.85, true, 0.799)]
    // never exceeds 1.0
    #[case(0.98, 3, 1.0, true, 1.0)]
    fn confidence_scores(
        #[case] base: f64,
        #[case] n_variants: usize,
        #[case] factor: f64,
        #[case] has_variants: bool,
        #[case] expected: f64,
    ) {
        assert_eq!(
            super::confidence(base, n_variants, factor, has_variants),
            expected
        );
    }
}
