//! Per-gene analysis: allele annotation, diploid dosing, and phenotype
//! classification.

use crate::pgx::ds::{AnnotatedAllele, Gene, Phenotype, VariantObservation};

use super::result::GeneResult;

/// Number of allele slots in the diploid model.
const DIPLOID_SLOTS: usize = 2;

/// The up-to-two allele doses of a diploid genotype.
///
/// Slots fill in observation scan order; doses beyond the second are
/// discarded.
#[derive(Debug, Clone, Default)]
struct AlleleSlots {
    slots: [Option<AnnotatedAllele>; DIPLOID_SLOTS],
}

impl AlleleSlots {
    /// Insert one allele dose; returns `false` once both slots are taken.
    fn push(&mut self, allele: AnnotatedAllele) -> bool {
        for slot in self.slots.iter_mut() {
            if slot.is_none() {
                *slot = Some(allele);
                return true;
            }
        }
        false
    }

    /// The filled slots in insertion order.
    fn filled(&self) -> impl Iterator<Item = &AnnotatedAllele> {
        self.slots.iter().flatten()
    }

    fn n_filled(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Total activity score; empty slots contribute the per-allele reference
    /// score.
    fn total_activity(&self, reference_score: f64) -> f64 {
        let observed: f64 = self.filled().map(|allele| allele.activity_score).sum();
        observed + (DIPLOID_SLOTS - self.n_filled()) as f64 * reference_score
    }
}

/// Evaluator for one gene's observations.
pub struct Evaluator<'a> {
    /// The parent evaluator holding the reference tables.
    parent: &'a super::Evaluator,
}

impl<'a> Evaluator<'a> {
    /// Create a new `Evaluator` borrowing from the parent.
    pub fn with_parent(parent: &'a super::Evaluator) -> Self {
        Self { parent }
    }

    /// Analyze all observations claimed for `gene`.
    ///
    /// Observations for other genes and observations that cannot be
    /// annotated are skipped.
    pub fn evaluate(&self, gene: Gene, observations: &[VariantObservation]) -> GeneResult {
        let data = self.parent.data();
        let mut slots = AlleleSlots::default();

        for observation in observations {
            if Gene::from_symbol(&observation.gene) != Some(gene) {
                continue;
            }
            let annotated = match data.annotate(observation) {
                Some(annotated) => annotated,
                None => {
                    tracing::debug!(
                        "{}: skipping observation with rsID(s) {:?}",
                        gene,
                        observation.rsid
                    );
                    continue;
                }
            };
            let doses = observation.zygosity().dose_units();
            tracing::debug!(
                "{}: {} ({:?}) maps to {} with {} dose(s)",
                gene,
                annotated.rsid,
                observation.gt,
                annotated.star_allele,
                doses
            );
            for _ in 0..doses {
                if !slots.push(annotated.clone()) {
                    break;
                }
            }
        }

        // Unfilled slots are assumed to carry the reference allele.
        let reference_score = data.default_diploid_score(gene) / 2.0;
        let total_activity_score = slots.total_activity(reference_score);
        let phenotype = data.classify_phenotype(gene, total_activity_score);
        let diplotype = diplotype_label(gene, &slots);

        let annotated_variants: Vec<AnnotatedAllele> = slots.filled().cloned().collect();
        let detected_rsids: Vec<String> = annotated_variants
            .iter()
            .map(|allele| allele.rsid.clone())
            .collect();
        let phenotype_reasoning =
            phenotype_reasoning(gene, phenotype, total_activity_score, &annotated_variants);

        tracing::info!(
            "{}: activity score {:.2}, phenotype {}, diplotype {}",
            gene,
            total_activity_score,
            phenotype,
            diplotype
        );

        GeneResult {
            gene,
            detected_rsids,
            annotated_variants,
            total_activity_score,
            diplotype,
            phenotype,
            phenotype_reasoning,
        }
    }
}

/// Render the gene-prefixed diplotype label, e.g. `CYP2C19:*2/*17`.
///
/// Empty slots render as the reference allele `*1`; two distinct star
/// alleles are sorted lexicographically.
fn diplotype_label(gene: Gene, slots: &AlleleSlots) -> String {
    let stars: Vec<&str> = slots
        .filled()
        .map(|allele| allele.star_allele.as_str())
        .collect();
    match (stars.first(), stars.get(1)) {
        (None, _) => format!("{}:*1/*1", gene),
        (Some(star), None) => format!("{}:{}/*1", gene, star),
        (Some(first), Some(second)) => {
            if first == second {
                format!("{}:{}/{}", gene, first, second)
            } else {
                let mut pair = [*first, *second];
                pair.sort_unstable();
                format!("{}:{}/{}", gene, pair[0], pair[1])
            }
        }
    }
}

/// Render the plain-English phenotype reasoning.
fn phenotype_reasoning(
    gene: Gene,
    phenotype: Phenotype,
    score: f64,
    annotated: &[AnnotatedAllele],
) -> String {
    let variant_list = if annotated.is_empty() {
        String::from("no database-annotated variants")
    } else {
        annotated
            .iter()
            .map(|allele| {
                format!(
                    "{} ({}, {})",
                    allele.rsid, allele.star_allele, allele.function
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "{} activity score = {:.2}. Detected variants: {}. \
        Phenotype classified as {} per CPIC activity-score model.",
        gene, score, variant_list, phenotype
    )
}

#[cfg(test)]
mod test {
    use crate::pgx::ds::{Gene, Phenotype, VariantObservation};
    use crate::pgx::eval::Evaluator;

    fn observation(gene: &str, rsid: &str, gt: &str) -> VariantObservation {
        VariantObservation {
            gene: gene.to_string(),
            chrom: String::from("22"),
            pos: 42_128_945,
            rsid: vec![rsid.to_string()],
            reference: String::from("C"),
            alt: vec![String::from("T")],
            gt: gt.to_string(),
        }
    }

    #[rstest::rstest]
    #[case(Gene::Cyp2d6, 2.0, Phenotype::NormalMetabolizer, "CYP2D6:*1/*1")]
    #[case(Gene::Cyp2c19, 1.0, Phenotype::NormalMetabolizer, "CYP2C19:*1/*1")]
    #[case(Gene::Slco1b1, 2.0, Phenotype::NormalFunction, "SLCO1B1:*1/*1")]
    #[case(Gene::Dpyd, 2.0, Phenotype::NormalMetabolizer, "DPYD:*1/*1")]
    fn no_observations_yield_reference_defaults(
        #[case] gene: Gene,
        #[case] expected_score: f64,
        #[case] expected_phenotype: Phenotype,
        #[case] expected_diplotype: &str,
    ) -> Result<(), anyhow::Error> {
        let evaluator = Evaluator::new()?;
        let result = super::Evaluator::with_parent(&evaluator).evaluate(gene, &[]);

        assert_eq!(result.total_activity_score, expected_score);
        assert_eq!(result.phenotype, expected_phenotype);
        assert_eq!(result.diplotype, expected_diplotype);
        assert!(result.detected_rsids.is_empty());
        assert!(result
            .phenotype_reasoning
            .contains("no database-annotated variants"));
        Ok(())
    }

    #[test]
    fn heterozygous_variant_fills_one_slot() -> Result<(), anyhow::Error> {
        let evaluator = Evaluator::new()?;
        let observations = vec![observation("SLCO1B1", "rs4149056", "0/1")];
        let result =
            super::Evaluator::with_parent(&evaluator).evaluate(Gene::Slco1b1, &observations);

        // 0.0 observed plus one reference allele at 1.0
        assert_eq!(result.total_activity_score, 1.0);
        assert_eq!(result.phenotype, Phenotype::DecreasedFunction);
        assert_eq!(result.diplotype, "SLCO1B1:*5/*1");
        assert_eq!(result.detected_rsids, vec!["rs4149056"]);
        Ok(())
    }

    #[test]
    fn homozygous_variant_fills_both_slots() -> Result<(), anyhow::Error> {
        let evaluator = Evaluator::new()?;
        let observations = vec![observation("CYP2C19", "rs4244285", "1/1")];
        let result =
            super::Evaluator::with_parent(&evaluator).evaluate(Gene::Cyp2c19, &observations);

        assert_eq!(result.total_activity_score, 0.0);
        assert_eq!(result.phenotype, Phenotype::PoorMetabolizer);
        assert_eq!(result.diplotype, "CYP2C19:*2/*2");
        assert_eq!(result.detected_rsids, vec!["rs4244285", "rs4244285"]);
        assert_eq!(result.annotated_variants.len(), 2);
        Ok(())
    }

    #[test]
    fn doses_beyond_the_second_slot_are_discarded() -> Result<(), anyhow::Error> {
        let evaluator = Evaluator::new()?;
        let observations = vec![
            observation("CYP2D6", "rs3892097", "0/1"),
            observation("CYP2D6", "rs35742686", "0/1"),
            observation("CYP2D6", "rs5030655", "0/1"),
        ];
        let result =
            super::Evaluator::with_parent(&evaluator).evaluate(Gene::Cyp2d6, &observations);

        assert_eq!(result.detected_rsids, vec!["rs3892097", "rs35742686"]);
        assert_eq!(result.total_activity_score, 0.0);
        assert_eq!(result.phenotype, Phenotype::PoorMetabolizer);
        // scan order *4, *3; rendered sorted
        assert_eq!(result.diplotype, "CYP2D6:*3/*4");
        Ok(())
    }

    #[test]
    fn heterozygous_then_homozygous_keeps_scan_order() -> Result<(), anyhow::Error> {
        let evaluator = Evaluator::new()?;
        let observations = vec![
            observation("CYP2D6", "rs16947", "0/1"),
            observation("CYP2D6", "rs3892097", "1/1"),
        ];
        let result =
            super::Evaluator::with_parent(&evaluator).evaluate(Gene::Cyp2d6, &observations);

        // one normal-function dose plus one of the two loss-of-function doses
        assert_eq!(result.detected_rsids, vec!["rs16947", "rs3892097"]);
        assert_eq!(result.total_activity_score, 1.0);
        assert_eq!(result.phenotype, Phenotype::IntermediateMetabolizer);
        assert_eq!(result.diplotype, "CYP2D6:*2/*4");
        Ok(())
    }

    #[test]
    fn reference_genotype_contributes_no_dose() -> Result<(), anyhow::Error> {
        let evaluator = Evaluator::new()?;
        let observations = vec![observation("CYP2D6", "rs3892097", "0/0")];
        let result =
            super::Evaluator::with_parent(&evaluator).evaluate(Gene::Cyp2d6, &observations);

        assert_eq!(result.total_activity_score, 2.0);
        assert_eq!(result.phenotype, Phenotype::NormalMetabolizer);
        assert!(result.detected_rsids.is_empty());
        Ok(())
    }

    #[test]
    fn observations_for_other_genes_are_ignored() -> Result<(), anyhow::Error> {
        let evaluator = Evaluator::new()?;
        let observations = vec![observation("SLCO1B1", "rs4149056", "0/1")];
        let result =
            super::Evaluator::with_parent(&evaluator).evaluate(Gene::Cyp2d6, &observations);

        assert_eq!(result.total_activity_score, 2.0);
        assert_eq!(result.diplotype, "CYP2D6:*1/*1");
        Ok(())
    }

    #[test]
    fn unannotatable_observations_are_skipped() -> Result<(), anyhow::Error> {
        let evaluator = Evaluator::new()?;
        let observations = vec![
            observation("CYP2C19", "rs999999999", "0/1"),
            observation("CYP2C19", "rs12248560", "0/1"),
        ];
        let result =
            super::Evaluator::with_parent(&evaluator).evaluate(Gene::Cyp2c19, &observations);

        // 1.0 for the increased-function allele plus 0.5 reference padding
        assert_eq!(result.detected_rsids, vec!["rs12248560"]);
        assert_eq!(result.total_activity_score, 1.5);
        assert_eq!(result.phenotype, Phenotype::RapidMetabolizer);
        assert_eq!(result.diplotype, "CYP2C19:*17/*1");
        Ok(())
    }

    #[test]
    fn reasoning_lists_annotated_variants() -> Result<(), anyhow::Error> {
        let evaluator = Evaluator::new()?;
        let observations = vec![observation("TPMT", "rs1142345", "0/1")];
        let result = super::Evaluator::with_parent(&evaluator).evaluate(Gene::Tpmt, &observations);

        assert_eq!(
            result.phenotype_reasoning,
            "TPMT activity score = 1.00. Detected variants: rs1142345 (*3C, LOF). \
            Phenotype classified as Intermediate Metabolizer per CPIC activity-score model."
        );
        Ok(())
    }
}
