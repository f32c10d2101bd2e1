//! Access to the compiled-in clinical reference tables.

pub mod alleles;
pub mod drugs;
pub mod phenotype;

use rustc_hash::FxHashMap;

use super::ds::{AnnotatedAllele, Gene, Phenotype, VariantObservation};

/// Facade struct for accessing the reference tables.
///
/// Construction validates the tables once; all accessors are infallible
/// afterwards.
pub struct Data {
    /// Mapping from rsID to allele-definition row.
    rsid_to_allele: FxHashMap<&'static str, &'static alleles::AlleleDefinition>,
    /// Mapping from normalized drug name to rule set.
    drug_to_rules: FxHashMap<&'static str, &'static drugs::DrugRules>,
    /// Drug names in table order.
    drug_names: Vec<&'static str>,
    /// Mapping from gene to phenotype intervals.
    gene_to_intervals: FxHashMap<Gene, &'static [phenotype::ScoreInterval]>,
    /// Mapping from gene to default diploid activity score.
    gene_to_default: FxHashMap<Gene, f64>,
}

impl Data {
    /// Build the lookup indexes over the static tables.
    ///
    /// # Returns
    ///
    /// A new `Data`.
    ///
    /// # Errors
    ///
    /// Returns an error if any table is malformed (duplicate keys, empty or
    /// unordered rule blocks).
    pub fn new() -> Result<Self, anyhow::Error> {
        let mut rsid_to_allele = FxHashMap::default();
        for def in alleles::ALLELE_DEFINITIONS {
            if rsid_to_allele.insert(def.rsid, def).is_some() {
                anyhow::bail!("duplicate rsID in allele table: {}", def.rsid);
            }
        }

        let mut drug_to_rules = FxHashMap::default();
        let mut drug_names = Vec::new();
        for drug in drugs::DRUG_RULES {
            if drugs::normalize(drug.name) != drug.name {
                anyhow::bail!("drug name is not normalized: {}", drug.name);
            }
            if drug.genes.is_empty() {
                anyhow::bail!("drug without gene blocks: {}", drug.name);
            }
            for block in drug.genes {
                if block.rules.is_empty() {
                    anyhow::bail!("empty rule block for {}/{}", drug.name, block.gene);
                }
                for (idx, (phenotype, _)) in block.rules.iter().enumerate() {
                    if block.rules[..idx].iter().any(|(p, _)| p == phenotype) {
                        anyhow::bail!(
                            "duplicate phenotype rule for {}/{}: {}",
                            drug.name,
                            block.gene,
                            phenotype
                        );
                    }
                }
            }
            if drug_to_rules.insert(drug.name, drug).is_some() {
                anyhow::bail!("duplicate drug in rule table: {}", drug.name);
            }
            drug_names.push(drug.name);
        }

        let mut gene_to_intervals = FxHashMap::default();
        for gi in phenotype::PHENOTYPE_INTERVALS {
            for interval in gi.intervals {
                if interval.lower >= interval.upper {
                    anyhow::bail!("empty score interval for {}", gi.gene);
                }
            }
            for window in gi.intervals.windows(2) {
                if window[0].upper > window[1].lower {
                    anyhow::bail!("overlapping score intervals for {}", gi.gene);
                }
            }
            if gene_to_intervals.insert(gi.gene, gi.intervals).is_some() {
                anyhow::bail!("duplicate interval table for {}", gi.gene);
            }
        }

        let mut gene_to_default = FxHashMap::default();
        for (gene, score) in phenotype::DEFAULT_DIPLOID_SCORES {
            if gene_to_default.insert(*gene, *score).is_some() {
                anyhow::bail!("duplicate default score for {}", gene);
            }
        }

        Ok(Self {
            rsid_to_allele,
            drug_to_rules,
            drug_names,
            gene_to_intervals,
            gene_to_default,
        })
    }

    /// Obtain the allele definition for the given rsID, if curated.
    pub fn allele_by_rsid(&self, rsid: &str) -> Option<&'static alleles::AlleleDefinition> {
        self.rsid_to_allele.get(rsid).copied()
    }

    /// Resolve a variant observation against the allele table.
    ///
    /// The observation's rsIDs are tried in order and the first one present
    /// in the table wins. The observation's claimed gene must agree with the
    /// matched definition; a mismatch rejects the observation.
    ///
    /// # Arguments
    ///
    /// * `observation` - The variant observation to resolve.
    ///
    /// # Returns
    ///
    /// The annotated allele, if any rsID matched consistently.
    pub fn annotate(&self, observation: &VariantObservation) -> Option<AnnotatedAllele> {
        let claimed = Gene::from_symbol(&observation.gene)?;
        for rsid in &observation.rsid {
            if rsid.is_empty() {
                continue;
            }
            if let Some(def) = self.allele_by_rsid(rsid) {
                if def.gene != claimed {
                    return None;
                }
                return Some(AnnotatedAllele {
                    rsid: rsid.clone(),
                    gene: def.gene,
                    star_allele: def.star_allele.to_string(),
                    function: def.function,
                    activity_score: def.activity_score(),
                    evidence_strength: def.evidence,
                    chrom: observation.chrom.clone(),
                    pos: observation.pos,
                    reference: observation.reference.clone(),
                    alt: observation.alt.clone(),
                });
            }
        }
        None
    }

    /// Default diploid activity score of a gene (two reference alleles).
    pub fn default_diploid_score(&self, gene: Gene) -> f64 {
        self.gene_to_default.get(&gene).copied().unwrap_or(2.0)
    }

    /// Map a gene's total activity score to its phenotype.
    ///
    /// Scores at or above the last interval's upper bound classify as the
    /// last interval's phenotype; a gene without intervals classifies as
    /// `Indeterminate`.
    pub fn classify_phenotype(&self, gene: Gene, score: f64) -> Phenotype {
        let intervals = match self.gene_to_intervals.get(&gene) {
            Some(intervals) => *intervals,
            None => return Phenotype::Indeterminate,
        };
        for interval in intervals {
            if interval.lower <= score && score < interval.upper {
                return interval.phenotype;
            }
        }
        intervals
            .last()
            .map(|interval| interval.phenotype)
            .unwrap_or(Phenotype::Indeterminate)
    }

    /// Obtain the rule set for a normalized drug name.
    pub fn rules_for_drug(&self, normalized_name: &str) -> Option<&'static drugs::DrugRules> {
        self.drug_to_rules.get(normalized_name).copied()
    }

    /// Whether the normalized drug name has curated rules.
    pub fn is_supported(&self, normalized_name: &str) -> bool {
        self.drug_to_rules.contains_key(normalized_name)
    }

    /// The supported drug names in table order.
    pub fn supported_drugs(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.drug_names.iter().copied()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::pgx::ds::{AlleleFunction, Evidence};

    fn observation(gene: &str, rsid: &[&str], gt: &str) -> VariantObservation {
        VariantObservation {
            gene: gene.to_string(),
            chrom: String::from("22"),
            pos: 42128945,
            rsid: rsid.iter().map(|s| s.to_string()).collect(),
            reference: String::from("C"),
            alt: vec![String::from("T")],
            gt: gt.to_string(),
        }
    }

    #[test]
    fn new_validates_tables() -> Result<(), anyhow::Error> {
        let data = Data::new()?;
        assert_eq!(data.supported_drugs().count(), 25);
        Ok(())
    }

    #[test]
    fn annotate_known_rsid() -> Result<(), anyhow::Error> {
        let data = Data::new()?;
        let ann = data
            .annotate(&observation("CYP2D6", &["rs3892097"], "0/1"))
            .unwrap();
        assert_eq!(ann.gene, Gene::Cyp2d6);
        assert_eq!(ann.star_allele, "*4");
        assert_eq!(ann.function, AlleleFunction::Lof);
        assert_eq!(ann.activity_score, 0.0);
        assert_eq!(ann.evidence_strength, Evidence::High);
        assert_eq!(ann.chrom, "22");
        assert_eq!(ann.pos, 42128945);
        Ok(())
    }

    #[test]
    fn annotate_takes_first_matching_rsid() -> Result<(), anyhow::Error> {
        let data = Data::new()?;
        let ann = data
            .annotate(&observation(
                "CYP2C19",
                &["rs0000000", "rs4244285", "rs4986893"],
                "0/1",
            ))
            .unwrap();
        assert_eq!(ann.rsid, "rs4244285");
        assert_eq!(ann.star_allele, "*2");
        Ok(())
    }

    #[rstest::rstest]
    #[case("CYP2C19", &["rs3892097"])] // rsID belongs to CYP2D6
    #[case("CYP2D6", &["rs999999999"])]
    #[case("VKORC1", &["rs3892097"])]
    #[case("CYP2D6", &[])]
    fn annotate_rejects(#[case] gene: &str, #[case] rsids: &[&str]) -> Result<(), anyhow::Error> {
        let data = Data::new()?;
        assert!(data.annotate(&observation(gene, rsids, "0/1")).is_none());
        Ok(())
    }

    #[rstest::rstest]
    #[case(Gene::Cyp2d6, 0.0, Phenotype::PoorMetabolizer)]
    #[case(Gene::Cyp2d6, 0.005, Phenotype::PoorMetabolizer)]
    #[case(Gene::Cyp2d6, 0.01, Phenotype::IntermediateMetabolizer)]
    #[case(Gene::Cyp2d6, 1.0, Phenotype::IntermediateMetabolizer)]
    #[case(Gene::Cyp2d6, 1.25, Phenotype::NormalMetabolizer)]
    #[case(Gene::Cyp2d6, 2.0, Phenotype::NormalMetabolizer)]
    #[case(Gene::Cyp2d6, 2.25, Phenotype::UltrarapidMetabolizer)]
    #[case(Gene::Cyp2d6, 120.0, Phenotype::UltrarapidMetabolizer)]
    #[case(Gene::Cyp2c19, 0.0, Phenotype::PoorMetabolizer)]
    #[case(Gene::Cyp2c19, 0.5, Phenotype::IntermediateMetabolizer)]
    #[case(Gene::Cyp2c19, 0.9, Phenotype::NormalMetabolizer)]
    #[case(Gene::Cyp2c19, 1.0, Phenotype::NormalMetabolizer)]
    #[case(Gene::Cyp2c19, 1.25, Phenotype::RapidMetabolizer)]
    #[case(Gene::Cyp2c19, 1.75, Phenotype::UltrarapidMetabolizer)]
    #[case(Gene::Cyp2c9, 1.0, Phenotype::IntermediateMetabolizer)]
    #[case(Gene::Cyp2c9, 1.5, Phenotype::NormalMetabolizer)]
    #[case(Gene::Slco1b1, 0.0, Phenotype::PoorFunction)]
    #[case(Gene::Slco1b1, 0.5, Phenotype::DecreasedFunction)]
    #[case(Gene::Slco1b1, 1.0, Phenotype::DecreasedFunction)]
    #[case(Gene::Slco1b1, 1.5, Phenotype::NormalFunction)]
    #[case(Gene::Tpmt, 0.5, Phenotype::IntermediateMetabolizer)]
    #[case(Gene::Tpmt, 1.5, Phenotype::NormalMetabolizer)]
    #[case(Gene::Dpyd, 0.5, Phenotype::IntermediateMetabolizer)]
    #[case(Gene::Dpyd, 1.75, Phenotype::NormalMetabolizer)]
    fn classify_phenotype_boundaries(
        #[case] gene: Gene,
        #[case] score: f64,
        #[case] expected: Phenotype,
    ) -> Result<(), anyhow::Error> {
        let data = Data::new()?;
        assert_eq!(data.classify_phenotype(gene, score), expected);
        Ok(())
    }

    #[rstest::rstest]
    #[case(Gene::Cyp2d6, 2.0)]
    #[case(Gene::Cyp2c19, 1.0)]
    #[case(Gene::Cyp2c9, 2.0)]
    #[case(Gene::Slco1b1, 2.0)]
    #[case(Gene::Tpmt, 2.0)]
    #[case(Gene::Dpyd, 2.0)]
    fn default_diploid_scores(#[case] gene: Gene, #[case] expected: f64) -> Result<(), anyhow::Error> {
        let data = Data::new()?;
        assert_eq!(data.default_diploid_score(gene), expected);
        Ok(())
    }

    #[test]
    fn drug_lookup_uses_normalized_names() -> Result<(), anyhow::Error> {
        let data = Data::new()?;
        assert!(data.rules_for_drug("clopidogrel").is_some());
        assert!(data.rules_for_drug("Clopidogrel").is_none());
        assert!(data.is_supported(&drugs::normalize("  Clo-pidogrel ")));
        assert!(!data.is_supported("aspirin"));
        Ok(())
    }
}
