//! Curated CPIC drug-phenotype rules.
//!
//! Each drug carries one or more gene blocks in clinical priority order; the
//! resolver walks the blocks and uses the first gene with a usable phenotype.
//! Amitriptyline is the only drug with two gene blocks (CYP2D6, then
//! CYP2C19).

use crate::pgx::ds::{
    Gene, Phenotype,
    Phenotype::{DecreasedFunction, NormalFunction, PoorFunction},
    RiskLabel,
    RiskLabel::{AdjustDosage, Ineffective, Safe, Toxic},
    Severity,
};

const PM: Phenotype = Phenotype::PoorMetabolizer;
const IM: Phenotype = Phenotype::IntermediateMetabolizer;
const NM: Phenotype = Phenotype::NormalMetabolizer;
const RM: Phenotype = Phenotype::RapidMetabolizer;
const URM: Phenotype = Phenotype::UltrarapidMetabolizer;

/// Clinical consequence of one drug-gene-phenotype combination.
#[derive(Debug, Clone, PartialEq)]
pub struct ClinicalRule {
    /// Risk category.
    pub label: RiskLabel,
    /// Urgency of the finding.
    pub severity: Severity,
    /// Rule-level confidence before evidence weighting.
    pub confidence_base: f64,
    /// Guideline citation.
    pub cpic_guideline: &'static str,
    /// Recommended clinical action.
    pub clinical_action: &'static str,
}

/// Phenotype rules of one gene for one drug.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneRules {
    /// The gene whose phenotype the rules key on.
    pub gene: Gene,
    /// Phenotype-to-rule entries.
    pub rules: &'static [(Phenotype, ClinicalRule)],
}

impl GeneRules {
    /// Look up the rule for a phenotype, if one is curated.
    pub fn rule_for(&self, phenotype: Phenotype) -> Option<&'static ClinicalRule> {
        self.rules
            .iter()
            .find(|(p, _)| *p == phenotype)
            .map(|(_, rule)| rule)
    }
}

/// A drug with its gene blocks in clinical priority order.
#[derive(Debug, Clone, PartialEq)]
pub struct DrugRules {
    /// Normalized drug name, which is also the lookup key.
    pub name: &'static str,
    /// Gene blocks, highest priority first.
    pub genes: &'static [GeneRules],
}

/// Normalize a drug name for rule lookup: trim, lowercase, and strip hyphens
/// and inner spaces.
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase().replace(['-', ' '], "")
}

const fn rule(
    label: RiskLabel,
    severity: Severity,
    confidence_base: f64,
    cpic_guideline: &'static str,
    clinical_action: &'static str,
) -> ClinicalRule {
    ClinicalRule {
        label,
        severity,
        confidence_base,
        cpic_guideline,
        clinical_action,
    }
}

/// The curated drug-rule table.
#[rustfmt::skip]
pub const DRUG_RULES: &[DrugRules] = &[
    // CYP2D6 drugs
    DrugRules { name: "codeine", genes: &[GeneRules { gene: Gene::Cyp2d6, rules: &[
        (PM,  rule(Ineffective,  Severity::High,     0.95, "CPIC Codeine (2021)", "Avoid codeine. Risk of no analgesia. Use non-opioid or non-CYP2D6 opioid.")),
        (IM,  rule(AdjustDosage, Severity::Moderate, 0.85, "CPIC Codeine (2021)", "Use lowest effective dose with caution. Monitor for reduced efficacy.")),
        (NM,  rule(Safe,         Severity::None,     0.90, "CPIC Codeine (2021)", "Standard dosing.")),
        (RM,  rule(Safe,         Severity::Low,      0.85, "CPIC Codeine (2021)", "Standard dosing. Monitor side effects.")),
        (URM, rule(Toxic,        Severity::High,     0.95, "CPIC Codeine (2021)", "Avoid. Risk of life-threatening toxicity (excess morphine).")),
    ] }] },
    DrugRules { name: "tramadol", genes: &[GeneRules { gene: Gene::Cyp2d6, rules: &[
        (PM,  rule(Ineffective,  Severity::High,     0.95, "CPIC Tramadol (2021)", "Avoid. Use alternative analgesic.")),
        (IM,  rule(AdjustDosage, Severity::Moderate, 0.80, "CPIC Tramadol (2021)", "Use with caution; reduced efficacy possible.")),
        (NM,  rule(Safe,         Severity::None,     0.90, "CPIC Tramadol (2021)", "Standard dosing.")),
        (URM, rule(Toxic,        Severity::High,     0.95, "CPIC Tramadol (2021)", "Avoid. Risk of serious adverse events.")),
    ] }] },
    DrugRules { name: "amitriptyline", genes: &[
        GeneRules { gene: Gene::Cyp2d6, rules: &[
            (PM,  rule(Toxic,        Severity::High,     0.90, "CPIC TCA Guideline", "Avoid TCA or reduce dose by 50%. Consider alternative.")),
            (IM,  rule(AdjustDosage, Severity::Moderate, 0.80, "CPIC TCA Guideline", "Consider 25% dose reduction. Monitor drug levels.")),
            (NM,  rule(Safe,         Severity::None,     0.90, "CPIC TCA Guideline", "Standard dosing.")),
            (URM, rule(Ineffective,  Severity::Moderate, 0.85, "CPIC TCA Guideline", "Avoid TCA or increase dose with monitoring.")),
        ] },
        GeneRules { gene: Gene::Cyp2c19, rules: &[
            (PM,  rule(Toxic,        Severity::High,     0.90, "CPIC TCA Guideline", "Avoid or reduce dose by 50%. Monitor levels.")),
            (IM,  rule(AdjustDosage, Severity::Moderate, 0.80, "CPIC TCA Guideline", "Reduce starting dose by 25%. Monitor.")),
            (NM,  rule(Safe,         Severity::None,     0.90, "CPIC TCA Guideline", "Standard dosing.")),
            (RM,  rule(Ineffective,  Severity::Low,      0.80, "CPIC TCA Guideline", "Consider dose titration. Monitor for reduced efficacy.")),
            (URM, rule(Ineffective,  Severity::Moderate, 0.85, "CPIC TCA Guideline", "Consider dose titration. Monitor for reduced efficacy.")),
        ] },
    ] },
    DrugRules { name: "nortriptyline", genes: &[GeneRules { gene: Gene::Cyp2d6, rules: &[
        (PM,  rule(Toxic,        Severity::High,     0.90, "CPIC TCA Guideline", "Avoid TCA or reduce dose by 50%. Consider alternative.")),
        (IM,  rule(AdjustDosage, Severity::Moderate, 0.80, "CPIC TCA Guideline", "Consider 25% dose reduction. Monitor drug levels.")),
        (NM,  rule(Safe,         Severity::None,     0.90, "CPIC TCA Guideline", "Standard dosing.")),
        (URM, rule(Ineffective,  Severity::Moderate, 0.85, "CPIC TCA Guideline", "Avoid TCA or increase dose with monitoring.")),
    ] }] },
    DrugRules { name: "ondansetron", genes: &[GeneRules { gene: Gene::Cyp2d6, rules: &[
        (PM,  rule(Ineffective,  Severity::Moderate, 0.85, "CPIC Antiemetics", "Use alternative antiemetic (e.g., granisetron). Standard dose may be ineffective.")),
        (IM,  rule(AdjustDosage, Severity::Low,      0.75, "CPIC Antiemetics", "Use with caution; may have reduced efficacy.")),
        (NM,  rule(Safe,         Severity::None,     0.90, "CPIC Antiemetics", "Standard dosing.")),
        (URM, rule(Safe,         Severity::None,     0.80, "CPIC Antiemetics", "Standard dosing.")),
    ] }] },
    DrugRules { name: "tamoxifen", genes: &[GeneRules { gene: Gene::Cyp2d6, rules: &[
        (PM,  rule(Ineffective,  Severity::High,     0.95, "CPIC Tamoxifen", "Avoid if possible. Inadequate active metabolite. Recommend alternative (e.g. aromatase inhibitor).")),
        (IM,  rule(AdjustDosage, Severity::Moderate, 0.85, "CPIC Tamoxifen", "Consider higher dose (40mg/day) or alternative. Monitor endoxifen.")),
        (NM,  rule(Safe,         Severity::None,     0.90, "CPIC Tamoxifen", "Standard 20 mg/day dosing.")),
        (URM, rule(Safe,         Severity::None,     0.85, "CPIC Tamoxifen", "Standard 20 mg/day dosing.")),
    ] }] },
    DrugRules { name: "atomoxetine", genes: &[GeneRules { gene: Gene::Cyp2d6, rules: &[
        (PM,  rule(Toxic,        Severity::Moderate, 0.90, "CPIC Atomoxetine", "Initiate at 50% of normal dose; titrate slowly. Increased exposure risk.")),
        (IM,  rule(AdjustDosage, Severity::Low,      0.80, "CPIC Atomoxetine", "Standard starting dose with close monitoring.")),
        (NM,  rule(Safe,         Severity::None,     0.90, "CPIC Atomoxetine", "Standard dosing.")),
        (URM, rule(Ineffective,  Severity::Low,      0.75, "CPIC Atomoxetine", "Standard dosing (limited data).")),
    ] }] },
    DrugRules { name: "haloperidol", genes: &[GeneRules { gene: Gene::Cyp2d6, rules: &[
        (PM,  rule(Toxic,        Severity::High,     0.85, "CPIC Antipsychotics (Level B)", "Use lowest effective dose; high risk of ADRs. Consider alternatives.")),
        (IM,  rule(AdjustDosage, Severity::Moderate, 0.75, "CPIC Antipsychotics", "Monitor carefully; consider dose reduction.")),
        (NM,  rule(Safe,         Severity::None,     0.90, "CPIC Antipsychotics", "Standard dosing.")),
        (URM, rule(Ineffective,  Severity::Moderate, 0.80, "CPIC Antipsychotics", "May need higher doses; monitor for reduced efficacy.")),
    ] }] },
    // CYP2C19 drugs
    DrugRules { name: "clopidogrel", genes: &[GeneRules { gene: Gene::Cyp2c19, rules: &[
        (PM,  rule(Ineffective,  Severity::High,     0.95, "CPIC Clopidogrel", "Avoid. Minimal antiplatelet effect. Use prasugrel or ticagrelor.")),
        (IM,  rule(Ineffective,  Severity::Moderate, 0.85, "CPIC Clopidogrel", "Use with caution; consider alternative. If used, consider higher dose.")),
        (NM,  rule(Safe,         Severity::None,     0.90, "CPIC Clopidogrel", "Standard 75 mg/day.")),
        (RM,  rule(Safe,         Severity::None,     0.85, "CPIC Clopidogrel", "Standard dosing.")),
        (URM, rule(Safe,         Severity::None,     0.85, "CPIC Clopidogrel", "Standard dosing.")),
    ] }] },
    DrugRules { name: "voriconazole", genes: &[GeneRules { gene: Gene::Cyp2c19, rules: &[
        (PM,  rule(Toxic,        Severity::High,     0.90, "CPIC Voriconazole", "High exposure; reduce dose and monitor levels. Risk of ADRs.")),
        (IM,  rule(AdjustDosage, Severity::Moderate, 0.80, "CPIC Voriconazole", "Monitor trough levels; may need dose reduction.")),
        (NM,  rule(Safe,         Severity::None,     0.90, "CPIC Voriconazole", "Standard dosing with TDM.")),
        (RM,  rule(Ineffective,  Severity::High,     0.90, "CPIC Voriconazole", "Significantly reduced exposure; ineffective. Use alternative antifungal.")),
        (URM, rule(Ineffective,  Severity::High,     0.95, "CPIC Voriconazole", "Significantly reduced exposure; ineffective. Use alternative antifungal.")),
    ] }] },
    DrugRules { name: "citalopram", genes: &[GeneRules { gene: Gene::Cyp2c19, rules: &[
        (PM,  rule(Toxic,        Severity::Moderate, 0.90, "CPIC SSRIs", "Reduce dose by 50% (max 20mg/day). Increased QT risk.")),
        (IM,  rule(AdjustDosage, Severity::Low,      0.80, "CPIC SSRIs", "Use lowest effective dose; monitor QT.")),
        (NM,  rule(Safe,         Severity::None,     0.90, "CPIC SSRIs", "Standard dosing.")),
        (RM,  rule(Ineffective,  Severity::Low,      0.80, "CPIC SSRIs", "Standard dosing (consider alternative if no response).")),
        (URM, rule(Ineffective,  Severity::Low,      0.80, "CPIC SSRIs", "Standard dosing (consider alternative if no response).")),
    ] }] },
    DrugRules { name: "escitalopram", genes: &[GeneRules { gene: Gene::Cyp2c19, rules: &[
        (PM,  rule(Toxic,        Severity::Moderate, 0.90, "CPIC SSRIs", "Reduce dose by 50% (max 10mg/day). Increased QT risk.")),
        (IM,  rule(AdjustDosage, Severity::Low,      0.80, "CPIC SSRIs", "Use lowest effective dose; monitor QT.")),
        (NM,  rule(Safe,         Severity::None,     0.90, "CPIC SSRIs", "Standard dosing.")),
        (RM,  rule(Ineffective,  Severity::Low,      0.80, "CPIC SSRIs", "Standard dosing (consider alternative if no response).")),
        (URM, rule(Ineffective,  Severity::Low,      0.80, "CPIC SSRIs", "Standard dosing (consider alternative if no response).")),
    ] }] },
    DrugRules { name: "omeprazole", genes: &[GeneRules { gene: Gene::Cyp2c19, rules: &[
        (PM,  rule(Toxic,        Severity::Moderate, 0.85, "CPIC PPIs", "Initiate at 50% of standard dose. Monitor for ADRs (increased exposure).")),
        (IM,  rule(AdjustDosage, Severity::Low,      0.80, "CPIC PPIs", "Consider dose reduction; start at lower end.")),
        (NM,  rule(Safe,         Severity::None,     0.90, "CPIC PPIs", "Standard dosing.")),
        (RM,  rule(Ineffective,  Severity::Moderate, 0.85, "CPIC PPIs", "Consider doubling dose for H. pylori or erosive esophagitis.")),
        (URM, rule(Ineffective,  Severity::Moderate, 0.85, "CPIC PPIs", "Consider doubling dose for H. pylori or erosive esophagitis.")),
    ] }] },
    // CYP2C9 drugs
    DrugRules { name: "warfarin", genes: &[GeneRules { gene: Gene::Cyp2c9, rules: &[
        (PM,  rule(Toxic,        Severity::High,     0.95, "CPIC Warfarin", "Start at significantly reduced dose (~5-6 mg/week). Very slow titration. High bleeding risk. Check VKORC1.")),
        (IM,  rule(AdjustDosage, Severity::Moderate, 0.88, "CPIC Warfarin", "Reduce starting dose by 25-50%. Close INR monitoring. Check VKORC1 status.")),
        (NM,  rule(Safe,         Severity::None,     0.90, "CPIC Warfarin", "Standard dosing. Consider VKORC1 genotype for fine-tuning.")),
    ] }] },
    DrugRules { name: "celecoxib", genes: &[GeneRules { gene: Gene::Cyp2c9, rules: &[
        (PM,  rule(Toxic,        Severity::Moderate, 0.90, "CPIC NSAIDs", "Reduce starting dose by 25-50%. Use lowest effective dose.")),
        (IM,  rule(AdjustDosage, Severity::Low,      0.80, "CPIC NSAIDs", "Consider 25% dose reduction. Monitor.")),
        (NM,  rule(Safe,         Severity::None,     0.90, "CPIC NSAIDs", "Standard dosing.")),
    ] }] },
    DrugRules { name: "phenytoin", genes: &[GeneRules { gene: Gene::Cyp2c9, rules: &[
        (PM,  rule(Toxic,        Severity::High,     0.95, "CPIC Phenytoin", "Reduce dose by 25-50%. Monitor levels. Risk of toxicity.")),
        (IM,  rule(AdjustDosage, Severity::Moderate, 0.85, "CPIC Phenytoin", "Consider 25% reduction. Monitor.")),
        (NM,  rule(Safe,         Severity::None,     0.90, "CPIC Phenytoin", "Standard dosing.")),
    ] }] },
    DrugRules { name: "siponimod", genes: &[GeneRules { gene: Gene::Cyp2c9, rules: &[
        (PM,  rule(Toxic,        Severity::High,     0.95, "CPIC Siponimod", "Contraindicated; avoid use.")),
        (IM,  rule(AdjustDosage, Severity::Moderate, 0.90, "CPIC Siponimod", "Use 1 mg/day maintenance (vs 2 mg).")),
        (NM,  rule(Safe,         Severity::None,     0.95, "CPIC Siponimod", "Standard 2 mg/day.")),
    ] }] },
    // SLCO1B1 drugs
    DrugRules { name: "simvastatin", genes: &[GeneRules { gene: Gene::Slco1b1, rules: &[
        (PoorFunction,      rule(Toxic,        Severity::High,     0.95, "CPIC Statins", "Avoid. High myopathy risk. Use alternative (rosuvastatin, pravastatin).")),
        (DecreasedFunction, rule(AdjustDosage, Severity::Moderate, 0.85, "CPIC Statins", "Use max 20 mg/day. If higher needed, use alternative.")),
        (NormalFunction,    rule(Safe,         Severity::None,     0.95, "CPIC Statins", "Standard dosing (max 40 mg/day).")),
    ] }] },
    DrugRules { name: "atorvastatin", genes: &[GeneRules { gene: Gene::Slco1b1, rules: &[
        (PoorFunction,      rule(AdjustDosage, Severity::Moderate, 0.85, "CPIC Statins", "Avoid or use lowest possible dose. Use alternative.")),
        (DecreasedFunction, rule(Safe,         Severity::Low,      0.80, "CPIC Statins", "Use max 40 mg/day. Monitor for myopathy.")),
        (NormalFunction,    rule(Safe,         Severity::None,     0.90, "CPIC Statins", "Standard dosing.")),
    ] }] },
    DrugRules { name: "rosuvastatin", genes: &[GeneRules { gene: Gene::Slco1b1, rules: &[
        (PoorFunction,      rule(AdjustDosage, Severity::Moderate, 0.85, "CPIC Statins", "Avoid or use max 20 mg/day. Use alternative.")),
        (DecreasedFunction, rule(Safe,         Severity::Low,      0.80, "CPIC Statins", "Use max 20 mg/day.")),
        (NormalFunction,    rule(Safe,         Severity::None,     0.90, "CPIC Statins", "Standard dosing.")),
    ] }] },
    // TPMT drugs
    DrugRules { name: "azathioprine", genes: &[GeneRules { gene: Gene::Tpmt, rules: &[
        (PM,  rule(Toxic,        Severity::High,     0.98, "CPIC Thiopurines", "Reduce dose 10-fold or avoid. Risk of life-threatening myelosuppression.")),
        (IM,  rule(AdjustDosage, Severity::Moderate, 0.90, "CPIC Thiopurines", "Start at 30-70% full dose. Titrate based on toxicity/efficacy. Monitor CBC.")),
        (NM,  rule(Safe,         Severity::None,     0.95, "CPIC Thiopurines", "Standard dosing (2-3 mg/kg/day).")),
    ] }] },
    DrugRules { name: "mercaptopurine", genes: &[GeneRules { gene: Gene::Tpmt, rules: &[
        (PM,  rule(Toxic,        Severity::High,     0.98, "CPIC Thiopurines", "Reduce dose to 10% of normal. Titrate cautiously.")),
        (IM,  rule(AdjustDosage, Severity::Moderate, 0.90, "CPIC Thiopurines", "Start at 30-80% standard dose. Monitor CBC.")),
        (NM,  rule(Safe,         Severity::None,     0.95, "CPIC Thiopurines", "Standard dosing.")),
    ] }] },
    DrugRules { name: "thioguanine", genes: &[GeneRules { gene: Gene::Tpmt, rules: &[
        (PM,  rule(Toxic,        Severity::High,     0.98, "CPIC Thiopurines", "Reduce dose to 10% of standard. Risk of fatal myelosuppression.")),
        (IM,  rule(AdjustDosage, Severity::Moderate, 0.90, "CPIC Thiopurines", "Start at 30-50% of normal dose.")),
        (NM,  rule(Safe,         Severity::None,     0.95, "CPIC Thiopurines", "Standard dosing.")),
    ] }] },
    // DPYD drugs
    DrugRules { name: "fluorouracil", genes: &[GeneRules { gene: Gene::Dpyd, rules: &[
        (PM,  rule(Toxic,        Severity::High,     0.98, "CPIC Fluoropyrimidines", "Avoid. Fatal toxicity risk. If no alt, use extreme caution.")),
        (IM,  rule(AdjustDosage, Severity::High,     0.90, "CPIC Fluoropyrimidines", "Reduce starting dose by 50%. Monitor closely.")),
        (NM,  rule(Safe,         Severity::None,     0.90, "CPIC Fluoropyrimidines", "Standard dosing.")),
    ] }] },
    DrugRules { name: "capecitabine", genes: &[GeneRules { gene: Gene::Dpyd, rules: &[
        (PM,  rule(Toxic,        Severity::High,     0.98, "CPIC Fluoropyrimidines", "Avoid. Fatal toxicity risk.")),
        (IM,  rule(AdjustDosage, Severity::High,     0.90, "CPIC Fluoropyrimidines", "Reduce starting dose by 50%. Monitor closely.")),
        (NM,  rule(Safe,         Severity::None,     0.90, "CPIC Fluoropyrimidines", "Standard dosing.")),
    ] }] },
];

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn table_dimensions() {
        assert_eq!(DRUG_RULES.len(), 25);
        for drug in DRUG_RULES {
            assert_eq!(normalize(drug.name), drug.name, "unnormalized: {}", drug.name);
            assert!(!drug.genes.is_empty());
        }
    }

    #[test]
    fn amitriptyline_is_the_only_two_gene_drug() {
        for drug in DRUG_RULES {
            if drug.name == "amitriptyline" {
                let genes: Vec<_> = drug.genes.iter().map(|block| block.gene).collect();
                assert_eq!(genes, vec![Gene::Cyp2d6, Gene::Cyp2c19]);
            } else {
                assert_eq!(drug.genes.len(), 1, "{}", drug.name);
            }
        }
    }

    #[rstest::rstest]
    #[case("Codeine", "codeine")]
    #[case("  CLOPIDOGREL ", "clopidogrel")]
    #[case("Fluoro-uracil", "fluorouracil")]
    #[case("war farin", "warfarin")]
    fn normalize_drug_names(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize(raw), expected);
    }

    #[test]
    fn codeine_ultrarapid_rule() {
        let codeine = DRUG_RULES.iter().find(|d| d.name == "codeine").unwrap();
        let rule = codeine.genes[0].rule_for(URM).unwrap();
        assert_eq!(rule.label, RiskLabel::Toxic);
        assert_eq!(rule.severity, Severity::High);
        assert_eq!(rule.confidence_base, 0.95);
    }

    // Rapid Metabolizer has no curated tramadol rule; the resolver falls back
    // to the synthesized Safe default for that combination.
    #[test]
    fn tramadol_has_no_rapid_metabolizer_rule() {
        let tramadol = DRUG_RULES.iter().find(|d| d.name == "tramadol").unwrap();
        assert!(tramadol.genes[0].rule_for(RM).is_none());
    }
}
