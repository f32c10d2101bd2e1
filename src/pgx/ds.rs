//! Shared data structures for `pgx`.

use std::str::FromStr;

/// Enumeration of the pharmacogenes covered by the engine.
///
/// The declaration order is the clinical reporting order; it also drives the
/// iteration order of `BTreeMap`s keyed by `Gene`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Gene {
    /// Cytochrome P450 2D6, e.g. codeine, tamoxifen.
    #[serde(rename = "CYP2D6")]
    #[strum(serialize = "CYP2D6")]
    Cyp2d6,
    /// Cytochrome P450 2C19, e.g. clopidogrel, voriconazole.
    #[serde(rename = "CYP2C19")]
    #[strum(serialize = "CYP2C19")]
    Cyp2c19,
    /// Cytochrome P450 2C9, e.g. warfarin, phenytoin.
    #[serde(rename = "CYP2C9")]
    #[strum(serialize = "CYP2C9")]
    Cyp2c9,
    /// Hepatic uptake transporter, statin myopathy risk.
    #[serde(rename = "SLCO1B1")]
    #[strum(serialize = "SLCO1B1")]
    Slco1b1,
    /// Thiopurine methyltransferase, thiopurine myelosuppression risk.
    #[serde(rename = "TPMT")]
    #[strum(serialize = "TPMT")]
    Tpmt,
    /// Dihydropyrimidine dehydrogenase, fluoropyrimidine toxicity risk.
    #[serde(rename = "DPYD")]
    #[strum(serialize = "DPYD")]
    Dpyd,
}

impl Gene {
    /// Parse a caller-supplied gene symbol, accepting any letter case.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::from_str(symbol.trim()).ok()
    }
}

/// Functional class of a star allele.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
)]
pub enum AlleleFunction {
    /// Loss of function.
    #[serde(rename = "LOF")]
    #[strum(serialize = "LOF")]
    Lof,
    /// Decreased function.
    #[serde(rename = "DEF")]
    #[strum(serialize = "DEF")]
    Def,
    /// Normal function.
    #[serde(rename = "NF")]
    #[strum(serialize = "NF")]
    Nf,
    /// Increased function (gene duplication / gain).
    #[serde(rename = "INF")]
    #[strum(serialize = "INF")]
    Inf,
}

impl AlleleFunction {
    /// Activity-score contribution of one allele dose on the standard scale.
    pub fn activity_score(self) -> f64 {
        match self {
            AlleleFunction::Lof => 0.0,
            AlleleFunction::Def => 0.5,
            AlleleFunction::Nf => 1.0,
            AlleleFunction::Inf => 2.0,
        }
    }

    /// Activity-score contribution of one allele dose for the given gene.
    ///
    /// CYP2C19 is scored on a compressed scale where a normal-function allele
    /// contributes 0.5 and an increased-function allele 1.0; all other genes
    /// use the standard scale.
    pub fn activity_score_for(self, gene: Gene) -> f64 {
        match (gene, self) {
            (Gene::Cyp2c19, AlleleFunction::Nf) => 0.5,
            (Gene::Cyp2c19, AlleleFunction::Inf) => 1.0,
            _ => self.activity_score(),
        }
    }
}

/// Evidence level of an rsID-to-allele assignment.
///
/// Ordered from strongest (`High`) to weakest (`Low`), so the weakest level
/// of a collection is its maximum.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Evidence {
    /// Well-established association.
    High,
    /// Reported association with limited replication.
    Moderate,
    /// Preliminary association.
    Low,
}

impl Evidence {
    /// Confidence multiplier applied for this evidence level.
    pub fn weight(self) -> f64 {
        match self {
            Evidence::High => 1.0,
            Evidence::Moderate => 0.85,
            Evidence::Low => 0.65,
        }
    }
}

/// Evidence strength reported on a drug-risk result.
///
/// Extends `Evidence` with the two states a result can be in without
/// variant support: phenotype inferred from the absence of variants, and no
/// assessment at all.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EvidenceStrength {
    /// Weakest supporting evidence was high.
    High,
    /// Weakest supporting evidence was moderate.
    Moderate,
    /// Weakest supporting evidence was low.
    Low,
    /// Phenotype inferred from the absence of known variants.
    Inferred,
    /// No assessment was possible.
    None,
}

impl From<Evidence> for EvidenceStrength {
    fn from(val: Evidence) -> Self {
        match val {
            Evidence::High => EvidenceStrength::High,
            Evidence::Moderate => EvidenceStrength::Moderate,
            Evidence::Low => EvidenceStrength::Low,
        }
    }
}

/// Metabolizer / transporter phenotype classification.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
)]
pub enum Phenotype {
    /// Severely reduced or absent enzyme activity.
    #[serde(rename = "Poor Metabolizer")]
    #[strum(serialize = "Poor Metabolizer")]
    PoorMetabolizer,
    /// Partially reduced enzyme activity.
    #[serde(rename = "Intermediate Metabolizer")]
    #[strum(serialize = "Intermediate Metabolizer")]
    IntermediateMetabolizer,
    /// Standard enzyme activity.
    #[serde(rename = "Normal Metabolizer")]
    #[strum(serialize = "Normal Metabolizer")]
    NormalMetabolizer,
    /// Faster-than-average enzyme activity.
    #[serde(rename = "Rapid Metabolizer")]
    #[strum(serialize = "Rapid Metabolizer")]
    RapidMetabolizer,
    /// Exceptionally high enzyme activity.
    #[serde(rename = "Ultrarapid Metabolizer")]
    #[strum(serialize = "Ultrarapid Metabolizer")]
    UltrarapidMetabolizer,
    /// Severely reduced transporter function (SLCO1B1).
    #[serde(rename = "Poor Function")]
    #[strum(serialize = "Poor Function")]
    PoorFunction,
    /// Partially reduced transporter function (SLCO1B1).
    #[serde(rename = "Decreased Function")]
    #[strum(serialize = "Decreased Function")]
    DecreasedFunction,
    /// Standard transporter function (SLCO1B1).
    #[serde(rename = "Normal Function")]
    #[strum(serialize = "Normal Function")]
    NormalFunction,
    /// Phenotype could not be determined.
    #[serde(rename = "Indeterminate")]
    #[strum(serialize = "Indeterminate")]
    Indeterminate,
}

/// Risk category assigned to a drug for a given phenotype.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
)]
pub enum RiskLabel {
    /// Standard dosing is appropriate.
    #[serde(rename = "Safe")]
    #[strum(serialize = "Safe")]
    Safe,
    /// Dose adjustment or closer monitoring is required.
    #[serde(rename = "Adjust Dosage")]
    #[strum(serialize = "Adjust Dosage")]
    AdjustDosage,
    /// Reduced or absent therapeutic effect expected.
    #[serde(rename = "Ineffective")]
    #[strum(serialize = "Ineffective")]
    Ineffective,
    /// Elevated risk of adverse effects or toxicity.
    #[serde(rename = "Toxic")]
    #[strum(serialize = "Toxic")]
    Toxic,
    /// No assessment possible.
    #[serde(rename = "Unknown")]
    #[strum(serialize = "Unknown")]
    Unknown,
}

/// Clinical urgency of a risk finding.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    /// No clinically significant interaction.
    None,
    /// Minor interaction, routine monitoring.
    Low,
    /// Clinically significant, dose adjustment recommended.
    Moderate,
    /// Serious interaction, immediate clinical action.
    High,
    /// Risk uncertain.
    Unknown,
}

/// Zygosity of a genotype call with respect to alternate alleles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Zygosity {
    /// Both chromosome copies carry the alternate allele.
    HomozygousAlt,
    /// One chromosome copy carries an alternate allele.
    Heterozygous,
    /// Both copies match the reference.
    Reference,
    /// The genotype was not called.
    Missing,
}

impl Zygosity {
    /// Classify a raw genotype string such as `0/1`, `1|1`, or `./.`.
    ///
    /// The homozygous-alt patterns are `1/1`, `1|1`, and `2/2`; any other
    /// call containing an alternate allele index counts as heterozygous.
    pub fn from_gt(gt: &str) -> Self {
        let gt = gt.trim();
        if gt.contains("1/1") || gt.contains("1|1") || gt.contains("2/2") {
            Zygosity::HomozygousAlt
        } else if gt.contains('1') || gt.contains('2') {
            Zygosity::Heterozygous
        } else if gt.contains('0') {
            Zygosity::Reference
        } else {
            Zygosity::Missing
        }
    }

    /// Number of allele doses this call contributes to the diploid genotype.
    pub fn dose_units(self) -> usize {
        match self {
            Zygosity::HomozygousAlt => 2,
            Zygosity::Heterozygous => 1,
            Zygosity::Reference | Zygosity::Missing => 0,
        }
    }
}

/// A single variant observation as reported by the upstream caller.
#[derive(Debug, Clone, PartialEq, Default, serde::Deserialize, serde::Serialize)]
pub struct VariantObservation {
    /// Gene symbol claimed by the caller.
    pub gene: String,
    /// Chromosome name.
    #[serde(default)]
    pub chrom: String,
    /// 1-based position.
    #[serde(default)]
    pub pos: u32,
    /// rsID(s) assigned to the site; accepts a single identifier or a list.
    #[serde(default, with = "rsid_list")]
    pub rsid: Vec<String>,
    /// Reference allele.
    #[serde(default, rename = "ref")]
    pub reference: String,
    /// Alternate allele(s).
    #[serde(default)]
    pub alt: Vec<String>,
    /// Raw genotype call of the first sample.
    #[serde(default)]
    pub gt: String,
}

impl VariantObservation {
    /// Zygosity of this observation's genotype call.
    pub fn zygosity(&self) -> Zygosity {
        Zygosity::from_gt(&self.gt)
    }
}

/// Serde support for the `rsid` field which may carry one identifier or a
/// list of identifiers.
mod rsid_list {
    pub fn serialize<S>(values: &[String], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if values.len() == 1 {
            serializer.serialize_str(&values[0])
        } else {
            serializer.collect_seq(values)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            One(String),
            Many(Vec<String>),
        }

        Ok(
            match serde::Deserialize::deserialize(deserializer)? {
                OneOrMany::One(value) => vec![value],
                OneOrMany::Many(values) => values,
            },
        )
    }
}

/// One allele observation resolved against the allele-definition table.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct AnnotatedAllele {
    /// The rsID that matched the table.
    pub rsid: String,
    /// Gene the allele belongs to.
    pub gene: Gene,
    /// Star-allele name, e.g. `*4`.
    pub star_allele: String,
    /// Functional class of the allele.
    pub function: AlleleFunction,
    /// Activity-score contribution of one allele dose.
    pub activity_score: f64,
    /// Evidence level of the rsID-to-allele assignment.
    pub evidence_strength: Evidence,
    /// Chromosome of the observation.
    #[serde(default)]
    pub chrom: String,
    /// 1-based position of the observation.
    #[serde(default)]
    pub pos: u32,
    /// Reference allele of the observation.
    #[serde(default, rename = "ref")]
    pub reference: String,
    /// Alternate allele(s) of the observation.
    #[serde(default)]
    pub alt: Vec<String>,
}
