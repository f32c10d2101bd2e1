//! Curated star-allele definitions.
//!
//! Maps pharmacogenomic rsIDs to the star allele they define, the allele's
//! functional class, and the evidence level of the association. The set
//! covers the actionable alleles of the six target genes.

use crate::pgx::ds::{AlleleFunction, Evidence, Gene};

/// One row of the rsID-to-star-allele table.
#[derive(Debug, Clone, PartialEq)]
pub struct AlleleDefinition {
    /// The defining rsID.
    pub rsid: &'static str,
    /// Gene the allele belongs to.
    pub gene: Gene,
    /// Star-allele name.
    pub star_allele: &'static str,
    /// Functional class of the allele.
    pub function: AlleleFunction,
    /// Evidence level of the association.
    pub evidence: Evidence,
}

impl AlleleDefinition {
    /// Activity-score contribution of one dose of this allele, on the
    /// gene-specific scale.
    pub fn activity_score(&self) -> f64 {
        self.function.activity_score_for(self.gene)
    }
}

const fn row(
    rsid: &'static str,
    gene: Gene,
    star_allele: &'static str,
    function: AlleleFunction,
    evidence: Evidence,
) -> AlleleDefinition {
    AlleleDefinition {
        rsid,
        gene,
        star_allele,
        function,
        evidence,
    }
}

/// The curated allele-definition table.
#[rustfmt::skip]
pub const ALLELE_DEFINITIONS: &[AlleleDefinition] = &[
    // CYP2D6
    row("rs3892097",  Gene::Cyp2d6,  "*4",    AlleleFunction::Lof, Evidence::High),
    row("rs35742686", Gene::Cyp2d6,  "*3",    AlleleFunction::Lof, Evidence::High),
    row("rs5030655",  Gene::Cyp2d6,  "*6",    AlleleFunction::Lof, Evidence::High),
    row("rs28371725", Gene::Cyp2d6,  "*41",   AlleleFunction::Def, Evidence::High),
    row("rs1065852",  Gene::Cyp2d6,  "*10",   AlleleFunction::Def, Evidence::High),
    row("rs16947",    Gene::Cyp2d6,  "*2",    AlleleFunction::Nf,  Evidence::High),
    row("rs1135840",  Gene::Cyp2d6,  "*2",    AlleleFunction::Nf,  Evidence::Moderate),
    row("rs5030865",  Gene::Cyp2d6,  "*8",    AlleleFunction::Lof, Evidence::Moderate),
    // CYP2C19
    row("rs4244285",  Gene::Cyp2c19, "*2",    AlleleFunction::Lof, Evidence::High),
    row("rs4986893",  Gene::Cyp2c19, "*3",    AlleleFunction::Lof, Evidence::High),
    row("rs28399504", Gene::Cyp2c19, "*4",    AlleleFunction::Lof, Evidence::Moderate),
    row("rs56337013", Gene::Cyp2c19, "*5",    AlleleFunction::Lof, Evidence::Moderate),
    row("rs12248560", Gene::Cyp2c19, "*17",   AlleleFunction::Inf, Evidence::High),
    row("rs41291556", Gene::Cyp2c19, "*17",   AlleleFunction::Inf, Evidence::Moderate),
    // CYP2C9
    row("rs1799853",  Gene::Cyp2c9,  "*2",    AlleleFunction::Def, Evidence::High),
    row("rs1057910",  Gene::Cyp2c9,  "*3",    AlleleFunction::Lof, Evidence::High),
    row("rs28371686", Gene::Cyp2c9,  "*5",    AlleleFunction::Lof, Evidence::Moderate),
    row("rs9332131",  Gene::Cyp2c9,  "*6",    AlleleFunction::Lof, Evidence::Moderate),
    row("rs7900194",  Gene::Cyp2c9,  "*8",    AlleleFunction::Def, Evidence::Moderate),
    // SLCO1B1
    row("rs4149056",  Gene::Slco1b1, "*5",    AlleleFunction::Lof, Evidence::High),
    row("rs2306283",  Gene::Slco1b1, "*1B",   AlleleFunction::Nf,  Evidence::Moderate),
    row("rs11045819", Gene::Slco1b1, "*15",   AlleleFunction::Lof, Evidence::Moderate),
    row("rs4363657",  Gene::Slco1b1, "*5",    AlleleFunction::Lof, Evidence::High),
    // TPMT
    row("rs1142345",  Gene::Tpmt,    "*3C",   AlleleFunction::Lof, Evidence::High),
    row("rs1800460",  Gene::Tpmt,    "*3B",   AlleleFunction::Lof, Evidence::High),
    row("rs1800462",  Gene::Tpmt,    "*2",    AlleleFunction::Lof, Evidence::High),
    row("rs1800584",  Gene::Tpmt,    "*4",    AlleleFunction::Lof, Evidence::Moderate),
    // DPYD
    row("rs3918290",  Gene::Dpyd,    "*2A",   AlleleFunction::Lof, Evidence::High),
    row("rs55886062", Gene::Dpyd,    "*13",   AlleleFunction::Lof, Evidence::High),
    row("rs67376798", Gene::Dpyd,    "HapB3", AlleleFunction::Def, Evidence::High),
    row("rs75017182", Gene::Dpyd,    "HapB3", AlleleFunction::Def, Evidence::Moderate),
];

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn table_dimensions() {
        assert_eq!(ALLELE_DEFINITIONS.len(), 31);
        let n_cyp2d6 = ALLELE_DEFINITIONS
            .iter()
            .filter(|def| def.gene == Gene::Cyp2d6)
            .count();
        assert_eq!(n_cyp2d6, 8);
    }

    #[rstest::rstest]
    #[case("rs3892097", 0.0)]
    #[case("rs28371725", 0.5)]
    #[case("rs16947", 1.0)]
    // CYP2C19 *17 scores 1.0 on the gene's compressed scale.
    #[case("rs12248560", 1.0)]
    fn activity_scores_use_gene_scale(#[case] rsid: &str, #[case] expected: f64) {
        let def = ALLELE_DEFINITIONS
            .iter()
            .find(|def| def.rsid == rsid)
            .unwrap();
        assert_eq!(def.activity_score(), expected);
    }
}
