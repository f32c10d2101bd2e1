//! Activity-score phenotype intervals and diploid defaults.

use crate::pgx::ds::{Gene, Phenotype};

/// One `[lower, upper)` interval mapping a diploid activity score to a
/// phenotype.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreInterval {
    /// Inclusive lower bound.
    pub lower: f64,
    /// Exclusive upper bound.
    pub upper: f64,
    /// Phenotype assigned within the interval.
    pub phenotype: Phenotype,
}

/// Phenotype intervals of one gene, ordered by ascending score.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneIntervals {
    /// The gene.
    pub gene: Gene,
    /// Intervals covering the score range; 99.0 is the open upper sentinel.
    pub intervals: &'static [ScoreInterval],
}

const fn iv(lower: f64, upper: f64, phenotype: Phenotype) -> ScoreInterval {
    ScoreInterval {
        lower,
        upper,
        phenotype,
    }
}

/// Per-gene phenotype classification intervals.
#[rustfmt::skip]
pub const PHENOTYPE_INTERVALS: &[GeneIntervals] = &[
    GeneIntervals {
        gene: Gene::Cyp2d6,
        intervals: &[
            iv(0.0,  0.01, Phenotype::PoorMetabolizer),
            iv(0.01, 1.25, Phenotype::IntermediateMetabolizer),
            iv(1.25, 2.25, Phenotype::NormalMetabolizer),
            iv(2.25, 99.0, Phenotype::UltrarapidMetabolizer),
        ],
    },
    GeneIntervals {
        gene: Gene::Cyp2c19,
        intervals: &[
            iv(0.0,  0.01, Phenotype::PoorMetabolizer),
            iv(0.01, 0.9,  Phenotype::IntermediateMetabolizer),
            iv(0.9,  1.25, Phenotype::NormalMetabolizer),
            iv(1.25, 1.75, Phenotype::RapidMetabolizer),
            iv(1.75, 99.0, Phenotype::UltrarapidMetabolizer),
        ],
    },
    GeneIntervals {
        gene: Gene::Cyp2c9,
        intervals: &[
            iv(0.0,  0.01, Phenotype::PoorMetabolizer),
            iv(0.01, 1.5,  Phenotype::IntermediateMetabolizer),
            iv(1.5,  99.0, Phenotype::NormalMetabolizer),
        ],
    },
    GeneIntervals {
        gene: Gene::Slco1b1,
        intervals: &[
            iv(0.0, 0.5,  Phenotype::PoorFunction),
            iv(0.5, 1.5,  Phenotype::DecreasedFunction),
            iv(1.5, 99.0, Phenotype::NormalFunction),
        ],
    },
    GeneIntervals {
        gene: Gene::Tpmt,
        intervals: &[
            iv(0.0, 0.5,  Phenotype::PoorMetabolizer),
            iv(0.5, 1.5,  Phenotype::IntermediateMetabolizer),
            iv(1.5, 99.0, Phenotype::NormalMetabolizer),
        ],
    },
    GeneIntervals {
        gene: Gene::Dpyd,
        intervals: &[
            iv(0.0, 0.5,  Phenotype::PoorMetabolizer),
            iv(0.5, 1.75, Phenotype::IntermediateMetabolizer),
            iv(1.75, 99.0, Phenotype::NormalMetabolizer),
        ],
    },
];

/// Default diploid activity scores for a genotype of two reference alleles.
///
/// CYP2C19's compressed scale puts `*1/*1` at 1.0; every other gene's
/// reference diplotype scores 2.0.
pub const DEFAULT_DIPLOID_SCORES: &[(Gene, f64)] = &[
    (Gene::Cyp2d6, 2.0),
    (Gene::Cyp2c19, 1.0),
    (Gene::Cyp2c9, 2.0),
    (Gene::Slco1b1, 2.0),
    (Gene::Tpmt, 2.0),
    (Gene::Dpyd, 2.0),
];
