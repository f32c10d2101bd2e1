//! CPIC-based pharmacogenomic risk prediction.
//!
//! The pipeline turns raw variant observations into clinical risk calls in
//! three stages: annotation against the curated allele tables, per-gene
//! diplotype and phenotype analysis, and drug-level risk resolution.

pub mod annotate;
pub mod data;
pub mod ds;
pub mod eval;
pub mod explain;
pub mod predict;
pub mod vcf;
