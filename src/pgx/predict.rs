//! Drug-risk prediction from VCF variants.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;

use super::eval;
use super::eval::result::RiskBundle;
use super::explain;

/// Command line arguments for `predict` command.
#[derive(Parser, Debug)]
#[command(about = "Predict drug risks from VCF variants", long_about = None)]
pub struct Args {
    /// Path to the VCF file to analyze (plain or gzip-compressed); omitting
    /// it predicts from an empty variant set.
    #[clap(long)]
    pub path_vcf: Option<PathBuf>,

    /// The drugs to assess; can be given multiple times.
    #[clap(long = "drug", required = true)]
    pub drugs: Vec<String>,

    /// Also generate a clinical narrative per drug.
    #[clap(long, default_value_t = false)]
    pub explain: bool,
}

/// Output written by the `predict` command.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Output {
    /// The analysis bundle.
    #[serde(flatten)]
    pub bundle: RiskBundle,
    /// Clinical narratives keyed by drug name, if requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanations: Option<BTreeMap<String, String>>,
}

/// Main entry point for the `predict` command.
///
/// # Arguments
///
/// * `common_args` - Commonly used command line arguments.
/// * `args` - Command line arguments specific to `predict` command.
///
/// # Errors
///
/// If anything goes wrong, it returns a generic `anyhow::Error`.
pub fn run(common_args: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("  running command `predict`");
    tracing::info!("  common_args = {:?}", &common_args);
    tracing::info!("  args = {:?}", &args);

    let observations = match &args.path_vcf {
        Some(path) => super::vcf::extract_observations(path)?,
        None => {
            tracing::warn!("no VCF file given; predicting from an empty variant set");
            Vec::new()
        }
    };

    let evaluator = eval::Evaluator::new()
        .map_err(|e| anyhow::anyhow!("failed to create evaluator: {}", e))?;
    let bundle = evaluator.predict_multi(&observations, &args.drugs);

    let explanations = args.explain.then(|| {
        bundle
            .drug_results
            .iter()
            .map(|result| {
                let profile = result
                    .gene_used
                    .and_then(|gene| bundle.gene_profiles.get(&gene));
                (
                    result.drug.clone(),
                    explain::explain(&observations, result, profile),
                )
            })
            .collect::<BTreeMap<_, _>>()
    });

    let output = Output {
        bundle,
        explanations,
    };
    println!("{}", serde_json::to_string(&output)?);

    Ok(())
}
