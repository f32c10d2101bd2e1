//! Annotation of VCF variants against the allele-definition table.

use std::path::PathBuf;

use clap::Parser;

/// Command line arguments for `annotate` command.
#[derive(Parser, Debug)]
#[command(about = "Annotate VCF variants with star alleles", long_about = None)]
pub struct Args {
    /// Path to the VCF file to annotate (plain or gzip-compressed).
    #[clap(long)]
    pub path_vcf: PathBuf,
}

/// Main entry point for the `annotate` command.
///
/// # Arguments
///
/// * `common_args` - Commonly used command line arguments.
/// * `args` - Command line arguments specific to `annotate` command.
///
/// # Errors
///
/// If anything goes wrong, it returns a generic `anyhow::Error`.
pub fn run(common_args: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("  running command `annotate`");
    tracing::info!("  common_args = {:?}", &common_args);
    tracing::info!("  args = {:?}", &args);

    let data = super::data::Data::new()
        .map_err(|e| anyhow::anyhow!("problem loading reference tables: {}", e))?;
    let observations = super::vcf::extract_observations(&args.path_vcf)?;

    for observation in &observations {
        tracing::info!("- annotating {:?}", observation.rsid);
        match data.annotate(observation) {
            Some(annotated) => println!("{}", serde_json::to_string(&annotated)?),
            None => {
                tracing::warn!(
                    "no allele definition for {:?} in {}; skipped",
                    observation.rsid,
                    observation.gene
                );
            }
        }
    }

    Ok(())
}
