//! Extraction of variant observations from VCF files.
//!
//! The scanner keeps only the data lines that matter for risk prediction:
//! the site must carry an rsID, the first sample's genotype must contain an
//! alternate allele, and the `GENE` INFO tag must name a covered gene.
//! Everything else, including malformed lines, is skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;

use super::ds::{Gene, VariantObservation};

/// Extract the pharmacogenomically relevant observations from a VCF file.
///
/// Files with a `.gz` extension are decompressed transparently.
///
/// # Arguments
///
/// * `path` - Path to the VCF file.
///
/// # Returns
///
/// The observations, in file order.
///
/// # Errors
///
/// If anything goes wrong, it returns a generic `anyhow::Error`.
pub fn extract_observations<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<VariantObservation>, anyhow::Error> {
    let path = path.as_ref();
    tracing::debug!("reading VCF file {:?}", path);
    let file = File::open(path)
        .map_err(|e| anyhow::anyhow!("problem opening VCF file {:?}: {}", path, e))?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        read_observations(BufReader::new(GzDecoder::new(file)))
    } else {
        read_observations(BufReader::new(file))
    }
}

/// Extract observations from a buffered VCF reader.
///
/// # Errors
///
/// If anything goes wrong, it returns a generic `anyhow::Error`.
pub fn read_observations<R: BufRead>(reader: R) -> Result<Vec<VariantObservation>, anyhow::Error> {
    let mut observations = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|e| anyhow::anyhow!("problem reading VCF line: {}", e))?;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(observation) = parse_data_line(&line) {
            observations.push(observation);
        }
    }
    tracing::debug!("extracted {} relevant observation(s)", observations.len());
    Ok(observations)
}

/// Parse one VCF data line into an observation, or `None` if the line is
/// irrelevant or malformed.
fn parse_data_line(line: &str) -> Option<VariantObservation> {
    // CHROM POS ID REF ALT QUAL FILTER INFO FORMAT <first sample>
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 10 {
        return None;
    }

    let id_field = fields[2];
    if id_field.is_empty() || id_field == "." {
        return None;
    }

    let gt = genotype_of_first_sample(fields[8], fields[9])?;
    // Uncalled and homozygous-reference genotypes carry no alternate allele.
    if !gt.contains('1') && !gt.contains('2') {
        return None;
    }

    let gene = Gene::from_symbol(info_value(fields[7], "GENE")?)?;
    let pos: u32 = fields[1].parse().ok()?;

    Some(VariantObservation {
        gene: gene.to_string(),
        chrom: fields[0].to_string(),
        pos,
        rsid: id_field.split(';').map(str::to_string).collect(),
        reference: fields[3].to_string(),
        alt: fields[4].split(',').map(str::to_string).collect(),
        gt: gt.to_string(),
    })
}

/// Pick the `GT` entry of the first sample, as positioned by the `FORMAT`
/// column.
fn genotype_of_first_sample<'a>(format: &str, sample: &'a str) -> Option<&'a str> {
    let gt_index = format.split(':').position(|key| key == "GT")?;
    sample.split(':').nth(gt_index)
}

/// Look up a key in the `INFO` column, taking the first value of a
/// comma-separated list.
fn info_value<'a>(info: &'a str, key: &str) -> Option<&'a str> {
    for entry in info.split(';') {
        if let Some(rest) = entry.strip_prefix(key) {
            if let Some(value) = rest.strip_prefix('=') {
                return value.split(',').next();
            }
        }
    }
    None
}
