//! Target preparation: fetch a structure from RCSB, strip it down to protein
//! records and summarise its chains.

use crate::error::{CliError, Result};
use binderflow::core::io::pdb::{self, ChainRange};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const RCSB_BASE_URL: &str = "https://files.rcsb.org/view";

pub fn pdb_url(base_url: &str, pdb_id: &str) -> String {
    format!("{}/{}.pdb", base_url.trim_end_matches('/'), pdb_id)
}

pub fn raw_path(dir: &Path, pdb_id: &str) -> PathBuf {
    dir.join(format!("{}.pdb", pdb_id))
}

pub fn cleaned_path(dir: &Path, pdb_id: &str) -> PathBuf {
    dir.join(format!("{}_cleaned.pdb", pdb_id))
}

/// Downloads `<pdb_id>.pdb` into `dir`, replacing any existing copy.
pub async fn download_pdb(
    client: &reqwest::Client,
    base_url: &str,
    pdb_id: &str,
    dir: &Path,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let url = pdb_url(base_url, pdb_id);
    info!("Sending request to {}", url);

    let response = client.get(&url).send().await?.error_for_status()?;
    let body = response.bytes().await?;
    if body.is_empty() {
        return Err(CliError::Target(format!("{} returned an empty body", url)));
    }

    let path = raw_path(dir, pdb_id);
    fs::write(&path, &body)?;
    info!("Saved {} bytes to {:?}", body.len(), path);
    Ok(path)
}

/// Writes the protein-only copy of `raw` to `cleaned` and returns the number
/// of atom records kept.
pub fn clean_target(raw: &Path, cleaned: &Path) -> Result<usize> {
    let mut reader = BufReader::new(File::open(raw)?);
    let mut writer = BufWriter::new(File::create(cleaned)?);
    let kept = pdb::strip_non_protein(&mut reader, &mut writer)
        .map_err(|e| CliError::parsing(raw, e))?;
    writer.flush()?;
    debug!("Kept {} protein atom records from {:?}", kept, raw);
    Ok(kept)
}

pub fn chain_ranges(path: &Path) -> Result<Vec<ChainRange>> {
    let mut reader = BufReader::new(File::open(path)?);
    pdb::chain_residue_ranges(&mut reader).map_err(|e| CliError::parsing(path, e))
}

/// A starting point for the backbone contig string: every target chain kept
/// whole, followed by a chain break.
pub fn contig_hint(ranges: &[ChainRange]) -> String {
    ranges
        .iter()
        .map(|r| format!("{}{}-{}/0", r.chain_id, r.first_residue, r.last_residue))
        .collect::<Vec<_>>()
        .join(" ")
}
