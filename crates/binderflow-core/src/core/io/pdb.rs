//! Minimal PDB text handling used to prepare a design target: stripping
//! everything that is not protein and summarising chain residue ranges.

use phf::{Set, phf_set};
use std::io::{self, BufRead, Write};
use thiserror::Error;

static PROTEIN_RESIDUES: Set<&'static str> = phf_set! {
    "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE",
    "LEU", "LYS", "MET", "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL",
    "MSE", "SEC", "PYL", "HID", "HIE", "HIP", "CYX", "ASH", "GLH", "LYN",
};

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid residue number '{value}' on line {line}")]
    InvalidResidueNumber { line: usize, value: String },
    #[error("No protein atoms found")]
    NoProteinAtoms,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn is_atom_record(line: &str) -> bool {
    line.starts_with("ATOM  ") || line.starts_with("HETATM")
}

fn is_protein_atom(line: &str) -> bool {
    is_atom_record(line) && PROTEIN_RESIDUES.contains(slice_and_trim(line, 17, 20))
}

/// Copies only protein atom records (and chain terminators) from `reader`
/// to `writer`, finishing with an `END` record. Returns the number of atom
/// records kept.
pub fn strip_non_protein(
    reader: &mut impl BufRead,
    writer: &mut impl Write,
) -> Result<usize, PdbError> {
    let mut kept = 0;
    let mut last_was_atom = false;

    for line in reader.lines() {
        let line = line?;
        if is_protein_atom(&line) {
            writeln!(writer, "{}", line)?;
            kept += 1;
            last_was_atom = true;
        } else if line.starts_with("TER") && last_was_atom {
            writeln!(writer, "{}", line)?;
            last_was_atom = false;
        }
    }

    if kept == 0 {
        return Err(PdbError::NoProteinAtoms);
    }
    writeln!(writer, "END")?;
    Ok(kept)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainRange {
    pub chain_id: char,
    pub first_residue: isize,
    pub last_residue: isize,
    pub residue_count: usize,
}

/// Residue-number range of each chain with protein atoms, in order of first
/// appearance. Insertion codes are ignored.
pub fn chain_residue_ranges(reader: &mut impl BufRead) -> Result<Vec<ChainRange>, PdbError> {
    let mut chains: Vec<(char, Vec<isize>)> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if !is_protein_atom(&line) {
            continue;
        }
        let chain_id = slice_and_trim(&line, 21, 22).chars().next().unwrap_or(' ');
        let res_str = slice_and_trim(&line, 22, 26);
        let res_num: isize = res_str.parse().map_err(|_| PdbError::InvalidResidueNumber {
            line: idx + 1,
            value: res_str.to_string(),
        })?;

        match chains.iter_mut().find(|(id, _)| *id == chain_id) {
            Some((_, residues)) => {
                if residues.last() != Some(&res_num) {
                    residues.push(res_num);
                }
            }
            None => chains.push((chain_id, vec![res_num])),
        }
    }

    Ok(chains
        .into_iter()
        .map(|(chain_id, mut residues)| {
            residues.sort_unstable();
            residues.dedup();
            ChainRange {
                chain_id,
                first_residue: residues[0],
                last_residue: residues[residues.len() - 1],
                residue_count: residues.len(),
            }
        })
        .collect())
}
