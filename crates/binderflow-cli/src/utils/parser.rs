use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid hotspot residue '{0}'. Expected a chain id followed by a residue number (e.g., 'A56').")]
    InvalidHotspot(String),

    #[error("Hotspot list '{0}' contains an empty entry.")]
    EmptyHotspot(String),

    #[error("Invalid PDB id '{0}'. Expected four alphanumeric characters starting with a digit (e.g., '5O45').")]
    InvalidPdbId(String),

    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidKeyValue(String),
}

/// A residue on the target that the generator should bind near.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotspot {
    pub chain_id: char,
    pub residue_number: u32,
}

impl fmt::Display for Hotspot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.chain_id, self.residue_number)
    }
}

fn parse_hotspot(token: &str) -> Result<Hotspot, ParseError> {
    let mut chars = token.chars();
    let invalid = || ParseError::InvalidHotspot(token.to_string());
    let chain_id = chars
        .next()
        .filter(char::is_ascii_alphabetic)
        .ok_or_else(invalid)?;
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let residue_number = digits.parse().map_err(|_| invalid())?;
    Ok(Hotspot {
        chain_id,
        residue_number,
    })
}

/// Parses a comma-separated hotspot list, tolerating whitespace around
/// entries. An empty or all-whitespace string yields no hotspots.
pub fn parse_hotspots(list: &str) -> Result<Vec<Hotspot>, ParseError> {
    if list.trim().is_empty() {
        return Ok(Vec::new());
    }
    list.split(',')
        .map(str::trim)
        .map(|token| {
            if token.is_empty() {
                Err(ParseError::EmptyHotspot(list.to_string()))
            } else {
                parse_hotspot(token)
            }
        })
        .collect()
}

/// `"A56, A115 ,A123"` becomes `"A56,A115,A123"`.
pub fn normalize_hotspots(list: &str) -> Result<String, ParseError> {
    let hotspots = parse_hotspots(list)?;
    Ok(hotspots
        .iter()
        .map(Hotspot::to_string)
        .collect::<Vec<_>>()
        .join(","))
}

/// Validates an RCSB entry id and returns it upper-cased.
pub fn parse_pdb_id(id: &str) -> Result<String, ParseError> {
    let trimmed = id.trim();
    let valid = trimmed.len() == 4
        && trimmed.bytes().all(|b| b.is_ascii_alphanumeric())
        && trimmed.as_bytes()[0].is_ascii_digit();
    if valid {
        Ok(trimmed.to_ascii_uppercase())
    } else {
        Err(ParseError::InvalidPdbId(id.to_string()))
    }
}

pub fn parse_key_value(pair: &str) -> Result<(&str, &str), ParseError> {
    pair.split_once('=')
        .map(|(k, v)| (k.trim(), v.trim()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| ParseError::InvalidKeyValue(pair.to_string()))
}
