use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

pub const HEADER_MARKER: &str = "SCORE:";

const NON_DATA_PREFIXES: &[&str] = &["SEQUENCE:", "REMARK"];

#[derive(Debug, Error)]
pub enum ScoreFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("No header line starting with 'SCORE:' found")]
    MissingHeader,
    #[error("No data line found after the header")]
    MissingDataLine,
    #[error("Column '{0}' is not present in the header")]
    MissingColumn(String),
    #[error("Data line has no value for column '{0}'")]
    MissingValue(String),
    #[error("Value '{value}' in column '{column}' is not a number")]
    InvalidValue { column: String, value: String },
}

/// The header and the last data row of a score file, split on whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreTable {
    pub header: Vec<String>,
    pub row: Vec<String>,
}

impl ScoreTable {
    pub fn parse(text: &str) -> Result<Self, ScoreFileError> {
        let lines: Vec<&str> = text.lines().collect();

        let header_idx = lines
            .iter()
            .position(|line| line.split_whitespace().next() == Some(HEADER_MARKER))
            .ok_or(ScoreFileError::MissingHeader)?;
        let header: Vec<&str> = lines[header_idx].split_whitespace().collect();

        let row = lines[header_idx + 1..]
            .iter()
            .rev()
            .map(|line| line.trim())
            .find(|line| !line.is_empty() && !is_non_data_line(line, &header))
            .ok_or(ScoreFileError::MissingDataLine)?;

        Ok(Self {
            header: header.into_iter().map(str::to_string).collect(),
            row: row.split_whitespace().map(str::to_string).collect(),
        })
    }

    pub fn value(&self, column: &str) -> Result<f64, ScoreFileError> {
        let idx = self
            .header
            .iter()
            .position(|name| name == column)
            .ok_or_else(|| ScoreFileError::MissingColumn(column.to_string()))?;
        let raw = self
            .row
            .get(idx)
            .ok_or_else(|| ScoreFileError::MissingValue(column.to_string()))?;
        raw.parse().map_err(|_| ScoreFileError::InvalidValue {
            column: column.to_string(),
            value: raw.clone(),
        })
    }
}

fn is_non_data_line(line: &str, header: &[&str]) -> bool {
    NON_DATA_PREFIXES.iter().any(|p| line.starts_with(p))
        || line.split_whitespace().eq(header.iter().copied())
}

pub fn parse_score_value(text: &str, column: &str) -> Result<f64, ScoreFileError> {
    ScoreTable::parse(text)?.value(column)
}

pub fn read_score_value(path: &Path, column: &str) -> Result<f64, ScoreFileError> {
    let text = fs::read_to_string(path)?;
    parse_score_value(&text, column)
}
