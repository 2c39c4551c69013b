use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

const DESIGN_PREFIX: &str = "design_";

/// `design_<digits>` not preceded by an ASCII letter or digit, so the
/// `dldesign_<N>` suffix added by the sequence designer never matches. The
/// digit run is greedy, so `design_1` never matches inside `design_10`.
static DESIGN_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^A-Za-z0-9])design_(\d+)").expect("design token pattern is valid")
});

/// Index of a generated design, rendered as `design_<index>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DesignId(pub usize);

impl fmt::Display for DesignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", DESIGN_PREFIX, self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid design identifier '{0}'. Expected 'design_<index>'.")]
pub struct InvalidDesignId(pub String);

impl FromStr for DesignId {
    type Err = InvalidDesignId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(DESIGN_PREFIX)
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse().ok())
            .map(DesignId)
            .ok_or_else(|| InvalidDesignId(s.to_string()))
    }
}

impl TryFrom<String> for DesignId {
    type Error = InvalidDesignId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DesignId> for String {
    fn from(id: DesignId) -> Self {
        id.to_string()
    }
}

fn design_tokens(text: &str) -> impl Iterator<Item = DesignId> + '_ {
    DESIGN_TOKEN
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse().ok())
        .map(DesignId)
}

/// The first whole `design_<N>` token in `text`.
pub fn first_design_token(text: &str) -> Option<DesignId> {
    design_tokens(text).next()
}

/// Whether `text` names `id` as a whole `design_<N>` token.
pub fn contains_design_token(text: &str, id: DesignId) -> bool {
    design_tokens(text).any(|found| found == id)
}

/// Per-design metrics. Every field is either absent or a finite-or-infinite
/// (never NaN) floating-point value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DesignMetrics {
    pub plddt_binder: Option<f64>,
    pub pae_interaction: Option<f64>,
    pub binder_aligned_rmsd: Option<f64>,
    pub ddg: Option<f64>,
}

impl DesignMetrics {
    pub fn is_empty(&self) -> bool {
        self.plddt_binder.is_none()
            && self.pae_interaction.is_none()
            && self.binder_aligned_rmsd.is_none()
            && self.ddg.is_none()
    }
}

/// Drops NaN so that a present value is always comparable.
pub(crate) fn valid_metric(value: f64) -> Option<f64> {
    (!value.is_nan()).then_some(value)
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesignRecord {
    pub id: DesignId,
    pub metrics: DesignMetrics,
}

impl DesignRecord {
    pub fn new(id: DesignId) -> Self {
        Self {
            id,
            metrics: DesignMetrics::default(),
        }
    }
}

/// The ordered collection of design records for one run.
///
/// Records are created up front for every requested design and are only ever
/// updated in place afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesignSet {
    records: Vec<DesignRecord>,
}

impl DesignSet {
    pub fn with_count(count: usize) -> Self {
        Self {
            records: (0..count).map(|i| DesignRecord::new(DesignId(i))).collect(),
        }
    }

    pub fn from_records(records: Vec<DesignRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DesignRecord> {
        self.records.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = DesignId> + '_ {
        self.records.iter().map(|r| r.id)
    }

    pub fn get(&self, id: DesignId) -> Option<&DesignRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    fn get_mut(&mut self, id: DesignId) -> Option<&mut DesignRecord> {
        self.records.iter_mut().find(|r| r.id == id)
    }

    /// Applies `update` to the metrics of `id`. Unknown ids are logged and
    /// ignored; returns whether a record was touched.
    pub fn update(&mut self, id: DesignId, update: impl FnOnce(&mut DesignMetrics)) -> bool {
        match self.get_mut(id) {
            Some(record) => {
                update(&mut record.metrics);
                true
            }
            None => {
                warn!(
                    "Ignoring metrics for {}: not one of the {} requested designs.",
                    id,
                    self.records.len()
                );
                false
            }
        }
    }
}

impl<'a> IntoIterator for &'a DesignSet {
    type Item = &'a DesignRecord;
    type IntoIter = std::slice::Iter<'a, DesignRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
