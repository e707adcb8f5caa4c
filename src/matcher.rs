//! Time-predicate selection over listed granules.
//!
//! Range matching compares start-time strings lexicographically, which
//! equals numeric comparison only because both sides are fixed-width
//! zero-padded digit strings ("0930" < "2030"). Never compare unpadded
//! values here; a varying pad width silently reorders the comparison.

use crate::error::Result;
use crate::naming::{extract, Family, FilenameFields};
use crate::storage_key::StorageKey;

/// The time shape of a match: one exact start time, or an inclusive window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeMatch {
    Exact(String),
    Range { start: String, end: String },
}

/// A pure predicate over extracted filename fields.
#[derive(Debug, Clone)]
pub struct MatchSpec {
    time: TimeMatch,
    product_code: Option<String>,
}

impl MatchSpec {
    pub fn exact(time: impl Into<String>) -> Self {
        Self {
            time: TimeMatch::Exact(time.into()),
            product_code: None,
        }
    }

    pub fn range(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            time: TimeMatch::Range {
                start: start.into(),
                end: end.into(),
            },
            product_code: None,
        }
    }

    /// Narrows the match to one product code, e.g. "MCMIPM2".
    pub fn with_product_code(mut self, code: impl Into<String>) -> Self {
        self.product_code = Some(code.into());
        self
    }

    pub fn matches(&self, fields: &FilenameFields) -> bool {
        let time = fields.start_time();
        let time_ok = match &self.time {
            TimeMatch::Exact(target) => time == target,
            TimeMatch::Range { start, end } => start.as_str() <= time && time <= end.as_str(),
        };
        let product_ok = match &self.product_code {
            Some(code) => fields.get("product_code") == Some(code.as_str()),
            None => true,
        };
        time_ok && product_ok
    }
}

/// Filters a listing down to the keys whose filenames satisfy `spec`,
/// preserving the original listing order.
///
/// Zero matches is an empty vec, not an error; a filename the family
/// schema cannot parse is an error, never a silent skip.
pub fn select_matching(
    listing: &[StorageKey],
    family: Family,
    spec: &MatchSpec,
) -> Result<Vec<StorageKey>> {
    let mut hits = vec![];
    for key in listing {
        let fields = extract(key.filename(), family)?;
        if spec.matches(&fields) {
            hits.push(key.clone());
        }
    }
    Ok(hits)
}
