//! TOML-described scan selections: which archive, which granules.
//!
//! A selection is the caller-facing query record. Family modules turn it
//! into prefixes, probes and a match predicate.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use url::Url;

use crate::calendar::DateSelector;
use crate::error::{ArchiveError, Result};
use crate::matcher::MatchSpec;
use crate::naming::Family;

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct TimeWindow {
    pub start: String,
    pub end: String,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ScanSelection {
    id: String,
    archive: String,
    satellite: String,
    product: String,
    year: i32,
    month: u32,
    day: u32,
    hour: Option<u32>,
    start_time: Option<String>,
    product_code: Option<String>,
    granules: Option<Vec<String>>,
    base_url: Option<String>,
    // Keep the window table last: TOML emits tables after plain values.
    window: Option<TimeWindow>,
}

impl ScanSelection {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let selection: Self = toml::from_str(&content)
            .map_err(|err| ArchiveError::InvalidSelection(err.to_string()))?;
        Ok(selection)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|err| ArchiveError::InvalidSelection(err.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn from_template(table: &toml::Table) -> Result<Self> {
        let selection: Self = toml::from_str(&table.to_string())
            .map_err(|err| ArchiveError::InvalidSelection(err.to_string()))?;
        Ok(selection)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn satellite(&self) -> &str {
        &self.satellite
    }

    pub fn family(&self) -> Result<Family> {
        match self.archive.as_str() {
            "abi" => Ok(Family::Abi),
            "viirs" => Ok(Family::Viirs),
            other => Err(ArchiveError::InvalidSelection(format!(
                "unknown archive family: {other}"
            ))),
        }
    }

    pub fn date(&self) -> DateSelector {
        DateSelector::new(self.year, self.month, self.day)
    }

    pub fn hour(&self) -> Option<u32> {
        self.hour
    }

    /// Candidate filenames to probe, deduplicated but in listed order.
    pub fn granules_to_probe(&self) -> Option<Vec<String>> {
        let granules = self.granules.as_ref()?;
        if granules.is_empty() {
            return None;
        }
        let mut seen = std::collections::HashSet::new();
        let deduped: Vec<String> = granules
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .cloned()
            .collect();
        Some(deduped)
    }

    /// The web-archive base URL, required for probe-only families.
    pub fn base_url(&self) -> Result<Url> {
        let raw = self.base_url.as_ref().ok_or_else(|| {
            ArchiveError::InvalidSelection("selection has no base_url".into())
        })?;
        Url::parse(raw).map_err(|err| ArchiveError::InvalidSelection(err.to_string()))
    }

    /// Builds the match predicate, enforcing the fixed-width invariant:
    /// times are exactly four digits, and a window must not cross
    /// midnight (HHMM comparison is only ordered within one UTC day).
    pub fn to_match_spec(&self) -> Result<MatchSpec> {
        let hhmm = Regex::new(r"^[0-9]{4}$").expect("Regex pattern should always compile");

        let mut spec = match (&self.start_time, &self.window) {
            (Some(time), None) => {
                if !hhmm.is_match(time) {
                    return Err(ArchiveError::InvalidSelection(format!(
                        "start_time must be 4 digits, got '{time}'"
                    )));
                }
                MatchSpec::exact(time)
            }
            (None, Some(window)) => {
                if !hhmm.is_match(&window.start) || !hhmm.is_match(&window.end) {
                    return Err(ArchiveError::InvalidSelection(format!(
                        "window bounds must be 4 digits, got '{}'-'{}'",
                        window.start, window.end
                    )));
                }
                if window.start > window.end {
                    return Err(ArchiveError::InvalidSelection(format!(
                        "window '{}'-'{}' crosses midnight",
                        window.start, window.end
                    )));
                }
                MatchSpec::range(&window.start, &window.end)
            }
            (Some(_), Some(_)) => {
                return Err(ArchiveError::InvalidSelection(
                    "selection has both start_time and window".into(),
                ))
            }
            (None, None) => {
                return Err(ArchiveError::InvalidSelection(
                    "selection needs start_time or window".into(),
                ))
            }
        };

        if let Some(code) = &self.product_code {
            spec = spec.with_product_code(code);
        }
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goes;
    use crate::jpss;

    const TEMPLATE_PATH: &str = "/tmp/granule-fetch-scan_selection.toml";

    #[test]
    fn test_abi_template() {
        let selection = ScanSelection::from_template(&goes::scan_selection_toml()).unwrap();
        assert_eq!(selection.id(), "goes.abi-l2-mcmipm");
        assert_eq!(selection.family().unwrap(), Family::Abi);
        assert_eq!(selection.satellite(), "G16");
        assert_eq!(selection.hour(), Some(20));
        assert_eq!(selection.date(), DateSelector::new(2022, 12, 2));
    }

    #[test]
    fn test_viirs_template() {
        let selection = ScanSelection::from_template(&jpss::scan_selection_toml()).unwrap();
        assert_eq!(selection.family().unwrap(), Family::Viirs);
        let granules = selection.granules_to_probe().unwrap();
        assert_eq!(granules.len(), 2);
    }

    #[test]
    fn test_write_then_read_toml() {
        let path = Path::new(TEMPLATE_PATH);
        let selection = ScanSelection::from_template(&goes::scan_selection_toml()).unwrap();
        selection.write(path).unwrap();

        let selection = ScanSelection::read(path).unwrap();
        assert_eq!(selection.id(), "goes.abi-l2-mcmipm");
        assert_eq!(selection.product(), "ABI-L2-MCMIPM");
    }

    #[test]
    fn test_match_spec_from_exact_selection() {
        let selection = ScanSelection::from_template(&goes::scan_selection_toml()).unwrap();
        let spec = selection.to_match_spec().unwrap();
        let fields = crate::naming::extract(
            "OR_ABI-L2-MCMIPM2-M6_G16_s20223362030252_e20223362030321_c20223362030399.nc",
            Family::Abi,
        )
        .unwrap();
        assert!(spec.matches(&fields));
    }

    #[test]
    fn test_granule_dedup_keeps_order() {
        let mut table = jpss::scan_selection_toml();
        let first = "AF-Iband_v1r1_j01_s202212022030123_e202212022031365_c202212022101190.nc";
        let second = "AF-Iband_v1r1_j01_s202212022031366_e202212022033008_c202212022102204.nc";
        table.insert(
            "granules".into(),
            toml::Value::Array(vec![
                toml::Value::String(first.into()),
                toml::Value::String(second.into()),
                toml::Value::String(first.into()),
            ]),
        );
        let selection = ScanSelection::from_template(&table).unwrap();
        let granules = selection.granules_to_probe().unwrap();
        assert_eq!(granules, vec![first.to_string(), second.to_string()]);
    }

    #[test]
    fn test_bad_time_strings_are_rejected() {
        let mut table = goes::scan_selection_toml();
        table.insert("start_time".into(), toml::Value::String("830".into()));
        let selection = ScanSelection::from_template(&table).unwrap();
        assert!(matches!(
            selection.to_match_spec(),
            Err(ArchiveError::InvalidSelection(_))
        ));
    }

    #[test]
    fn test_midnight_crossing_window_is_rejected() {
        let mut table = jpss::scan_selection_toml();
        table.insert(
            "window".into(),
            toml::toml! {
                start = "2359"
                end = "0001"
            }
            .into(),
        );
        let selection = ScanSelection::from_template(&table).unwrap();
        assert!(matches!(
            selection.to_match_spec(),
            Err(ArchiveError::InvalidSelection(_))
        ));
    }

    #[test]
    fn test_missing_base_url() {
        let selection = ScanSelection::from_template(&goes::scan_selection_toml()).unwrap();
        assert!(matches!(
            selection.base_url(),
            Err(ArchiveError::InvalidSelection(_))
        ));
    }
}
