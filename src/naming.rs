//! Filename layouts for the supported archive families.
//!
//! Granule metadata lives in the filename itself: delimited positional
//! tokens carrying the product code, satellite and observation start time.
//! Each family is described by a declarative schema (token index plus a
//! fixed-width slice within the token), and a single generic routine
//! extracts the named fields. Adding a family means adding a schema, not
//! new parsing code.

use std::collections::HashMap;

use crate::error::{ArchiveError, Result};

/// One named field: a fixed-width slice within a delimited token.
/// `len: None` takes the rest of the token.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub token: usize,
    pub start: usize,
    pub len: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
pub struct NamingSchema {
    pub family: &'static str,
    pub min_tokens: usize,
    pub fields: &'static [FieldSpec],
}

/// ABI L1b/L2 layout, e.g.
/// `OR_ABI-L2-MCMIPM2-M6_G16_s20223362030252_e20223362030321_c20223362030399.nc`
///
/// Tokens are split on '_' and '-'. The `s` token is
/// `sYYYYJJJHHMMSSt`: 4-digit year, 3-digit ordinal day, then
/// hour/minute/second/tenth.
pub const ABI_SCHEMA: NamingSchema = NamingSchema {
    family: "ABI",
    min_tokens: 9,
    fields: &[
        FieldSpec { name: "sensor", token: 1, start: 0, len: None },
        FieldSpec { name: "level", token: 2, start: 0, len: None },
        FieldSpec { name: "product_code", token: 3, start: 0, len: None },
        FieldSpec { name: "scan_mode", token: 4, start: 0, len: None },
        FieldSpec { name: "satellite", token: 5, start: 0, len: None },
        FieldSpec { name: "start_date", token: 6, start: 1, len: Some(7) },
        FieldSpec { name: "start_time", token: 6, start: 8, len: Some(4) },
        FieldSpec { name: "start_seconds", token: 6, start: 12, len: Some(3) },
    ],
};

/// JPSS/VIIRS active-fire layout, e.g.
/// `AF-Iband_v1r1_j01_s202212022030123_e202212022031365_c202212022101190.nc`
///
/// The `s` token is `sYYYYMMDDHHMMSSt`: calendar date rather than ordinal
/// day, and one more digit of time precision than ABI.
pub const VIIRS_SCHEMA: NamingSchema = NamingSchema {
    family: "VIIRS",
    min_tokens: 7,
    fields: &[
        FieldSpec { name: "record_type", token: 0, start: 0, len: None },
        FieldSpec { name: "product_code", token: 1, start: 0, len: None },
        FieldSpec { name: "version", token: 2, start: 0, len: None },
        FieldSpec { name: "satellite", token: 3, start: 0, len: None },
        FieldSpec { name: "start_date", token: 4, start: 1, len: Some(8) },
        FieldSpec { name: "start_time", token: 4, start: 9, len: Some(4) },
        FieldSpec { name: "start_seconds", token: 4, start: 13, len: Some(3) },
    ],
};

/// The archive families this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Abi,
    Viirs,
}

impl Family {
    pub fn schema(&self) -> &'static NamingSchema {
        match self {
            Family::Abi => &ABI_SCHEMA,
            Family::Viirs => &VIIRS_SCHEMA,
        }
    }
}

/// Named fields extracted from one filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameFields(HashMap<&'static str, String>);

impl FilenameFields {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// The HHMM observation start, present in every family.
    pub fn start_time(&self) -> &str {
        self.0["start_time"].as_str()
    }
}

/// Splits `filename` per the family schema and extracts its named fields.
///
/// `filename` must be a bare name (no directory prefix). Performs no I/O.
pub fn extract(filename: &str, family: Family) -> Result<FilenameFields> {
    let schema = family.schema();
    let tokens: Vec<&str> = filename.split(['_', '-']).collect();

    if tokens.len() < schema.min_tokens {
        return Err(ArchiveError::unrecognized(
            filename,
            format!(
                "{} name needs {} tokens, found {}",
                schema.family,
                schema.min_tokens,
                tokens.len()
            ),
        ));
    }

    let mut fields = HashMap::with_capacity(schema.fields.len());
    for spec in schema.fields {
        let token = tokens[spec.token];
        let end = match spec.len {
            Some(len) => spec.start + len,
            None => token.len(),
        };
        if spec.start >= end || end > token.len() {
            return Err(ArchiveError::unrecognized(
                filename,
                format!(
                    "token {} too short for field '{}' ({} chars, need {})",
                    spec.token,
                    spec.name,
                    token.len(),
                    end
                ),
            ));
        }
        fields.insert(spec.name, token[spec.start..end].to_string());
    }

    Ok(FilenameFields(fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABI_NAME: &str =
        "OR_ABI-L2-MCMIPM2-M6_G16_s20223362030252_e20223362030321_c20223362030399.nc";
    const VIIRS_NAME: &str =
        "AF-Iband_v1r1_j01_s202212022030123_e202212022031365_c202212022101190.nc";

    #[test]
    fn test_abi_fields() {
        let fields = extract(ABI_NAME, Family::Abi).unwrap();
        assert_eq!(fields.get("sensor"), Some("ABI"));
        assert_eq!(fields.get("product_code"), Some("MCMIPM2"));
        assert_eq!(fields.get("scan_mode"), Some("M6"));
        assert_eq!(fields.get("satellite"), Some("G16"));
        assert_eq!(fields.get("start_date"), Some("2022336"));
        assert_eq!(fields.start_time(), "2030");
        assert_eq!(fields.get("start_seconds"), Some("252"));
    }

    #[test]
    fn test_viirs_fields() {
        let fields = extract(VIIRS_NAME, Family::Viirs).unwrap();
        assert_eq!(fields.get("record_type"), Some("AF"));
        assert_eq!(fields.get("product_code"), Some("Iband"));
        assert_eq!(fields.get("satellite"), Some("j01"));
        assert_eq!(fields.get("start_date"), Some("20221202"));
        assert_eq!(fields.start_time(), "2030");
        assert_eq!(fields.get("start_seconds"), Some("123"));
    }

    #[test]
    fn test_families_are_not_conflated() {
        // A VIIRS name read with the ABI schema slices the wrong offsets
        // or fails outright; it must never quietly produce ABI fields.
        match extract(VIIRS_NAME, Family::Abi) {
            Ok(fields) => assert_ne!(fields.get("sensor"), Some("ABI")),
            Err(ArchiveError::UnrecognizedFilename { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_too_few_tokens() {
        let err = extract("OR_ABI-L2.nc", Family::Abi).unwrap_err();
        assert!(matches!(err, ArchiveError::UnrecognizedFilename { .. }));
    }

    #[test]
    fn test_short_time_token() {
        let err = extract(
            "OR_ABI-L2-MCMIPM2-M6_G16_s2022336_e20223362030321_c20223362030399.nc",
            Family::Abi,
        )
        .unwrap_err();
        assert!(matches!(err, ArchiveError::UnrecognizedFilename { .. }));
    }

    #[test]
    fn test_empty_name() {
        assert!(extract("", Family::Abi).is_err());
        assert!(extract("", Family::Viirs).is_err());
    }
}
