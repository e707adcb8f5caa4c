//! Storage keys and the typed segments they are built from.
//!
//! Both origins address objects by '/'-joined paths. Numeric segments
//! (year, ordinal day, hour) are rendered at a fixed zero-padded width;
//! the width is part of the archive layout, not a formatting nicety.

use std::fmt;

use crate::error::{ArchiveError, Result};

/// One path segment: either a literal name or a zero-padded number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Name(String),
    Padded { value: u64, width: usize },
}

impl Segment {
    pub fn name(value: impl Into<String>) -> Self {
        Segment::Name(value.into())
    }

    pub fn padded(value: u64, width: usize) -> Self {
        Segment::Padded { value, width }
    }

    fn render(&self) -> Result<String> {
        match self {
            Segment::Name(name) => Ok(name.clone()),
            Segment::Padded { value, width } => {
                // A value wider than its segment would silently break the
                // archive layout, so refuse to truncate.
                if *value >= 10u64.pow(*width as u32) {
                    return Err(ArchiveError::PathEncoding {
                        value: *value,
                        width: *width,
                    });
                }
                Ok(format!("{:0width$}", value, width = width))
            }
        }
    }
}

/// A key into a remote namespace: a prefix (trailing '/') or a leaf object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn new(key: impl Into<String>) -> Self {
        StorageKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_prefix(&self) -> bool {
        self.0.ends_with('/')
    }

    /// This key with a trailing separator, marking it as a one-level prefix.
    pub fn into_prefix(mut self) -> Self {
        if !self.0.ends_with('/') {
            self.0.push('/');
        }
        self
    }

    /// The last path segment, with any directory prefix stripped.
    pub fn filename(&self) -> &str {
        match self.0.rfind('/') {
            Some(i) => &self.0[(i + 1)..],
            None => &self.0,
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Renders each segment and joins them with '/'. Identical inputs always
/// produce identical keys.
pub fn build_key(segments: &[Segment]) -> Result<StorageKey> {
    let rendered = segments
        .iter()
        .map(Segment::render)
        .collect::<Result<Vec<_>>>()?;
    Ok(StorageKey(rendered.join("/")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_hour_key() {
        let key = build_key(&[
            Segment::name("noaa-goes16"),
            Segment::name("ABI-L2-MCMIPM"),
            Segment::padded(2022, 4),
            Segment::padded(336, 3),
            Segment::padded(20, 2),
        ])
        .unwrap();
        assert_eq!(key.as_str(), "noaa-goes16/ABI-L2-MCMIPM/2022/336/20");
    }

    #[test]
    fn test_padding_is_applied() {
        let key = build_key(&[Segment::padded(7, 3), Segment::padded(4, 2)]).unwrap();
        assert_eq!(key.as_str(), "007/04");
    }

    #[test]
    fn test_overflowing_width_is_an_error() {
        let err = build_key(&[Segment::padded(336, 2)]).unwrap_err();
        assert!(matches!(
            err,
            ArchiveError::PathEncoding { value: 336, width: 2 }
        ));
    }

    #[test]
    fn test_width_boundary() {
        assert!(build_key(&[Segment::padded(99, 2)]).is_ok());
        assert!(build_key(&[Segment::padded(100, 2)]).is_err());
    }

    #[test]
    fn test_prefix_form() {
        let key = StorageKey::new("ABI-L2-MCMIPM/2022/336/20").into_prefix();
        assert_eq!(key.as_str(), "ABI-L2-MCMIPM/2022/336/20/");
        assert!(key.is_prefix());
        // Already-terminated prefixes are left alone.
        assert_eq!(key.clone().into_prefix(), key);
    }

    #[test]
    fn test_filename() {
        let key = StorageKey::new("ABI-L2-MCMIPM/2022/336/20/OR_ABI.nc");
        assert_eq!(key.filename(), "OR_ABI.nc");
        assert_eq!(StorageKey::new("bare.nc").filename(), "bare.nc");
    }
}
