//! Civil-date to day-of-year resolution.
//!
//! The GOES archive keys granules by ordinal day (001-366) rather than
//! month and day, so every query starts by resolving the selected civil
//! date to its ordinal.

use chrono::{Datelike, NaiveDate};

use crate::error::{ArchiveError, Result};

/// A (year, month, day) selector for one UTC day of archive data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSelector {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DateSelector {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// The 1-based day-of-year for this date (Jan 1 = 1, Dec 31 = 365/366).
    ///
    /// Fails when the fields do not denote a real calendar date, e.g.
    /// Feb 30 or month 13.
    pub fn ordinal(&self) -> Result<u32> {
        let date = NaiveDate::from_ymd_opt(self.year, self.month, self.day).ok_or(
            ArchiveError::InvalidDate {
                year: self.year,
                month: self.month,
                day: self.day,
            },
        )?;
        Ok(date.ordinal())
    }

    /// The ordinal rendered as the archive writes it: exactly three digits,
    /// zero-padded ("001"-"366").
    pub fn ordinal_string(&self) -> Result<String> {
        Ok(format!("{:03}", self.ordinal()?))
    }
}
