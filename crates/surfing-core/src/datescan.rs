use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::SCAN_PAD_WIDTH;
use crate::error::{Result, SurfingError};

/// One observation session, written `YYYYMMDD_SS` where `SS` is the scan number.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Datescan {
    date: String,
    scan: u32,
}

impl Datescan {
    pub fn new(date: &str, scan: u32) -> Result<Self> {
        let value = format!("{date}_{scan}");
        if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid(&value, "date must be 8 digits (YYYYMMDD)"));
        }
        if scan > 99_999 {
            return Err(invalid(&value, "scan number does not fit in 5 digits"));
        }
        Ok(Self {
            date: date.to_string(),
            scan,
        })
    }

    /// Observation date as `YYYYMMDD`.
    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn scan(&self) -> u32 {
        self.scan
    }

    /// Scan number zero-padded to five digits, as used in directory names.
    pub fn scan_padded(&self) -> String {
        format!("{:0width$}", self.scan, width = SCAN_PAD_WIDTH)
    }
}

impl FromStr for Datescan {
    type Err = SurfingError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (date, scan) = s
            .split_once('_')
            .ok_or_else(|| invalid(s, "expected YYYYMMDD_SS"))?;
        if scan.is_empty()
            || scan.len() > SCAN_PAD_WIDTH
            || !scan.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid(s, "scan must be 1-5 digits"));
        }
        let scan: u32 = scan
            .parse()
            .map_err(|_| invalid(s, "scan must be 1-5 digits"))?;
        Self::new(date, scan).map_err(|_| invalid(s, "date must be 8 digits (YYYYMMDD)"))
    }
}

impl TryFrom<String> for Datescan {
    type Error = SurfingError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Datescan> for String {
    fn from(value: Datescan) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for Datescan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.date, self.scan)
    }
}

/// Parse a list of datescan strings, failing on the first invalid entry.
pub fn parse_datescans<S: AsRef<str>>(values: &[S]) -> Result<Vec<Datescan>> {
    values.iter().map(|v| v.as_ref().parse()).collect()
}

fn invalid(value: &str, reason: &str) -> SurfingError {
    SurfingError::InvalidDatescan {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
