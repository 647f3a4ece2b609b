//! Reporting period codes
//!
//! Snapshots are keyed by a 4-digit year+month code: "2511" = 2025-11.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SnapshotError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    first_day: NaiveDate,
}

impl Period {
    pub fn parse(code: &str) -> Result<Self, SnapshotError> {
        let code = code.trim();
        if code.len() != 4 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SnapshotError::InvalidPeriod(code.to_string()));
        }
        let yy: i32 = code[..2]
            .parse()
            .map_err(|_| SnapshotError::InvalidPeriod(code.to_string()))?;
        let month: u32 = code[2..]
            .parse()
            .map_err(|_| SnapshotError::InvalidPeriod(code.to_string()))?;

        NaiveDate::from_ymd_opt(2000 + yy, month, 1)
            .map(|first_day| Self { first_day })
            .ok_or_else(|| SnapshotError::InvalidPeriod(code.to_string()))
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// "2511"
    pub fn code(&self) -> String {
        format!("{:02}{:02}", self.year() % 100, self.month())
    }

    /// "2025-11"
    pub fn label(&self) -> String {
        format!("{}-{:02}", self.year(), self.month())
    }

    /// Same month one year earlier; `None` before 2000-01
    pub fn prior_year(&self) -> Option<Self> {
        NaiveDate::from_ymd_opt(self.year() - 1, self.month(), 1)
            .filter(|d| d.year() >= 2000)
            .map(|first_day| Self { first_day })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Period {
    type Err = SnapshotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Period {
    type Error = SnapshotError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.code()
    }
}
