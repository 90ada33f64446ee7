//! Calendar month parsed from the `MM-YYYY` form used by the totals query.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::errors::ModelError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthYear {
    year: i32,
    month: u32,
}

impl MonthYear {
    pub fn new(year: i32, month: u32) -> Result<Self, ModelError> {
        if !(1..=12).contains(&month) {
            return Err(ModelError::Validation(format!("month out of range: {month}")));
        }
        if !(0..=9999).contains(&year) {
            return Err(ModelError::Validation(format!("year out of range: {year}")));
        }
        Ok(Self { year, month })
    }

    /// Strict `MM-YYYY`: exactly two month digits and four year digits.
    pub fn parse(s: &str) -> Result<Self, ModelError> {
        let invalid = || ModelError::Validation(format!("expected MM-YYYY, got {s:?}"));
        let (mm, yyyy) = s.split_once('-').ok_or_else(invalid)?;
        if mm.len() != 2 || yyyy.len() != 4 {
            return Err(invalid());
        }
        if !mm.bytes().chain(yyyy.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let month = mm.parse::<u32>().map_err(|_| invalid())?;
        let year = yyyy.parse::<i32>().map_err(|_| invalid())?;
        Self::new(year, month)
    }

    pub fn year(&self) -> i32 { self.year }

    pub fn month(&self) -> u32 { self.month }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    /// Midnight UTC on the first day of the month.
    pub fn first_instant(&self) -> DateTime<FixedOffset> {
        // `new` guarantees a valid calendar month
        let date = NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MIN)
            .and_time(NaiveTime::MIN);
        Utc.from_utc_datetime(&date).into()
    }

    /// Exclusive upper bound covering the whole month.
    pub fn end_exclusive(&self) -> DateTime<FixedOffset> {
        self.next().first_instant()
    }
}

impl FromStr for MonthYear {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.month, self.year)
    }
}
