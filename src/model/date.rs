//! The expense date, parsed from and written as `DD-MM-YYYY`.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The day-month-year layout used in the expense sheet, e.g. `24-10-2025`.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// A calendar date written as `DD-MM-YYYY`. Only real dates parse, so `31-02-2025` is rejected.
/// Single-digit days and months are accepted and written back zero-padded. The year must be
/// exactly four digits.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ExpenseDate(NaiveDate);

impl ExpenseDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DateError {
    input: String,
    /// `None` when the year is not four digits, which is checked before chrono sees the input.
    source: Option<chrono::ParseError>,
}

impl DateError {
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl Display for DateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(
                f,
                "Invalid date '{}' ({source}), use the format DD-MM-YYYY",
                self.input
            ),
            None => write!(
                f,
                "Invalid date '{}' (the year must have four digits), use the format DD-MM-YYYY",
                self.input
            ),
        }
    }
}

impl Error for DateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn Error + 'static))
    }
}

impl FromStr for ExpenseDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // chrono's %Y also takes a signed year of 1 to 4 digits, e.g. `24-10-25` as year 25.
        if !has_four_digit_year(trimmed) {
            return Err(DateError {
                input: s.to_string(),
                source: None,
            });
        }
        NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
            .map(Self)
            .map_err(|source| DateError {
                input: s.to_string(),
                source: Some(source),
            })
    }
}

/// Exactly three `-` separated parts, the last being four ASCII digits with no sign.
fn has_four_digit_year(s: &str) -> bool {
    let mut parts = s.split('-');
    let year = parts.nth(2);
    parts.next().is_none()
        && year.is_some_and(|year| year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()))
}

impl Display for ExpenseDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl Serialize for ExpenseDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ExpenseDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ExpenseDate::from_str(&s).map_err(serde::de::Error::custom)
    }
}
