//! Calendar month arithmetic.
//!
//! Budgets and trend queries are keyed by calendar month. Internally a month
//! is a structured (year, month) pair so that arithmetic never goes through
//! string parsing; the canonical "YYYY-MM" form only appears when formatting
//! for storage, URLs, and display.

use std::{cmp::Ordering, fmt::Display, str::FromStr};

use serde::Deserialize;
use time::{Date, Month};

use crate::Error;

/// A calendar month, e.g. March 2024.
///
/// Ordered chronologically. The canonical string form is zero-padded
/// "YYYY-MM", which matches how transaction dates prefix-match in SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct MonthKey {
    year: i32,
    month: Month,
}

impl MonthKey {
    /// Create a month key from its parts.
    pub const fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// The month containing `date`.
    pub fn from_date(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The calendar year.
    pub fn year(self) -> i32 {
        self.year
    }

    /// The month of the year.
    pub fn month(self) -> Month {
        self.month
    }

    /// Add `delta` calendar months, rolling over year boundaries in either
    /// direction, so January 2024 minus one month is December 2023.
    pub fn plus_months(self, delta: i64) -> Self {
        let zero_based = self.year as i64 * 12 + (self.month as u8 as i64 - 1) + delta;

        Self {
            year: zero_based.div_euclid(12) as i32,
            month: month_from_number((zero_based.rem_euclid(12) + 1) as u8),
        }
    }

    /// The previous calendar month.
    pub fn previous(self) -> Self {
        self.plus_months(-1)
    }

    /// The next calendar month.
    pub fn next(self) -> Self {
        self.plus_months(1)
    }

    /// The number of days in this month, accounting for leap years.
    pub fn days_in_month(self) -> u8 {
        time::util::days_in_month(self.month, self.year)
    }

    /// Every month from `self` through `end`, inclusive.
    ///
    /// Returns an empty vector when `self` is after `end`.
    pub fn sequence_to(self, end: MonthKey) -> Vec<MonthKey> {
        let mut months = Vec::new();
        let mut current = self;

        while current <= end {
            months.push(current);
            current = current.next();
        }

        months
    }
}

impl PartialOrd for MonthKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MonthKey {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.year, self.month as u8).cmp(&(other.year, other.month as u8))
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month as u8)
    }
}

impl FromStr for MonthKey {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidMonthKey(text.to_owned());

        let (year_text, month_text) = text.split_once('-').ok_or_else(invalid)?;
        let year: i32 = year_text.parse().map_err(|_| invalid())?;
        let month_number: u8 = month_text.parse().map_err(|_| invalid())?;
        let month = Month::try_from(month_number).map_err(|_| invalid())?;

        Ok(Self { year, month })
    }
}

impl TryFrom<String> for MonthKey {
    type Error = Error;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

fn month_from_number(number: u8) -> Month {
    match number {
        1 => Month::January,
        2 => Month::February,
        3 => Month::March,
        4 => Month::April,
        5 => Month::May,
        6 => Month::June,
        7 => Month::July,
        8 => Month::August,
        9 => Month::September,
        10 => Month::October,
        11 => Month::November,
        _ => Month::December,
    }
}



#[cfg(test)]
mod parse_and_format_tests {
    use time::Month;

    use crate::Error;

    use super::MonthKey;

    #[test]
    fn formats_zero_padded() {
        let month = MonthKey::new(2024, Month::March);

        assert_eq!(month.to_string(), "2024-03");
    }

    #[test]
    fn parses_canonical_form() {
        let month: MonthKey = "2023-12".parse().unwrap();

        assert_eq!(month, MonthKey::new(2023, Month::December));
    }

    #[test]
    fn rejects_out_of_range_month() {
        let result: Result<MonthKey, Error> = "2023-13".parse();

        assert_eq!(result, Err(Error::InvalidMonthKey("2023-13".to_owned())));
    }

    #[test]
    fn rejects_garbage() {
        let result: Result<MonthKey, Error> = "next month".parse();

        assert!(result.is_err());
    }
}
