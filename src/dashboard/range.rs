//! The dashboard's trend range selector.

use time::Month;

use crate::month::MonthKey;

/// How far back the trend chart and the top categories list look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(super) enum TrendRange {
    /// The current month only.
    #[default]
    CurrentMonth,
    /// The current month and the two before it.
    ThreeMonths,
    /// The current month and the five before it.
    SixMonths,
    /// January of the current year through the current month.
    YearToDate,
}

impl TrendRange {
    /// Parse the `?range=` query value. Unknown values fall back to the
    /// current month so a mistyped URL still renders.
    pub fn from_key(key: Option<&str>) -> Self {
        match key {
            Some("3") => Self::ThreeMonths,
            Some("6") => Self::SixMonths,
            Some("ytd") => Self::YearToDate,
            _ => Self::CurrentMonth,
        }
    }

    /// The query value that selects this range.
    pub fn key(self) -> &'static str {
        match self {
            Self::CurrentMonth => "1",
            Self::ThreeMonths => "3",
            Self::SixMonths => "6",
            Self::YearToDate => "ytd",
        }
    }

    /// A short label for the range selector links.
    pub fn label(self) -> &'static str {
        match self {
            Self::CurrentMonth => "1M",
            Self::ThreeMonths => "3M",
            Self::SixMonths => "6M",
            Self::YearToDate => "YTD",
        }
    }

    /// The first month of the range ending at `current`.
    pub fn start_month(self, current: MonthKey) -> MonthKey {
        match self {
            Self::CurrentMonth => current,
            Self::ThreeMonths => current.plus_months(-2),
            Self::SixMonths => current.plus_months(-5),
            Self::YearToDate => MonthKey::new(current.year(), Month::January),
        }
    }

    /// Every range in the order the selector shows them.
    pub fn all() -> [TrendRange; 4] {
        [
            Self::CurrentMonth,
            Self::ThreeMonths,
            Self::SixMonths,
            Self::YearToDate,
        ]
    }
}
