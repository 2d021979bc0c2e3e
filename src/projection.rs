//! Pro-rata budget projection.
//!
//! Answers two questions about the current month: how much of the total
//! budget should have been spent by today if spending were perfectly linear,
//! and how much can be spent per day for the rest of the month without going
//! over.

use time::Date;

use crate::month::MonthKey;

/// Where the month's spending should be as of a given day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProRata {
    /// Calendar length of the month.
    pub days_in_month: u8,
    /// The day the projection was taken on.
    pub day_of_month: u8,
    /// Whole days left after today.
    pub days_remaining: u8,
    /// Expected cumulative spend by today, in cents. Real-valued; callers
    /// truncate rather than round so that spend "on pace" never reads as
    /// over target.
    pub target_cents: f64,
}

impl ProRata {
    /// Expected spend-to-date truncated to whole cents.
    pub fn target_cents_floor(&self) -> i64 {
        self.target_cents as i64
    }

    /// How far actual spending is ahead of (positive) or behind (negative)
    /// the linear target.
    pub fn variance_cents(&self, spent_cents: i64) -> i64 {
        spent_cents - self.target_cents_floor()
    }
}

/// Project the expected spend-to-date for `today` given the month's total
/// budget.
pub fn pro_rata(total_budget_cents: i64, today: Date) -> ProRata {
    let days_in_month = MonthKey::from_date(today).days_in_month();
    let day_of_month = today.day();
    let days_remaining = days_in_month.saturating_sub(day_of_month);
    let target_cents = total_budget_cents as f64 * day_of_month as f64 / days_in_month as f64;

    ProRata {
        days_in_month,
        day_of_month,
        days_remaining,
        target_cents,
    }
}

/// How much can be spent per remaining day of the month without exceeding the
/// total budget, in whole cents.
///
/// Overspent months floor the remaining budget at zero, and the last day of
/// the month returns zero rather than dividing by zero.
pub fn daily_cap(total_budget_cents: i64, spent_cents: i64, today: Date) -> i64 {
    let days_in_month = MonthKey::from_date(today).days_in_month();
    let days_remaining = i64::from(days_in_month.saturating_sub(today.day()));

    if days_remaining == 0 {
        return 0;
    }

    let remaining_cents = (total_budget_cents - spent_cents).max(0);

    remaining_cents / days_remaining
}
