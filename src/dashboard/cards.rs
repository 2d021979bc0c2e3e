//! The dashboard's summary cards.
//!
//! Six figures for the current month: income, total budget, spend so far,
//! the pro-rata pace target, the recommended daily cap, and the projected
//! savings. Amounts display as whole dollars with the exact amount in the
//! tooltip.

use maud::{Markup, html};

use crate::html::{currency_rounded_with_tooltip, format_currency};

/// The current month figures the summary cards show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct SummaryFigures {
    /// Income for the month, in cents, possibly estimated from the salary.
    pub income_cents: i64,
    /// Whether the income figure fell back to one twelfth of the salary.
    pub income_is_salary_estimate: bool,
    /// Total budget across all categories for the month, in cents.
    pub total_budget_cents: i64,
    /// Spend so far this month, in cents.
    pub spent_cents: i64,
    /// Where spending should be by today if it were linear, in cents.
    pub target_cents: i64,
    /// Spend so far minus the target. Positive means over pace.
    pub variance_cents: i64,
    /// How much can be spent per remaining day, in cents.
    pub daily_cap_cents: i64,
    /// Income minus spend so far, in cents.
    pub savings_cents: i64,
}

/// "over pace" / "under pace" line under the pace card figure.
fn variance_note(variance_cents: i64) -> Markup {
    if variance_cents > 0 {
        html!(
            p class="text-sm text-red-700 dark:text-red-300" data-variance="over"
            {
                (format_currency(variance_cents)) " over pace"
            }
        )
    } else if variance_cents < 0 {
        html!(
            p class="text-sm text-green-700 dark:text-green-300" data-variance="under"
            {
                (format_currency(-variance_cents)) " under pace"
            }
        )
    } else {
        html!(
            p class="text-sm text-gray-500 dark:text-gray-400" data-variance="on"
            {
                "on pace"
            }
        )
    }
}

fn savings_class(savings_cents: i64) -> &'static str {
    if savings_cents < 0 {
        "text-xl font-bold tabular-nums text-red-700 dark:text-red-300"
    } else {
        "text-xl font-bold tabular-nums"
    }
}

pub(super) fn summary_cards_view(figures: &SummaryFigures) -> Markup {
    let card = |label: &str, key: &str, body: Markup| {
        html!(
            div class="p-4 rounded-lg bg-gray-50 dark:bg-gray-800" data-card=(key)
            {
                p class="text-sm text-gray-500 dark:text-gray-400" { (label) }

                (body)
            }
        )
    };

    let figure = |cents: i64| {
        html!(
            p class="text-xl font-bold tabular-nums" { (currency_rounded_with_tooltip(cents)) }
        )
    };

    let income = html!(
        p class="text-xl font-bold tabular-nums"
        {
            (currency_rounded_with_tooltip(figures.income_cents))
        }

        @if figures.income_is_salary_estimate {
            p class="text-sm text-gray-500 dark:text-gray-400" data-salary-estimate="true"
            {
                "estimated from salary"
            }
        }
    );

    let pace = html!(
        p class="text-xl font-bold tabular-nums"
        {
            (currency_rounded_with_tooltip(figures.target_cents))
        }

        (variance_note(figures.variance_cents))
    );

    let daily_cap = html!(
        p class="text-xl font-bold tabular-nums"
        {
            (currency_rounded_with_tooltip(figures.daily_cap_cents))
        }

        p class="text-sm text-gray-500 dark:text-gray-400" { "per day until month end" }
    );

    let savings = html!(
        p class=(savings_class(figures.savings_cents))
        {
            (currency_rounded_with_tooltip(figures.savings_cents))
        }
    );

    html!(
        section class="grid grid-cols-2 lg:grid-cols-3 gap-4 w-full"
        {
            (card("Income", "income", income))
            (card("Budget", "budget", figure(figures.total_budget_cents)))
            (card("Spent", "spent", figure(figures.spent_cents)))
            (card("Pace", "pace", pace))
            (card("Daily Cap", "daily-cap", daily_cap))
            (card("Savings", "savings", savings))
        }
    )
}
