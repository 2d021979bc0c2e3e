//! Budget rollover suggestions.
//!
//! When a new month starts, the previous month's budgets are compared with
//! what was actually spent and the difference is carried forward as a
//! suggested budget. A surplus raises the suggestion, an overspend lowers
//! it, and the suggestion never goes below zero. Suggestions are only ever
//! prefills: a budget the user has already saved for the month wins.

use std::collections::HashMap;

use rusqlite::Connection;

use crate::{Error, category::CategoryId, month::MonthKey, transaction::spend_by_category};

use super::core::get_budget_map;

/// Rollover figures for one month, keyed by category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolloverSuggestions {
    /// Previous month's budget minus previous month's spend. Positive means
    /// money was left over, negative means the category overspent.
    pub rollover_cents: HashMap<CategoryId, i64>,
    /// Suggested budget, clamped at zero, for categories that do not have a
    /// saved budget this month yet.
    pub suggested_cents: HashMap<CategoryId, i64>,
}

/// Compute rollover figures for `month` from the previous month's budgets
/// and spend.
///
/// Only categories that were budgeted in the previous month get figures.
/// Uncategorized spend has no budget to roll over and is ignored here.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn compute_rollover(
    month: MonthKey,
    connection: &Connection,
) -> Result<RolloverSuggestions, Error> {
    let previous = month.previous();
    let previous_budgets = get_budget_map(previous, connection)?;
    let current_budgets = get_budget_map(month, connection)?;

    let spent: HashMap<CategoryId, i64> = spend_by_category(previous, connection)?
        .into_iter()
        .filter_map(|row| {
            row.category_id
                .map(|category_id| (category_id, row.spent_cents))
        })
        .collect();

    let mut rollover_cents = HashMap::new();
    let mut suggested_cents = HashMap::new();

    for (&category_id, &budget) in &previous_budgets {
        let leftover = budget - spent.get(&category_id).copied().unwrap_or(0);
        rollover_cents.insert(category_id, leftover);

        if !current_budgets.contains_key(&category_id) {
            suggested_cents.insert(category_id, (budget + leftover).max(0));
        }
    }

    Ok(RolloverSuggestions {
        rollover_cents,
        suggested_cents,
    })
}
