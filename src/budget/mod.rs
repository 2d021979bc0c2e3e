//! Monthly category budgets with rollover suggestions.
//!
//! A budget is one amount per (month, category) pair. When a month begins,
//! the previous month's surplus or overspend is offered as a suggested
//! budget, but nothing is written until the user saves. This module contains
//! the budget table, the rollover math, the breakdowns the dashboard reads,
//! and the budget editor page with its save endpoint.

mod breakdown;
mod budgets_page;
mod core;
mod rollover;
mod save_endpoint;

pub use breakdown::{CategoryBreakdownRow, GroupBreakdownRow, category_breakdown, group_breakdown};
pub use budgets_page::get_budgets_page;
pub use core::{
    clear_month_budgets, create_budget_table, get_budget_map, save_month_budgets,
    total_budget_for_month, upsert_budget,
};
pub use rollover::{RolloverSuggestions, compute_rollover};
pub use save_endpoint::save_budgets_endpoint;
