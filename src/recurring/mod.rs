//! Recurring transactions, e.g. rent or a monthly salary.
//!
//! A recurring rule is a template: name, account, category, a magnitude in
//! cents, a direction, and a day of the month. The materializer turns active
//! rules into real transactions as their day arrives, at most once per rule
//! per month. Pages that show transaction data call [ensure_materialized]
//! before reading so no scheduler is needed.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod materialize;
mod new_recurring_page;
mod recurring_page;
mod toggle_endpoint;

pub use core::{
    Direction, NewRecurringRule, RecurringRule, RecurringRuleId, RuleWithNames,
    create_recurring_rule, create_recurring_table, delete_recurring_rule, get_all_recurring_rules,
    get_recurring_rule, get_rules_with_names, toggle_recurring_rule,
};
pub use create_endpoint::create_recurring_endpoint;
pub use delete_endpoint::delete_recurring_endpoint;
pub use materialize::ensure_materialized;
pub use new_recurring_page::get_new_recurring_page;
pub use recurring_page::get_recurring_page;
pub use toggle_endpoint::toggle_recurring_endpoint;
