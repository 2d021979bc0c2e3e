//! Account balance snapshots and net worth over time.
//!
//! A snapshot records one balance per (account, date) pair. Debit and
//! investment balances count as assets, credit balances as liabilities, and
//! net worth is their difference. This module contains the snapshot table,
//! the summary and history queries, and the net worth page with its save
//! endpoint.

mod core;
mod net_worth_page;
mod save_endpoint;

pub use core::{
    NetWorthPoint, NetWorthSummary, create_balance_snapshot_table, get_balances_for_date,
    net_worth_history, net_worth_summary, save_balances, upsert_balance,
};
pub use net_worth_page::get_net_worth_page;
pub use save_endpoint::save_balances_endpoint;
