//! Transactions, the ledger at the center of the application.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating them
//! - Database functions for storing, deleting and aggregating transactions
//! - View handlers for the transaction listing and creation pages

mod core;
mod create_endpoint;
mod delete_endpoint;
mod new_transaction_page;
mod query;
mod transactions_page;

pub use core::{
    Transaction, TransactionBuilder, TransactionId, create_transaction,
    create_transaction_table, create_transaction_tag_table, create_transaction_with_tags,
    delete_transaction, get_transaction, get_transaction_tag_ids, map_transaction_row,
    recurring_transaction_exists,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use new_transaction_page::get_new_transaction_page;
pub use query::{
    CategoryMonthSpend, CategorySpend, MonthSummary, MonthTotal, TransactionListRow,
    month_summary, monthly_totals, moving_average_3, recent_transactions, spend_by_category,
    top_spend_categories,
};
pub use transactions_page::get_transactions_page;
