//! Bank, credit and investment accounts.
//!
//! Every transaction and balance snapshot belongs to an account, so this
//! module also owns the account table definition that those modules reference.

mod accounts_page;
mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;

pub use accounts_page::get_accounts_page;
pub use core::{
    Account, AccountId, AccountType, create_account, create_account_table, delete_account,
    get_account, get_all_accounts, update_account,
};
pub use create_endpoint::create_account_endpoint;
pub use create_page::get_create_account_page;
pub use delete_endpoint::delete_account_endpoint;
pub use edit_endpoint::update_account_endpoint;
pub use edit_page::get_edit_account_page;
pub use form::account_form_fields;
