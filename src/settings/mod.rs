//! The singleton user's settings.
//!
//! Holds the user table with the annual salary, the settings page, and its
//! update endpoint.

mod core;
mod settings_page;
mod update_endpoint;

pub use core::{create_user_table, get_salary, update_salary};
pub use settings_page::get_settings_page;
pub use update_endpoint::update_settings_endpoint;
