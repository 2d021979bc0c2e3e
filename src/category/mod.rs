//! Spending categories and the groups that organize them on the dashboard.

mod categories_page;
mod create_endpoint;
mod db;
mod delete_endpoint;
mod domain;
mod group_create_endpoint;
mod group_delete_endpoint;
mod set_group_endpoint;

pub use categories_page::get_categories_page;
pub use create_endpoint::create_category_endpoint;
pub use db::{
    create_category, create_category_group, create_category_group_table, create_category_table,
    delete_category, delete_category_group, get_all_categories, get_all_category_groups,
    get_category, set_category_group,
};
pub use delete_endpoint::delete_category_endpoint;
pub use domain::{Category, CategoryGroup, CategoryGroupId, CategoryId, GroupType};
pub use group_create_endpoint::create_category_group_endpoint;
pub use group_delete_endpoint::delete_category_group_endpoint;
pub use set_group_endpoint::set_category_group_endpoint;
