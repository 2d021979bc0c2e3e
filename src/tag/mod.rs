//! Free-form labels that cut across categories (e.g. a holiday or a project).

mod create;
mod db;
mod delete;
mod domain;
mod list;

pub use create::{create_tag_endpoint, get_new_tag_page};
pub use db::{create_tag, create_tag_table, get_all_tags, get_tag};
pub use delete::delete_tag_endpoint;
pub use domain::{Tag, TagColor, TagId, TagName};
pub use list::get_tags_page;
