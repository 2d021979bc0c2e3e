//! The dashboard: the current month at a glance.
//!
//! Headline figures for income, budget, spend pace, and savings, budget
//! versus spend breakdowns, a spending trend chart over a selectable range,
//! and the biggest spending categories.

mod cards;
mod charts;
mod handlers;
mod range;
mod tables;

pub use handlers::get_dashboard_page;
