//! Core category and category group domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, database_id::DatabaseId};

/// Database identifier for a category.
pub type CategoryId = DatabaseId;

/// Database identifier for a category group.
pub type CategoryGroupId = DatabaseId;

/// Whether a group's categories count as spending or income in breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GroupType {
    Expense,
    Income,
}

impl GroupType {
    /// The string stored in the database for this group type.
    pub fn as_str(self) -> &'static str {
        match self {
            GroupType::Expense => "expense",
            GroupType::Income => "income",
        }
    }
}

impl FromStr for GroupType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expense" => Ok(GroupType::Expense),
            "income" => Ok(GroupType::Income),
            _ => Err(Error::InvalidGroupType(s.to_string())),
        }
    }
}

impl Display for GroupType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A label for where money goes (e.g. 'Groceries').
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub group_id: Option<CategoryGroupId>,
}

/// A named bundle of categories (e.g. 'Essentials').
///
/// `sort_order` controls where the group appears in breakdowns, with `None`
/// sorting last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub id: CategoryGroupId,
    pub name: String,
    pub sort_order: Option<i64>,
    pub group_type: GroupType,
}
