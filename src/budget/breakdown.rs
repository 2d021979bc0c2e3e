//! Month breakdowns of budget versus spend, per category and per group.

use std::collections::HashMap;

use rusqlite::Connection;

use crate::{
    Error,
    category::{CategoryGroupId, CategoryId, get_all_categories, get_all_category_groups},
    month::MonthKey,
    transaction::spend_by_category,
};

use super::core::get_budget_map;

/// The bucket label for spend that belongs to no group.
const UNGROUPED_LABEL: &str = "Ungrouped";

/// Budget versus spend for one expense category in a month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBreakdownRow {
    pub category_id: CategoryId,
    pub name: String,
    pub budget_cents: i64,
    pub spent_cents: i64,
}

/// Budget versus spend for one category group in a month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBreakdownRow {
    pub name: String,
    pub budget_cents: i64,
    pub spent_cents: i64,
}

/// Get budget versus spend for every expense category in `month`,
/// alphabetically. Categories in an income group are left out, and ungrouped
/// categories count as expense. Categories with no budget and no spend still
/// get a row so the budgets page can offer them for editing.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn category_breakdown(
    month: MonthKey,
    connection: &Connection,
) -> Result<Vec<CategoryBreakdownRow>, Error> {
    let budgets = get_budget_map(month, connection)?;
    let spent = spend_map(month, connection)?;

    let expense_categories: Result<Vec<(CategoryId, String)>, rusqlite::Error> = connection
        .prepare(
            "SELECT category.id, category.name FROM category
            LEFT JOIN category_group ON category_group.id = category.group_id
            WHERE COALESCE(category_group.type, 'expense') = 'expense'
            ORDER BY category.name ASC",
        )?
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect();

    Ok(expense_categories?
        .into_iter()
        .map(|(category_id, name)| CategoryBreakdownRow {
            category_id,
            name,
            budget_cents: budgets.get(&category_id).copied().unwrap_or(0),
            spent_cents: spent.get(&Some(category_id)).copied().unwrap_or(0),
        })
        .collect())
}

/// Get budget versus spend for `month` summed per category group, ordered by
/// the groups' sort order with un-ordered groups sorting alphabetically last.
///
/// A synthetic "Ungrouped" bucket collects the budgets and spend of
/// categories that belong to no group, plus spend that has no category at
/// all. Every group gets a row even when it saw no activity.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn group_breakdown(
    month: MonthKey,
    connection: &Connection,
) -> Result<Vec<GroupBreakdownRow>, Error> {
    let groups = get_all_category_groups(connection)?;
    let categories = get_all_categories(connection)?;
    let budgets = get_budget_map(month, connection)?;
    let spent = spend_map(month, connection)?;

    let mut budget_totals: HashMap<Option<CategoryGroupId>, i64> = HashMap::new();
    let mut spend_totals: HashMap<Option<CategoryGroupId>, i64> = HashMap::new();

    for category in &categories {
        if let Some(&budget) = budgets.get(&category.id) {
            *budget_totals.entry(category.group_id).or_insert(0) += budget;
        }

        if let Some(&spend) = spent.get(&Some(category.id)) {
            *spend_totals.entry(category.group_id).or_insert(0) += spend;
        }
    }

    // Spend with no category at all lands in the ungrouped bucket.
    if let Some(&uncategorized) = spent.get(&None) {
        *spend_totals.entry(None).or_insert(0) += uncategorized;
    }

    let mut rows: Vec<(Option<i64>, GroupBreakdownRow)> = groups
        .into_iter()
        .map(|group| {
            (
                group.sort_order,
                GroupBreakdownRow {
                    name: group.name,
                    budget_cents: budget_totals.get(&Some(group.id)).copied().unwrap_or(0),
                    spent_cents: spend_totals.get(&Some(group.id)).copied().unwrap_or(0),
                },
            )
        })
        .collect();

    rows.push((
        None,
        GroupBreakdownRow {
            name: UNGROUPED_LABEL.to_owned(),
            budget_cents: budget_totals.get(&None).copied().unwrap_or(0),
            spent_cents: spend_totals.get(&None).copied().unwrap_or(0),
        },
    ));

    rows.sort_by(|(left_order, left), (right_order, right)| {
        (left_order.is_none(), left_order, &left.name).cmp(&(
            right_order.is_none(),
            right_order,
            &right.name,
        ))
    });

    Ok(rows.into_iter().map(|(_, row)| row).collect())
}

fn spend_map(
    month: MonthKey,
    connection: &Connection,
) -> Result<HashMap<Option<CategoryId>, i64>, Error> {
    Ok(spend_by_category(month, connection)?
        .into_iter()
        .map(|row| (row.category_id, row.spent_cents))
        .collect())
}

#[cfg(test)]
mod category_breakdown_tests {
    use rusqlite::Connection;
    use time::{Month, macros::date};

    use crate::{
        budget::upsert_budget,
        category::{GroupType, create_category_group, set_category_group},
        db::initialize,
        month::MonthKey,
        transaction::{Transaction, create_transaction},
    };

    use super::category_breakdown;

    const OCTOBER: MonthKey = MonthKey::new(2025, Month::October);

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    #[test]
    fn every_expense_category_appears_with_zero_figures() {
        let connection = get_test_connection();

        let rows = category_breakdown(OCTOBER, &connection).expect("Could not get breakdown");

        let names: Vec<&str> = rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Dining",
                "Entertainment",
                "Groceries",
                "Health",
                "Misc",
                "Rent/Mortgage",
                "Subscriptions",
                "Transport",
                "Utilities",
            ]
        );
        assert!(
            rows.iter()
                .all(|row| row.budget_cents == 0 && row.spent_cents == 0)
        );
    }

    #[test]
    fn combines_budget_and_spend_per_category() {
        let connection = get_test_connection();
        upsert_budget(OCTOBER, 3, 50_000, &connection).unwrap();
        create_transaction(
            Transaction::build(-12_000, date!(2025 - 10 - 02), 1).category_id(Some(3)),
            &connection,
        )
        .unwrap();
        create_transaction(
            Transaction::build(-345, date!(2025 - 10 - 20), 1).category_id(Some(3)),
            &connection,
        )
        .unwrap();
        // Income and other months must not count as spend.
        create_transaction(
            Transaction::build(90_000, date!(2025 - 10 - 15), 1).category_id(Some(3)),
            &connection,
        )
        .unwrap();
        create_transaction(
            Transaction::build(-7_000, date!(2025 - 09 - 15), 1).category_id(Some(3)),
            &connection,
        )
        .unwrap();

        let rows = category_breakdown(OCTOBER, &connection).unwrap();

        let groceries = rows
            .iter()
            .find(|row| row.name == "Groceries")
            .expect("Groceries row missing");
        assert_eq!(groceries.budget_cents, 50_000);
        assert_eq!(groceries.spent_cents, 12_345);
    }

    #[test]
    fn income_group_categories_are_excluded() {
        let connection = get_test_connection();
        let income =
            create_category_group("Income", GroupType::Income, Some(1), &connection).unwrap();
        set_category_group(9, Some(income.id), &connection).unwrap();

        let rows = category_breakdown(OCTOBER, &connection).unwrap();

        assert_eq!(rows.len(), 8);
        assert!(rows.iter().all(|row| row.name != "Misc"));
    }

    #[test]
    fn uncategorized_spend_is_invisible_here() {
        let connection = get_test_connection();
        create_transaction(Transaction::build(-5_000, date!(2025 - 10 - 02), 1), &connection)
            .unwrap();

        let rows = category_breakdown(OCTOBER, &connection).unwrap();

        assert!(rows.iter().all(|row| row.spent_cents == 0));
    }
}
