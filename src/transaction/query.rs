//! Aggregation queries over transactions.
//!
//! These back the dashboard summary cards, the trend chart, and the budget
//! breakdowns. All amounts follow the sign convention of the transaction
//! table: income totals sum the positive amounts, spend totals sum the
//! magnitudes of the negative amounts, so both come back as non-negative
//! numbers.

use std::collections::HashMap;

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    category::CategoryId,
    month::MonthKey,
    tag::{Tag, TagColor, TagId, TagName},
    transaction::TransactionId,
};

/// Income and spend totals for a single month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonthSummary {
    /// Sum of the positive transaction amounts, in cents.
    pub income_cents: i64,
    /// Sum of the magnitudes of the negative transaction amounts, in cents.
    pub spend_cents: i64,
}

/// One month's totals in a [monthly_totals] series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthTotal {
    /// The month the totals are for.
    pub month: MonthKey,
    /// Income for the month, in cents.
    pub income_cents: i64,
    /// Spend for the month, in cents.
    pub spend_cents: i64,
}

/// A category's spend over some date range, for the top-categories list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySpend {
    /// The category name, or "Uncategorized" for transactions without one.
    pub name: String,
    /// Total spent, in cents.
    pub spent_cents: i64,
}

/// Spend in one month, grouped by category ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryMonthSpend {
    /// The category, or `None` for uncategorized spend.
    pub category_id: Option<CategoryId>,
    /// Total spent in the category that month, in cents.
    pub spent_cents: i64,
}

/// A transaction joined with the names a listing needs.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionListRow {
    pub id: TransactionId,
    pub date: Date,
    pub description: String,
    pub amount_cents: i64,
    pub account_name: String,
    pub category_name: Option<String>,
    pub tags: Vec<Tag>,
}

/// The ISO date bounds of a month: its first day, and the first day of the
/// month after. Dates are stored as ISO-8601 text so these compare correctly
/// with `>=` and `<`.
fn month_bounds(month: MonthKey) -> (String, String) {
    (format!("{month}-01"), format!("{}-01", month.next()))
}

/// Get the income and spend totals for `month`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn month_summary(month: MonthKey, connection: &Connection) -> Result<MonthSummary, Error> {
    let (start, end) = month_bounds(month);

    connection
        .prepare(
            "SELECT
                COALESCE(SUM(CASE WHEN amount_cents > 0 THEN amount_cents ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN amount_cents < 0 THEN -amount_cents ELSE 0 END), 0)
            FROM \"transaction\"
            WHERE date >= :start AND date < :end",
        )?
        .query_one(&[(":start", &start), (":end", &end)], |row| {
            Ok(MonthSummary {
                income_cents: row.get(0)?,
                spend_cents: row.get(1)?,
            })
        })
        .map_err(|error| error.into())
}

/// Get income and spend totals for every month from `start` through `end`
/// inclusive. Months with no transactions appear with zero totals so chart
/// series stay aligned with their axis.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn monthly_totals(
    start: MonthKey,
    end: MonthKey,
    connection: &Connection,
) -> Result<Vec<MonthTotal>, Error> {
    let range_start = format!("{start}-01");
    let range_end = format!("{}-01", end.next());

    let totals: HashMap<String, (i64, i64)> = connection
        .prepare(
            "SELECT
                substr(date, 1, 7),
                COALESCE(SUM(CASE WHEN amount_cents > 0 THEN amount_cents ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN amount_cents < 0 THEN -amount_cents ELSE 0 END), 0)
            FROM \"transaction\"
            WHERE date >= :start AND date < :end
            GROUP BY substr(date, 1, 7)",
        )?
        .query_map(&[(":start", &range_start), (":end", &range_end)], |row| {
            Ok((row.get(0)?, (row.get(1)?, row.get(2)?)))
        })?
        .map(|maybe_total| maybe_total.map_err(Error::SqlError))
        .collect::<Result<_, _>>()?;

    Ok(start
        .sequence_to(end)
        .into_iter()
        .map(|month| {
            let (income_cents, spend_cents) =
                totals.get(&month.to_string()).copied().unwrap_or((0, 0));

            MonthTotal {
                month,
                income_cents,
                spend_cents,
            }
        })
        .collect())
}

/// Compute a three month moving average with a growing window.
///
/// The first element averages one value and the second averages two, so the
/// smoothed series has the same length as the input and no leading gap.
pub fn moving_average_3(values: &[i64]) -> Vec<f64> {
    values
        .iter()
        .enumerate()
        .map(|(index, _)| {
            let window = &values[index.saturating_sub(2)..=index];
            let total: i64 = window.iter().sum();
            total as f64 / window.len() as f64
        })
        .collect()
}

/// Get the categories with the highest spend between the first day of `start`
/// and the last day of `end`, highest first. Uncategorized spend appears as
/// its own entry. Ties are broken by name so the ordering is stable.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn top_spend_categories(
    start: MonthKey,
    end: MonthKey,
    limit: i64,
    connection: &Connection,
) -> Result<Vec<CategorySpend>, Error> {
    let range_start = format!("{start}-01");
    let range_end = format!("{}-01", end.next());

    connection
        .prepare(
            "SELECT COALESCE(category.name, 'Uncategorized') AS name, SUM(-amount_cents) AS spent
            FROM \"transaction\"
            LEFT JOIN category ON category.id = \"transaction\".category_id
            WHERE date >= :start AND date < :end AND amount_cents < 0
            GROUP BY category.name
            ORDER BY spent DESC, name ASC
            LIMIT :limit",
        )?
        .query_map(
            &[
                (":start", &range_start as &dyn rusqlite::ToSql),
                (":end", &range_end),
                (":limit", &limit),
            ],
            |row| {
                Ok(CategorySpend {
                    name: row.get(0)?,
                    spent_cents: row.get(1)?,
                })
            },
        )?
        .map(|maybe_spend| maybe_spend.map_err(Error::SqlError))
        .collect()
}

/// Get the spend in `month` grouped by category. Uncategorized spend comes
/// back as a row with a `None` category. Categories with no spend do not
/// appear; callers that need zero rows join against the category table
/// themselves.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn spend_by_category(
    month: MonthKey,
    connection: &Connection,
) -> Result<Vec<CategoryMonthSpend>, Error> {
    let (start, end) = month_bounds(month);

    connection
        .prepare(
            "SELECT category_id, SUM(-amount_cents)
            FROM \"transaction\"
            WHERE date >= :start AND date < :end AND amount_cents < 0
            GROUP BY category_id",
        )?
        .query_map(&[(":start", &start), (":end", &end)], |row| {
            Ok(CategoryMonthSpend {
                category_id: row.get(0)?,
                spent_cents: row.get(1)?,
            })
        })?
        .map(|maybe_spend| maybe_spend.map_err(Error::SqlError))
        .collect()
}

/// Get the most recent transactions, newest first, joined with their account
/// name, category name and tags.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn recent_transactions(
    limit: i64,
    connection: &Connection,
) -> Result<Vec<TransactionListRow>, Error> {
    let mut tags_by_transaction = transaction_tags(connection)?;

    connection
        .prepare(
            "SELECT \"transaction\".id, date, description, amount_cents, account.name, category.name
            FROM \"transaction\"
            INNER JOIN account ON account.id = \"transaction\".account_id
            LEFT JOIN category ON category.id = \"transaction\".category_id
            ORDER BY date DESC, \"transaction\".id DESC
            LIMIT :limit",
        )?
        .query_map(&[(":limit", &limit)], |row| {
            let id: TransactionId = row.get(0)?;

            Ok(TransactionListRow {
                id,
                date: row.get(1)?,
                description: row.get(2)?,
                amount_cents: row.get(3)?,
                account_name: row.get(4)?,
                category_name: row.get(5)?,
                tags: Vec::new(),
            })
        })?
        .map(|maybe_row| {
            maybe_row.map_err(Error::SqlError).map(|mut row| {
                if let Some(tags) = tags_by_transaction.remove(&row.id) {
                    row.tags = tags;
                }
                row
            })
        })
        .collect()
}

/// Fetch every tag assignment in one query, keyed by transaction. Tags within
/// each transaction are in name order.
fn transaction_tags(connection: &Connection) -> Result<HashMap<TransactionId, Vec<Tag>>, Error> {
    let assignments: Vec<(TransactionId, Tag)> = connection
        .prepare(
            "SELECT transaction_tag.transaction_id, tag.id, tag.name, tag.color
            FROM transaction_tag
            INNER JOIN tag ON tag.id = transaction_tag.tag_id
            ORDER BY tag.name ASC",
        )?
        .query_map([], |row| {
            let transaction_id: TransactionId = row.get(0)?;
            let id: TagId = row.get(1)?;
            let raw_name: String = row.get(2)?;
            let raw_color: String = row.get(3)?;

            Ok((
                transaction_id,
                Tag {
                    id,
                    name: TagName::new_unchecked(&raw_name),
                    color: TagColor::new_unchecked(&raw_color),
                },
            ))
        })?
        .map(|maybe_assignment| maybe_assignment.map_err(Error::SqlError))
        .collect::<Result<_, _>>()?;

    let mut tags_by_transaction: HashMap<TransactionId, Vec<Tag>> = HashMap::new();

    for (transaction_id, tag) in assignments {
        tags_by_transaction
            .entry(transaction_id)
            .or_default()
            .push(tag);
    }

    Ok(tags_by_transaction)
}


#[cfg(test)]
mod monthly_totals_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        month::MonthKey,
        transaction::{MonthTotal, Transaction, create_transaction, monthly_totals},
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    #[test]
    fn zero_fills_months_without_transactions() {
        let connection = get_test_connection();
        create_transaction(
            Transaction::build(100_000, date!(2025 - 08 - 15), 1),
            &connection,
        )
        .unwrap();
        create_transaction(
            Transaction::build(-5_000, date!(2025 - 10 - 02), 1),
            &connection,
        )
        .unwrap();

        let totals = monthly_totals(
            MonthKey::new(2025, time::Month::August),
            MonthKey::new(2025, time::Month::October),
            &connection,
        )
        .expect("Could not get monthly totals");

        assert_eq!(
            totals,
            vec![
                MonthTotal {
                    month: MonthKey::new(2025, time::Month::August),
                    income_cents: 100_000,
                    spend_cents: 0,
                },
                MonthTotal {
                    month: MonthKey::new(2025, time::Month::September),
                    income_cents: 0,
                    spend_cents: 0,
                },
                MonthTotal {
                    month: MonthKey::new(2025, time::Month::October),
                    income_cents: 0,
                    spend_cents: 5_000,
                },
            ]
        );
    }

    #[test]
    fn excludes_months_outside_the_range() {
        let connection = get_test_connection();
        create_transaction(
            Transaction::build(-5_000, date!(2025 - 07 - 31), 1),
            &connection,
        )
        .unwrap();
        create_transaction(
            Transaction::build(-5_000, date!(2025 - 11 - 01), 1),
            &connection,
        )
        .unwrap();

        let totals = monthly_totals(
            MonthKey::new(2025, time::Month::August),
            MonthKey::new(2025, time::Month::October),
            &connection,
        )
        .expect("Could not get monthly totals");

        assert_eq!(totals.len(), 3);
        assert!(totals.iter().all(|total| total.spend_cents == 0));
    }
}


#[cfg(test)]
mod top_spend_categories_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        month::MonthKey,
        transaction::{CategorySpend, Transaction, create_transaction, top_spend_categories},
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    /// The default categories are seeded in a fixed order, so Groceries is ID
    /// 3 and Dining is ID 4.
    #[test]
    fn orders_by_spend_and_buckets_uncategorized() {
        let connection = get_test_connection();
        let october = MonthKey::new(2025, time::Month::October);
        for (amount_cents, category_id) in [
            (-500, Some(3)),
            (-1_000, Some(3)),
            (-2_000, Some(4)),
            (-700, None),
            // Income must not count towards spend.
            (250_000, Some(4)),
        ] {
            create_transaction(
                Transaction::build(amount_cents, date!(2025 - 10 - 10), 1)
                    .category_id(category_id),
                &connection,
            )
            .unwrap();
        }

        let top = top_spend_categories(october, october, 5, &connection)
            .expect("Could not get top spend categories");

        assert_eq!(
            top,
            vec![
                CategorySpend {
                    name: "Dining".to_owned(),
                    spent_cents: 2_000,
                },
                CategorySpend {
                    name: "Groceries".to_owned(),
                    spent_cents: 1_500,
                },
                CategorySpend {
                    name: "Uncategorized".to_owned(),
                    spent_cents: 700,
                },
            ]
        );
    }

    #[test]
    fn respects_the_limit() {
        let connection = get_test_connection();
        let october = MonthKey::new(2025, time::Month::October);
        for category_id in [1, 2, 3] {
            create_transaction(
                Transaction::build(-1_000 * category_id, date!(2025 - 10 - 10), 1)
                    .category_id(Some(category_id)),
                &connection,
            )
            .unwrap();
        }

        let top = top_spend_categories(october, october, 2, &connection)
            .expect("Could not get top spend categories");

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "Groceries");
    }
}
