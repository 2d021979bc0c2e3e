//! The budget table and its database queries.
//!
//! A budget is one amount per (month, category) pair. Writes are upserts so
//! saving the budgets form twice simply overwrites the previous values.

use std::collections::HashMap;

use rusqlite::Connection;

use crate::{Error, category::CategoryId, month::MonthKey};

/// Insert or replace the budget for one category in `month`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the category does not exist,
/// - [Error::SqlError] if there is some other SQL error.
pub fn upsert_budget(
    month: MonthKey,
    category_id: CategoryId,
    amount_cents: i64,
    connection: &Connection,
) -> Result<(), Error> {
    connection
        .execute(
            "INSERT INTO budget (month, category_id, amount_cents)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (month, category_id)
            DO UPDATE SET amount_cents = excluded.amount_cents",
            (month.to_string(), category_id, amount_cents),
        )
        .map_err(|error| match error {
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(error, Some(_)) if error.extended_code == 787 => {
                Error::NotFound
            }
            error => error.into(),
        })?;

    Ok(())
}

/// Upsert a batch of category budgets for `month` atomically. Either every
/// amount is applied or none are.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if any category does not exist,
/// - [Error::SqlError] if there is some other SQL error.
pub fn save_month_budgets(
    month: MonthKey,
    amounts: &[(CategoryId, i64)],
    connection: &Connection,
) -> Result<(), Error> {
    let month_text = month.to_string();
    let sql_transaction = connection.unchecked_transaction()?;

    {
        let mut statement = sql_transaction.prepare(
            "INSERT INTO budget (month, category_id, amount_cents)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (month, category_id)
            DO UPDATE SET amount_cents = excluded.amount_cents",
        )?;

        for &(category_id, amount_cents) in amounts {
            statement
                .execute((&month_text, category_id, amount_cents))
                .map_err(|error| match error {
                    // Code 787 occurs when a FOREIGN KEY constraint failed.
                    rusqlite::Error::SqliteFailure(sql_error, Some(_))
                        if sql_error.extended_code == 787 =>
                    {
                        Error::NotFound
                    }
                    error => error.into(),
                })?;
        }
    }

    sql_transaction.commit()?;

    Ok(())
}

/// Get the budgeted amount per category for `month`. Categories with no
/// budget row are absent from the map.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_budget_map(
    month: MonthKey,
    connection: &Connection,
) -> Result<HashMap<CategoryId, i64>, Error> {
    let month_text = month.to_string();

    let result: Result<HashMap<CategoryId, i64>, rusqlite::Error> = connection
        .prepare("SELECT category_id, amount_cents FROM budget WHERE month = :month")?
        .query_map(&[(":month", &month_text)], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?
        .collect();

    result.map_err(Error::from)
}

/// Get the total budget across all categories for `month`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn total_budget_for_month(month: MonthKey, connection: &Connection) -> Result<i64, Error> {
    let month_text = month.to_string();

    connection
        .query_one(
            "SELECT COALESCE(SUM(amount_cents), 0) FROM budget WHERE month = :month",
            &[(":month", &month_text)],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Delete every budget row for `month`. Clearing a month with no budgets is
/// not an error.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn clear_month_budgets(month: MonthKey, connection: &Connection) -> Result<(), Error> {
    connection.execute("DELETE FROM budget WHERE month = ?1", [month.to_string()])?;

    Ok(())
}

/// Create the budget table in the database.
///
/// The category table must exist first.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
                month TEXT NOT NULL,
                category_id INTEGER NOT NULL,
                amount_cents INTEGER NOT NULL,
                PRIMARY KEY (month, category_id),
                FOREIGN KEY(category_id) REFERENCES category(id) ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}
