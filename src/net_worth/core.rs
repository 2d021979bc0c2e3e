//! The balance snapshot table and its database queries.
//!
//! A snapshot is one balance per (account, date) pair. Net worth figures are
//! derived from snapshots by account type: debit and investment balances
//! count as assets, credit balances count as liabilities.

use std::collections::HashMap;

use rusqlite::Connection;
use time::Date;

use crate::{Error, account::AccountId};

/// Assets, liabilities and their difference for a single snapshot date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetWorthSummary {
    pub assets_cents: i64,
    pub liabilities_cents: i64,
    pub net_cents: i64,
}

/// One point in the net worth history, aggregated over a snapshot date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetWorthPoint {
    pub as_of: Date,
    pub assets_cents: i64,
    pub liabilities_cents: i64,
    pub net_cents: i64,
}

/// Insert or replace the balance snapshot for one account on `as_of`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the account does not exist,
/// - [Error::SqlError] if there is some other SQL error.
pub fn upsert_balance(
    account_id: AccountId,
    as_of: Date,
    balance_cents: i64,
    connection: &Connection,
) -> Result<(), Error> {
    connection
        .execute(
            "INSERT INTO balance_snapshot (account_id, as_of, balance_cents)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (account_id, as_of)
            DO UPDATE SET balance_cents = excluded.balance_cents",
            (account_id, as_of, balance_cents),
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

/// Upsert a batch of account balances for `as_of` atomically. Either every
/// balance is applied or none are.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if any account does not exist,
/// - [Error::SqlError] if there is some other SQL error.
pub fn save_balances(
    as_of: Date,
    balances: &[(AccountId, i64)],
    connection: &Connection,
) -> Result<(), Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    {
        let mut statement = sql_transaction.prepare(
            "INSERT INTO balance_snapshot (account_id, as_of, balance_cents)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (account_id, as_of)
            DO UPDATE SET balance_cents = excluded.balance_cents",
        )?;

        for &(account_id, balance_cents) in balances {
            statement
                .execute((account_id, as_of, balance_cents))
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

/// Get the snapshot balance per account for `as_of`. Accounts with no
/// snapshot on that date are absent from the map.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_balances_for_date(
    as_of: Date,
    connection: &Connection,
) -> Result<HashMap<AccountId, i64>, Error> {
    let result: Result<HashMap<AccountId, i64>, rusqlite::Error> = connection
        .prepare("SELECT account_id, balance_cents FROM balance_snapshot WHERE as_of = :as_of")?
        .query_map(&[(":as_of", &as_of)], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect();

    result.map_err(Error::from)
}

/// Get assets, liabilities and net worth for `as_of`.
///
/// Accounts without a snapshot on that date contribute zero, so the summary
/// understates net worth until every account has been recorded for the date.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn net_worth_summary(as_of: Date, connection: &Connection) -> Result<NetWorthSummary, Error> {
    let (assets_cents, liabilities_cents) = connection.query_one(
        "SELECT
            COALESCE(SUM(CASE WHEN account.type IN ('debit', 'investment')
                THEN balance_snapshot.balance_cents ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN account.type = 'credit'
                THEN balance_snapshot.balance_cents ELSE 0 END), 0)
        FROM account
        LEFT JOIN balance_snapshot
            ON balance_snapshot.account_id = account.id
            AND balance_snapshot.as_of = :as_of",
        &[(":as_of", &as_of)],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    Ok(NetWorthSummary {
        assets_cents,
        liabilities_cents,
        net_cents: assets_cents - liabilities_cents,
    })
}

/// Get the net worth history, one point per snapshot date in ascending order.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn net_worth_history(connection: &Connection) -> Result<Vec<NetWorthPoint>, Error> {
    let result: Result<Vec<NetWorthPoint>, rusqlite::Error> = connection
        .prepare(
            "SELECT
                balance_snapshot.as_of,
                COALESCE(SUM(CASE WHEN account.type IN ('debit', 'investment')
                    THEN balance_snapshot.balance_cents ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN account.type = 'credit'
                    THEN balance_snapshot.balance_cents ELSE 0 END), 0)
            FROM balance_snapshot
            INNER JOIN account ON account.id = balance_snapshot.account_id
            GROUP BY balance_snapshot.as_of
            ORDER BY balance_snapshot.as_of ASC",
        )?
        .query_map((), |row| {
            let assets_cents: i64 = row.get(1)?;
            let liabilities_cents: i64 = row.get(2)?;

            Ok(NetWorthPoint {
                as_of: row.get(0)?,
                assets_cents,
                liabilities_cents,
                net_cents: assets_cents - liabilities_cents,
            })
        })?
        .collect();

    result.map_err(Error::from)
}

/// Create the balance snapshot table in the database.
///
/// The account table must exist first.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_balance_snapshot_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS balance_snapshot (
                account_id INTEGER NOT NULL,
                as_of TEXT NOT NULL,
                balance_cents INTEGER NOT NULL,
                PRIMARY KEY (account_id, as_of),
                FOREIGN KEY(account_id) REFERENCES account(id) ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

#[cfg(test)]
mod database_tests {
    use std::collections::HashMap;

    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        account::{AccountType, create_account, delete_account},
        db::initialize,
    };

    use super::{
        get_balances_for_date, net_worth_history, net_worth_summary, save_balances, upsert_balance,
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    #[test]
    fn upsert_and_read_round_trip() {
        let connection = get_test_connection();

        upsert_balance(1, date!(2025 - 10 - 31), 500_000, &connection)
            .expect("Could not upsert balance");

        let balances = get_balances_for_date(date!(2025 - 10 - 31), &connection)
            .expect("Could not get balances");
        assert_eq!(balances, HashMap::from([(1, 500_000)]));
    }

    #[test]
    fn second_upsert_keeps_latest_value() {
        let connection = get_test_connection();

        upsert_balance(1, date!(2025 - 10 - 31), 500_000, &connection).unwrap();
        upsert_balance(1, date!(2025 - 10 - 31), 525_000, &connection).unwrap();

        let balances = get_balances_for_date(date!(2025 - 10 - 31), &connection).unwrap();
        assert_eq!(balances, HashMap::from([(1, 525_000)]));

        let row_count: i64 = connection
            .query_one("SELECT COUNT(*) FROM balance_snapshot", (), |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(row_count, 1);
    }

    #[test]
    fn upsert_fails_on_missing_account() {
        let connection = get_test_connection();

        let result = upsert_balance(999, date!(2025 - 10 - 31), 500_000, &connection);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn summary_splits_assets_and_liabilities() {
        let connection = get_test_connection();
        let visa = create_account("Visa", AccountType::Credit, &connection).unwrap();
        let kiwisaver = create_account("Kiwisaver", AccountType::Investment, &connection).unwrap();

        upsert_balance(1, date!(2025 - 10 - 31), 500_000, &connection).unwrap();
        upsert_balance(visa.id, date!(2025 - 10 - 31), 120_000, &connection).unwrap();
        upsert_balance(kiwisaver.id, date!(2025 - 10 - 31), 1_000_000, &connection).unwrap();

        let summary = net_worth_summary(date!(2025 - 10 - 31), &connection).unwrap();

        assert_eq!(summary.assets_cents, 1_500_000);
        assert_eq!(summary.liabilities_cents, 120_000);
        assert_eq!(summary.net_cents, 1_380_000);
    }

    #[test]
    fn accounts_without_snapshots_contribute_zero() {
        let connection = get_test_connection();
        create_account("Visa", AccountType::Credit, &connection).unwrap();

        upsert_balance(1, date!(2025 - 10 - 31), 500_000, &connection).unwrap();

        let summary = net_worth_summary(date!(2025 - 10 - 31), &connection).unwrap();

        assert_eq!(summary.assets_cents, 500_000);
        assert_eq!(summary.liabilities_cents, 0);
        assert_eq!(summary.net_cents, 500_000);
    }

    #[test]
    fn summary_only_counts_the_requested_date() {
        let connection = get_test_connection();

        upsert_balance(1, date!(2025 - 09 - 30), 400_000, &connection).unwrap();
        upsert_balance(1, date!(2025 - 10 - 31), 500_000, &connection).unwrap();

        let summary = net_worth_summary(date!(2025 - 10 - 31), &connection).unwrap();

        assert_eq!(summary.assets_cents, 500_000);
    }

    #[test]
    fn batch_save_applies_all_or_nothing() {
        let connection = get_test_connection();

        let result = save_balances(
            date!(2025 - 10 - 31),
            &[(1, 500_000), (999, 1_000)],
            &connection,
        );

        assert_eq!(result, Err(Error::NotFound));
        let balances = get_balances_for_date(date!(2025 - 10 - 31), &connection).unwrap();
        assert_eq!(balances, HashMap::new());
    }

    #[test]
    fn history_has_one_point_per_date_ascending() {
        let connection = get_test_connection();
        let visa = create_account("Visa", AccountType::Credit, &connection).unwrap();

        // Inserted newest first to check the query orders by date.
        upsert_balance(1, date!(2025 - 10 - 31), 500_000, &connection).unwrap();
        upsert_balance(visa.id, date!(2025 - 10 - 31), 120_000, &connection).unwrap();
        upsert_balance(1, date!(2025 - 09 - 30), 400_000, &connection).unwrap();

        let history = net_worth_history(&connection).unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].as_of, date!(2025 - 09 - 30));
        assert_eq!(history[0].net_cents, 400_000);
        assert_eq!(history[1].as_of, date!(2025 - 10 - 31));
        assert_eq!(history[1].assets_cents, 500_000);
        assert_eq!(history[1].liabilities_cents, 120_000);
        assert_eq!(history[1].net_cents, 380_000);
    }

    #[test]
    fn deleting_an_account_cascades_its_snapshots() {
        let connection = get_test_connection();

        upsert_balance(1, date!(2025 - 10 - 31), 500_000, &connection).unwrap();

        delete_account(1, &connection).expect("Could not delete account");

        let balances = get_balances_for_date(date!(2025 - 10 - 31), &connection).unwrap();
        assert_eq!(balances, HashMap::new());
        assert_eq!(net_worth_history(&connection).unwrap(), Vec::new());
    }
}
