/*! Database initialization: creates the schema and seeds the default rows. */

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error,
    account::create_account_table,
    budget::create_budget_table,
    category::{create_category_group_table, create_category_table},
    net_worth::create_balance_snapshot_table,
    recurring::create_recurring_table,
    settings::create_user_table,
    tag::create_tag_table,
    transaction::{create_transaction_table, create_transaction_tag_table},
};

/// The categories every new database starts with.
const DEFAULT_CATEGORIES: [&str; 9] = [
    "Rent/Mortgage",
    "Utilities",
    "Groceries",
    "Dining",
    "Transport",
    "Health",
    "Subscriptions",
    "Entertainment",
    "Misc",
];

/// Create the application tables and seed the default rows.
///
/// The default rows are the single settings row, a starter set of expense
/// categories, and a "My Debit" account. Categories and the account are only
/// seeded into an empty database so that deleting them later sticks.
///
/// This also turns on foreign key enforcement, which SQLite tracks per
/// connection, so it must be called on every connection the app opens.
///
/// # Errors
/// Returns an error if the schema could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_account_table(&transaction)?;
    create_category_group_table(&transaction)?;
    create_category_table(&transaction)?;
    create_tag_table(&transaction)?;
    create_recurring_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_transaction_tag_table(&transaction)?;
    create_budget_table(&transaction)?;
    create_balance_snapshot_table(&transaction)?;

    seed_defaults(&transaction)?;

    transaction.commit()?;

    Ok(())
}

fn seed_defaults(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "INSERT OR IGNORE INTO user (id, salary_annual_cents) VALUES (1, 0)",
        (),
    )?;

    let category_count: i64 =
        connection.query_row("SELECT COUNT(*) FROM category", [], |row| row.get(0))?;

    if category_count == 0 {
        let mut statement = connection.prepare("INSERT INTO category (name) VALUES (?1)")?;

        for name in DEFAULT_CATEGORIES {
            statement.execute([name])?;
        }
    }

    let account_count: i64 =
        connection.query_row("SELECT COUNT(*) FROM account", [], |row| row.get(0))?;

    if account_count == 0 {
        connection.execute(
            "INSERT INTO account (name, type) VALUES ('My Debit', 'debit')",
            (),
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn seeds_default_categories_and_account() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        let category_count: i64 = connection
            .query_row("SELECT COUNT(*) FROM category", [], |row| row.get(0))
            .unwrap();
        let account_name: String = connection
            .query_row("SELECT name FROM account", [], |row| row.get(0))
            .unwrap();
        let salary: i64 = connection
            .query_row(
                "SELECT salary_annual_cents FROM user WHERE id = 1",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(category_count, 9);
        assert_eq!(account_name, "My Debit");
        assert_eq!(salary, 0);
    }

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();
        initialize(&connection).unwrap();

        let category_count: i64 = connection
            .query_row("SELECT COUNT(*) FROM category", [], |row| row.get(0))
            .unwrap();
        let account_count: i64 = connection
            .query_row("SELECT COUNT(*) FROM account", [], |row| row.get(0))
            .unwrap();

        assert_eq!(category_count, 9);
        assert_eq!(account_count, 1);
    }

    #[test]
    fn does_not_reseed_after_deletes() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        connection
            .execute("DELETE FROM category WHERE name = 'Misc'", ())
            .unwrap();
        initialize(&connection).unwrap();

        let category_count: i64 = connection
            .query_row("SELECT COUNT(*) FROM category", [], |row| row.get(0))
            .unwrap();

        assert_eq!(category_count, 8);
    }
}
