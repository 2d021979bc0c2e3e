//! The transaction model and its database queries.

use rusqlite::{Connection, Row};
use time::Date;

use crate::{
    Error, account::AccountId, category::CategoryId, database_id::DatabaseId,
    recurring::RecurringRuleId, tag::TagId,
};

/// Alias for the integer type used for transaction IDs.
pub type TransactionId = DatabaseId;

/// Money moving in or out of an account.
///
/// The sign of `amount_cents` is the single source of truth for direction:
/// negative amounts are money out, positive amounts are money in.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The account the money moved in or out of.
    pub account_id: AccountId,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The signed amount in cents.
    pub amount_cents: i64,
    /// The category the transaction belongs to, if any.
    pub category_id: Option<CategoryId>,
    /// The recurring rule that materialized this transaction, if any.
    pub recurring_id: Option<RecurringRuleId>,
}

impl Transaction {
    /// Start building a new transaction.
    pub fn build(amount_cents: i64, date: Date, account_id: AccountId) -> TransactionBuilder {
        TransactionBuilder {
            amount_cents,
            date,
            account_id,
            description: String::new(),
            category_id: None,
            recurring_id: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The amount, date, and account are always required; the remaining fields
/// default to empty/none and can be set with the builder methods. Pass the
/// finished builder to [create_transaction] or [create_transaction_with_tags]
/// to insert the row and get back the stored [Transaction].
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    /// The signed amount in cents. Negative is money out, positive is money
    /// in.
    pub amount_cents: i64,
    /// The date when the transaction occurred.
    pub date: Date,
    /// The account the money moved in or out of.
    pub account_id: AccountId,
    /// A human-readable description of the transaction.
    pub description: String,
    /// The category of the transaction, e.g. "Groceries" or "Transport".
    pub category_id: Option<CategoryId>,
    /// The recurring rule this transaction was materialized from.
    ///
    /// At most one transaction may exist per rule and date, which is how
    /// re-running the materializer stays idempotent.
    pub recurring_id: Option<RecurringRuleId>,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the category for the transaction.
    pub fn category_id(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }

    /// Mark the transaction as materialized from a recurring rule.
    pub fn recurring_id(mut self, recurring_id: Option<RecurringRuleId>) -> Self {
        self.recurring_id = recurring_id;
        self
    }
}

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the account, category, or recurring rule the builder
///   references does not exist,
/// - [Error::DuplicateRecurringTransaction] if a transaction already exists
///   for the builder's recurring rule and date,
/// - [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .execute(
            "INSERT INTO \"transaction\"
                (account_id, date, description, amount_cents, category_id, recurring_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                builder.account_id,
                builder.date,
                &builder.description,
                builder.amount_cents,
                builder.category_id,
                builder.recurring_id,
            ),
        )
        .map_err(|error| match error {
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(error, Some(_)) if error.extended_code == 787 => {
                Error::NotFound
            }
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();

    Ok(Transaction {
        id,
        account_id: builder.account_id,
        date: builder.date,
        description: builder.description,
        amount_cents: builder.amount_cents,
        category_id: builder.category_id,
        recurring_id: builder.recurring_id,
    })
}

/// Create a new transaction and attach `tag_ids` to it, all in one database
/// transaction so a bad tag ID leaves nothing behind.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the account, category, or any tag does not exist,
/// - [Error::SqlError] if there is some other SQL error.
pub fn create_transaction_with_tags(
    builder: TransactionBuilder,
    tag_ids: &[TagId],
    connection: &Connection,
) -> Result<Transaction, Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let transaction = create_transaction(builder, &sql_transaction)?;

    let mut statement = sql_transaction
        .prepare("INSERT INTO transaction_tag (transaction_id, tag_id) VALUES (?1, ?2)")?;

    for &tag_id in tag_ids {
        statement
            .execute((transaction.id, tag_id))
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

    drop(statement);
    sql_transaction.commit()?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    connection
        .prepare(
            "SELECT id, account_id, date, description, amount_cents, category_id, recurring_id
            FROM \"transaction\"
            WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_transaction_row)
        .map_err(|error| error.into())
}

/// Get the IDs of the tags attached to a transaction, in ascending order.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transaction_tag_ids(
    transaction_id: TransactionId,
    connection: &Connection,
) -> Result<Vec<TagId>, Error> {
    connection
        .prepare(
            "SELECT tag_id FROM transaction_tag
            WHERE transaction_id = :transaction_id
            ORDER BY tag_id ASC",
        )?
        .query_map(&[(":transaction_id", &transaction_id)], |row| row.get(0))?
        .map(|maybe_id| maybe_id.map_err(Error::SqlError))
        .collect()
}

/// Check whether a recurring rule has already materialized a transaction for
/// `date`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn recurring_transaction_exists(
    recurring_id: RecurringRuleId,
    date: Date,
    connection: &Connection,
) -> Result<bool, Error> {
    let count: i64 = connection.query_row(
        "SELECT COUNT(1) FROM \"transaction\" WHERE recurring_id = ?1 AND date = ?2",
        (recurring_id, date),
        |row| row.get(0),
    )?;

    Ok(count > 0)
}

/// Delete the transaction with the given `id`. Tag assignments are removed by
/// the cascade on the join table.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a transaction
///   in the database,
/// - [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM \"transaction\" WHERE id = :id", &[(":id", &id)])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// The account, category, and recurring tables must exist first.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                account_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                amount_cents INTEGER NOT NULL,
                category_id INTEGER,
                recurring_id INTEGER,
                FOREIGN KEY(account_id) REFERENCES account(id) ON DELETE CASCADE,
                FOREIGN KEY(category_id) REFERENCES category(id) ON DELETE SET NULL,
                FOREIGN KEY(recurring_id) REFERENCES recurring(id) ON DELETE SET NULL
                )",
        (),
    )?;

    // The existence check in the materializer is advisory; this index is what
    // actually stops two racing requests from materializing the same rule
    // twice on one date.
    connection.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_transaction_recurring_date
            ON \"transaction\"(recurring_id, date)
            WHERE recurring_id IS NOT NULL",
        (),
    )?;

    // Composite index used by the dashboard and budget aggregations.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date_category
            ON \"transaction\"(date, category_id)",
        (),
    )?;

    Ok(())
}

/// Create the transaction/tag junction table in the database.
///
/// The transaction and tag tables must exist first.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_tag_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transaction_tag (
                transaction_id INTEGER NOT NULL,
                tag_id INTEGER NOT NULL,
                PRIMARY KEY (transaction_id, tag_id),
                FOREIGN KEY(transaction_id) REFERENCES \"transaction\"(id) ON DELETE CASCADE,
                FOREIGN KEY(tag_id) REFERENCES tag(id) ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_tag_tag_id ON transaction_tag(tag_id)",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Transaction].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let account_id = row.get(1)?;
    let date = row.get(2)?;
    let description = row.get(3)?;
    let amount_cents = row.get(4)?;
    let category_id = row.get(5)?;
    let recurring_id = row.get(6)?;

    Ok(Transaction {
        id,
        account_id,
        date,
        description,
        amount_cents,
        category_id,
        recurring_id,
    })
}
