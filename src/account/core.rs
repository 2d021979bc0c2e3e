use std::{fmt::Display, str::FromStr};

use rusqlite::Connection;

use crate::{Error, database_id::DatabaseId};

pub type AccountId = DatabaseId;

/// The kind of account, which decides how balances count toward net worth.
///
/// Debit and investment balances are assets, credit balances are liabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    Debit,
    Credit,
    Investment,
}

impl AccountType {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountType::Debit => "debit",
            AccountType::Credit => "credit",
            AccountType::Investment => "investment",
        }
    }
}

impl FromStr for AccountType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "debit" => Ok(AccountType::Debit),
            "credit" => Ok(AccountType::Credit),
            "investment" => Ok(AccountType::Investment),
            _ => Err(Error::InvalidAccountType(value.to_owned())),
        }
    }
}

impl Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A place money lives, such as a bank account, credit card, or brokerage.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// The id for the account.
    pub id: AccountId,
    /// The name of the account.
    pub name: String,
    /// The kind of account.
    pub account_type: AccountType,
}

pub fn create_account_table(connection: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            type TEXT NOT NULL DEFAULT 'debit'
                CHECK (type IN ('debit', 'credit', 'investment'))
        )",
        (),
    )?;

    Ok(())
}

fn map_row_to_account(row: &rusqlite::Row) -> Result<Account, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let type_string: String = row.get(2)?;
    let account_type = type_string.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            format!("unknown account type \"{type_string}\"").into(),
        )
    })?;

    Ok(Account {
        id,
        name,
        account_type,
    })
}

/// Create an account and return it with its generated ID.
///
/// # Errors
/// Returns [Error::EmptyAccountName] if `name` is blank, or an error if the
/// insert fails.
pub fn create_account(
    name: &str,
    account_type: AccountType,
    connection: &Connection,
) -> Result<Account, Error> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::EmptyAccountName);
    }

    connection.execute(
        "INSERT INTO account (name, type) VALUES (?1, ?2)",
        (name, account_type.as_str()),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Account {
        id,
        name: name.to_owned(),
        account_type,
    })
}

/// Retrieve an account from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid account,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_account(id: AccountId, connection: &Connection) -> Result<Account, Error> {
    let account = connection
        .prepare("SELECT id, name, type FROM account WHERE id = :id")?
        .query_one(&[(":id", &id)], map_row_to_account)?;

    Ok(account)
}

/// Retrieve all accounts ordered alphabetically by name.
pub fn get_all_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare("SELECT id, name, type FROM account ORDER BY name ASC;")?
        .query_map([], map_row_to_account)?
        .map(|maybe_account| maybe_account.map_err(Error::from))
        .collect()
}

/// Rename an account and/or change its type.
///
/// # Errors
/// Returns [Error::EmptyAccountName] if `new_name` is blank, or
/// [Error::UpdateMissingAccount] if `id` does not refer to an account in the
/// database.
pub fn update_account(
    id: AccountId,
    new_name: &str,
    new_type: AccountType,
    connection: &Connection,
) -> Result<(), Error> {
    let new_name = new_name.trim();

    if new_name.is_empty() {
        return Err(Error::EmptyAccountName);
    }

    let rows_affected = connection.execute(
        "UPDATE account SET name = ?1, type = ?2 WHERE id = ?3",
        (new_name, new_type.as_str(), id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingAccount);
    }

    Ok(())
}

/// Delete an account.
///
/// Transactions and balance snapshots recorded against the account are
/// removed by the foreign key cascade.
///
/// # Errors
/// Returns [Error::DeleteMissingAccount] if `id` does not refer to an account
/// in the database.
pub fn delete_account(id: AccountId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM account WHERE id = ?1", (id,))?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingAccount);
    }

    Ok(())
}


#[cfg(test)]
mod account_type_tests {
    use crate::Error;

    use super::AccountType;

    #[test]
    fn parses_valid_types() {
        assert_eq!("debit".parse(), Ok(AccountType::Debit));
        assert_eq!("credit".parse(), Ok(AccountType::Credit));
        assert_eq!("investment".parse(), Ok(AccountType::Investment));
    }

    #[test]
    fn rejects_unknown_type() {
        let result: Result<AccountType, Error> = "chequing".parse();

        assert_eq!(
            result,
            Err(Error::InvalidAccountType("chequing".to_owned()))
        );
    }
}
