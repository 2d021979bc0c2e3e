//! The recurring rule model and its database queries.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, Row};

use crate::{Error, account::AccountId, category::CategoryId, database_id::DatabaseId};

/// Alias for the integer type used for recurring rule IDs.
pub type RecurringRuleId = DatabaseId;

/// Whether a rule's money moves in or out of the account.
///
/// Rules store their amount as a magnitude; the direction supplies the sign
/// when a transaction is materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Money coming in, e.g. a salary.
    In,
    /// Money going out, e.g. rent.
    Out,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }

    /// Apply the direction's sign to a magnitude in cents.
    pub fn signed_cents(self, magnitude_cents: i64) -> i64 {
        match self {
            Direction::In => magnitude_cents,
            Direction::Out => -magnitude_cents,
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "in" => Ok(Direction::In),
            "out" => Ok(Direction::Out),
            _ => Err(Error::InvalidDirection(value.to_owned())),
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A template for a transaction that repeats monthly, e.g. rent or a salary.
///
/// Each month the materializer turns every active rule into a real
/// transaction on the rule's day, clamped to the last day of short months.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringRule {
    /// The ID of the rule.
    pub id: RecurringRuleId,
    /// What the rule is for, e.g. "Rent". Used as the description of
    /// materialized transactions.
    pub name: String,
    /// The account the materialized transactions belong to.
    pub account_id: AccountId,
    /// The category the materialized transactions belong to.
    pub category_id: CategoryId,
    /// The amount as a magnitude in cents. Always non-negative.
    pub amount_cents: i64,
    /// The day of the month the transaction lands on, 1 through 31.
    pub day_of_month: u8,
    /// The direction the money moves.
    pub direction: Direction,
    /// Whether the rule currently materializes transactions.
    pub active: bool,
}

/// The fields needed to create a [RecurringRule].
#[derive(Debug, Clone)]
pub struct NewRecurringRule<'a> {
    /// What the rule is for, e.g. "Rent".
    pub name: &'a str,
    /// The account materialized transactions belong to.
    pub account_id: AccountId,
    /// The category materialized transactions belong to.
    pub category_id: CategoryId,
    /// The amount as a magnitude in cents.
    pub amount_cents: i64,
    /// The day of the month, 1 through 31.
    pub day_of_month: i64,
    /// The direction the money moves.
    pub direction: Direction,
    /// Whether the rule starts active.
    pub active: bool,
}

/// Create a recurring rule and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyRuleName] if the name is blank,
/// - [Error::InvalidDayOfMonth] if the day is outside 1 through 31,
/// - [Error::NotFound] if the account or category does not exist,
/// - [Error::SqlError] if there is some other SQL error.
pub fn create_recurring_rule(
    rule: NewRecurringRule,
    connection: &Connection,
) -> Result<RecurringRule, Error> {
    let name = rule.name.trim();

    if name.is_empty() {
        return Err(Error::EmptyRuleName);
    }

    if !(1..=31).contains(&rule.day_of_month) {
        return Err(Error::InvalidDayOfMonth(rule.day_of_month.to_string()));
    }

    let amount_cents = rule.amount_cents.abs();

    connection
        .execute(
            "INSERT INTO recurring
                (name, account_id, category_id, amount_cents, day_of_month, direction, active)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            (
                name,
                rule.account_id,
                rule.category_id,
                amount_cents,
                rule.day_of_month,
                rule.direction.as_str(),
                rule.active,
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

    Ok(RecurringRule {
        id,
        name: name.to_owned(),
        account_id: rule.account_id,
        category_id: rule.category_id,
        amount_cents,
        day_of_month: rule.day_of_month as u8,
        direction: rule.direction,
        active: rule.active,
    })
}

/// Retrieve a recurring rule by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid rule,
/// - [Error::SqlError] if there is some other SQL error.
pub fn get_recurring_rule(
    id: RecurringRuleId,
    connection: &Connection,
) -> Result<RecurringRule, Error> {
    connection
        .prepare(
            "SELECT id, name, account_id, category_id, amount_cents, day_of_month, direction, active
            FROM recurring
            WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_rule_row)
        .map_err(|error| error.into())
}

/// Retrieve all recurring rules ordered by the day they land on, then name.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_all_recurring_rules(connection: &Connection) -> Result<Vec<RecurringRule>, Error> {
    connection
        .prepare(
            "SELECT id, name, account_id, category_id, amount_cents, day_of_month, direction, active
            FROM recurring
            ORDER BY day_of_month ASC, name ASC",
        )?
        .query_map([], map_rule_row)?
        .map(|maybe_rule| maybe_rule.map_err(|error| error.into()))
        .collect()
}

/// A recurring rule joined with the names its listing needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleWithNames {
    pub rule: RecurringRule,
    pub account_name: String,
    pub category_name: String,
}

/// Retrieve all rules with their account and category names, ordered by the
/// day they land on, then name.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_rules_with_names(connection: &Connection) -> Result<Vec<RuleWithNames>, Error> {
    connection
        .prepare(
            "SELECT recurring.id, recurring.name, account_id, category_id, amount_cents,
                day_of_month, direction, active, account.name, category.name
            FROM recurring
            INNER JOIN account ON account.id = recurring.account_id
            INNER JOIN category ON category.id = recurring.category_id
            ORDER BY day_of_month ASC, recurring.name ASC",
        )?
        .query_map([], |row| {
            Ok(RuleWithNames {
                rule: map_rule_row(row)?,
                account_name: row.get(8)?,
                category_name: row.get(9)?,
            })
        })?
        .map(|maybe_rule| maybe_rule.map_err(|error| error.into()))
        .collect()
}

/// Flip a rule between active and paused, returning the new state.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingRule] if `id` does not refer to a rule in the
///   database,
/// - [Error::SqlError] if there is some other SQL error.
pub fn toggle_recurring_rule(id: RecurringRuleId, connection: &Connection) -> Result<bool, Error> {
    connection
        .prepare("UPDATE recurring SET active = NOT active WHERE id = :id RETURNING active")?
        .query_one(&[(":id", &id)], |row| row.get(0))
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingRule,
            error => error.into(),
        })
}

/// Delete the rule with the given `id`.
///
/// Transactions the rule has already materialized keep their history; the
/// foreign key sets their `recurring_id` to NULL.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingRule] if `id` does not refer to a rule in the
///   database,
/// - [Error::SqlError] if there is some other SQL error.
pub fn delete_recurring_rule(id: RecurringRuleId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM recurring WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingRule);
    }

    Ok(())
}

/// Create the recurring rule table in the database.
///
/// The account and category tables must exist first.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_recurring_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS recurring (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                account_id INTEGER NOT NULL,
                category_id INTEGER NOT NULL,
                amount_cents INTEGER NOT NULL,
                day_of_month INTEGER NOT NULL,
                direction TEXT NOT NULL CHECK (direction IN ('in', 'out')),
                active INTEGER NOT NULL DEFAULT 1,
                FOREIGN KEY(account_id) REFERENCES account(id) ON DELETE CASCADE,
                FOREIGN KEY(category_id) REFERENCES category(id)
                )",
        (),
    )?;

    Ok(())
}

fn map_rule_row(row: &Row) -> Result<RecurringRule, rusqlite::Error> {
    let direction_string: String = row.get(6)?;
    let direction = direction_string.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            6,
            rusqlite::types::Type::Text,
            format!("unknown direction \"{direction_string}\"").into(),
        )
    })?;

    Ok(RecurringRule {
        id: row.get(0)?,
        name: row.get(1)?,
        account_id: row.get(2)?,
        category_id: row.get(3)?,
        amount_cents: row.get(4)?,
        day_of_month: row.get(5)?,
        direction,
        active: row.get(7)?,
    })
}

#[cfg(test)]
mod direction_tests {
    use crate::{Error, recurring::Direction};

    #[test]
    fn parses_valid_directions() {
        assert_eq!("in".parse(), Ok(Direction::In));
        assert_eq!("out".parse(), Ok(Direction::Out));
    }

    #[test]
    fn rejects_unknown_direction() {
        let result = "sideways".parse::<Direction>();

        assert_eq!(result, Err(Error::InvalidDirection("sideways".to_owned())));
    }

    #[test]
    fn signs_amounts_by_direction() {
        assert_eq!(Direction::Out.signed_cents(4_599), -4_599);
        assert_eq!(Direction::In.signed_cents(250_000), 250_000);
    }
}
