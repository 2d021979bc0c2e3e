//! The singleton user table and its database queries.
//!
//! The app is single-user, so the user table holds exactly one row pinned to
//! id 1. It carries the settings that are not derivable from transactions,
//! currently just the annual salary the dashboard falls back to when a month
//! has no recorded income.

use rusqlite::Connection;

use crate::Error;

/// Get the annual salary in cents.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the user row is missing,
/// - [Error::SqlError] if there is some other SQL error.
pub fn get_salary(connection: &Connection) -> Result<i64, Error> {
    connection
        .query_one(
            "SELECT salary_annual_cents FROM user WHERE id = 1",
            (),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Set the annual salary in cents.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the user row is missing,
/// - [Error::SqlError] if there is some other SQL error.
pub fn update_salary(salary_annual_cents: i64, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET salary_annual_cents = ?1 WHERE id = 1",
        [salary_annual_cents],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Create the user table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                salary_annual_cents INTEGER NOT NULL DEFAULT 0
                )",
        (),
    )?;

    Ok(())
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;

    use crate::db::initialize;

    use super::{get_salary, update_salary};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    #[test]
    fn salary_starts_at_zero() {
        let connection = get_test_connection();

        assert_eq!(get_salary(&connection), Ok(0));
    }

    #[test]
    fn update_and_read_round_trip() {
        let connection = get_test_connection();

        update_salary(9_000_000, &connection).expect("Could not update salary");

        assert_eq!(get_salary(&connection), Ok(9_000_000));
    }

    #[test]
    fn second_update_keeps_latest_value() {
        let connection = get_test_connection();

        update_salary(9_000_000, &connection).unwrap();
        update_salary(9_550_000, &connection).unwrap();

        assert_eq!(get_salary(&connection), Ok(9_550_000));
    }

    #[test]
    fn reinitializing_does_not_reset_the_salary() {
        let connection = get_test_connection();
        update_salary(9_000_000, &connection).unwrap();

        initialize(&connection).expect("Could not reinitialize database");

        assert_eq!(get_salary(&connection), Ok(9_000_000));
    }
}
