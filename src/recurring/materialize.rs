//! Turns recurring rules into real transactions.
//!
//! Materialization is lazy: instead of a background scheduler, pages that
//! show transaction data call [ensure_materialized] on load, which inserts
//! any transactions that have fallen due since the last visit. Running it
//! twice in a row is a no-op.

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    month::MonthKey,
    recurring::get_all_recurring_rules,
    transaction::{Transaction, create_transaction, recurring_transaction_exists},
};

/// Insert a transaction for every active rule whose day in `today`'s month
/// has arrived and has not been materialized yet, and return how many were
/// created.
///
/// A rule lands on its `day_of_month`, clamped to the last day of months
/// that are too short for it. Days later in the month than `today` are left
/// for a future visit.
///
/// The whole batch is applied atomically.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn ensure_materialized(today: Date, connection: &Connection) -> Result<usize, Error> {
    let rules = get_all_recurring_rules(connection)?;
    let last_day = MonthKey::from_date(today).days_in_month();

    let sql_transaction = connection.unchecked_transaction()?;
    let mut created = 0;

    for rule in rules {
        if !rule.active {
            continue;
        }

        let effective_day = rule.day_of_month.min(last_day);

        if effective_day > today.day() {
            continue;
        }

        let date = today
            .replace_day(effective_day)
            .map_err(|_| Error::InvalidDayOfMonth(effective_day.to_string()))?;

        if recurring_transaction_exists(rule.id, date, &sql_transaction)? {
            continue;
        }

        create_transaction(
            Transaction::build(
                rule.direction.signed_cents(rule.amount_cents),
                date,
                rule.account_id,
            )
            .description(&rule.name)
            .category_id(Some(rule.category_id))
            .recurring_id(Some(rule.id)),
            &sql_transaction,
        )?;

        created += 1;
    }

    sql_transaction.commit()?;

    Ok(created)
}

#[cfg(test)]
mod ensure_materialized_tests {
    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        db::initialize,
        recurring::{Direction, NewRecurringRule, create_recurring_rule, toggle_recurring_rule},
        transaction::Transaction,
    };

    use super::ensure_materialized;

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    fn create_rule(name: &str, day_of_month: i64, direction: Direction, connection: &Connection) {
        create_recurring_rule(
            NewRecurringRule {
                name,
                account_id: 1,
                category_id: 1,
                amount_cents: 180_000,
                day_of_month,
                direction,
                active: true,
            },
            connection,
        )
        .expect("Could not create rule");
    }

    fn materialized_transactions(connection: &Connection) -> Vec<Transaction> {
        connection
            .prepare(
                "SELECT id, account_id, date, description, amount_cents, category_id, recurring_id
                FROM \"transaction\"
                WHERE recurring_id IS NOT NULL
                ORDER BY date ASC",
            )
            .unwrap()
            .query_map([], crate::transaction::map_transaction_row)
            .unwrap()
            .map(|row| row.unwrap())
            .collect()
    }

    #[test]
    fn creates_transaction_from_due_rule() {
        let connection = get_test_connection();
        create_rule("Rent", 1, Direction::Out, &connection);

        let created = ensure_materialized(date!(2025 - 10 - 15), &connection)
            .expect("Could not materialize");

        assert_eq!(created, 1);
        let transactions = materialized_transactions(&connection);
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].date, date!(2025 - 10 - 01));
        assert_eq!(transactions[0].description, "Rent");
        assert_eq!(transactions[0].amount_cents, -180_000);
        assert_eq!(transactions[0].category_id, Some(1));
        assert_eq!(transactions[0].recurring_id, Some(1));
    }

    #[test]
    fn second_run_creates_nothing() {
        let connection = get_test_connection();
        create_rule("Rent", 1, Direction::Out, &connection);
        let today = date!(2025 - 10 - 15);

        ensure_materialized(today, &connection).expect("Could not materialize");
        let created_again = ensure_materialized(today, &connection).expect("Could not materialize");

        assert_eq!(created_again, 0);
        assert_eq!(materialized_transactions(&connection).len(), 1);
    }

    #[test]
    fn money_in_rules_materialize_with_positive_amounts() {
        let connection = get_test_connection();
        create_rule("Salary", 1, Direction::In, &connection);

        ensure_materialized(date!(2025 - 10 - 15), &connection).expect("Could not materialize");

        assert_eq!(materialized_transactions(&connection)[0].amount_cents, 180_000);
    }

    #[test]
    fn day_31_lands_on_the_last_day_of_short_months() {
        let connection = get_test_connection();
        create_rule("Rent", 31, Direction::Out, &connection);

        let created = ensure_materialized(date!(2025 - 02 - 28), &connection)
            .expect("Could not materialize");

        assert_eq!(created, 1);
        assert_eq!(
            materialized_transactions(&connection)[0].date,
            date!(2025 - 02 - 28)
        );
    }

    #[test]
    fn day_31_lands_on_february_29_in_leap_years() {
        let connection = get_test_connection();
        create_rule("Rent", 31, Direction::Out, &connection);

        ensure_materialized(date!(2024 - 02 - 29), &connection).expect("Could not materialize");

        assert_eq!(
            materialized_transactions(&connection)[0].date,
            date!(2024 - 02 - 29)
        );
    }

    #[test]
    fn rules_due_later_in_the_month_wait() {
        let connection = get_test_connection();
        create_rule("Salary", 20, Direction::In, &connection);

        let created = ensure_materialized(date!(2025 - 10 - 15), &connection)
            .expect("Could not materialize");

        assert_eq!(created, 0);
        assert!(materialized_transactions(&connection).is_empty());

        // The rule lands once the day arrives.
        let created = ensure_materialized(date!(2025 - 10 - 20), &connection)
            .expect("Could not materialize");

        assert_eq!(created, 1);
    }

    #[test]
    fn paused_rules_are_skipped() {
        let connection = get_test_connection();
        create_rule("Rent", 1, Direction::Out, &connection);
        toggle_recurring_rule(1, &connection).expect("Could not pause rule");

        let created = ensure_materialized(date!(2025 - 10 - 15), &connection)
            .expect("Could not materialize");

        assert_eq!(created, 0);
    }

    #[test]
    fn counts_every_rule_that_landed() {
        let connection = get_test_connection();
        create_rule("Rent", 1, Direction::Out, &connection);
        create_rule("Internet", 5, Direction::Out, &connection);
        create_rule("Salary", 28, Direction::In, &connection);

        let created = ensure_materialized(date!(2025 - 10 - 15), &connection)
            .expect("Could not materialize");

        assert_eq!(created, 2);

        let dates: Vec<Date> = materialized_transactions(&connection)
            .iter()
            .map(|transaction| transaction.date)
            .collect();
        assert_eq!(dates, vec![date!(2025 - 10 - 01), date!(2025 - 10 - 05)]);
    }
}
