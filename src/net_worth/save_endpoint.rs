//! Defines the endpoint for saving a date's account balances.
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use time::{Date, Month};

use crate::{
    AppState, Error,
    account::{AccountId, get_all_accounts},
    endpoints,
    money::parse_dollars_to_cents,
};

use super::core::save_balances;

/// The state needed to save a date's account balances.
#[derive(Debug, Clone)]
pub struct SaveBalancesState {
    /// The database connection for writing balance snapshots.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SaveBalancesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for saving a date's account balances, redirects back to
/// that date's net worth page on success.
///
/// The form carries one `acct_<id>` dollar field per account plus a hidden
/// `as_of` date. Blank fields are skipped so an unrecorded account keeps no
/// snapshot, and a negative or non-numeric field aborts the whole save.
pub async fn save_balances_endpoint(
    State(state): State<SaveBalancesState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    let Some(as_of_text) = fields.get("as_of") else {
        tracing::error!("balance form submitted without a date");
        return Error::NotFound.into_alert_response();
    };

    let as_of = match parse_form_date(as_of_text) {
        Ok(as_of) => as_of,
        Err(error) => {
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let account_names: HashMap<AccountId, String> = match get_all_accounts(&connection) {
        Ok(accounts) => accounts
            .into_iter()
            .map(|account| (account.id, account.name))
            .collect(),
        Err(error) => {
            tracing::error!("could not get all accounts: {error}");
            return error.into_alert_response();
        }
    };

    let mut balances: Vec<(AccountId, i64)> = Vec::new();

    for (key, value) in &fields {
        let Some(id_text) = key.strip_prefix("acct_") else {
            continue;
        };

        let Ok(account_id) = id_text.parse::<AccountId>() else {
            tracing::error!("balance form field {key} does not name an account");
            return Error::NotFound.into_alert_response();
        };

        let Some(account_name) = account_names.get(&account_id) else {
            tracing::error!("balance form field {key} does not name an account");
            return Error::NotFound.into_alert_response();
        };

        match parse_dollars_to_cents(value) {
            Ok(Some(cents)) if cents >= 0 => balances.push((account_id, cents)),
            Ok(None) => {}
            Ok(Some(_)) | Err(_) => {
                return Error::InvalidBalance(account_name.clone()).into_alert_response();
            }
        }
    }

    if let Err(error) = save_balances(as_of, &balances, &connection) {
        tracing::error!("could not save balances for {as_of}: {error}");

        return error.into_alert_response();
    }

    net_worth_redirect(as_of)
}

/// Parse a date in YYYY-MM-DD form from a form field.
fn parse_form_date(text: &str) -> Result<Date, Error> {
    let invalid = || Error::InvalidDate(text.to_owned());

    let (year_text, rest) = text.split_once('-').ok_or_else(invalid)?;
    let (month_text, day_text) = rest.split_once('-').ok_or_else(invalid)?;

    let year: i32 = year_text.parse().map_err(|_| invalid())?;
    let month_number: u8 = month_text.parse().map_err(|_| invalid())?;
    let month = Month::try_from(month_number).map_err(|_| invalid())?;
    let day: u8 = day_text.parse().map_err(|_| invalid())?;

    Date::from_calendar_date(year, month, day).map_err(|_| invalid())
}

fn net_worth_redirect(as_of: Date) -> Response {
    (
        HxRedirect(format!("{}?as_of={as_of}", endpoints::NET_WORTH_VIEW)),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod save_balances_endpoint_tests {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        account::{AccountType, create_account},
        db::initialize,
        net_worth::{get_balances_for_date, save_endpoint::SaveBalancesState, upsert_balance},
        test_utils::{assert_hx_redirect, assert_valid_html, parse_html_fragment},
    };

    use super::save_balances_endpoint;

    fn get_test_state() -> SaveBalancesState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");

        SaveBalancesState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    async fn assert_alert_message(
        response: axum::response::Response,
        want_status: StatusCode,
        want_message: &str,
    ) {
        assert_eq!(response.status(), want_status);

        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);

        let selector = Selector::parse("p").unwrap();
        let message = html
            .select(&selector)
            .next()
            .expect("no alert message found")
            .text()
            .collect::<String>();
        assert_eq!(message.trim(), want_message);
    }

    #[tokio::test]
    async fn saves_non_blank_fields_and_redirects() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_account("Visa", AccountType::Credit, &connection).unwrap();
        }
        let form = fields(&[
            ("as_of", "2025-10-31"),
            ("acct_1", "5000"),
            ("acct_2", ""),
        ]);

        let response = save_balances_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/net-worth?as_of=2025-10-31");

        let connection = state.db_connection.lock().unwrap();
        let balances = get_balances_for_date(date!(2025 - 10 - 31), &connection).unwrap();
        assert_eq!(balances, HashMap::from([(1, 500_000)]));
    }

    #[tokio::test]
    async fn overwrites_the_existing_snapshot() {
        let state = get_test_state();
        upsert_balance(
            1,
            date!(2025 - 10 - 31),
            400_000,
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        let form = fields(&[("as_of", "2025-10-31"), ("acct_1", "5250.50")]);

        let response = save_balances_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let connection = state.db_connection.lock().unwrap();
        let balances = get_balances_for_date(date!(2025 - 10 - 31), &connection).unwrap();
        assert_eq!(balances, HashMap::from([(1, 525_050)]));
    }

    #[tokio::test]
    async fn negative_balance_aborts_the_whole_save() {
        let state = get_test_state();
        let form = fields(&[("as_of", "2025-10-31"), ("acct_1", "-100")]);

        let response = save_balances_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_alert_message(response, StatusCode::BAD_REQUEST, "Invalid balance").await;

        let connection = state.db_connection.lock().unwrap();
        assert!(
            get_balances_for_date(date!(2025 - 10 - 31), &connection)
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn non_numeric_balance_aborts_the_whole_save() {
        let state = get_test_state();
        let form = fields(&[("as_of", "2025-10-31"), ("acct_1", "heaps")]);

        let response = save_balances_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_alert_message(response, StatusCode::BAD_REQUEST, "Invalid balance").await;

        let connection = state.db_connection.lock().unwrap();
        assert!(
            get_balances_for_date(date!(2025 - 10 - 31), &connection)
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn unknown_account_applies_nothing() {
        let state = get_test_state();
        let form = fields(&[
            ("as_of", "2025-10-31"),
            ("acct_1", "5000"),
            ("acct_999", "10"),
        ]);

        let response = save_balances_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_alert_message(response, StatusCode::NOT_FOUND, "Not found").await;

        let connection = state.db_connection.lock().unwrap();
        assert!(
            get_balances_for_date(date!(2025 - 10 - 31), &connection)
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn missing_date_is_rejected() {
        let state = get_test_state();
        let form = fields(&[("acct_1", "5000")]);

        let response = save_balances_endpoint(State(state), Form(form))
            .await
            .into_response();

        assert_alert_message(response, StatusCode::NOT_FOUND, "Not found").await;
    }

    #[tokio::test]
    async fn malformed_date_is_rejected() {
        let state = get_test_state();
        let form = fields(&[("as_of", "Halloween"), ("acct_1", "5000")]);

        let response = save_balances_endpoint(State(state), Form(form))
            .await
            .into_response();

        assert_alert_message(response, StatusCode::BAD_REQUEST, "Invalid date").await;
    }

    #[tokio::test]
    async fn impossible_date_is_rejected() {
        let state = get_test_state();
        let form = fields(&[("as_of", "2025-02-30"), ("acct_1", "5000")]);

        let response = save_balances_endpoint(State(state), Form(form))
            .await
            .into_response();

        assert_alert_message(response, StatusCode::BAD_REQUEST, "Invalid date").await;
    }
}
