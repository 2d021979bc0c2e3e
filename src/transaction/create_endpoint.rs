//! Defines the endpoint for recording a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form. It also collects repeated tag_ids fields into a
// Vec.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    account::AccountId,
    category::CategoryId,
    endpoints,
    money::parse_dollars_to_cents,
    recurring::Direction,
    tag::TagId,
    transaction::{Transaction, create_transaction_with_tags},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// The account the money moved in or out of.
    pub account_id: Option<AccountId>,
    /// The date when the transaction occurred.
    pub date: Date,
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: String,
    /// The dollar amount as typed, always a magnitude.
    pub amount: String,
    /// Whether the money went `in` or `out`.
    pub direction: String,
    /// The category of the transaction.
    pub category_id: Option<CategoryId>,
    /// The IDs of tags to attach to this transaction.
    #[serde(default)]
    pub tag_ids: Vec<TagId>,
}

/// A route handler for creating a new transaction, redirects to the
/// transactions view on success.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let magnitude_cents = match parse_dollars_to_cents(&form.amount) {
        Ok(Some(cents)) => cents.abs(),
        Ok(None) => {
            return Error::InvalidAmount(form.amount).into_alert_response();
        }
        Err(error) => {
            return error.into_alert_response();
        }
    };

    let direction = match form.direction.parse::<Direction>() {
        Ok(direction) => direction,
        Err(error) => {
            return error.into_alert_response();
        }
    };

    let Some(category_id) = form.category_id else {
        return Error::MissingCategory.into_alert_response();
    };

    let Some(account_id) = form.account_id else {
        tracing::error!("transaction form submitted without an account");
        return Error::NotFound.into_alert_response();
    };

    let builder = Transaction::build(direction.signed_cents(magnitude_cents), form.date, account_id)
        .description(&form.description)
        .category_id(Some(category_id));

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_transaction_with_tags(builder, &form.tag_ids, &connection) {
        tracing::error!("could not create transaction: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod create_transaction_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        db::initialize,
        endpoints,
        test_utils::{assert_hx_redirect, assert_valid_html, parse_html_fragment},
        transaction::{
            create_endpoint::{CreateTransactionState, TransactionForm},
            create_transaction_endpoint, get_transaction, get_transaction_tag_ids,
        },
    };

    fn get_test_state() -> CreateTransactionState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");

        CreateTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn valid_form() -> TransactionForm {
        TransactionForm {
            account_id: Some(1),
            date: date!(2025 - 10 - 05),
            description: "Coffee beans".to_owned(),
            amount: "45.99".to_owned(),
            direction: "out".to_owned(),
            category_id: Some(3),
            tag_ids: Vec::new(),
        }
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
    async fn money_out_is_stored_as_a_negative_amount() {
        let state = get_test_state();

        let response = create_transaction_endpoint(State(state.clone()), Form(valid_form()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::TRANSACTIONS_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, &connection).unwrap();
        assert_eq!(transaction.amount_cents, -4_599);
        assert_eq!(transaction.description, "Coffee beans");
        assert_eq!(transaction.category_id, Some(3));
    }

    #[tokio::test]
    async fn money_in_is_stored_as_a_positive_amount() {
        let state = get_test_state();
        let form = TransactionForm {
            direction: "in".to_owned(),
            amount: "2500".to_owned(),
            description: "Salary".to_owned(),
            ..valid_form()
        };

        let response = create_transaction_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, &connection).unwrap();
        assert_eq!(transaction.amount_cents, 250_000);
    }

    #[tokio::test]
    async fn attaches_selected_tags() {
        let state = get_test_state();
        state
            .db_connection
            .lock()
            .unwrap()
            .execute("INSERT INTO tag (name) VALUES ('Holiday'), ('Work')", ())
            .unwrap();
        let form = TransactionForm {
            tag_ids: vec![1, 2],
            ..valid_form()
        };

        let response = create_transaction_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_transaction_tag_ids(1, &connection), Ok(vec![1, 2]));
    }

    #[tokio::test]
    async fn rejects_unparseable_amount() {
        let state = get_test_state();
        let form = TransactionForm {
            amount: "12.3.4".to_owned(),
            ..valid_form()
        };

        let response = create_transaction_endpoint(State(state), Form(form))
            .await
            .into_response();

        assert_alert_message(response, StatusCode::BAD_REQUEST, "Invalid amount").await;
    }

    #[tokio::test]
    async fn rejects_blank_amount() {
        let state = get_test_state();
        let form = TransactionForm {
            amount: "   ".to_owned(),
            ..valid_form()
        };

        let response = create_transaction_endpoint(State(state), Form(form))
            .await
            .into_response();

        assert_alert_message(response, StatusCode::BAD_REQUEST, "Invalid amount").await;
    }

    #[tokio::test]
    async fn rejects_unknown_direction() {
        let state = get_test_state();
        let form = TransactionForm {
            direction: "sideways".to_owned(),
            ..valid_form()
        };

        let response = create_transaction_endpoint(State(state), Form(form))
            .await
            .into_response();

        assert_alert_message(response, StatusCode::BAD_REQUEST, "Invalid direction").await;
    }

    #[tokio::test]
    async fn rejects_missing_category() {
        let state = get_test_state();
        let form = TransactionForm {
            category_id: None,
            ..valid_form()
        };

        let response = create_transaction_endpoint(State(state), Form(form))
            .await
            .into_response();

        assert_alert_message(response, StatusCode::BAD_REQUEST, "Category required").await;
    }

    #[tokio::test]
    async fn rejects_unknown_account() {
        let state = get_test_state();
        let form = TransactionForm {
            account_id: Some(999),
            ..valid_form()
        };

        let response = create_transaction_endpoint(State(state), Form(form))
            .await
            .into_response();

        assert_alert_message(response, StatusCode::NOT_FOUND, "Not found").await;
    }
}
