//! Defines the endpoint for creating a new account.
use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    account::{AccountType, create_account, create_page::new_account_form_view},
    endpoints,
};

/// The state needed to create an account.
#[derive(Debug, Clone)]
pub struct CreateAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating an account.
#[derive(Debug, Deserialize)]
pub struct AccountForm {
    /// The display name for the account.
    pub name: String,
    /// One of `debit`, `credit` or `investment`.
    pub account_type: String,
}

/// A route handler for creating a new account, redirects to the accounts view
/// on success.
pub async fn create_account_endpoint(
    State(state): State<CreateAccountState>,
    Form(form): Form<AccountForm>,
) -> Response {
    let account_type = match form.account_type.parse::<AccountType>() {
        Ok(account_type) => account_type,
        Err(error) => {
            return new_account_form_view(&format!("Error: {error}")).into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_account(&form.name, account_type, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::ACCOUNTS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ Error::EmptyAccountName) => {
            new_account_form_view(&format!("Error: {error}")).into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating an account: {error}");

            error.into_alert_response()
        }
    }
}
