//! Defines the endpoint for updating an account.
use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{
        AccountId, AccountType, create_endpoint::AccountForm, edit_page::edit_account_form_view,
        update_account,
    },
    endpoints,
};

/// The state needed to update an account.
#[derive(Debug, Clone)]
pub struct UpdateAccountEndpointState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateAccountEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle account update form submission.
pub async fn update_account_endpoint(
    Path(account_id): Path<AccountId>,
    State(state): State<UpdateAccountEndpointState>,
    Form(form): Form<AccountForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_ACCOUNT, account_id);

    let account_type = match form.account_type.parse::<AccountType>() {
        Ok(account_type) => account_type,
        Err(error) => {
            return edit_account_form_view(
                &update_endpoint,
                &form.name,
                "debit",
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    match update_account(account_id, &form.name, account_type, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::ACCOUNTS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ Error::EmptyAccountName) => edit_account_form_view(
            &update_endpoint,
            &form.name,
            form.account_type.as_str(),
            &format!("Error: {error}"),
        )
        .into_response(),
        Err(Error::UpdateMissingAccount) => Error::UpdateMissingAccount.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating account {account_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod update_account_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;

    use crate::{
        account::{
            AccountType, create_account, create_account_table, create_endpoint::AccountForm,
            edit_endpoint::UpdateAccountEndpointState, get_account, update_account_endpoint,
        },
        endpoints,
        test_utils::{
            assert_form_error_message, assert_hx_redirect, assert_valid_html, must_get_form,
            parse_html_fragment,
        },
    };

    fn get_update_account_state() -> UpdateAccountEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_account_table(&connection).expect("Could not create account table");

        UpdateAccountEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn update_account_endpoint_succeeds() {
        let state = get_update_account_state();
        let account = create_account(
            "Everyday",
            AccountType::Debit,
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test account");

        let form = AccountForm {
            name: "Visa".to_owned(),
            account_type: "credit".to_owned(),
        };

        let response = update_account_endpoint(Path(account.id), State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::ACCOUNTS_VIEW);

        let updated = get_account(account.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(updated.name, "Visa");
        assert_eq!(updated.account_type, AccountType::Credit);
    }

    #[tokio::test]
    async fn update_account_endpoint_with_invalid_id_returns_not_found() {
        let state = get_update_account_state();
        let invalid_id = 999999;
        let form = AccountForm {
            name: "Visa".to_owned(),
            account_type: "credit".to_owned(),
        };

        let response = update_account_endpoint(Path(invalid_id), State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_account_endpoint_with_empty_name_returns_error() {
        let state = get_update_account_state();
        let account = create_account(
            "Everyday",
            AccountType::Debit,
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test account");

        let form = AccountForm {
            name: "".to_owned(),
            account_type: "debit".to_owned(),
        };

        let response = update_account_endpoint(Path(account.id), State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: account name cannot be empty");
    }
}
