//! Defines the route handler for the page for editing an account.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{AccountId, account_form_fields, get_account},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
};

/// The state needed for the edit account page.
#[derive(Debug, Clone)]
pub struct EditAccountPageState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditAccountPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the account editing page.
pub async fn get_edit_account_page(
    Path(account_id): Path<AccountId>,
    State(state): State<EditAccountPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_ACCOUNT_VIEW, account_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_ACCOUNT, account_id);

    match get_account(account_id, &connection) {
        Ok(account) => Ok(edit_account_view(
            &edit_endpoint,
            &update_endpoint,
            &account.name,
            account.account_type.as_str(),
            "",
        )
        .into_response()),
        Err(error) => {
            let error_message = match error {
                Error::NotFound => "Account not found",
                _ => {
                    tracing::error!("Failed to retrieve account {account_id}: {error}");
                    "Failed to load account"
                }
            };

            Ok(
                edit_account_view(&edit_endpoint, &update_endpoint, "", "debit", error_message)
                    .into_response(),
            )
        }
    }
}

fn edit_account_view(
    edit_endpoint: &str,
    update_endpoint: &str,
    name: &str,
    account_type: &str,
    error_message: &str,
) -> Markup {
    let nav_bar = NavBar::new(edit_endpoint).into_html();
    let form = edit_account_form_view(update_endpoint, name, account_type, error_message);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Edit Account", &[], &content)
}

pub(super) fn edit_account_form_view(
    update_endpoint: &str,
    name: &str,
    account_type: &str,
    error_message: &str,
) -> Markup {
    html! {
        form
            hx-put=(update_endpoint)
            class="w-full space-y-4 md:space-y-6"
        {
            (account_form_fields(name, account_type))

            @if !error_message.is_empty() {
                p
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update Account" }
        }
    }
}
