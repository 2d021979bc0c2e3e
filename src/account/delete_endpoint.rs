//! Defines the endpoint for deleting an account.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{AccountId, delete_account},
    alert::Alert,
};

/// The state needed for deleting an account.
#[derive(Debug, Clone)]
pub struct DeleteAccountEndpointState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteAccountEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle account deletion. Returns a success alert or error.
pub async fn delete_account_endpoint(
    Path(account_id): Path<AccountId>,
    State(state): State<DeleteAccountEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_account(account_id, &connection) {
        Ok(_) => Alert::Success {
            message: "Account deleted successfully".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingAccount) => Error::DeleteMissingAccount.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting account {account_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
