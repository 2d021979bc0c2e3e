//! Defines the endpoint for deleting a recurring transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    recurring::{RecurringRuleId, delete_recurring_rule},
};

/// The state needed for deleting a recurring transaction.
#[derive(Debug, Clone)]
pub struct DeleteRecurringState {
    /// The database connection for managing recurring rules.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteRecurringState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle recurring rule deletion. Returns a success alert or error.
pub async fn delete_recurring_endpoint(
    Path(rule_id): Path<RecurringRuleId>,
    State(state): State<DeleteRecurringState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_recurring_rule(rule_id, &connection) {
        Ok(_) => Alert::Success {
            message: "Recurring transaction deleted successfully".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingRule) => Error::DeleteMissingRule.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting recurring rule {rule_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
