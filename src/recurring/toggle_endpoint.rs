//! Defines the endpoint for pausing and resuming a recurring transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    recurring::{RecurringRuleId, toggle_recurring_rule},
};

/// The state needed to toggle a recurring transaction.
#[derive(Debug, Clone)]
pub struct ToggleRecurringState {
    /// The database connection for managing recurring rules.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ToggleRecurringState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Flip a rule between active and paused, then redirect back to the listing
/// so the row re-renders with its new state.
pub async fn toggle_recurring_endpoint(
    Path(rule_id): Path<RecurringRuleId>,
    State(state): State<ToggleRecurringState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match toggle_recurring_rule(rule_id, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::RECURRING_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingRule) => Error::UpdateMissingRule.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while toggling recurring rule {rule_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
