//! Defines the endpoint for saving or clearing a month's budgets.
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

use crate::{
    AppState, Error, category::CategoryId, endpoints, money::parse_dollars_to_cents,
    month::MonthKey,
};

use super::core::{clear_month_budgets, save_month_budgets};

/// The state needed to save a month's budgets.
#[derive(Debug, Clone)]
pub struct SaveBudgetsState {
    /// The database connection for writing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SaveBudgetsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for saving or clearing a month's category budgets,
/// redirects back to that month's budget editor on success.
///
/// The form carries one `cat_<id>` dollar field per category plus a hidden
/// `month`. Blank fields are skipped, and a field that fails to parse aborts
/// the whole save so a typo never applies half the form. Submitting with
/// `action=clear` deletes the month's budgets instead.
pub async fn save_budgets_endpoint(
    State(state): State<SaveBudgetsState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    let Some(month_text) = fields.get("month") else {
        tracing::error!("budget form submitted without a month");
        return Error::NotFound.into_alert_response();
    };

    let month = match month_text.parse::<MonthKey>() {
        Ok(month) => month,
        Err(error) => {
            return error.into_alert_response();
        }
    };

    if fields.get("action").is_some_and(|action| action == "clear") {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_alert_response();
            }
        };

        if let Err(error) = clear_month_budgets(month, &connection) {
            tracing::error!("could not clear budgets for {month}: {error}");

            return error.into_alert_response();
        }

        return budgets_redirect(month);
    }

    let mut amounts: Vec<(CategoryId, i64)> = Vec::new();

    for (key, value) in &fields {
        let Some(id_text) = key.strip_prefix("cat_") else {
            continue;
        };

        let Ok(category_id) = id_text.parse::<CategoryId>() else {
            tracing::error!("budget form field {key} does not name a category");
            return Error::NotFound.into_alert_response();
        };

        match parse_dollars_to_cents(value) {
            Ok(Some(cents)) => amounts.push((category_id, cents)),
            Ok(None) => {}
            Err(error) => {
                return error.into_alert_response();
            }
        }
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = save_month_budgets(month, &amounts, &connection) {
        tracing::error!("could not save budgets for {month}: {error}");

        return error.into_alert_response();
    }

    budgets_redirect(month)
}

fn budgets_redirect(month: MonthKey) -> Response {
    (
        HxRedirect(format!("{}?month={month}", endpoints::BUDGETS_VIEW)),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
