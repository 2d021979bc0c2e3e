//! Defines the endpoint for creating a recurring transaction.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    account::AccountId,
    category::CategoryId,
    endpoints,
    money::parse_dollars_to_cents,
    recurring::{Direction, NewRecurringRule, create_recurring_rule},
};

/// The state needed to create a recurring transaction.
#[derive(Debug, Clone)]
pub struct CreateRecurringState {
    /// The database connection for managing recurring rules.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateRecurringState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating a recurring transaction.
#[derive(Debug, Deserialize)]
pub struct RecurringForm {
    /// What the rule is for, e.g. "Rent".
    #[serde(default)]
    pub name: String,
    /// The account materialized transactions belong to.
    pub account_id: Option<AccountId>,
    /// The category materialized transactions belong to.
    pub category_id: Option<CategoryId>,
    /// The dollar amount as typed, always a magnitude.
    pub amount: String,
    /// The day of the month as typed.
    pub day_of_month: String,
    /// Whether the money goes `in` or `out`.
    pub direction: String,
    /// Present when the active checkbox is ticked.
    #[serde(default)]
    pub active: Option<String>,
}

/// A route handler for creating a recurring transaction, redirects to the
/// recurring view on success.
pub async fn create_recurring_endpoint(
    State(state): State<CreateRecurringState>,
    Form(form): Form<RecurringForm>,
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

    let day_of_month = match form.day_of_month.trim().parse::<i64>() {
        Ok(day) => day,
        Err(_) => {
            return Error::InvalidDayOfMonth(form.day_of_month).into_alert_response();
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
        tracing::error!("recurring form submitted without an account");
        return Error::NotFound.into_alert_response();
    };

    let rule = NewRecurringRule {
        name: &form.name,
        account_id,
        category_id,
        amount_cents: magnitude_cents,
        day_of_month,
        direction,
        active: form.active.is_some(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_recurring_rule(rule, &connection) {
        tracing::error!("could not create recurring rule: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::RECURRING_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
