//! Defines the endpoint for updating the user settings.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{AppState, Error, endpoints, money::parse_dollars_to_cents};

use super::core::update_salary;

/// The state needed to update the user settings.
#[derive(Debug, Clone)]
pub struct UpdateSettingsState {
    /// The database connection for writing the user settings.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateSettingsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for updating the user settings.
#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    /// The annual salary in dollars. Blank unsets the salary.
    pub salary_annual: String,
}

/// A route handler for updating the annual salary, redirects back to the
/// settings page on success.
pub async fn update_settings_endpoint(
    State(state): State<UpdateSettingsState>,
    Form(form): Form<SettingsForm>,
) -> Response {
    let salary_annual_cents = match parse_dollars_to_cents(&form.salary_annual) {
        Ok(Some(cents)) if cents >= 0 => cents,
        Ok(None) => 0,
        Ok(Some(_)) => {
            return Error::InvalidAmount(form.salary_annual.trim().to_owned())
                .into_alert_response();
        }
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

    if let Err(error) = update_salary(salary_annual_cents, &connection) {
        tracing::error!("could not update salary: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::SETTINGS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod update_settings_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        db::initialize,
        settings::{get_salary, update_endpoint::UpdateSettingsState, update_salary},
        test_utils::{assert_hx_redirect, assert_valid_html, parse_html_fragment},
    };

    use super::{SettingsForm, update_settings_endpoint};

    fn get_test_state() -> UpdateSettingsState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");

        UpdateSettingsState {
            db_connection: Arc::new(Mutex::new(connection)),
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
    async fn saves_salary_and_redirects() {
        let state = get_test_state();
        let form = SettingsForm {
            salary_annual: "90000".to_owned(),
        };

        let response = update_settings_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/settings");

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_salary(&connection), Ok(9_000_000));
    }

    #[tokio::test]
    async fn blank_salary_clears_to_zero() {
        let state = get_test_state();
        update_salary(9_000_000, &state.db_connection.lock().unwrap()).unwrap();
        let form = SettingsForm {
            salary_annual: "".to_owned(),
        };

        let response = update_settings_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_salary(&connection), Ok(0));
    }

    #[tokio::test]
    async fn non_numeric_salary_is_rejected() {
        let state = get_test_state();
        update_salary(9_000_000, &state.db_connection.lock().unwrap()).unwrap();
        let form = SettingsForm {
            salary_annual: "heaps".to_owned(),
        };

        let response = update_settings_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_alert_message(response, StatusCode::BAD_REQUEST, "Invalid amount").await;

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_salary(&connection), Ok(9_000_000));
    }

    #[tokio::test]
    async fn negative_salary_is_rejected() {
        let state = get_test_state();
        update_salary(9_000_000, &state.db_connection.lock().unwrap()).unwrap();
        let form = SettingsForm {
            salary_annual: "-100".to_owned(),
        };

        let response = update_settings_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_alert_message(response, StatusCode::BAD_REQUEST, "Invalid amount").await;

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_salary(&connection), Ok(9_000_000));
    }
}
