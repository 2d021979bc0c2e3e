//! Defines the route handler for the settings page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, base, dollar_input_styles,
    },
    money::cents_to_dollars,
    navigation::NavBar,
};

use super::core::get_salary;

/// The state needed for the settings page.
#[derive(Debug, Clone)]
pub struct SettingsPageState {
    /// The database connection for reading the user settings.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SettingsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the settings page.
pub async fn get_settings_page(State(state): State<SettingsPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let salary_annual_cents = get_salary(&connection)
        .inspect_err(|error| tracing::error!("could not get salary: {error}"))?;

    Ok(settings_view(salary_annual_cents).into_response())
}

fn settings_view(salary_annual_cents: i64) -> Markup {
    let nav_bar = NavBar::new(endpoints::SETTINGS_VIEW).into_html();
    let salary_dollars = format!("{:.2}", cents_to_dollars(salary_annual_cents));

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::POST_SETTINGS)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h1 class="text-xl font-bold" { "Settings" }

                div
                {
                    label for="salary_annual" class=(FORM_LABEL_STYLE) { "Annual salary" }

                    div class="input-wrapper"
                    {
                        input
                            type="number"
                            step="0.01"
                            min="0"
                            name="salary_annual"
                            id="salary_annual"
                            value=(salary_dollars)
                            class="block w-full p-2.5 rounded text-sm text-gray-900
                                dark:text-white bg-gray-50 dark:bg-gray-700 border
                                border-gray-300 dark:border-gray-600 focus:ring-blue-600
                                focus:border-blue-600";
                    }

                    p class="mt-2 text-xs text-gray-500 dark:text-gray-400"
                    {
                        "When a month has no recorded income, the dashboard assumes \
                        one twelfth of this salary instead. Leave blank to unset."
                    }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Settings" }
            }
        }
    };

    base("Settings", &[dollar_input_styles()], &content)
}
