//! Defines the route handler for the page for setting up a recurring
//! transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{Account, get_all_accounts},
    category::{Category, get_all_categories},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE,
        FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        dollar_input_styles, link, loading_spinner,
    },
    navigation::NavBar,
};

/// The state needed for the new recurring transaction page.
#[derive(Debug, Clone)]
pub struct NewRecurringPageState {
    /// The database connection for accounts and categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for NewRecurringPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for setting up a recurring transaction.
pub async fn get_new_recurring_page(
    State(state): State<NewRecurringPageState>,
) -> Result<Response, Error> {
    let (accounts, categories) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        (
            get_all_accounts(&connection).inspect_err(|error| {
                tracing::error!("Failed to retrieve accounts for new recurring page: {error}")
            })?,
            get_all_categories(&connection).inspect_err(|error| {
                tracing::error!("Failed to retrieve categories for new recurring page: {error}")
            })?,
        )
    };

    if accounts.is_empty() {
        return Ok(no_accounts_view().into_response());
    }

    Ok(new_recurring_view(&accounts, &categories).into_response())
}

/// Shown instead of the form when there is nothing to attach a rule to.
fn no_accounts_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_RECURRING_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold" { "New Recurring Transaction" }

            p class="mt-4 text-gray-500 dark:text-gray-400"
            {
                "Recurring transactions need an account to belong to. "
                (link(endpoints::NEW_ACCOUNT_VIEW, "Add your first account"))
                " to get started."
            }
        }
    };

    base("New Recurring Transaction", &[], &content)
}

fn new_recurring_view(accounts: &[Account], categories: &[Category]) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_RECURRING_VIEW).into_html();
    let spinner = loading_spinner();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::POST_RECURRING)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Recurring Transaction" }

                div
                {
                    label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                    input
                        name="name"
                        id="name"
                        type="text"
                        placeholder="e.g. Rent"
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="account_id" class=(FORM_LABEL_STYLE) { "Account" }

                    select
                        name="account_id"
                        id="account_id"
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for account in accounts {
                            option value=(account.id) { (account.name) }
                        }
                    }
                }

                div
                {
                    label for="category_id" class=(FORM_LABEL_STYLE) { "Category" }

                    select
                        name="category_id"
                        id="category_id"
                        required
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" { "Select a category" }

                        @for category in categories {
                            option value=(category.id) { (category.name) }
                        }
                    }
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                    // w-full needed to ensure input takes the full width when prefilled with a value
                    div class="input-wrapper w-full"
                    {
                        input
                            name="amount"
                            id="amount"
                            type="number"
                            step="0.01"
                            min="0"
                            placeholder="0.00"
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                div
                {
                    label for="day_of_month" class=(FORM_LABEL_STYLE) { "Day of month" }

                    input
                        name="day_of_month"
                        id="day_of_month"
                        type="number"
                        min="1"
                        max="31"
                        step="1"
                        value="1"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);

                    p class="mt-2 text-xs text-gray-500 dark:text-gray-400"
                    {
                        "Months shorter than the chosen day use their last day instead."
                    }
                }

                fieldset {
                    legend class=(FORM_LABEL_STYLE) { "Direction" }
                    div class=(FORM_RADIO_GROUP_STYLE) {
                        div class="flex items-center gap-3" {
                            input
                                id="direction-out"
                                type="radio"
                                name="direction"
                                value="out"
                                checked
                                class=(FORM_RADIO_INPUT_STYLE);
                            label for="direction-out" class=(FORM_RADIO_LABEL_STYLE) { "Money out" }
                        }
                        div class="flex items-center gap-3" {
                            input
                                id="direction-in"
                                type="radio"
                                name="direction"
                                value="in"
                                class=(FORM_RADIO_INPUT_STYLE);
                            label for="direction-in" class=(FORM_RADIO_LABEL_STYLE) { "Money in" }
                        }
                    }
                }

                div class="flex items-center gap-2"
                {
                    input
                        id="active"
                        type="checkbox"
                        name="active"
                        checked
                        class=(FORM_RADIO_INPUT_STYLE);
                    label for="active" class=(FORM_LABEL_STYLE) { "Active" }
                }

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    " Create Recurring Transaction"
                }
            }
        }
    };

    base("New Recurring Transaction", &[dollar_input_styles()], &content)
}
