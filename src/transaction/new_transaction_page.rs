//! Defines the route handler for the page for recording a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

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
    tag::{Tag, get_all_tags},
    timezone::local_date_today,
};

/// The state needed for the new transaction page.
#[derive(Debug, Clone)]
pub struct NewTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for accounts, categories and tags.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for NewTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for recording a transaction.
pub async fn get_new_transaction_page(
    State(state): State<NewTransactionPageState>,
) -> Result<Response, Error> {
    let (accounts, categories, tags) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        (
            get_all_accounts(&connection).inspect_err(|error| {
                tracing::error!("Failed to retrieve accounts for new transaction page: {error}")
            })?,
            get_all_categories(&connection).inspect_err(|error| {
                tracing::error!("Failed to retrieve categories for new transaction page: {error}")
            })?,
            get_all_tags(&connection).inspect_err(|error| {
                tracing::error!("Failed to retrieve tags for new transaction page: {error}")
            })?,
        )
    };

    if accounts.is_empty() {
        return Ok(no_accounts_view().into_response());
    }

    let today = local_date_today(&state.local_timezone)
        .inspect_err(|_| tracing::error!("Invalid timezone {}", state.local_timezone))?;

    Ok(new_transaction_view(today, &accounts, &categories, &tags).into_response())
}

/// Shown instead of the form when there is nothing to attach a transaction to.
fn no_accounts_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold" { "New Transaction" }

            p class="mt-4 text-gray-500 dark:text-gray-400"
            {
                "Transactions need an account to belong to. "
                (link(endpoints::NEW_ACCOUNT_VIEW, "Add your first account"))
                " to get started."
            }
        }
    };

    base("New Transaction", &[], &content)
}

fn new_transaction_view(
    today: Date,
    accounts: &[Account],
    categories: &[Category],
    tags: &[Tag],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();
    let spinner = loading_spinner();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::POST_TRANSACTION)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Transaction" }

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
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                    input
                        name="date"
                        id="date"
                        type="date"
                        max=(today)
                        value=(today)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                    input
                        name="description"
                        id="description"
                        type="text"
                        placeholder="Description"
                        class=(FORM_TEXT_INPUT_STYLE);
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
                            autofocus
                            class=(FORM_TEXT_INPUT_STYLE);
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

                @if !tags.is_empty() {
                    fieldset {
                        legend class=(FORM_LABEL_STYLE) { "Tags" }
                        div class="flex flex-wrap gap-3" {
                            @for tag in tags {
                                div class="flex items-center gap-2" {
                                    input
                                        id={ "tag-" (tag.id) }
                                        type="checkbox"
                                        name="tag_ids"
                                        value=(tag.id)
                                        class=(FORM_RADIO_INPUT_STYLE);
                                    label for={ "tag-" (tag.id) } class=(FORM_RADIO_LABEL_STYLE)
                                    {
                                        (tag.name)
                                    }
                                }
                            }
                        }
                    }
                }

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    " Create Transaction"
                }
            }
        }
    };

    base("New Transaction", &[dollar_input_styles()], &content)
}

#[cfg(test)]
mod view_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use scraper::Selector;
    use time::OffsetDateTime;

    use crate::{
        db::initialize,
        endpoints,
        tag::{TagColor, TagName, create_tag},
        test_utils::{
            assert_form_input, assert_form_input_with_value, assert_form_submit_button,
            assert_hx_endpoint, assert_status_ok, assert_valid_html, must_get_form,
            parse_html_document,
        },
        transaction::{get_new_transaction_page, new_transaction_page::NewTransactionPageState},
    };

    fn get_test_state() -> NewTransactionPageState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");

        NewTransactionPageState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn renders_form_with_expected_inputs() {
        let state = get_test_state();
        let today = OffsetDateTime::now_utc().date().to_string();

        let response = get_new_transaction_page(State(state)).await.unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_TRANSACTION, "hx-post");
        assert_form_input(&form, "amount", "number");
        assert_form_input_with_value(&form, "date", "date", &today);
        assert_form_submit_button(&form);
    }

    #[tokio::test]
    async fn date_input_is_capped_at_today() {
        let state = get_test_state();
        let today = OffsetDateTime::now_utc().date().to_string();

        let response = get_new_transaction_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        let selector = Selector::parse("input[name=date]").unwrap();
        let input = html.select(&selector).next().expect("no date input");

        assert_eq!(input.value().attr("max"), Some(today.as_str()));
    }

    #[tokio::test]
    async fn amount_input_uses_cent_steps() {
        let state = get_test_state();

        let response = get_new_transaction_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        let selector = Selector::parse("input[name=amount]").unwrap();
        let input = html.select(&selector).next().expect("no amount input");

        assert_eq!(input.value().attr("step"), Some("0.01"));
        assert_eq!(input.value().attr("min"), Some("0"));
    }

    #[tokio::test]
    async fn account_select_lists_the_seeded_account() {
        let state = get_test_state();

        let response = get_new_transaction_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        let selector = Selector::parse("select[name=account_id] option").unwrap();
        let options: Vec<_> = html.select(&selector).collect();

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].value().attr("value"), Some("1"));
        assert_eq!(options[0].text().collect::<String>(), "My Debit");
    }

    #[tokio::test]
    async fn category_select_has_placeholder_and_default_categories() {
        let state = get_test_state();

        let response = get_new_transaction_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        let selector = Selector::parse("select[name=category_id] option").unwrap();
        let options: Vec<_> = html.select(&selector).collect();

        // The placeholder plus the nine seeded categories.
        assert_eq!(options.len(), 10);
        assert_eq!(options[0].value().attr("value"), Some(""));
    }

    #[tokio::test]
    async fn direction_radios_default_to_money_out() {
        let state = get_test_state();

        let response = get_new_transaction_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        let selector = Selector::parse("input[type=radio][name=direction]").unwrap();
        for input in html.select(&selector) {
            let value = input.value().attr("value").unwrap_or_default();
            let checked = input.value().attr("checked").is_some();

            assert_eq!(checked, value == "out", "radio {value} checked state was wrong");
        }
    }

    #[tokio::test]
    async fn tags_render_as_checkboxes_when_present() {
        let state = get_test_state();
        create_tag(
            TagName::new_unchecked("Holiday"),
            TagColor::default(),
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test tag");

        let response = get_new_transaction_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        let selector = Selector::parse("input[type=checkbox][name=tag_ids]").unwrap();
        let checkboxes: Vec<_> = html.select(&selector).collect();

        assert_eq!(checkboxes.len(), 1);
        assert_eq!(checkboxes[0].value().attr("value"), Some("1"));
    }

    #[tokio::test]
    async fn prompts_for_an_account_when_none_exist() {
        let state = get_test_state();
        state
            .db_connection
            .lock()
            .unwrap()
            .execute("DELETE FROM account", ())
            .unwrap();

        let response = get_new_transaction_page(State(state)).await.unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        let selector = scraper::Selector::parse("form").unwrap();
        assert!(html.select(&selector).next().is_none(), "want no form");

        let link_selector = scraper::Selector::parse("p a").unwrap();
        let link = html.select(&link_selector).next().expect("no account link");
        assert_eq!(link.value().attr("href"), Some(endpoints::NEW_ACCOUNT_VIEW));
    }
}
