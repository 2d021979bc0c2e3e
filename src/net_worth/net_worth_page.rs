//! Defines the route handler for the net worth page.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    account::{Account, AccountId, get_all_accounts},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, dollar_input_styles,
        format_currency, loading_spinner,
    },
    money::cents_to_dollars,
    navigation::NavBar,
    timezone::local_date_today,
};

use super::core::{
    NetWorthPoint, NetWorthSummary, get_balances_for_date, net_worth_history, net_worth_summary,
};

/// The state needed for the net worth page.
#[derive(Debug, Clone)]
pub struct NetWorthPageState {
    /// The database connection for reading accounts and balance snapshots.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for NetWorthPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters accepted by the net worth page.
#[derive(Debug, Deserialize)]
pub struct NetWorthPageQuery {
    /// The snapshot date to edit, defaulting to today.
    as_of: Option<Date>,
}

/// Render the net worth page for one snapshot date.
///
/// Every account gets a dollar field prefilled with its balance on that
/// date, followed by the net worth history across all snapshot dates.
pub async fn get_net_worth_page(
    Query(query): Query<NetWorthPageQuery>,
    State(state): State<NetWorthPageState>,
) -> Result<Response, Error> {
    let as_of = match query.as_of {
        Some(as_of) => as_of,
        None => local_date_today(&state.local_timezone)
            .inspect_err(|_| tracing::error!("Invalid timezone {}", state.local_timezone))?,
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let accounts = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("could not get all accounts: {error}"))?;
    let balances = get_balances_for_date(as_of, &connection)
        .inspect_err(|error| tracing::error!("could not get balances: {error}"))?;
    let summary = net_worth_summary(as_of, &connection)
        .inspect_err(|error| tracing::error!("could not get net worth summary: {error}"))?;
    let history = net_worth_history(&connection)
        .inspect_err(|error| tracing::error!("could not get net worth history: {error}"))?;

    Ok(net_worth_view(as_of, &accounts, &balances, summary, &history).into_response())
}

fn net_class(net_cents: i64) -> &'static str {
    if net_cents < 0 {
        "text-xl font-bold tabular-nums text-red-700 dark:text-red-300"
    } else {
        "text-xl font-bold tabular-nums text-green-700 dark:text-green-300"
    }
}

fn summary_cards(summary: NetWorthSummary) -> Markup {
    let stat_card = |label: &str, key: &str, figure: Markup| {
        html!(
            div class="p-4 rounded-lg bg-gray-50 dark:bg-gray-800" data-stat=(key)
            {
                p class="text-sm text-gray-500 dark:text-gray-400" { (label) }

                (figure)
            }
        )
    };

    let plain = |cents: i64| {
        html!(
            p class="text-xl font-bold tabular-nums" { (format_currency(cents)) }
        )
    };
    let net = html!(
        p class=(net_class(summary.net_cents)) { (format_currency(summary.net_cents)) }
    );

    html!(
        section class="grid grid-cols-1 sm:grid-cols-3 gap-4"
        {
            (stat_card("Assets", "assets", plain(summary.assets_cents)))
            (stat_card("Liabilities", "liabilities", plain(summary.liabilities_cents)))
            (stat_card("Net Worth", "net", net))
        }
    )
}

fn date_picker(as_of: Date) -> Markup {
    html!(
        form
            method="get"
            action=(endpoints::NET_WORTH_VIEW)
            class="flex items-end gap-2"
        {
            div
            {
                label for="as_of" class=(FORM_LABEL_STYLE) { "As of" }

                input
                    type="date"
                    name="as_of"
                    id="as_of"
                    value=(as_of)
                    class="block p-2.5 rounded text-sm text-gray-900 dark:text-white
                        bg-gray-50 dark:bg-gray-700 border border-gray-300
                        dark:border-gray-600 focus:ring-blue-600 focus:border-blue-600";
            }

            button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Go" }
        }
    )
}

fn balances_table(accounts: &[Account], balances: &HashMap<AccountId, i64>) -> Markup {
    let table_row = |account: &Account| {
        let prefill = balances
            .get(&account.id)
            .map(|&cents| format!("{:.2}", cents_to_dollars(cents)));

        html!(
            tr class=(TABLE_ROW_STYLE) data-balance-row="true"
            {
                td class=(TABLE_CELL_STYLE)
                {
                    label for={ "acct_" (account.id) } { (account.name) }
                }

                td class="px-6 py-4 capitalize"
                {
                    (account.account_type)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="input-wrapper"
                    {
                        input
                            type="number"
                            step="0.01"
                            min="0"
                            name={ "acct_" (account.id) }
                            id={ "acct_" (account.id) }
                            value=[prefill]
                            // w-full needed to ensure input takes the full width when prefilled with a value
                            class="block w-full min-w-28 p-2.5 rounded text-sm text-right
                                tabular-nums text-gray-900 dark:text-white bg-gray-50
                                dark:bg-gray-700 border border-gray-300 dark:border-gray-600
                                focus:ring-blue-600 focus:border-blue-600";
                    }
                }
            }
        )
    };

    html!(
        div class="overflow-x-auto dark:bg-gray-800"
        {
            table class="w-full text-sm text-left rtl:text-right
                text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Account" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Balance" }
                    }
                }

                tbody
                {
                    @for account in accounts {
                        (table_row(account))
                    }
                }
            }
        }
    )
}

fn history_table(history: &[NetWorthPoint]) -> Markup {
    html!(
        section class="space-y-2"
        {
            h2 class="text-lg font-bold" { "History" }

            @if history.is_empty() {
                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    "No snapshots yet. Save balances above to start tracking."
                }
            } @else {
                div class="overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class="px-6 py-4 text-right" { "Assets" }
                                th scope="col" class="px-6 py-4 text-right" { "Liabilities" }
                                th scope="col" class="px-6 py-4 text-right" { "Net Worth" }
                            }
                        }

                        tbody
                        {
                            @for point in history {
                                tr class=(TABLE_ROW_STYLE) data-history-row="true"
                                {
                                    td class=(TABLE_CELL_STYLE)
                                    {
                                        time datetime=(point.as_of) { (point.as_of) }
                                    }

                                    td class="px-6 py-4 text-right tabular-nums"
                                    {
                                        (format_currency(point.assets_cents))
                                    }

                                    td class="px-6 py-4 text-right tabular-nums"
                                    {
                                        (format_currency(point.liabilities_cents))
                                    }

                                    td class="px-6 py-4 text-right tabular-nums"
                                    {
                                        (format_currency(point.net_cents))
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    )
}

fn net_worth_view(
    as_of: Date,
    accounts: &[Account],
    balances: &HashMap<AccountId, i64>,
    summary: NetWorthSummary,
    history: &[NetWorthPoint],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::NET_WORTH_VIEW).into_html();
    let spinner = loading_spinner();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-4xl"
            {
                header class="flex justify-between flex-wrap items-end gap-2"
                {
                    h1 class="text-xl font-bold" { "Net Worth" }

                    (date_picker(as_of))
                }

                (summary_cards(summary))

                form
                    hx-post=(endpoints::POST_NET_WORTH)
                    hx-target-error="#alert-container"
                {
                    input type="hidden" name="as_of" value=(as_of);

                    (balances_table(accounts, balances))

                    p class="mt-2 text-xs text-gray-500 dark:text-gray-400"
                    {
                        "Accounts without a balance for this date count as zero. \
                        Blank fields are left unchanged."
                    }

                    div class="mt-4 lg:max-w-xs"
                    {
                        button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                        {
                            span
                                id="indicator"
                                class="inline htmx-indicator"
                            {
                                (spinner)
                            }

                            "Save Balances"
                        }
                    }
                }

                (history_table(history))
            }
        }
    );

    base("Net Worth", &[dollar_input_styles()], &content)
}

#[cfg(test)]
mod net_worth_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use rusqlite::Connection;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        account::{AccountType, create_account},
        db::initialize,
        endpoints,
        net_worth::{net_worth_page::NetWorthPageQuery, upsert_balance},
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
    };

    use super::{NetWorthPageState, get_net_worth_page};

    fn get_test_state() -> NetWorthPageState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");

        NetWorthPageState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn halloween_query() -> Query<NetWorthPageQuery> {
        Query(NetWorthPageQuery {
            as_of: Some(date!(2025 - 10 - 31)),
        })
    }

    #[tokio::test]
    async fn shows_an_input_for_every_account() {
        let state = get_test_state();
        create_account("Visa", AccountType::Credit, &state.db_connection.lock().unwrap()).unwrap();

        let response = get_net_worth_page(halloween_query(), State(state))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let selector = Selector::parse("input[name^='acct_']").unwrap();
        assert_eq!(html.select(&selector).count(), 2);

        let form = Selector::parse("form[hx-post]").unwrap();
        let balances_form = html.select(&form).next().expect("no balances form");
        assert_eq!(
            balances_form.value().attr("hx-post"),
            Some(endpoints::POST_NET_WORTH)
        );
    }

    #[tokio::test]
    async fn posts_the_date_it_is_editing() {
        let state = get_test_state();

        let response = get_net_worth_page(halloween_query(), State(state))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let selector = Selector::parse("form[hx-post] input[name='as_of']").unwrap();
        let date_input = html.select(&selector).next().expect("no as_of input");

        assert_eq!(date_input.value().attr("value"), Some("2025-10-31"));
        assert_eq!(date_input.value().attr("type"), Some("hidden"));
    }

    #[tokio::test]
    async fn prefills_saved_balances() {
        let state = get_test_state();
        upsert_balance(
            1,
            date!(2025 - 10 - 31),
            500_000,
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = get_net_worth_page(halloween_query(), State(state))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let selector = Selector::parse("input[name='acct_1']").unwrap();
        let input = html.select(&selector).next().expect("no My Debit input");

        assert_eq!(input.value().attr("value"), Some("5000.00"));
    }

    #[tokio::test]
    async fn balances_from_other_dates_are_not_prefilled() {
        let state = get_test_state();
        upsert_balance(
            1,
            date!(2025 - 09 - 30),
            500_000,
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = get_net_worth_page(halloween_query(), State(state))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let selector = Selector::parse("input[name='acct_1']").unwrap();
        let input = html.select(&selector).next().expect("no My Debit input");

        assert_eq!(input.value().attr("value"), None);
    }

    #[tokio::test]
    async fn summarizes_assets_liabilities_and_net() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            let visa = create_account("Visa", AccountType::Credit, &connection).unwrap();

            upsert_balance(1, date!(2025 - 10 - 31), 500_000, &connection).unwrap();
            upsert_balance(visa.id, date!(2025 - 10 - 31), 120_000, &connection).unwrap();
        }

        let response = get_net_worth_page(halloween_query(), State(state))
            .await
            .unwrap();

        let html = parse_html_document(response).await;

        let stat_text = |key: &str| {
            let selector = Selector::parse(&format!("div[data-stat='{key}'] p + p")).unwrap();
            html.select(&selector)
                .next()
                .unwrap_or_else(|| panic!("no {key} card"))
                .text()
                .collect::<String>()
                .trim()
                .to_owned()
        };

        assert_eq!(stat_text("assets"), "$5,000.00");
        assert_eq!(stat_text("liabilities"), "$1,200.00");
        assert_eq!(stat_text("net"), "$3,800.00");
    }

    #[tokio::test]
    async fn history_lists_every_snapshot_date_in_order() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            upsert_balance(1, date!(2025 - 10 - 31), 500_000, &connection).unwrap();
            upsert_balance(1, date!(2025 - 09 - 30), 400_000, &connection).unwrap();
        }

        let response = get_net_worth_page(halloween_query(), State(state))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let selector = Selector::parse("tr[data-history-row='true'] time").unwrap();
        let dates: Vec<String> = html
            .select(&selector)
            .map(|element| element.text().collect::<String>().trim().to_owned())
            .collect();

        assert_eq!(dates, vec!["2025-09-30", "2025-10-31"]);
    }

    #[tokio::test]
    async fn empty_history_shows_a_hint_instead_of_a_table() {
        let state = get_test_state();

        let response = get_net_worth_page(halloween_query(), State(state))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let selector = Selector::parse("tr[data-history-row='true']").unwrap();
        assert_eq!(html.select(&selector).count(), 0);
    }

    #[tokio::test]
    async fn date_picker_targets_the_net_worth_page() {
        let state = get_test_state();

        let response = get_net_worth_page(halloween_query(), State(state))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let selector = Selector::parse("form[method='get']").unwrap();
        let picker = html.select(&selector).next().expect("no date picker form");

        assert_eq!(
            picker.value().attr("action"),
            Some(endpoints::NET_WORTH_VIEW)
        );

        let date_input = Selector::parse("input[type='date'][name='as_of']").unwrap();
        let input = picker.select(&date_input).next().expect("no date input");
        assert_eq!(input.value().attr("value"), Some("2025-10-31"));
    }
}
