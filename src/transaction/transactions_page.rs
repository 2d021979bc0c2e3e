//! Defines the route handler for the page that lists recent transactions.

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
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        TAG_BADGE_STYLE, base, delete_action_button, format_currency,
    },
    navigation::NavBar,
    recurring::ensure_materialized,
    timezone::local_date_today,
    transaction::{TransactionListRow, recent_transactions},
};

/// The number of transactions shown on the listing page.
const MAX_LISTED_TRANSACTIONS: i64 = 200;

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the listing of recent transactions.
///
/// Recurring rules that are due are materialized first so the listing never
/// shows a month with its rent or salary missing.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
) -> Result<Response, Error> {
    let today = local_date_today(&state.local_timezone)
        .inspect_err(|_| tracing::error!("Invalid timezone {}", state.local_timezone))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let materialized = ensure_materialized(today, &connection)
        .inspect_err(|error| tracing::error!("could not materialize recurring rules: {error}"))?;

    if materialized > 0 {
        tracing::debug!("materialized {materialized} recurring transaction(s)");
    }

    let transactions = recent_transactions(MAX_LISTED_TRANSACTIONS, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    Ok(transactions_view(&transactions).into_response())
}

fn amount_class(amount_cents: i64) -> &'static str {
    if amount_cents < 0 {
        "text-red-700 dark:text-red-300"
    } else {
        "text-green-700 dark:text-green-300"
    }
}

fn delete_confirm_message(row: &TransactionListRow) -> String {
    let subject = if row.description.is_empty() {
        "this transaction".to_owned()
    } else {
        format!("the transaction '{}'", row.description)
    };

    format!("Are you sure you want to delete {subject}? This cannot be undone.")
}

fn tag_badges(row: &TransactionListRow) -> Markup {
    html!(
        @for tag in &row.tags {
            span
                class=(TAG_BADGE_STYLE)
                style={ "background-color: " (tag.color) }
            {
                (tag.name)
            }
        }
    )
}

fn transactions_view(transactions: &[TransactionListRow]) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let new_transaction_route = endpoints::NEW_TRANSACTION_VIEW;

    let table_row = |row: &TransactionListRow| {
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_TRANSACTION, row.id);
        let confirm_message = delete_confirm_message(row);

        html!(
            tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
            {
                td class=(TABLE_CELL_STYLE)
                {
                    time datetime=(row.date) { (row.date) }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (row.description)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (row.account_name)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    @if let Some(name) = &row.category_name {
                        (name)
                    } @else {
                        span class="text-gray-400 dark:text-gray-500" { "Uncategorized" }
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex flex-wrap gap-1"
                    {
                        (tag_badges(row))
                    }
                }

                td class={ "px-6 py-4 text-right tabular-nums " (amount_class(row.amount_cents)) }
                {
                    (format_currency(row.amount_cents))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (delete_action_button(
                            &delete_url,
                            &confirm_message,
                            "closest tr",
                            "delete",
                        ))
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(new_transaction_route) class=(LINK_STYLE)
                    {
                        "New Transaction"
                    }
                }

                (transactions_cards_view(transactions, new_transaction_route))

                section class="hidden lg:block dark:bg-gray-800 lg:max-w-5xl lg:w-full lg:mx-auto"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Account" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Tags" }
                                th scope="col" class="px-6 py-4 text-right" { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for row in transactions {
                                (table_row(row))
                            }

                            @if transactions.is_empty() {
                                tr
                                {
                                    td
                                        colspan="7"
                                        data-empty-state="true"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No transactions recorded yet. "
                                        a href=(new_transaction_route) class=(LINK_STYLE)
                                        {
                                            "Record your first transaction"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Transactions", &[], &content)
}

fn transactions_cards_view(
    transactions: &[TransactionListRow],
    new_transaction_route: &str,
) -> Markup {
    html!(
        ul class="lg:hidden space-y-4"
        {
            @for row in transactions {
                li class="rounded border border-gray-200 bg-white px-4 py-3 shadow-sm dark:border-gray-700 dark:bg-gray-800"
                    data-transaction-card="true"
                {
                    div class="flex items-start justify-between gap-3"
                    {
                        div
                        {
                            p class="font-medium text-gray-900 dark:text-white"
                            {
                                @if row.description.is_empty() {
                                    span class="text-gray-400 dark:text-gray-500" { "(no description)" }
                                } @else {
                                    (row.description)
                                }
                            }
                            p class="text-xs text-gray-500 dark:text-gray-400"
                            {
                                time datetime=(row.date) { (row.date) }
                                " · "
                                (row.account_name)
                            }
                        }

                        span class={ "text-sm tabular-nums " (amount_class(row.amount_cents)) }
                        {
                            (format_currency(row.amount_cents))
                        }
                    }

                    @if !row.tags.is_empty() {
                        div class="mt-2 flex flex-wrap gap-1"
                        {
                            (tag_badges(row))
                        }
                    }

                    div class="mt-2 flex items-center gap-4 text-sm"
                    {
                        (delete_action_button(
                            &endpoints::format_endpoint(endpoints::DELETE_TRANSACTION, row.id),
                            &delete_confirm_message(row),
                            "closest [data-transaction-card='true']",
                            "outerHTML",
                        ))
                    }
                }
            }

            @if transactions.is_empty() {
                li class="rounded border border-dashed border-gray-300 bg-white px-4 py-6 text-center text-sm text-gray-500 dark:border-gray-700 dark:bg-gray-800 dark:text-gray-400"
                {
                    "No transactions recorded yet. "
                    a href=(new_transaction_route) class=(LINK_STYLE)
                    {
                        "Record your first transaction"
                    }
                }
            }
        }
    )
}
