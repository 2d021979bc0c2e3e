//! Defines the route handler for the page that lists recurring transactions.

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
        base, delete_action_button, format_currency,
    },
    navigation::NavBar,
    recurring::{RuleWithNames, get_rules_with_names},
};

/// The state needed for the recurring transactions page.
#[derive(Debug, Clone)]
pub struct RecurringPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RecurringPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the listing of recurring transactions, ordered by the day of the
/// month they land on.
pub async fn get_recurring_page(
    State(state): State<RecurringPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let rules = get_rules_with_names(&connection)
        .inspect_err(|error| tracing::error!("could not get recurring rules: {error}"))?;

    Ok(recurring_view(&rules).into_response())
}

fn amount_class(amount_cents: i64) -> &'static str {
    if amount_cents < 0 {
        "text-red-700 dark:text-red-300"
    } else {
        "text-green-700 dark:text-green-300"
    }
}

fn delete_confirm_message(row: &RuleWithNames) -> String {
    format!(
        "Are you sure you want to delete '{}'? Transactions it has already created will be kept.",
        row.rule.name
    )
}

fn status_badge(active: bool) -> Markup {
    html!(
        @if active {
            span class="inline-flex items-center rounded-full bg-green-100 px-2.5 py-0.5
                text-xs font-medium text-green-800 dark:bg-green-900 dark:text-green-300"
                data-rule-status="active"
            {
                "Active"
            }
        } @else {
            span class="inline-flex items-center rounded-full bg-gray-100 px-2.5 py-0.5
                text-xs font-medium text-gray-800 dark:bg-gray-700 dark:text-gray-300"
                data-rule-status="paused"
            {
                "Paused"
            }
        }
    )
}

/// A button that flips a rule between active and paused. The server responds
/// with a redirect back to this page so the row re-renders.
fn toggle_button(row: &RuleWithNames) -> Markup {
    let toggle_url = endpoints::format_endpoint(endpoints::TOGGLE_RECURRING, row.rule.id);
    let label = if row.rule.active { "Pause" } else { "Resume" };

    html!(
        button
            type="button"
            class=(LINK_STYLE)
            hx-post=(toggle_url)
            hx-target-error="#alert-container"
        {
            (label)
        }
    )
}

fn recurring_view(rules: &[RuleWithNames]) -> Markup {
    let nav_bar = NavBar::new(endpoints::RECURRING_VIEW).into_html();
    let new_recurring_route = endpoints::NEW_RECURRING_VIEW;

    let table_row = |row: &RuleWithNames| {
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_RECURRING, row.rule.id);
        let confirm_message = delete_confirm_message(row);
        let signed_cents = row.rule.direction.signed_cents(row.rule.amount_cents);

        html!(
            tr class=(TABLE_ROW_STYLE) data-recurring-row="true"
            {
                td class=(TABLE_CELL_STYLE)
                {
                    (row.rule.day_of_month)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (row.rule.name)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (row.account_name)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (row.category_name)
                }

                td class={ "px-6 py-4 text-right tabular-nums " (amount_class(signed_cents)) }
                {
                    (format_currency(signed_cents))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (status_badge(row.rule.active))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (toggle_button(row))

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
                    h1 class="text-xl font-bold" { "Recurring Transactions" }

                    a href=(new_recurring_route) class=(LINK_STYLE)
                    {
                        "New Recurring Transaction"
                    }
                }

                (recurring_cards_view(rules, new_recurring_route))

                section class="hidden lg:block dark:bg-gray-800 lg:max-w-5xl lg:w-full lg:mx-auto"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Day" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Account" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class="px-6 py-4 text-right" { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for row in rules {
                                (table_row(row))
                            }

                            @if rules.is_empty() {
                                tr
                                {
                                    td
                                        colspan="7"
                                        data-empty-state="true"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No recurring transactions yet. "
                                        a href=(new_recurring_route) class=(LINK_STYLE)
                                        {
                                            "Set up your first recurring transaction"
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

    base("Recurring Transactions", &[], &content)
}

fn recurring_cards_view(rules: &[RuleWithNames], new_recurring_route: &str) -> Markup {
    html!(
        ul class="lg:hidden space-y-4"
        {
            @for row in rules {
                @let signed_cents = row.rule.direction.signed_cents(row.rule.amount_cents);

                li class="rounded border border-gray-200 bg-white px-4 py-3 shadow-sm dark:border-gray-700 dark:bg-gray-800"
                    data-recurring-card="true"
                {
                    div class="flex items-start justify-between gap-3"
                    {
                        div
                        {
                            p class="font-medium text-gray-900 dark:text-white"
                            {
                                (row.rule.name)
                            }
                            p class="text-xs text-gray-500 dark:text-gray-400"
                            {
                                "Day " (row.rule.day_of_month)
                                " · "
                                (row.account_name)
                                " · "
                                (row.category_name)
                            }
                        }

                        span class={ "text-sm tabular-nums " (amount_class(signed_cents)) }
                        {
                            (format_currency(signed_cents))
                        }
                    }

                    div class="mt-2"
                    {
                        (status_badge(row.rule.active))
                    }

                    div class="mt-2 flex items-center gap-4 text-sm"
                    {
                        (toggle_button(row))

                        (delete_action_button(
                            &endpoints::format_endpoint(endpoints::DELETE_RECURRING, row.rule.id),
                            &delete_confirm_message(row),
                            "closest [data-recurring-card='true']",
                            "outerHTML",
                        ))
                    }
                }
            }

            @if rules.is_empty() {
                li class="rounded border border-dashed border-gray-300 bg-white px-4 py-6 text-center text-sm text-gray-500 dark:border-gray-700 dark:bg-gray-800 dark:text-gray-400"
                {
                    "No recurring transactions yet. "
                    a href=(new_recurring_route) class=(LINK_STYLE)
                    {
                        "Set up your first recurring transaction"
                    }
                }
            }
        }
    )
}
