//! Defines the route handler for the monthly budget editor.

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

use crate::{
    AppState, Error,
    category::CategoryId,
    endpoints,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, dollar_input_styles,
        format_currency, loading_spinner,
    },
    money::cents_to_dollars,
    month::MonthKey,
    navigation::NavBar,
    timezone::local_date_today,
};

use super::{
    breakdown::{CategoryBreakdownRow, category_breakdown},
    core::{get_budget_map, total_budget_for_month},
    rollover::{RolloverSuggestions, compute_rollover},
};

/// The state needed for the budgets page.
#[derive(Debug, Clone)]
pub struct BudgetsPageState {
    /// The database connection for reading budgets and spend.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for BudgetsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters accepted by the budgets page.
#[derive(Debug, Deserialize)]
pub struct BudgetsPageQuery {
    /// The month to edit, defaulting to the current month.
    month: Option<MonthKey>,
}

/// Render the budget editor for one month.
///
/// Every expense category gets a dollar field. Fields without a saved budget
/// are prefilled with the rollover suggestion from the previous month, which
/// only becomes real once saved.
pub async fn get_budgets_page(
    Query(query): Query<BudgetsPageQuery>,
    State(state): State<BudgetsPageState>,
) -> Result<Response, Error> {
    let month = match query.month {
        Some(month) => month,
        None => {
            let today = local_date_today(&state.local_timezone)
                .inspect_err(|_| tracing::error!("Invalid timezone {}", state.local_timezone))?;
            MonthKey::from_date(today)
        }
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let rows = category_breakdown(month, &connection)
        .inspect_err(|error| tracing::error!("could not get category breakdown: {error}"))?;
    let saved = get_budget_map(month, &connection)
        .inspect_err(|error| tracing::error!("could not get budgets: {error}"))?;
    let figures = compute_rollover(month, &connection)
        .inspect_err(|error| tracing::error!("could not compute rollover: {error}"))?;
    let total_cents = total_budget_for_month(month, &connection)
        .inspect_err(|error| tracing::error!("could not total budgets: {error}"))?;

    Ok(budgets_view(month, &rows, &saved, &figures, total_cents).into_response())
}

/// A human-readable month, e.g. "October 2025".
fn month_label(month: MonthKey) -> String {
    format!("{} {}", month.month(), month.year())
}

fn leftover_class(leftover_cents: i64) -> &'static str {
    if leftover_cents < 0 {
        "text-red-700 dark:text-red-300"
    } else {
        "text-green-700 dark:text-green-300"
    }
}

fn month_nav(month: MonthKey) -> Markup {
    let previous_url = format!("{}?month={}", endpoints::BUDGETS_VIEW, month.previous());
    let next_url = format!("{}?month={}", endpoints::BUDGETS_VIEW, month.next());

    html!(
        div class="flex items-center gap-4"
        {
            a
                href=(previous_url)
                class=(LINK_STYLE)
                aria-label="Previous month"
                data-month-nav="previous"
            {
                "←"
            }

            strong data-month-label=(month) { (month_label(month)) }

            a
                href=(next_url)
                class=(LINK_STYLE)
                aria-label="Next month"
                data-month-nav="next"
            {
                "→"
            }
        }
    )
}

fn budgets_view(
    month: MonthKey,
    rows: &[CategoryBreakdownRow],
    saved: &HashMap<CategoryId, i64>,
    figures: &RolloverSuggestions,
    total_cents: i64,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::BUDGETS_VIEW).into_html();
    let spinner = loading_spinner();
    let clear_confirm = format!(
        "Clear all budgets for {}? This cannot be undone.",
        month_label(month)
    );

    let table_row = |row: &CategoryBreakdownRow| {
        let saved_cents = saved.get(&row.category_id);
        let suggested_cents = figures.suggested_cents.get(&row.category_id);
        let prefill = saved_cents
            .or(suggested_cents)
            .map(|&cents| format!("{:.2}", cents_to_dollars(cents)));

        html!(
            tr class=(TABLE_ROW_STYLE) data-budget-row="true"
            {
                td class=(TABLE_CELL_STYLE)
                {
                    label for={ "cat_" (row.category_id) } { (row.name) }
                }

                td class="px-6 py-4 text-right tabular-nums"
                {
                    @if let Some(&leftover) = figures.rollover_cents.get(&row.category_id) {
                        span class=(leftover_class(leftover)) data-rollover="true"
                        {
                            (format_currency(leftover))
                        }
                    }
                }

                td class="px-6 py-4 text-right tabular-nums"
                {
                    (format_currency(row.spent_cents))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="input-wrapper"
                    {
                        input
                            type="number"
                            step="0.01"
                            min="0"
                            name={ "cat_" (row.category_id) }
                            id={ "cat_" (row.category_id) }
                            value=[prefill]
                            data-suggested[saved_cents.is_none() && suggested_cents.is_some()]
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

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-4xl"
            {
                header class="flex justify-between flex-wrap items-end gap-2"
                {
                    h1 class="text-xl font-bold" { "Budgets" }

                    (month_nav(month))
                }

                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    "Total budgeted: "
                    strong class="text-gray-900 dark:text-white" data-budget-total="true"
                    {
                        (format_currency(total_cents))
                    }
                }

                form
                    hx-post=(endpoints::POST_BUDGETS)
                    hx-target-error="#alert-container"
                {
                    input type="hidden" name="month" value=(month);

                    div class="overflow-x-auto dark:bg-gray-800"
                    {
                        table class="w-full text-sm text-left rtl:text-right
                            text-gray-500 dark:text-gray-400"
                        {
                            thead class=(TABLE_HEADER_STYLE)
                            {
                                tr
                                {
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                    th scope="col" class="px-6 py-4 text-right" { "Last Month Left" }
                                    th scope="col" class="px-6 py-4 text-right" { "Spent" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Budget" }
                                }
                            }

                            tbody
                            {
                                @for row in rows {
                                    (table_row(row))
                                }
                            }
                        }
                    }

                    p class="mt-2 text-xs text-gray-500 dark:text-gray-400"
                    {
                        "Suggested amounts carry last month's leftover forward. \
                        They only take effect once saved."
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

                            "Save Budgets"
                        }
                    }
                }

                form
                    hx-post=(endpoints::POST_BUDGETS)
                    hx-confirm=(clear_confirm)
                    hx-target-error="#alert-container"
                {
                    input type="hidden" name="month" value=(month);
                    input type="hidden" name="action" value="clear";

                    button type="submit" class=(BUTTON_DELETE_STYLE) { "Clear Month" }
                }
            }
        }
    );

    base("Budgets", &[dollar_input_styles()], &content)
}
