//! Defines the route handler for the dashboard.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    budget::{
        CategoryBreakdownRow, GroupBreakdownRow, category_breakdown, group_breakdown,
        total_budget_for_month,
    },
    endpoints,
    html::{HeadElement, PAGE_CONTAINER_STYLE, base},
    month::MonthKey,
    navigation::NavBar,
    projection::{daily_cap, pro_rata},
    recurring::ensure_materialized,
    settings::get_salary,
    timezone::local_date_today,
    transaction::{
        CategorySpend, month_summary, monthly_totals, moving_average_3, top_spend_categories,
    },
};

use super::{
    cards::{SummaryFigures, summary_cards_view},
    charts::{DashboardChart, charts_script, charts_view, trend_chart},
    range::TrendRange,
    tables::{category_breakdown_table, group_breakdown_table, top_categories_view},
};

/// How many categories the top spending list shows.
const TOP_CATEGORY_COUNT: i64 = 5;

/// The state needed for the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions and budgets.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters accepted by the dashboard.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// The trend range key, defaulting to the current month.
    range: Option<String>,
}

/// Render an overview of the current month: headline figures, budget versus
/// spend breakdowns, the spending trend, and the biggest spending categories.
///
/// Recurring rules that fell due are materialized first, so the figures
/// include transactions that became due since the last visit.
pub async fn get_dashboard_page(
    Query(query): Query<DashboardQuery>,
    State(state): State<DashboardState>,
) -> Result<Response, Error> {
    let today = local_date_today(&state.local_timezone)
        .inspect_err(|_| tracing::error!("Invalid timezone {}", state.local_timezone))?;
    let current = MonthKey::from_date(today);
    let range = TrendRange::from_key(query.range.as_deref());
    let start = range.start_month(current);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    ensure_materialized(today, &connection)
        .inspect_err(|error| tracing::error!("could not materialize recurring rules: {error}"))?;

    let summary = month_summary(current, &connection)
        .inspect_err(|error| tracing::error!("could not summarize the month: {error}"))?;
    let salary_annual_cents = get_salary(&connection)
        .inspect_err(|error| tracing::error!("could not get salary: {error}"))?;
    let total_budget_cents = total_budget_for_month(current, &connection)
        .inspect_err(|error| tracing::error!("could not total budgets: {error}"))?;

    // A month with no recorded income yet shows one twelfth of the annual
    // salary so the savings figure stays meaningful early in the month.
    let salary_monthly_cents = salary_annual_cents / 12;
    let (income_cents, income_is_salary_estimate) =
        if summary.income_cents == 0 && salary_monthly_cents > 0 {
            (salary_monthly_cents, true)
        } else {
            (summary.income_cents, false)
        };

    let projection = pro_rata(total_budget_cents, today);
    let figures = SummaryFigures {
        income_cents,
        income_is_salary_estimate,
        total_budget_cents,
        spent_cents: summary.spend_cents,
        target_cents: projection.target_cents_floor(),
        variance_cents: projection.variance_cents(summary.spend_cents),
        daily_cap_cents: daily_cap(total_budget_cents, summary.spend_cents, today),
        savings_cents: income_cents - summary.spend_cents,
    };

    let categories = category_breakdown(current, &connection)
        .inspect_err(|error| tracing::error!("could not get category breakdown: {error}"))?;
    let groups = group_breakdown(current, &connection)
        .inspect_err(|error| tracing::error!("could not get group breakdown: {error}"))?;
    let trend = monthly_totals(start, current, &connection)
        .inspect_err(|error| tracing::error!("could not get monthly totals: {error}"))?;
    let top_categories = top_spend_categories(start, current, TOP_CATEGORY_COUNT, &connection)
        .inspect_err(|error| tracing::error!("could not get top categories: {error}"))?;

    let spend: Vec<i64> = trend.iter().map(|total| total.spend_cents).collect();
    let charts = [DashboardChart {
        id: "trend-chart",
        options: trend_chart(&trend, &moving_average_3(&spend)).to_string(),
    }];

    Ok(dashboard_view(
        current,
        range,
        &figures,
        &categories,
        &groups,
        &charts,
        &top_categories,
    )
    .into_response())
}

/// A human-readable month, e.g. "October 2025".
fn month_label(month: MonthKey) -> String {
    format!("{} {}", month.month(), month.year())
}

/// Links that switch the trend range, with the active one highlighted.
fn range_selector(current: TrendRange) -> Markup {
    let link_class = |is_current: bool| -> &'static str {
        if is_current {
            "px-3 py-1.5 rounded text-sm font-semibold bg-blue-700 text-white"
        } else {
            "px-3 py-1.5 rounded text-sm font-semibold text-gray-600
            hover:bg-gray-100 dark:text-gray-300 dark:hover:bg-gray-700"
        }
    };

    html!(
        nav class="flex gap-1" aria-label="Trend range"
        {
            @for option in TrendRange::all() {
                a
                    href={ (endpoints::DASHBOARD_VIEW) "?range=" (option.key()) }
                    class=(link_class(option == current))
                    data-range=(option.key())
                    aria-current=[(option == current).then_some("page")]
                {
                    (option.label())
                }
            }
        }
    )
}

fn dashboard_view(
    month: MonthKey,
    range: TrendRange,
    figures: &SummaryFigures,
    categories: &[CategoryBreakdownRow],
    groups: &[GroupBreakdownRow],
    charts: &[DashboardChart],
    top_categories: &[CategorySpend],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full max-w-screen-xl"
            {
                header class="flex justify-between flex-wrap items-end gap-2"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { "Dashboard" }

                        p
                            class="text-sm text-gray-500 dark:text-gray-400"
                            data-month-label=(month)
                        {
                            (month_label(month))
                        }
                    }

                    (range_selector(range))
                }

                (summary_cards_view(figures))

                (charts_view(charts))

                div class="grid grid-cols-1 xl:grid-cols-2 gap-8"
                {
                    (category_breakdown_table(categories))
                    (group_breakdown_table(groups))
                }

                (top_categories_view(top_categories))
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(charts),
    ];

    base("Dashboard", &scripts, &content)
}
