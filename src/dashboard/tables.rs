//! Budget-versus-spend tables for the dashboard.

use maud::{Markup, html};

use crate::{
    budget::{CategoryBreakdownRow, GroupBreakdownRow},
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
    transaction::CategorySpend,
};

fn left_class(left_cents: i64) -> &'static str {
    if left_cents < 0 {
        "text-red-700 dark:text-red-300"
    } else {
        "text-green-700 dark:text-green-300"
    }
}

fn breakdown_table(heading: &str, row_key: &str, rows: &[(String, i64, i64)]) -> Markup {
    let first_column = if row_key == "group" { "Group" } else { "Category" };

    let table_row = |name: &str, budget_cents: i64, spent_cents: i64| {
        let left_cents = budget_cents - spent_cents;

        html!(
            tr class=(TABLE_ROW_STYLE) data-breakdown-row=(row_key)
            {
                td class=(TABLE_CELL_STYLE) { (name) }

                td class="px-6 py-4 text-right tabular-nums"
                {
                    (format_currency(budget_cents))
                }

                td class="px-6 py-4 text-right tabular-nums"
                {
                    (format_currency(spent_cents))
                }

                td class="px-6 py-4 text-right tabular-nums"
                {
                    span class=(left_class(left_cents)) data-left="true"
                    {
                        (format_currency(left_cents))
                    }
                }
            }
        )
    };

    html!(
        section
        {
            h3 class="text-xl font-semibold mb-4" { (heading) }

            div class="overflow-x-auto dark:bg-gray-800"
            {
                table class="w-full text-sm text-left rtl:text-right
                    text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { (first_column) }
                            th scope="col" class="px-6 py-4 text-right" { "Budget" }
                            th scope="col" class="px-6 py-4 text-right" { "Spent" }
                            th scope="col" class="px-6 py-4 text-right" { "Left" }
                        }
                    }

                    tbody
                    {
                        @for (name, budget_cents, spent_cents) in rows {
                            (table_row(name, *budget_cents, *spent_cents))
                        }
                    }
                }
            }
        }
    )
}

/// A table of budget versus spend per expense category, with the amount left
/// colored red when the category is over budget.
pub(super) fn category_breakdown_table(rows: &[CategoryBreakdownRow]) -> Markup {
    let rows: Vec<(String, i64, i64)> = rows
        .iter()
        .map(|row| (row.name.clone(), row.budget_cents, row.spent_cents))
        .collect();

    breakdown_table("Categories", "category", &rows)
}

/// A table of budget versus spend per category group, including the synthetic
/// ungrouped bucket.
pub(super) fn group_breakdown_table(rows: &[GroupBreakdownRow]) -> Markup {
    let rows: Vec<(String, i64, i64)> = rows
        .iter()
        .map(|row| (row.name.clone(), row.budget_cents, row.spent_cents))
        .collect();

    breakdown_table("Groups", "group", &rows)
}

/// A ranked list of the categories with the most spend over the selected
/// range. Renders a short hint instead when there is no spend at all.
pub(super) fn top_categories_view(entries: &[CategorySpend]) -> Markup {
    html!(
        section
        {
            h3 class="text-xl font-semibold mb-4" { "Top Spending" }

            @if entries.is_empty() {
                p class="text-sm text-gray-500 dark:text-gray-400" data-top-categories-empty="true"
                {
                    "No spending recorded for this range yet."
                }
            } @else {
                ol class="space-y-2"
                {
                    @for (index, entry) in entries.iter().enumerate() {
                        li
                            class="flex justify-between gap-4 text-sm text-gray-900 dark:text-white"
                            data-top-category=(entry.name)
                        {
                            span
                            {
                                span class="text-gray-500 dark:text-gray-400 mr-2"
                                {
                                    (index + 1) "."
                                }

                                (entry.name)
                            }

                            span class="tabular-nums" { (format_currency(entry.spent_cents)) }
                        }
                    }
                }
            }
        }
    )
}
