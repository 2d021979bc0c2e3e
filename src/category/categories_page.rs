//! Displays categories and category groups, with inline management forms.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{Category, CategoryGroup, get_all_categories, get_all_category_groups},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, delete_action_button,
    },
    navigation::NavBar,
};

/// The state needed for the categories page.
#[derive(Debug, Clone)]
pub struct CategoriesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoriesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the categories page: all categories with their group assignments,
/// all groups, and the forms for creating both.
pub async fn get_categories_page(
    State(state): State<CategoriesPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("could not get all categories: {error}"))?;
    let groups = get_all_category_groups(&connection)
        .inspect_err(|error| tracing::error!("could not get all category groups: {error}"))?;

    Ok(categories_view(&categories, &groups).into_response())
}

fn categories_view(categories: &[Category], groups: &[CategoryGroup]) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Categories" }
                }

                (categories_table(categories, groups))

                (new_category_form())
            }

            section class="space-y-4 mt-10"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h2 class="text-xl font-bold" { "Groups" }
                }

                (groups_table(groups))

                (new_group_form())
            }
        }
    );

    base("Categories", &[], &content)
}

fn categories_table(categories: &[Category], groups: &[CategoryGroup]) -> Markup {
    let table_row = |category: &Category| {
        let delete_url = format_endpoint(endpoints::DELETE_CATEGORY, category.id);
        let confirm_message = format!(
            "Are you sure you want to delete '{}'? \
            Transactions keep their history but lose this category.",
            category.name
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    (category.name)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (group_select(category, groups))
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

    html!(
        section class="w-full overflow-x-auto dark:bg-gray-800 lg:max-w-5xl lg:mx-auto"
        {
            table class="w-full text-sm text-left rtl:text-right
                text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Group" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for category in categories {
                        (table_row(category))
                    }

                    @if categories.is_empty() {
                        tr
                        {
                            td
                                colspan="3"
                                class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                            {
                                "No categories yet. Add one below."
                            }
                        }
                    }
                }
            }
        }
    )
}

fn group_select(category: &Category, groups: &[CategoryGroup]) -> Markup {
    let set_group_url = format_endpoint(endpoints::SET_CATEGORY_GROUP, category.id);

    html!(
        select
            name="group_id"
            aria-label={ "Group for " (category.name) }
            hx-post=(set_group_url)
            hx-trigger="change"
            hx-swap="none"
            hx-target-error="#alert-container"
            class=(FORM_TEXT_INPUT_STYLE)
        {
            @if category.group_id.is_none() {
                option value="" selected { "No group" }
            } @else {
                option value="" { "No group" }
            }

            @for group in groups {
                @if category.group_id == Some(group.id) {
                    option value=(group.id) selected { (group.name) }
                } @else {
                    option value=(group.id) { (group.name) }
                }
            }
        }
    )
}

fn new_category_form() -> Markup {
    html!(
        form
            hx-post=(endpoints::POST_CATEGORY)
            hx-target-error="#alert-container"
            class="flex flex-wrap items-end gap-4"
        {
            div
            {
                label for="category-name" class=(FORM_LABEL_STYLE) { "New Category" }

                input
                    id="category-name"
                    type="text"
                    name="name"
                    placeholder="Category Name"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Category" }
        }
    )
}

fn groups_table(groups: &[CategoryGroup]) -> Markup {
    let table_row = |group: &CategoryGroup| {
        let delete_url = format_endpoint(endpoints::DELETE_CATEGORY_GROUP, group.id);
        let confirm_message = format!(
            "Are you sure you want to delete '{}'? Its categories will be ungrouped.",
            group.name
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    (group.name)
                }

                td class="px-6 py-4 capitalize" { (group.group_type) }

                td class=(TABLE_CELL_STYLE)
                {
                    @if let Some(sort_order) = group.sort_order {
                        (sort_order)
                    } @else {
                        "-"
                    }
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

    html!(
        section class="w-full overflow-x-auto dark:bg-gray-800 lg:max-w-5xl lg:mx-auto"
        {
            table class="w-full text-sm text-left rtl:text-right
                text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Sort Order" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for group in groups {
                        (table_row(group))
                    }

                    @if groups.is_empty() {
                        tr
                        {
                            td
                                colspan="4"
                                class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                            {
                                "No groups yet. Groups bundle categories together \
                                on the dashboard."
                            }
                        }
                    }
                }
            }
        }
    )
}

fn new_group_form() -> Markup {
    html!(
        form
            hx-post=(endpoints::POST_CATEGORY_GROUP)
            hx-target-error="#alert-container"
            class="flex flex-wrap items-end gap-4"
        {
            div
            {
                label for="group-name" class=(FORM_LABEL_STYLE) { "New Group" }

                input
                    id="group-name"
                    type="text"
                    name="name"
                    placeholder="Group Name"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="group-type" class=(FORM_LABEL_STYLE) { "Type" }

                select
                    id="group-type"
                    name="group_type"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="expense" selected { "Expense" }
                    option value="income" { "Income" }
                }
            }

            div
            {
                label for="group-sort-order" class=(FORM_LABEL_STYLE) { "Sort Order" }

                input
                    id="group-sort-order"
                    type="number"
                    name="sort_order"
                    placeholder="1"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Group" }
        }
    )
}
