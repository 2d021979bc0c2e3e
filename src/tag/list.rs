//! Tags listing page.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

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
        TAG_BADGE_STYLE, base, delete_action_button,
    },
    navigation::NavBar,
    tag::{Tag, TagId, get_all_tags},
};

/// The state needed for the tags listing page.
#[derive(Debug, Clone)]
pub struct TagsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TagsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A tag with its transaction count for template rendering.
#[derive(Debug, Clone)]
struct TagListRow {
    pub tag: Tag,
    pub transaction_count: u32,
}

/// Render the tags listing page with transaction counts.
pub async fn get_tags_page(State(state): State<TagsPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let tags = get_all_tags(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve tags: {error}"))?;

    let transactions_per_tag = count_transactions_per_tag(&connection)
        .inspect_err(|error| tracing::error!("Could not count transactions per tag: {error}"))?;

    let rows = tags
        .into_iter()
        .map(|tag| {
            let transaction_count = *transactions_per_tag.get(&tag.id).unwrap_or(&0);

            TagListRow {
                tag,
                transaction_count,
            }
        })
        .collect::<Vec<_>>();

    Ok(tags_view(&rows).into_response())
}

fn count_transactions_per_tag(connection: &Connection) -> Result<HashMap<TagId, u32>, Error> {
    let result: Result<HashMap<TagId, u32>, rusqlite::Error> = connection
        .prepare("SELECT tag_id, COUNT(1) FROM transaction_tag GROUP BY tag_id")?
        .query_map((), |row| {
            let tag_id = row.get(0)?;
            let count = row.get(1)?;

            Ok((tag_id, count))
        })?
        .collect();

    result.map_err(Error::from)
}

fn tag_badge(name: &str, color: &str) -> Markup {
    html!(
        span class=(TAG_BADGE_STYLE) style={ "background-color: " (color) }
        {
            (name)
        }
    )
}

fn delete_confirm_message(row: &TagListRow) -> String {
    format!(
        "Are you sure you want to delete '{}'? This will remove it from {} transaction(s).",
        row.tag.name, row.transaction_count
    )
}

fn tags_view(tags: &[TagListRow]) -> Markup {
    let new_tag_route = endpoints::NEW_TAG_VIEW;
    let nav_bar = NavBar::new(endpoints::TAGS_VIEW).into_html();

    let table_row = |row: &TagListRow| {
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_TAG, row.tag.id);
        let confirm_message = delete_confirm_message(row);

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    (tag_badge(row.tag.name.as_ref(), row.tag.color.as_ref()))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (row.transaction_count)
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
                    h1 class="text-xl font-bold" { "Tags" }

                    a href=(new_tag_route) class=(LINK_STYLE)
                    {
                        "Create Tag"
                    }
                }

                (tags_cards_view(tags, new_tag_route))

                section class="hidden lg:block dark:bg-gray-800 lg:max-w-5xl lg:w-full lg:mx-auto"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Name"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Transactions"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Actions"
                                }
                            }
                        }

                        tbody
                        {
                            @for row in tags {
                                (table_row(row))
                            }

                            @if tags.is_empty() {
                                tr
                                {
                                    td
                                        colspan="3"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No tags created yet. "
                                        a href=(new_tag_route) class=(LINK_STYLE)
                                        {
                                            "Create your first tag"
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

    base("Tags", &[], &content)
}

fn tags_cards_view(tags: &[TagListRow], new_tag_route: &str) -> Markup {
    struct TagCardView<'a> {
        tag_name: &'a str,
        tag_color: &'a str,
        transaction_count: u32,
        delete_url: String,
        confirm_message: String,
    }

    let cards = tags
        .iter()
        .map(|row| TagCardView {
            tag_name: row.tag.name.as_ref(),
            tag_color: row.tag.color.as_ref(),
            transaction_count: row.transaction_count,
            delete_url: endpoints::format_endpoint(endpoints::DELETE_TAG, row.tag.id),
            confirm_message: delete_confirm_message(row),
        })
        .collect::<Vec<_>>();

    html!(
        ul class="lg:hidden space-y-4"
        {
            @for card in &cards {
                li class="rounded border border-gray-200 bg-white px-4 py-3 shadow-sm dark:border-gray-700 dark:bg-gray-800"
                    data-tag-card="true"
                {
                    div class="flex items-start justify-between gap-3"
                    {
                        (tag_badge(card.tag_name, card.tag_color))
                        span class="text-sm tabular-nums text-gray-900 dark:text-white"
                        { (card.transaction_count) }
                    }

                    div class="mt-2 flex items-center gap-4 text-sm"
                    {
                        (delete_action_button(
                            &card.delete_url,
                            &card.confirm_message,
                            "closest [data-tag-card='true']",
                            "outerHTML",
                        ))
                    }
                }
            }

            @if cards.is_empty() {
                li class="rounded border border-dashed border-gray-300 bg-white px-4 py-6 text-center text-sm text-gray-500 dark:border-gray-700 dark:bg-gray-800 dark:text-gray-400"
                {
                    "No tags created yet. "
                    a href=(new_tag_route) class=(LINK_STYLE)
                    {
                        "Create your first tag"
                    }
                }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        db::initialize,
        tag::{
            TagColor, TagName, create_tag, get_tags_page,
            list::{TagsPageState, count_transactions_per_tag},
        },
        test_utils::{assert_valid_html, parse_html_document},
    };

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    #[test]
    fn test_counts_transactions_per_tag() {
        let connection = get_test_db_connection();
        let tag1 = create_tag(
            TagName::new_unchecked("foo"),
            TagColor::default(),
            &connection,
        )
        .expect("Could not create test tag");
        let tag2 = create_tag(
            TagName::new_unchecked("bar"),
            TagColor::default(),
            &connection,
        )
        .expect("Could not create test tag");
        let want_tag1_count = 2;
        let want_tag2_count = 3;

        let mut transaction_id = 0;
        let mut insert_tagged_transaction = |tag_id: i64| {
            transaction_id += 1;
            connection
                .execute(
                    "INSERT INTO \"transaction\" (id, account_id, date, description, amount_cents)
                    VALUES (?1, 1, '2025-01-15', 'test', -100)",
                    [transaction_id],
                )
                .unwrap();
            connection
                .execute(
                    "INSERT INTO transaction_tag (transaction_id, tag_id) VALUES (?1, ?2)",
                    [transaction_id, tag_id],
                )
                .unwrap();
        };

        for _ in 0..want_tag1_count {
            insert_tagged_transaction(tag1.id);
        }
        for _ in 0..want_tag2_count {
            insert_tagged_transaction(tag2.id);
        }

        let counts = count_transactions_per_tag(&connection).unwrap();

        assert_eq!(want_tag1_count, counts[&tag1.id]);
        assert_eq!(want_tag2_count, counts[&tag2.id]);
    }

    #[tokio::test]
    async fn page_renders_tag_badges_with_color() {
        let connection = get_test_db_connection();
        create_tag(
            TagName::new_unchecked("Holiday"),
            TagColor::new_unchecked("#ff0088"),
            &connection,
        )
        .expect("Could not create test tag");
        let state = TagsPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_tags_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let selector = Selector::parse("tbody span[style]").unwrap();
        let badge = html.select(&selector).next().expect("no tag badge found");

        assert_eq!(badge.text().collect::<String>().trim(), "Holiday");
        assert_eq!(
            badge.value().attr("style"),
            Some("background-color: #ff0088")
        );
    }
}
