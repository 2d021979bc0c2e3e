//! Defines the endpoint for deleting a category.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    category::{CategoryId, delete_category},
};

/// The state needed for deleting a category.
#[derive(Debug, Clone)]
pub struct DeleteCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle category deletion. Returns a success alert or error.
///
/// Deletion is refused while a recurring rule references the category, since
/// silently dropping the reference would change what the rule materializes.
pub async fn delete_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<DeleteCategoryState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_category(category_id, &connection) {
        Ok(_) => Alert::Success {
            message: "Category deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error @ (Error::CategoryInUse | Error::DeleteMissingCategory)) => {
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting category {category_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_category_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;

    use crate::{
        category::{create_category, delete_category_endpoint},
        db::initialize,
        test_utils::{assert_valid_html, parse_html_fragment},
    };

    use super::DeleteCategoryState;

    fn get_delete_category_state() -> DeleteCategoryState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        DeleteCategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn delete_category_endpoint_succeeds() {
        let state = get_delete_category_state();
        let category = create_category("Pets", &state.db_connection.lock().unwrap())
            .expect("Could not create test category");

        let response = delete_category_endpoint(Path(category.id), State(state))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn delete_category_in_use_by_rule_returns_error() {
        let state = get_delete_category_state();
        let category_id = {
            let connection = state.db_connection.lock().unwrap();
            let category =
                create_category("Pets", &connection).expect("Could not create test category");
            connection
                .execute(
                    "INSERT INTO recurring
                        (name, account_id, category_id, amount_cents, day_of_month, direction)
                    VALUES ('Pet insurance', 1, ?1, 2500, 1, 'out')",
                    [category.id],
                )
                .unwrap();
            category.id
        };

        let response = delete_category_endpoint(Path(category_id), State(state))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);

        let p = scraper::Selector::parse("p").unwrap();
        let message = html
            .select(&p)
            .next()
            .expect("No alert message found")
            .text()
            .collect::<String>();
        assert_eq!(message.trim(), "Category in use");
    }

    #[tokio::test]
    async fn delete_category_endpoint_with_invalid_id_returns_not_found() {
        let state = get_delete_category_state();

        let response = delete_category_endpoint(Path(999999), State(state))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
