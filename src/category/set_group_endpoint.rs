//! Defines the endpoint for assigning a category to a group.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::Alert,
    category::{CategoryGroupId, CategoryId, set_category_group},
};

/// The state needed to assign a category to a group.
#[derive(Debug, Clone)]
pub struct SetCategoryGroupState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SetCategoryGroupState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for group assignment. An empty `group_id` un-groups the
/// category.
#[derive(Debug, Deserialize)]
pub struct SetGroupForm {
    #[serde(default)]
    pub group_id: String,
}

/// Handle the group select on the categories page.
pub async fn set_category_group_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<SetCategoryGroupState>,
    Form(form): Form<SetGroupForm>,
) -> Response {
    let group_id = form.group_id.trim();
    let group_id = if group_id.is_empty() {
        None
    } else {
        match group_id.parse::<CategoryGroupId>() {
            Ok(id) => Some(id),
            Err(_) => return Error::NotFound.into_alert_response(),
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match set_category_group(category_id, group_id, &connection) {
        Ok(_) => Alert::Success {
            message: "Category group updated".to_owned(),
        }
        .into_response(),
        Err(Error::NotFound) => Error::NotFound.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while setting the group \
                for category {category_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod set_category_group_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;

    use crate::{
        category::{
            GroupType, create_category, create_category_group, get_category,
            set_category_group_endpoint,
        },
        db::initialize,
    };

    use super::{SetCategoryGroupState, SetGroupForm};

    fn get_set_group_state() -> SetCategoryGroupState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        SetCategoryGroupState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn assigns_category_to_group() {
        let state = get_set_group_state();
        let (category_id, group_id) = {
            let connection = state.db_connection.lock().unwrap();
            let category =
                create_category("Pets", &connection).expect("Could not create test category");
            let group = create_category_group("Essentials", GroupType::Expense, None, &connection)
                .expect("Could not create test group");
            (category.id, group.id)
        };
        let form = SetGroupForm {
            group_id: group_id.to_string(),
        };

        let response =
            set_category_group_endpoint(Path(category_id), State(state.clone()), Form(form))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let category = get_category(category_id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(category.group_id, Some(group_id));
    }

    #[tokio::test]
    async fn empty_group_id_ungroups_category() {
        let state = get_set_group_state();
        let category_id = {
            let connection = state.db_connection.lock().unwrap();
            let category =
                create_category("Pets", &connection).expect("Could not create test category");
            let group = create_category_group("Essentials", GroupType::Expense, None, &connection)
                .expect("Could not create test group");
            crate::category::set_category_group(category.id, Some(group.id), &connection)
                .expect("Could not assign group");
            category.id
        };
        let form = SetGroupForm {
            group_id: "".to_owned(),
        };

        let response =
            set_category_group_endpoint(Path(category_id), State(state.clone()), Form(form))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let category = get_category(category_id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(category.group_id, None);
    }

    #[tokio::test]
    async fn invalid_category_id_returns_not_found() {
        let state = get_set_group_state();
        let form = SetGroupForm {
            group_id: "".to_owned(),
        };

        let response = set_category_group_endpoint(Path(999999), State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
