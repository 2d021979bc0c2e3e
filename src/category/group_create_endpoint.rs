//! Defines the endpoint for creating a category group.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    category::{GroupType, create_category_group},
    endpoints,
};

/// The state needed to create a category group.
#[derive(Debug, Clone)]
pub struct CreateCategoryGroupState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryGroupState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating a category group.
#[derive(Debug, Deserialize)]
pub struct CategoryGroupForm {
    pub name: String,
    pub group_type: String,
    #[serde(default)]
    pub sort_order: String,
}

/// Handle group creation from the inline form on the categories page,
/// redirects back to the categories view on success.
pub async fn create_category_group_endpoint(
    State(state): State<CreateCategoryGroupState>,
    Form(form): Form<CategoryGroupForm>,
) -> Response {
    let group_type = match form.group_type.parse::<GroupType>() {
        Ok(group_type) => group_type,
        Err(error) => return error.into_alert_response(),
    };

    let sort_order = form.sort_order.trim();
    let sort_order = if sort_order.is_empty() {
        None
    } else {
        match sort_order.parse::<i64>() {
            Ok(sort_order) => Some(sort_order),
            Err(_) => {
                return Error::InvalidSortOrder(form.sort_order.clone()).into_alert_response();
            }
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_category_group(&form.name, group_type, sort_order, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ (Error::EmptyGroupName | Error::DuplicateGroupName)) => {
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while creating a category group: {error}"
            );
            error.into_alert_response()
        }
    }
}
