//! Defines the endpoint for deleting a category group.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    category::{CategoryGroupId, delete_category_group},
};

/// The state needed for deleting a category group.
#[derive(Debug, Clone)]
pub struct DeleteCategoryGroupState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCategoryGroupState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle group deletion. Member categories are un-grouped, not deleted.
pub async fn delete_category_group_endpoint(
    Path(group_id): Path<CategoryGroupId>,
    State(state): State<DeleteCategoryGroupState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_category_group(group_id, &connection) {
        Ok(_) => Alert::Success {
            message: "Group deleted successfully".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingGroup) => Error::DeleteMissingGroup.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting group {group_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
