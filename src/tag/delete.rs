//! Tag deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    tag::{TagId, db::delete_tag},
};

/// The state needed for deleting a tag.
#[derive(Debug, Clone)]
pub struct DeleteTagEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTagEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle tag deletion. Returns success alert or error.
pub async fn delete_tag_endpoint(
    Path(tag_id): Path<TagId>,
    State(state): State<DeleteTagEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_tag(tag_id, &connection) {
        Ok(_) => Alert::Success {
            message: "Tag deleted successfully".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingTag) => Error::DeleteMissingTag.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while deleting tag {tag_id}: {error}");
            error.into_alert_response()
        }
    }
}
