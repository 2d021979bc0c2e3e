//! The 500 page shown when an unexpected error occurs.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// The content of the 500 error page.
pub struct InternalServerError<'a> {
    /// A short summary of what went wrong.
    pub description: &'a str,
    /// A hint for the reader on what to do next.
    pub fix: &'a str,
}

impl Default for InternalServerError<'_> {
    fn default() -> Self {
        Self {
            description: "Sorry, something went wrong.",
            fix: "Try again later or check the server logs",
        }
    }
}

impl IntoResponse for InternalServerError<'_> {
    fn into_response(self) -> Response {
        let page = error_view("Internal Server Error", "500", self.description, self.fix);

        (StatusCode::INTERNAL_SERVER_ERROR, Html(page.into_string())).into_response()
    }
}

/// A route handler that renders the 500 error page.
pub async fn get_internal_server_error_page() -> Response {
    InternalServerError::default().into_response()
}
