//! Dismissible alert messages for success and error feedback.
//!
//! Alerts are rendered as HTML fragments and swapped into the
//! `#alert-container` element that [crate::html::base] places at the bottom of
//! every page. Forms opt in with `hx-target-error="#alert-container"` so that
//! error responses land there instead of replacing the form.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

const SUCCESS_ALERT_STYLE: &str = "p-4 mb-4 rounded-lg border shadow-lg \
    text-green-800 bg-green-50 border-green-300 dark:bg-gray-800 \
    dark:text-green-400 dark:border-green-800";

const ERROR_ALERT_STYLE: &str = "p-4 mb-4 rounded-lg border shadow-lg \
    text-red-800 bg-red-50 border-red-300 dark:bg-gray-800 dark:text-red-400 \
    dark:border-red-800";

const DISMISS_BUTTON_STYLE: &str = "ms-auto -mx-1.5 -my-1.5 rounded-lg p-1.5 \
    inline-flex items-center justify-center h-8 w-8 bg-transparent \
    hover:bg-gray-200 dark:hover:bg-gray-700 cursor-pointer";

/// A message to display to the client in the alert container.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// The operation succeeded.
    Success { message: String },
    /// The operation failed, with detail on how to fix it.
    Error { message: String, details: String },
}

impl Alert {
    /// Render the alert as an HTML fragment for the alert container.
    ///
    /// The dismiss button is wired up by the click handler in
    /// `static/app.js`.
    pub fn into_html(self) -> Markup {
        let (style, message, details) = match self {
            Alert::Success { message } => (SUCCESS_ALERT_STYLE, message, String::new()),
            Alert::Error { message, details } => (ERROR_ALERT_STYLE, message, details),
        };

        html! {
            div class=(style) role="alert"
            {
                div class="flex items-center gap-3"
                {
                    p class="font-medium" { (message) }

                    button
                        type="button"
                        class=(DISMISS_BUTTON_STYLE)
                        data-dismiss-alert
                        aria-label="Dismiss"
                    {
                        "\u{2715}"
                    }
                }

                @if !details.is_empty()
                {
                    p class="mt-1 text-sm" { (details) }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
