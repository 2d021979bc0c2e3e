//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A month was given in something other than the canonical "YYYY-MM"
    /// form, or with a month outside 1-12.
    #[error("\"{0}\" is not a valid month in YYYY-MM form")]
    InvalidMonthKey(String),

    /// A date string could not be parsed as a calendar date.
    #[error("\"{0}\" is not a valid date in YYYY-MM-DD form")]
    InvalidDate(String),

    /// A dollar amount from a form could not be parsed as a number.
    #[error("\"{0}\" is not a valid dollar amount")]
    InvalidAmount(String),

    /// An account balance was either not a number or negative.
    ///
    /// Carries the name of the account whose balance field failed so the
    /// client knows which row to fix.
    #[error("the balance given for \"{0}\" must be a non-negative number")]
    InvalidBalance(String),

    /// A category group sort order could not be parsed as an integer.
    #[error("\"{0}\" is not a valid sort order")]
    InvalidSortOrder(String),

    /// A recurring rule's day of month was outside 1-31.
    #[error("day of month must be between 1 and 31, got {0}")]
    InvalidDayOfMonth(String),

    /// An account type other than debit, credit, or investment was given.
    #[error("\"{0}\" is not a valid account type")]
    InvalidAccountType(String),

    /// A recurring rule direction other than "in" or "out" was given.
    #[error("\"{0}\" is not a valid direction")]
    InvalidDirection(String),

    /// A category group type other than "expense" or "income" was given.
    #[error("\"{0}\" is not a valid group type")]
    InvalidGroupType(String),

    /// A tag color that is not a "#RRGGBB" hex string was given.
    #[error("\"{0}\" is not a valid hex color")]
    InvalidTagColor(String),

    /// An empty string was used for an account name.
    #[error("account name cannot be empty")]
    EmptyAccountName,

    /// An empty string was used for a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// An empty string was used for a category group name.
    #[error("category group name cannot be empty")]
    EmptyGroupName,

    /// An empty string was used for a tag name.
    #[error("tag name cannot be empty")]
    EmptyTagName,

    /// An empty string was used for a recurring rule name.
    #[error("recurring rule name cannot be empty")]
    EmptyRuleName,

    /// A transaction or recurring rule was submitted without a category.
    #[error("a category is required")]
    MissingCategory,

    /// The specified category name already exists in the database.
    #[error("the category already exists in the database")]
    DuplicateCategoryName,

    /// The specified category group name already exists in the database.
    #[error("the category group already exists in the database")]
    DuplicateGroupName,

    /// The specified tag name already exists in the database.
    #[error("the tag already exists in the database")]
    DuplicateTagName,

    /// A recurring rule tried to materialize a second transaction for the
    /// same date.
    ///
    /// The materializer checks for an existing transaction before inserting,
    /// so this can only happen when two requests race; the unique index on
    /// (recurring_id, date) turns the race into this error instead of a
    /// duplicate row.
    #[error("a transaction for this recurring rule and date already exists")]
    DuplicateRecurringTransaction,

    /// Tried to delete a category that is referenced by a recurring rule.
    #[error("the category is in use by a recurring rule")]
    CategoryInUse,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to delete an account that does not exist
    #[error("tried to delete an account that is not in the database")]
    DeleteMissingAccount,

    /// Tried to update an account that does not exist
    #[error("tried to update an account that is not in the database")]
    UpdateMissingAccount,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// Tried to delete a category group that does not exist
    #[error("tried to delete a category group that is not in the database")]
    DeleteMissingGroup,

    /// Tried to delete a tag that does not exist
    #[error("tried to delete a tag that is not in the database")]
    DeleteMissingTag,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to delete a recurring rule that does not exist
    #[error("tried to delete a recurring rule that is not in the database")]
    DeleteMissingRule,

    /// Tried to update a recurring rule that does not exist
    #[error("tried to update a recurring rule that is not in the database")]
    UpdateMissingRule,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("category_group.name") =>
            {
                Error::DuplicateGroupName
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("category.name") =>
            {
                Error::DuplicateCategoryName
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("tag.name") =>
            {
                Error::DuplicateTagName
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("recurring_id") =>
            {
                Error::DuplicateRecurringTransaction
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::InvalidMonthKey(month) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid month".to_owned(),
                    details: format!("\"{month}\" is not a month in YYYY-MM form."),
                },
            ),
            Error::InvalidDate(date) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid date".to_owned(),
                    details: format!("\"{date}\" is not a date in YYYY-MM-DD form."),
                },
            ),
            Error::InvalidAmount(amount) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid amount".to_owned(),
                    details: format!("\"{amount}\" is not a number. Enter a dollar amount."),
                },
            ),
            Error::InvalidBalance(account_name) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid balance".to_owned(),
                    details: format!(
                        "The balance for {account_name} must be a non-negative number."
                    ),
                },
            ),
            Error::InvalidSortOrder(sort_order) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid sort order".to_owned(),
                    details: format!("\"{sort_order}\" is not a whole number."),
                },
            ),
            Error::InvalidDayOfMonth(day) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid day of month".to_owned(),
                    details: format!("\"{day}\" is not a day between 1 and 31."),
                },
            ),
            Error::InvalidAccountType(account_type) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid account type".to_owned(),
                    details: format!(
                        "\"{account_type}\" is not an account type. \
                        Choose debit, credit, or investment."
                    ),
                },
            ),
            Error::InvalidDirection(direction) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid direction".to_owned(),
                    details: format!(
                        "\"{direction}\" is not a direction. Choose money in or money out."
                    ),
                },
            ),
            Error::InvalidGroupType(group_type) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid group type".to_owned(),
                    details: format!(
                        "\"{group_type}\" is not a group type. Choose expense or income."
                    ),
                },
            ),
            Error::InvalidTagColor(color) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid tag color".to_owned(),
                    details: format!("\"{color}\" is not a hex color like #64748b."),
                },
            ),
            Error::EmptyAccountName => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Account name required".to_owned(),
                    details: "Enter a name for the account.".to_owned(),
                },
            ),
            Error::EmptyCategoryName => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Category name required".to_owned(),
                    details: "Enter a name for the category.".to_owned(),
                },
            ),
            Error::EmptyGroupName => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Group name required".to_owned(),
                    details: "Enter a name for the category group.".to_owned(),
                },
            ),
            Error::EmptyTagName => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Tag name required".to_owned(),
                    details: "Enter a name for the tag.".to_owned(),
                },
            ),
            Error::EmptyRuleName => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Rule name required".to_owned(),
                    details: "Enter a name for the recurring transaction.".to_owned(),
                },
            ),
            Error::MissingCategory => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Category required".to_owned(),
                    details: "Choose a category before saving.".to_owned(),
                },
            ),
            Error::DuplicateCategoryName => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Duplicate category name".to_owned(),
                    details: "A category with that name already exists. \
                    Choose a different name, or delete the existing category."
                        .to_owned(),
                },
            ),
            Error::DuplicateGroupName => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Duplicate group name".to_owned(),
                    details: "A category group with that name already exists. \
                    Choose a different name, or delete the existing group."
                        .to_owned(),
                },
            ),
            Error::DuplicateTagName => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Duplicate tag name".to_owned(),
                    details: "A tag with that name already exists. \
                    Choose a different name, or delete the existing tag."
                        .to_owned(),
                },
            ),
            Error::CategoryInUse => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Category in use".to_owned(),
                    details: "The category is used by a recurring transaction. \
                    Delete or re-categorize the recurring transaction first."
                        .to_owned(),
                },
            ),
            Error::DeleteMissingAccount => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete account".to_owned(),
                    details: "The account could not be found. \
                    Try refreshing the page to see if the account has already been deleted."
                        .to_owned(),
                },
            ),
            Error::UpdateMissingAccount => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update account".to_owned(),
                    details: "The account could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingCategory => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete category".to_owned(),
                    details: "The category could not be found. \
                    Try refreshing the page to see if the category has already been deleted."
                        .to_owned(),
                },
            ),
            Error::DeleteMissingGroup => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete group".to_owned(),
                    details: "The category group could not be found. \
                    Try refreshing the page to see if the group has already been deleted."
                        .to_owned(),
                },
            ),
            Error::DeleteMissingTag => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete tag".to_owned(),
                    details: "The tag could not be found. \
                    Try refreshing the page to see if the tag has already been deleted."
                        .to_owned(),
                },
            ),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete transaction".to_owned(),
                    details: "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted."
                        .to_owned(),
                },
            ),
            Error::DeleteMissingRule => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete recurring transaction".to_owned(),
                    details: "The recurring transaction could not be found. \
                    Try refreshing the page to see if it has already been deleted."
                        .to_owned(),
                },
            ),
            Error::UpdateMissingRule => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update recurring transaction".to_owned(),
                    details: "The recurring transaction could not be found.".to_owned(),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Not found".to_owned(),
                    details: "The requested resource could not be found. \
                    Try refreshing the page."
                        .to_owned(),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}
