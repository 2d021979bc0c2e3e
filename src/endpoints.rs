//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/accounts/{account_id}/edit', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page with the monthly summary, budget breakdown and trends.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for displaying recent transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page for viewing and editing a month's category budgets.
pub const BUDGETS_VIEW: &str = "/budgets";
/// The page for listing recurring transactions.
pub const RECURRING_VIEW: &str = "/recurring";
/// The page for creating a new recurring transaction.
pub const NEW_RECURRING_VIEW: &str = "/recurring/new";
/// The page for listing all accounts.
pub const ACCOUNTS_VIEW: &str = "/accounts";
/// The page for creating a new account.
pub const NEW_ACCOUNT_VIEW: &str = "/accounts/new";
/// The page for editing an existing account.
pub const EDIT_ACCOUNT_VIEW: &str = "/accounts/{account_id}/edit";
/// The page for managing categories and category groups.
pub const CATEGORIES_VIEW: &str = "/categories";
/// The page for listing all tags.
pub const TAGS_VIEW: &str = "/tags";
/// The page for creating a new tag.
pub const NEW_TAG_VIEW: &str = "/tags/new";
/// The page for recording balances and viewing net worth history.
pub const NET_WORTH_VIEW: &str = "/net-worth";
/// The page for app settings such as the annual salary.
pub const SETTINGS_VIEW: &str = "/settings";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";
/// The route to create a transaction.
pub const POST_TRANSACTION: &str = "/api/transactions";
/// The route to delete a transaction.
pub const DELETE_TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to save a month's budgets.
pub const POST_BUDGETS: &str = "/api/budgets";
/// The route to create a recurring transaction.
pub const POST_RECURRING: &str = "/api/recurring";
/// The route to toggle a recurring transaction between active and paused.
pub const TOGGLE_RECURRING: &str = "/api/recurring/{rule_id}/toggle";
/// The route to delete a recurring transaction.
pub const DELETE_RECURRING: &str = "/api/recurring/{rule_id}";
/// The route to create an account.
pub const POST_ACCOUNT: &str = "/api/accounts";
/// The route to update an account.
pub const PUT_ACCOUNT: &str = "/api/accounts/{account_id}";
/// The route to delete an account.
pub const DELETE_ACCOUNT: &str = "/api/accounts/{account_id}";
/// The route to create a category.
pub const POST_CATEGORY: &str = "/api/categories";
/// The route to delete a category.
pub const DELETE_CATEGORY: &str = "/api/categories/{category_id}";
/// The route to assign a category to a group, or clear its group.
pub const SET_CATEGORY_GROUP: &str = "/api/categories/{category_id}/group";
/// The route to create a category group.
pub const POST_CATEGORY_GROUP: &str = "/api/category-groups";
/// The route to delete a category group.
pub const DELETE_CATEGORY_GROUP: &str = "/api/category-groups/{group_id}";
/// The route to create a tag.
pub const POST_TAG: &str = "/api/tags";
/// The route to delete a tag.
pub const DELETE_TAG: &str = "/api/tags/{tag_id}";
/// The route to record account balances as of a date.
pub const POST_NET_WORTH: &str = "/api/net-worth";
/// The route to update the app settings.
pub const POST_SETTINGS: &str = "/api/settings";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/accounts/{account_id}/edit',
/// '{account_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
