//! Application router configuration.

use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    account::{
        create_account_endpoint, delete_account_endpoint, get_accounts_page,
        get_create_account_page, get_edit_account_page, update_account_endpoint,
    },
    budget::{get_budgets_page, save_budgets_endpoint},
    category::{
        create_category_endpoint, create_category_group_endpoint, delete_category_endpoint,
        delete_category_group_endpoint, get_categories_page, set_category_group_endpoint,
    },
    dashboard::get_dashboard_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    net_worth::{get_net_worth_page, save_balances_endpoint},
    not_found::get_404_not_found,
    recurring::{
        create_recurring_endpoint, delete_recurring_endpoint, get_new_recurring_page,
        get_recurring_page, toggle_recurring_endpoint,
    },
    settings::{get_settings_page, update_settings_endpoint},
    tag::{create_tag_endpoint, delete_tag_endpoint, get_new_tag_page, get_tags_page},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_new_transaction_page,
        get_transactions_page,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let pages = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_new_transaction_page),
        )
        .route(endpoints::BUDGETS_VIEW, get(get_budgets_page))
        .route(endpoints::RECURRING_VIEW, get(get_recurring_page))
        .route(endpoints::NEW_RECURRING_VIEW, get(get_new_recurring_page))
        .route(endpoints::ACCOUNTS_VIEW, get(get_accounts_page))
        .route(endpoints::NEW_ACCOUNT_VIEW, get(get_create_account_page))
        .route(endpoints::EDIT_ACCOUNT_VIEW, get(get_edit_account_page))
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
        .route(endpoints::TAGS_VIEW, get(get_tags_page))
        .route(endpoints::NEW_TAG_VIEW, get(get_new_tag_page))
        .route(endpoints::NET_WORTH_VIEW, get(get_net_worth_page))
        .route(endpoints::SETTINGS_VIEW, get(get_settings_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .route(endpoints::COFFEE, get(get_coffee));

    let api = Router::new()
        .route(
            endpoints::POST_TRANSACTION,
            post(create_transaction_endpoint),
        )
        .route(
            endpoints::DELETE_TRANSACTION,
            delete(delete_transaction_endpoint),
        )
        .route(endpoints::POST_BUDGETS, post(save_budgets_endpoint))
        .route(endpoints::POST_RECURRING, post(create_recurring_endpoint))
        .route(endpoints::TOGGLE_RECURRING, post(toggle_recurring_endpoint))
        .route(
            endpoints::DELETE_RECURRING,
            delete(delete_recurring_endpoint),
        )
        .route(endpoints::POST_ACCOUNT, post(create_account_endpoint))
        .route(endpoints::PUT_ACCOUNT, put(update_account_endpoint))
        .route(endpoints::DELETE_ACCOUNT, delete(delete_account_endpoint))
        .route(endpoints::POST_CATEGORY, post(create_category_endpoint))
        .route(endpoints::DELETE_CATEGORY, delete(delete_category_endpoint))
        .route(
            endpoints::SET_CATEGORY_GROUP,
            post(set_category_group_endpoint),
        )
        .route(
            endpoints::POST_CATEGORY_GROUP,
            post(create_category_group_endpoint),
        )
        .route(
            endpoints::DELETE_CATEGORY_GROUP,
            delete(delete_category_group_endpoint),
        )
        .route(endpoints::POST_TAG, post(create_tag_endpoint))
        .route(endpoints::DELETE_TAG, delete(delete_tag_endpoint))
        .route(endpoints::POST_NET_WORTH, post(save_balances_endpoint))
        .route(endpoints::POST_SETTINGS, post(update_settings_endpoint));

    pages
        .merge(api)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, Html("I'm a teapot")).into_response()
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
