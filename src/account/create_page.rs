//! Defines the route handler for the page for creating an account.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

use crate::{
    account::account_form_fields,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
};

/// Renders the page for creating an account.
pub async fn get_create_account_page() -> Response {
    new_account_view().into_response()
}

fn new_account_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_ACCOUNT_VIEW).into_html();
    let form = new_account_form_view("");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Add Account", &[], &content)
}

pub(super) fn new_account_form_view(error_message: &str) -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_ACCOUNT)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            (account_form_fields("", "debit"))

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Account" }
        }
    }
}

#[cfg(test)]
mod new_account_page_tests {
    use axum::http::StatusCode;

    use crate::{
        account::get_create_account_page,
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            must_get_form, parse_html_document,
        },
    };

    #[tokio::test]
    async fn render_page() {
        let response = get_create_account_page().await;

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_ACCOUNT, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_submit_button(&form);
    }

    #[tokio::test]
    async fn form_has_account_type_radios() {
        let response = get_create_account_page().await;

        let html = parse_html_document(response).await;
        let selector = scraper::Selector::parse("input[type=radio][name=account_type]").unwrap();
        let values: Vec<&str> = html
            .select(&selector)
            .filter_map(|input| input.value().attr("value"))
            .collect();

        assert_eq!(values, vec!["debit", "credit", "investment"]);
    }
}
