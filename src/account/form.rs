//! Form fields shared by the create and edit account pages.

use maud::{Markup, html};

use crate::html::{
    FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
    FORM_TEXT_INPUT_STYLE,
};

/// Renders the name input and account type radio group.
///
/// `selected_type` should be one of `debit`, `credit` or `investment` and
/// controls which radio button starts checked.
pub fn account_form_fields(name: &str, selected_type: &str) -> Markup {
    html! {
        div {
            label for="name" class=(FORM_LABEL_STYLE) { "Name" }
            input
                type="text"
                name="name"
                id="name"
                value=(name)
                class=(FORM_TEXT_INPUT_STYLE)
                placeholder="Everyday Checking"
                required
                autofocus;
        }

        fieldset {
            legend class=(FORM_LABEL_STYLE) { "Type" }
            div class=(FORM_RADIO_GROUP_STYLE) {
                div class="flex items-center gap-3" {
                    input
                        id="type-debit"
                        type="radio"
                        name="account_type"
                        value="debit"
                        checked[selected_type == "debit"]
                        class=(FORM_RADIO_INPUT_STYLE);
                    label for="type-debit" class=(FORM_RADIO_LABEL_STYLE) { "Debit" }
                }
                div class="flex items-center gap-3" {
                    input
                        id="type-credit"
                        type="radio"
                        name="account_type"
                        value="credit"
                        checked[selected_type == "credit"]
                        class=(FORM_RADIO_INPUT_STYLE);
                    label for="type-credit" class=(FORM_RADIO_LABEL_STYLE) { "Credit" }
                }
                div class="flex items-center gap-3" {
                    input
                        id="type-investment"
                        type="radio"
                        name="account_type"
                        value="investment"
                        checked[selected_type == "investment"]
                        class=(FORM_RADIO_INPUT_STYLE);
                    label for="type-investment" class=(FORM_RADIO_LABEL_STYLE) { "Investment" }
                }
            }
        }
    }
}
