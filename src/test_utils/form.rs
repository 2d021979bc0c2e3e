use scraper::{ElementRef, Html, Selector};

#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    html.select(&Selector::parse("form").unwrap())
        .next()
        .expect("page has no form")
}

#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    let got = form
        .value()
        .attr(attribute)
        .unwrap_or_else(|| panic!("form has no {attribute} attribute"));

    assert_eq!(
        got, endpoint,
        "want form with {attribute}=\"{endpoint}\", got {got:?}"
    );
}

#[track_caller]
fn find_input<'a>(form: &ElementRef<'a>, name: &str) -> ElementRef<'a> {
    form.select(&Selector::parse("input").unwrap())
        .find(|input| input.value().attr("name") == Some(name))
        .unwrap_or_else(|| panic!("form has no input named \"{name}\""))
}

#[track_caller]
fn check_input(input: &ElementRef<'_>, name: &str, type_: &str, value: Option<&str>) {
    let got_type = input.value().attr("type").unwrap_or_default();
    assert_eq!(
        got_type, type_,
        "want input \"{name}\" with type \"{type_}\", got {got_type:?}"
    );

    if let Some(want_value) = value {
        let got_value = input.value().attr("value").unwrap_or_default();
        assert_eq!(
            got_value, want_value,
            "want input \"{name}\" with value \"{want_value}\", got {got_value:?}"
        );
    }

    assert!(
        input.value().attr("required").is_some(),
        "want input \"{name}\" to be marked required"
    );
}

#[track_caller]
pub(crate) fn assert_form_input(form: &ElementRef<'_>, name: &str, type_: &str) {
    check_input(&find_input(form, name), name, type_, None);
}

#[track_caller]
pub(crate) fn assert_form_input_with_value(
    form: &ElementRef<'_>,
    name: &str,
    type_: &str,
    value: &str,
) {
    check_input(&find_input(form, name), name, type_, Some(value));
}

#[track_caller]
fn must_get_submit_button<'a>(form: &ElementRef<'a>) -> ElementRef<'a> {
    let button = form
        .select(&Selector::parse("button").unwrap())
        .next()
        .expect("form has no button");

    assert_eq!(
        button.value().attr("type").unwrap_or_default(),
        "submit",
        "want button with type=\"submit\""
    );

    button
}

#[track_caller]
pub(crate) fn assert_form_submit_button(form: &ElementRef<'_>) {
    must_get_submit_button(form);
}

#[track_caller]
pub(crate) fn assert_form_submit_button_with_text(form: &ElementRef<'_>, text: &str) {
    let button = must_get_submit_button(form);
    let got_text = button.text().collect::<String>();

    assert_eq!(text, got_text.trim());
}

#[track_caller]
pub(crate) fn assert_form_error_message(form: &ElementRef<'_>, want_error_message: &str) {
    let message = form
        .select(&Selector::parse("p").unwrap())
        .next()
        .expect("form has no error message")
        .text()
        .collect::<String>();

    assert_eq!(want_error_message, message.trim());
}
