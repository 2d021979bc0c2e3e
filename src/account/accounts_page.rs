//! Displays accounts and their types.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{AccountType, get_all_accounts},
    endpoints::{self, format_endpoint},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links,
    },
    navigation::NavBar,
};

/// The state needed for the [get_accounts_page](crate::account::get_accounts_page) route handler.
#[derive(Debug, Clone)]
pub struct AccountState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The account data to display in the view
#[derive(Debug, PartialEq)]
struct AccountTableRow {
    name: String,
    account_type: AccountType,
    edit_url: String,
    delete_url: String,
}

fn delete_confirm_message(account_name: &str) -> String {
    format!(
        "Are you sure you want to delete the account '{account_name}'? \
        Its transactions and balance history will be deleted too."
    )
}

fn accounts_view(accounts: &[AccountTableRow]) -> Markup {
    let create_account_page_url = endpoints::NEW_ACCOUNT_VIEW;
    let nav_bar = NavBar::new(endpoints::ACCOUNTS_VIEW).into_html();

    let table_row = |account: &AccountTableRow| {
        let action_links = edit_delete_action_links(
            &account.edit_url,
            &account.delete_url,
            &delete_confirm_message(&account.name),
            "closest tr",
            "delete",
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    (account.name)
                }

                td class="px-6 py-4 capitalize"
                {
                    (account.account_type)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (action_links)
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Accounts" }

                    a href=(create_account_page_url) class=(LINK_STYLE)
                    {
                        "Add Account"
                    }
                }

                (accounts_cards_view(accounts, create_account_page_url))

                section class="hidden lg:block w-full overflow-x-auto lg:overflow-visible dark:bg-gray-800 lg:max-w-5xl lg:w-full lg:mx-auto"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Name"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Type"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Actions"
                                }
                            }
                        }

                        tbody
                        {
                            @for account in accounts {
                                (table_row(account))
                            }

                            @if accounts.is_empty() {
                                tr
                                {
                                    td
                                        colspan="3"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No accounts found. Create an account "
                                        a href=(create_account_page_url) class=(LINK_STYLE)
                                        {
                                            "here"
                                        }
                                        "."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Accounts", &[], &content)
}

fn accounts_cards_view(accounts: &[AccountTableRow], create_account_page_url: &str) -> Markup {
    html!(
        ul class="lg:hidden space-y-4"
        {
            @for account in accounts {
                li class="rounded border border-gray-200 bg-white px-4 py-3 shadow-sm dark:border-gray-700 dark:bg-gray-800"
                    data-account-card="true"
                {
                    div class="flex items-start justify-between gap-3"
                    {
                        div class="text-sm font-semibold text-gray-900 dark:text-white"
                        { (account.name) }
                        div class="text-sm capitalize text-right text-gray-500 dark:text-gray-400"
                        { (account.account_type) }
                    }

                    div class="mt-2 flex items-center gap-4 text-sm"
                    {
                        (edit_delete_action_links(
                            &account.edit_url,
                            &account.delete_url,
                            &delete_confirm_message(&account.name),
                            "closest [data-account-card='true']",
                            "outerHTML",
                        ))
                    }
                }
            }

            @if accounts.is_empty() {
                li class="rounded border border-dashed border-gray-300 bg-white px-4 py-6 text-center text-sm text-gray-500 dark:border-gray-700 dark:bg-gray-800 dark:text-gray-400"
                {
                    "No accounts found. Create an account "
                    a href=(create_account_page_url) class=(LINK_STYLE)
                    {
                        "here"
                    }
                    "."
                }
            }
        }
    )
}

/// Renders the accounts page showing all accounts.
pub async fn get_accounts_page(State(state): State<AccountState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let accounts: Vec<AccountTableRow> = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("could not get all accounts: {error}"))?
        .into_iter()
        .map(|account| AccountTableRow {
            name: account.name,
            account_type: account.account_type,
            edit_url: format_endpoint(endpoints::EDIT_ACCOUNT_VIEW, account.id),
            delete_url: format_endpoint(endpoints::DELETE_ACCOUNT, account.id),
        })
        .collect();

    Ok(accounts_view(&accounts).into_response())
}
