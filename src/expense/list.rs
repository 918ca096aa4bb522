//! The home page listing the current user's expenses.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Extension, FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints,
    expense::{Expense, get_expenses_for_user},
    html::{
        CATEGORY_BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, edit_delete_action_links, format_currency,
    },
    navigation::NavBar,
};

/// The state needed for the expenses listing page.
#[derive(Debug, Clone)]
pub struct ExpensesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpensesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// An expense with its formatted edit URL for template rendering.
#[derive(Debug, Clone)]
struct ExpenseWithEditUrl {
    pub expense: Expense,
    pub edit_url: String,
}

/// Render the expenses listing page for the authenticated user.
pub async fn get_expenses_page(
    State(state): State<ExpensesPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expenses = get_expenses_for_user(user_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve expenses: {error}"))?;

    let expenses_with_edit_urls = expenses
        .into_iter()
        .map(|expense| ExpenseWithEditUrl {
            edit_url: endpoints::format_endpoint(endpoints::EDIT_EXPENSE, expense.id),
            expense,
        })
        .collect::<Vec<_>>();

    Ok(expenses_view(&expenses_with_edit_urls).into_response())
}

fn expenses_view(expenses: &[ExpenseWithEditUrl]) -> Markup {
    let add_expense_route = endpoints::ADD_EXPENSE;
    let nav_bar = NavBar::new(endpoints::EXPENSES_VIEW).into_html();

    let table_row = |expense_with_url: &ExpenseWithEditUrl| {
        let delete_url =
            endpoints::format_endpoint(endpoints::DELETE_EXPENSE, expense_with_url.expense.id);
        let confirm_message = format!(
            "Are you sure you want to delete '{}'?",
            expense_with_url.expense.name
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    (expense_with_url.expense.name)
                }

                td class={ (TABLE_CELL_STYLE) " tabular-nums" }
                {
                    (format_currency(expense_with_url.expense.amount))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    span class=(CATEGORY_BADGE_STYLE)
                    {
                        (expense_with_url.expense.category)
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &expense_with_url.edit_url,
                            &delete_url,
                            &confirm_message,
                            "closest tr",
                        ))
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
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "Expenses" }

                    div class="flex gap-4"
                    {
                        a href=(endpoints::SUMMARY_VIEW) class=(LINK_STYLE)
                        {
                            "Summary"
                        }

                        a href=(add_expense_route) class=(LINK_STYLE)
                        {
                            "Add Expense"
                        }
                    }
                }

                section class="dark:bg-gray-800 lg:max-w-5xl lg:w-full lg:mx-auto"
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
                                    "Amount"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Category"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Actions"
                                }
                            }
                        }

                        tbody
                        {
                            @for expense_with_url in expenses {
                                (table_row(expense_with_url))
                            }

                            @if expenses.is_empty() {
                                tr
                                {
                                    td
                                        colspan="4"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No expenses recorded yet. "
                                        a href=(add_expense_route) class=(LINK_STYLE)
                                        {
                                            "Add your first expense"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Expenses", &content)
}

#[cfg(test)]
mod expenses_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Extension, State},
        http::StatusCode,
    };
    use scraper::Selector;

    use crate::{
        expense::{
            ExpenseBuilder, create_expense,
            db::test_utils::{create_test_user, get_test_db_connection},
            get_expenses_page,
        },
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::ExpensesPageState;

    #[tokio::test]
    async fn renders_expense_table() {
        let connection = get_test_db_connection();
        let user_id = create_test_user("ada", &connection).id;
        create_expense(
            ExpenseBuilder {
                name: "Coffee".to_string(),
                amount: 3.5,
                category: "Food".to_string(),
                user_id,
            },
            &connection,
        )
        .unwrap();
        create_expense(
            ExpenseBuilder {
                name: "Train ticket".to_string(),
                amount: 12.0,
                category: "Travel".to_string(),
                user_id,
            },
            &connection,
        )
        .unwrap();
        let state = ExpensesPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_expenses_page(State(state), Extension(user_id))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let row_selector = Selector::parse("tbody tr").unwrap();
        let rows = html.select(&row_selector).collect::<Vec<_>>();
        assert_eq!(rows.len(), 2, "want 2 rows, got {}", rows.len());

        let first_row_text = rows[0].text().collect::<String>();
        assert!(first_row_text.contains("Coffee"));
        assert!(first_row_text.contains("$3.50"));
        assert!(first_row_text.contains("Food"));
    }

    #[tokio::test]
    async fn does_not_show_other_users_expenses() {
        let connection = get_test_db_connection();
        let user_id = create_test_user("ada", &connection).id;
        let other_user_id = create_test_user("grace", &connection).id;
        create_expense(
            ExpenseBuilder {
                name: "Secret purchase".to_string(),
                amount: 100.0,
                category: "Secrets".to_string(),
                user_id: other_user_id,
            },
            &connection,
        )
        .unwrap();
        let state = ExpensesPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_expenses_page(State(state), Extension(user_id))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let text = html.html();
        assert!(
            !text.contains("Secret purchase"),
            "another user's expense must not be rendered"
        );
    }

    #[tokio::test]
    async fn empty_list_shows_call_to_action() {
        let connection = get_test_db_connection();
        let user_id = create_test_user("ada", &connection).id;
        let state = ExpensesPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_expenses_page(State(state), Extension(user_id))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let text = html.html();
        assert!(text.contains("No expenses recorded yet."));
    }
}
