//! Expense creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{Extension, FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints,
    expense::{
        ExpenseBuilder, create_expense,
        domain::{ExpenseFormData, parse_amount},
    },
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
};

/// The state needed for creating an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the expense creation page.
pub async fn get_add_expense_page() -> Response {
    add_expense_view().into_response()
}

/// Handle expense creation form submission.
///
/// The amount field is free text and is parsed here; input that does not
/// parse as a finite number re-renders the form with an error message
/// instead of creating anything.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseEndpointState>,
    Extension(user_id): Extension<UserID>,
    Form(form_data): Form<ExpenseFormData>,
) -> Response {
    let amount = match parse_amount(&form_data.amount) {
        Ok(amount) => amount,
        Err(error) => {
            return add_expense_form_view(&form_data, &format!("Error: {error}")).into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let builder = ExpenseBuilder {
        name: form_data.name,
        amount,
        category: form_data.category,
        user_id,
    };

    match create_expense(builder, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating an expense: {error}");

            error.into_alert_response()
        }
    }
}

fn add_expense_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::ADD_EXPENSE).into_html();
    let form = add_expense_form_view(
        &ExpenseFormData {
            name: String::new(),
            amount: String::new(),
            category: String::new(),
        },
        "",
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Add Expense", &content)
}

pub(super) fn expense_form_fields(form_data: &ExpenseFormData) -> Markup {
    html! {
        div
        {
            label
                for="name"
                class=(FORM_LABEL_STYLE)
            {
                "Name"
            }

            input
                id="name"
                type="text"
                name="name"
                placeholder="Coffee"
                value=(form_data.name)
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            input
                id="amount"
                type="text"
                name="amount"
                inputmode="decimal"
                placeholder="3.50"
                value=(form_data.amount)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="category"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            input
                id="category"
                type="text"
                name="category"
                placeholder="Food"
                value=(form_data.category)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

fn add_expense_form_view(form_data: &ExpenseFormData, error_message: &str) -> Markup {
    html! {
        form
            hx-post=(endpoints::ADD_EXPENSE)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            (expense_form_fields(form_data))

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Expense" }
        }
    }
}

#[cfg(test)]
mod add_expense_page_tests {
    use axum::http::StatusCode;

    use crate::{
        endpoints,
        expense::get_add_expense_page,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            must_get_form, parse_html_document,
        },
    };

    #[tokio::test]
    async fn render_page() {
        let response = get_add_expense_page().await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("content-type")
                .expect("content-type header missing"),
            "text/html; charset=utf-8"
        );

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::ADD_EXPENSE, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_input(&form, "amount", "text");
        assert_form_input(&form, "category", "text");
        assert_form_submit_button(&form);
    }
}

#[cfg(test)]
mod create_expense_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Extension, State},
        http::{StatusCode, header::CONTENT_TYPE},
        response::IntoResponse,
    };
    use rusqlite::Connection;

    use crate::{
        auth::UserID,
        endpoints,
        expense::{
            create::CreateExpenseEndpointState, create_expense_endpoint,
            db::test_utils::{get_test_db_connection, test_user_id},
            domain::ExpenseFormData,
            get_expense, get_expenses_for_user,
        },
        test_utils::{
            assert_form_error_message, assert_hx_redirect, assert_valid_html, get_header,
            must_get_form, parse_html_fragment,
        },
    };

    fn get_state(connection: Connection) -> CreateExpenseEndpointState {
        CreateExpenseEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn can_create_expense() {
        let connection = get_test_db_connection();
        let user_id = test_user_id(&connection);
        let state = get_state(connection);
        let form = ExpenseFormData {
            name: "Coffee".to_string(),
            amount: "3.50".to_string(),
            category: "Food".to_string(),
        };

        let response = create_expense_endpoint(State(state.clone()), Extension(user_id), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::EXPENSES_VIEW);

        let expense = get_expense(1, &state.db_connection.lock().unwrap())
            .expect("Could not get created expense");
        assert_eq!(expense.name, "Coffee");
        assert_eq!(expense.amount, 3.5);
        assert_eq!(expense.category, "Food");
        assert_eq!(expense.user_id, user_id);
    }

    #[tokio::test]
    async fn create_expense_fails_on_unparseable_amount() {
        let connection = get_test_db_connection();
        let user_id = test_user_id(&connection);
        let state = get_state(connection);
        let form = ExpenseFormData {
            name: "Coffee".to_string(),
            amount: "three fifty".to_string(),
            category: "Food".to_string(),
        };

        let response = create_expense_endpoint(State(state.clone()), Extension(user_id), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            get_header(&response, CONTENT_TYPE.as_str()),
            "text/html; charset=utf-8"
        );
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: \"three fifty\" is not a valid amount");

        // Nothing must be created on a rejected amount.
        assert_eq!(
            get_expenses_for_user(user_id, &state.db_connection.lock().unwrap()).unwrap(),
            vec![]
        );
    }
}
