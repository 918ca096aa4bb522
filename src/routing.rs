//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_log_in_page, get_log_out, get_register_page, post_log_in,
        register_user,
    },
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, get_add_expense_page,
        get_edit_expense_page, get_expenses_page, get_summary_page, update_expense_endpoint,
    },
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(
            endpoints::LOG_IN,
            get(get_log_in_page).post(post_log_in),
        )
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(
            endpoints::REGISTER,
            get(get_register_page).post(register_user),
        )
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::EXPENSES_VIEW, get(get_expenses_page))
        .route(endpoints::ADD_EXPENSE, get(get_add_expense_page))
        .route(endpoints::EDIT_EXPENSE, get(get_edit_expense_page))
        .route(endpoints::SUMMARY_VIEW, get(get_summary_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These POST routes need to use the HX-Redirect header for auth redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::ADD_EXPENSE, post(create_expense_endpoint))
            .route(endpoints::EDIT_EXPENSE, post(update_expense_endpoint))
            .route(endpoints::DELETE_EXPENSE, post(delete_expense_endpoint))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}
