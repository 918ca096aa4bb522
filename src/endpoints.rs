//! The application's route URIs.
//!
//! For endpoints that take a parameter, e.g., '/edit_expense/{expense_id}',
//! use [format_endpoint].

/// The home page listing the current user's expenses.
pub const EXPENSES_VIEW: &str = "/";
/// The page and endpoint for creating a new expense.
pub const ADD_EXPENSE: &str = "/add_expense";
/// The endpoint for deleting an expense.
pub const DELETE_EXPENSE: &str = "/delete_expense/{expense_id}";
/// The page and endpoint for editing an existing expense.
pub const EDIT_EXPENSE: &str = "/edit_expense/{expense_id}";
/// The page displaying the total and per-category expense sums.
pub const SUMMARY_VIEW: &str = "/summary";
/// The page and endpoint for creating a user account.
pub const REGISTER: &str = "/register";
/// The page and endpoint for logging in a user.
pub const LOG_IN: &str = "/login";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/logout";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/edit_expense/{expense_id}',
/// '{expense_id}' is the parameter.
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
