//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! The cookie module handles the lower level cookie auth logic.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    app_state::create_cookie_key,
    auth::{
        DEFAULT_COOKIE_DURATION, get_user_id_from_auth_cookie, get_user_by_username,
        invalidate_auth_cookie, set_auth_cookie,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, LINK_STYLE, base, log_in_register, password_input, username_input,
    },
};

pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect username or password.";

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl LoginState {
    /// Create the cookie key from a string and set the default cookie duration.
    pub fn new(cookie_secret: &str, db_connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            db_connection: db_connection.clone(),
        }
    }
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// Display the log-in page.
///
/// A client that already holds an authenticated session is redirected to the
/// home page instead.
pub async fn get_log_in_page(jar: PrivateCookieJar) -> Response {
    if get_user_id_from_auth_cookie(&jar).is_ok() {
        return Redirect::to(endpoints::EXPENSES_VIEW).into_response();
    }

    log_in_view().into_response()
}

/// The raw data entered by the user in the log-in form.
///
/// The username and password are stored as plain strings. There is no need for validation here
/// since they will be compared against the username and password in the database, which have been
/// verified.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    /// Username entered during log-in.
    pub username: String,
    /// Password entered during log-in.
    pub password: String,
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the auth cookie is set and the client is redirected to the
/// home page. Otherwise, the form is returned with an error message explaining the problem.
///
/// The error message is the same whether the username does not exist or the
/// password does not match, so that the response does not reveal which
/// usernames are registered.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    if get_user_id_from_auth_cookie(&jar).is_ok() {
        return (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
            (),
        )
            .into_response();
    }

    let username = &user_data.username;
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let user = match get_user_by_username(username, &connection) {
        Ok(user) => user,
        Err(Error::NotFound) => {
            return log_in_form_view(username, INVALID_CREDENTIALS_ERROR_MSG).into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return log_in_form_view(
                username,
                "An internal error occurred. Please try again later.",
            )
            .into_response();
        }
    };

    let is_password_valid = match user.password_hash.verify(&user_data.password) {
        Ok(is_password_valid) => is_password_valid,
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return log_in_form_view(
                username,
                "An internal error occurred. Please try again later.",
            )
            .into_response();
        }
    };

    if !is_password_valid {
        return log_in_form_view(username, INVALID_CREDENTIALS_ERROR_MSG).into_response();
    }

    set_auth_cookie(jar.clone(), user.id, state.cookie_duration)
        .map(|updated_jar| {
            (
                StatusCode::SEE_OTHER,
                HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
                updated_jar,
            )
        })
        .map_err(|err| {
            tracing::error!("Error setting auth cookie: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_auth_cookie(jar),
            )
        })
        .into_response()
}

fn log_in_view() -> Markup {
    let form = log_in_form_view("", "");
    let content = log_in_register("Log In", &form);

    base("Log In", &content)
}

fn log_in_form_view(username: &str, error_message: &str) -> Markup {
    let password_error = if error_message.is_empty() {
        None
    } else {
        Some(error_message)
    };

    html! {
        form
            hx-post=(endpoints::LOG_IN)
            hx-swap="outerHTML"
            class="space-y-4 md:space-y-6"
        {
            (username_input(username, None))
            (password_input(password_error))

            button type="submit" tabindex="0" class=(BUTTON_PRIMARY_STYLE) { "Log In" }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Don't have an account yet? "

                a href=(endpoints::REGISTER) tabindex="0" class=(LINK_STYLE)
                {
                  "Register here"
                }
            }
        }
    }
}
