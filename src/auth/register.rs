//! The registration page for creating a user account.

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
        DEFAULT_COOKIE_DURATION, PasswordHash, Username, create_user,
        get_user_id_from_auth_cookie, set_auth_cookie,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, base,
        loading_spinner, log_in_register, password_input, username_input,
    },
    internal_server_error::get_internal_server_error_redirect,
};

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl RegistrationState {
    /// Create the cookie key from a string and set the default cookie duration.
    pub fn new(cookie_secret: &str, db_connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            db_connection: db_connection.clone(),
        }
    }
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

fn confirm_password_input(error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label
                for="confirm-password"
                class=(FORM_LABEL_STYLE)
            {
                "Confirm Password"
            }

            input
                type="password"
                name="confirm_password"
                id="confirm-password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                autofocus[error_message.is_some()]
            ;

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }

    }
}

fn registration_form(
    username: &str,
    username_error_message: Option<&str>,
    confirm_password_error_message: Option<&str>,
) -> Markup {
    html! {
        form
            hx-post=(endpoints::REGISTER)
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            (username_input(username, username_error_message))
            (password_input(None))
            (confirm_password_input(confirm_password_error_message))

            button
                type="submit" id="submit-button" tabindex="0"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Create Account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "

                a href=(endpoints::LOG_IN) tabindex="0" class=(LINK_STYLE)
                {
                  "Log in here"
                }
            }
        }
    }
}

/// Display the registration page.
///
/// A client that already holds an authenticated session is redirected to the
/// home page instead.
pub async fn get_register_page(jar: PrivateCookieJar) -> Response {
    if get_user_id_from_auth_cookie(&jar).is_ok() {
        return Redirect::to(endpoints::EXPENSES_VIEW).into_response();
    }

    let registration_form = registration_form("", None, None);
    let content = log_in_register("Create Account", &registration_form);
    base("Register", &content).into_response()
}

/// The raw data entered by the user in the registration form.
#[derive(Serialize, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

/// Handler for registration requests via the POST method.
///
/// Creates the user and immediately establishes an authenticated session for
/// them, then redirects to the home page. A duplicate or empty username, or
/// mismatching passwords, return the form with an error message instead.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<RegisterForm>,
) -> Response {
    if get_user_id_from_auth_cookie(&jar).is_ok() {
        return (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
            (),
        )
            .into_response();
    }

    let username = match Username::new(&user_data.username) {
        Ok(username) => username,
        Err(error) => {
            return registration_form(
                &user_data.username,
                Some(error.to_string().as_ref()),
                None,
            )
            .into_response();
        }
    };

    if user_data.password != user_data.confirm_password {
        return registration_form(&user_data.username, None, Some("Passwords do not match"))
            .into_response();
    }

    let password_hash = match PasswordHash::new(&user_data.password, PasswordHash::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("an error occurred while hashing a password: {e}");

            return get_internal_server_error_redirect();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match create_user(username, password_hash, &connection) {
        Ok(user) => match set_auth_cookie(jar, user.id, state.cookie_duration) {
            Ok(jar) => (
                StatusCode::SEE_OTHER,
                HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
                jar,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("An error occurred while setting the auth cookie: {e}");

                get_internal_server_error_redirect()
            }
        },
        Err(Error::DuplicateUsername) => registration_form(
            &user_data.username,
            Some("That username is already taken, please choose another or log in."),
            None,
        )
        .into_response(),
        Err(e) => {
            tracing::error!("An unhandled error occurred while inserting a new user: {e}");

            get_internal_server_error_redirect()
        }
    }
}

#[cfg(test)]
mod get_register_page_tests {
    use axum::http::{StatusCode, header::CONTENT_TYPE};
    use axum_extra::extract::PrivateCookieJar;

    use crate::{
        app_state::create_cookie_key,
        auth::{DEFAULT_COOKIE_DURATION, UserID, register::get_register_page, set_auth_cookie},
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            get_header, must_get_form, parse_html_document,
        },
    };

    #[tokio::test]
    async fn render_register_page() {
        let jar = PrivateCookieJar::new(create_cookie_key("foobar"));

        let response = get_register_page(jar).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(get_header(&response, CONTENT_TYPE.as_str()).starts_with("text/html"));

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::REGISTER, "hx-post");
        assert_form_input(&form, "username", "text");
        assert_form_input(&form, "password", "password");
        assert_form_input(&form, "confirm_password", "password");
        assert_form_submit_button(&form);

        let log_in_link_selector = scraper::Selector::parse("a[href]").unwrap();
        let links = form.select(&log_in_link_selector).collect::<Vec<_>>();
        assert_eq!(links.len(), 1, "want 1 link, got {}", links.len());
        assert_eq!(
            links[0].value().attr("href"),
            Some(endpoints::LOG_IN),
            "want link to {}, got {:?}",
            endpoints::LOG_IN,
            links[0].value().attr("href")
        );
    }

    #[tokio::test]
    async fn register_page_redirects_when_already_authenticated() {
        let jar = PrivateCookieJar::new(create_cookie_key("foobar"));
        let jar = set_auth_cookie(jar, UserID::new(1), DEFAULT_COOKIE_DURATION).unwrap();

        let response = get_register_page(jar).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            get_header(&response, "location"),
            endpoints::EXPENSES_VIEW
        );
    }
}
