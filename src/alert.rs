//! Alert fragments for displaying error messages to users.
//!
//! Alerts are swapped into the `#alert-container` element of the page shell
//! by HTMX via the response-targets extension.

use axum::response::{IntoResponse, Response};
use maud::{Markup, Render, html};

/// A dismissable error notice with a title and a longer description.
#[derive(Debug, Clone)]
pub struct Alert {
    title: String,
    message: String,
}

impl Alert {
    /// Create a new error alert.
    pub fn error(title: &str, message: &str) -> Self {
        Self {
            title: title.to_owned(),
            message: message.to_owned(),
        }
    }
}

impl Render for Alert {
    fn render(&self) -> Markup {
        html!(
            div
                class="rounded border-l-4 border-red-500 bg-white p-4 shadow-lg
                    text-red-700 dark:bg-gray-800 dark:text-red-400"
                role="alert"
            {
                p class="font-bold" { (self.title) }
                p { (self.message) }

                button
                    type="button"
                    class="mt-2 text-sm underline cursor-pointer"
                    onclick="this.closest('#alert-container').classList.add('hidden')"
                {
                    "Dismiss"
                }
            }
        )
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.render().into_response()
    }
}
