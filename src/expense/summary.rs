//! The summary page: the user's total spend and per-category sums.

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
    html::{
        CATEGORY_BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
    },
    navigation::NavBar,
};

/// The state needed for the summary page.
#[derive(Debug, Clone)]
pub struct SummaryPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SummaryPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A user's total spend and the sums per category.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Summary {
    /// The sum of all of the user's expense amounts, 0 if they have none.
    pub total: f64,
    /// Category names and the sum of amounts within each, in alphabetical
    /// order. Empty if the user has no expenses.
    pub categories: Vec<(String, f64)>,
}

/// Compute the total and per-category sums of a user's expenses.
pub(crate) fn get_summary(user_id: UserID, connection: &Connection) -> Result<Summary, Error> {
    let total = connection.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM expense WHERE user_id = :user_id",
        &[(":user_id", &user_id.as_i64())],
        |row| row.get(0),
    )?;

    let categories = connection
        .prepare(
            "SELECT category, SUM(amount) FROM expense WHERE user_id = :user_id \
            GROUP BY category ORDER BY category ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], |row| {
            let category: String = row.get(0)?;
            let sum: f64 = row.get(1)?;

            Ok((category, sum))
        })?
        .collect::<Result<Vec<_>, rusqlite::Error>>()?;

    Ok(Summary { total, categories })
}

/// Render the summary page for the authenticated user.
pub async fn get_summary_page(
    State(state): State<SummaryPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let summary = get_summary(user_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to compute expense summary: {error}"))?;

    Ok(summary_view(&summary).into_response())
}

fn summary_view(summary: &Summary) -> Markup {
    let nav_bar = NavBar::new(endpoints::SUMMARY_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "Summary" }

                    a href=(endpoints::EXPENSES_VIEW) class=(LINK_STYLE)
                    {
                        "Back to Expenses"
                    }
                }

                p class="text-lg"
                {
                    "Total spent: "
                    span class="font-bold tabular-nums" { (format_currency(summary.total)) }
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
                                    "Category"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Total"
                                }
                            }
                        }

                        tbody
                        {
                            @for (category, sum) in &summary.categories {
                                tr class=(TABLE_ROW_STYLE)
                                {
                                    td class=(TABLE_CELL_STYLE)
                                    {
                                        span class=(CATEGORY_BADGE_STYLE) { (category) }
                                    }

                                    td class={ (TABLE_CELL_STYLE) " tabular-nums" }
                                    {
                                        (format_currency(*sum))
                                    }
                                }
                            }

                            @if summary.categories.is_empty() {
                                tr
                                {
                                    td
                                        colspan="2"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "Nothing to summarize yet."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Summary", &content)
}
