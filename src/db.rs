//! Creates the application's database schema.

use rusqlite::Connection;

use crate::{Error, auth::create_user_table, expense::create_expense_table};

/// Create the tables for the application's domain models if they do not
/// already exist.
///
/// # Errors
///
/// Returns an [Error::SqlError] if an SQL related error occurred.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    create_user_table(connection)?;
    create_expense_table(connection)?;

    Ok(())
}
