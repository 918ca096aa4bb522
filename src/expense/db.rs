//! Database operations for expenses.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    auth::UserID,
    expense::{Expense, ExpenseBuilder, ExpenseId},
};

/// Create an expense and return it with its generated ID.
pub fn create_expense(builder: ExpenseBuilder, connection: &Connection) -> Result<Expense, Error> {
    connection.execute(
        "INSERT INTO expense (name, amount, category, user_id) VALUES (?1, ?2, ?3, ?4);",
        (
            &builder.name,
            builder.amount,
            &builder.category,
            builder.user_id.as_i64(),
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Expense {
        id,
        name: builder.name,
        amount: builder.amount,
        category: builder.category,
        user_id: builder.user_id,
    })
}

/// Retrieve a single expense by ID.
pub fn get_expense(expense_id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    connection
        .prepare("SELECT id, name, amount, category, user_id FROM expense WHERE id = :id;")?
        .query_row(&[(":id", &expense_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all of a user's expenses in insertion order.
pub fn get_expenses_for_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, name, amount, category, user_id FROM expense \
            WHERE user_id = :user_id ORDER BY id ASC;",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// Update an expense's name, amount and category. Returns an error if the
/// expense doesn't exist.
///
/// The expense is looked up by ID alone, the owner is not checked.
pub fn update_expense(
    expense_id: ExpenseId,
    name: &str,
    amount: f64,
    category: &str,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE expense SET name = ?1, amount = ?2, category = ?3 WHERE id = ?4",
        (name, amount, category, expense_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingExpense);
    }

    Ok(())
}

/// Delete an expense by ID.
///
/// Deleting an ID that is not in the database is a no-op, not an error. The
/// expense is looked up by ID alone, the owner is not checked.
pub fn delete_expense(expense_id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    connection.execute("DELETE FROM expense WHERE id = ?1", [expense_id])?;

    Ok(())
}

/// Initialize the expense table.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            amount REAL NOT NULL,
            category TEXT NOT NULL,
            user_id INTEGER NOT NULL REFERENCES user(id)
        );

        CREATE INDEX IF NOT EXISTS idx_expense_user_id ON expense(user_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        name: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        user_id: UserID::new(row.get(4)?),
    })
}

#[cfg(test)]
pub(crate) mod test_utils {
    use rusqlite::Connection;

    use crate::{
        auth::{PasswordHash, User, UserID, Username, create_user, create_user_table},
        expense::create_expense_table,
    };

    pub(crate) fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_user_table(&connection).expect("Could not create user table");
        create_expense_table(&connection).expect("Could not create expense table");
        connection
    }

    pub(crate) fn create_test_user(username: &str, connection: &Connection) -> User {
        create_user(
            Username::new_unchecked(username),
            PasswordHash::new_unchecked("hunter2"),
            connection,
        )
        .expect("Could not create test user")
    }

    pub(crate) fn test_user_id(connection: &Connection) -> UserID {
        create_test_user("ada", connection).id
    }
}
