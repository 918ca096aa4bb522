//! Expense records and the pages for creating, editing, deleting and
//! summarizing them.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;
mod summary;

pub(crate) use create::{create_expense_endpoint, get_add_expense_page};
pub(crate) use db::{
    create_expense, create_expense_table, delete_expense, get_expense, get_expenses_for_user,
    update_expense,
};
pub(crate) use delete::delete_expense_endpoint;
pub(crate) use domain::{Expense, ExpenseBuilder, ExpenseId};
pub(crate) use edit::{get_edit_expense_page, update_expense_endpoint};
pub(crate) use list::get_expenses_page;
pub(crate) use summary::get_summary_page;
