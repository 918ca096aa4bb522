//! Core expense domain types.

use serde::{Deserialize, Serialize};

use crate::{Error, auth::UserID};

/// Database identifier for an expense.
pub type ExpenseId = i64;

/// A single expense record (e.g., 'Coffee', $3.50, 'Food').
///
/// The category is a free-form label that is only used for grouping on the
/// summary page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub name: String,
    pub amount: f64,
    pub category: String,
    pub user_id: UserID,
}

/// The fields needed to insert a new expense.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseBuilder {
    pub name: String,
    pub amount: f64,
    pub category: String,
    pub user_id: UserID,
}

/// Form data for expense creation and editing.
///
/// The amount is kept as the raw string the user entered so that it can be
/// echoed back with an error message when it does not parse.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExpenseFormData {
    pub name: String,
    pub amount: String,
    pub category: String,
}

/// Parse the amount field of an expense form.
///
/// # Errors
///
/// Returns an [Error::InvalidAmount] holding the original input if it cannot
/// be parsed as a finite number. Zero and negative amounts are accepted.
pub fn parse_amount(input: &str) -> Result<f64, Error> {
    let trimmed = input.trim();

    match trimmed.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(Error::InvalidAmount(input.to_string())),
    }
}

#[cfg(test)]
mod parse_amount_tests {
    use crate::Error;

    use super::parse_amount;

    #[test]
    fn parses_decimal_amount() {
        assert_eq!(parse_amount("3.50"), Ok(3.5));
    }

    #[test]
    fn parses_amount_with_surrounding_whitespace() {
        assert_eq!(parse_amount(" 12 "), Ok(12.0));
    }

    #[test]
    fn accepts_zero_and_negative_amounts() {
        assert_eq!(parse_amount("0"), Ok(0.0));
        assert_eq!(parse_amount("-4.2"), Ok(-4.2));
    }

    #[test]
    fn rejects_text() {
        assert_eq!(
            parse_amount("three fifty"),
            Err(Error::InvalidAmount("three fifty".to_string()))
        );
    }

    #[test]
    fn rejects_empty_string() {
        assert_eq!(parse_amount(""), Err(Error::InvalidAmount("".to_string())));
    }

    #[test]
    fn rejects_non_finite_numbers() {
        assert_eq!(
            parse_amount("inf"),
            Err(Error::InvalidAmount("inf".to_string()))
        );
        assert_eq!(
            parse_amount("NaN"),
            Err(Error::InvalidAmount("NaN".to_string()))
        );
    }
}
