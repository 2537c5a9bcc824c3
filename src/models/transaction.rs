//! This file defines the `Transaction` type, the validated input type for
//! creating one, and the partial update type for editing one.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    models::{DatabaseID, Kind, UserID},
};

/// A single income or expense entry in a user's ledger.
///
/// `amount` is always strictly positive: the direction of money flow is
/// carried by [Kind], never by the sign of the number. The category reference
/// is weak; deleting the category clears it without touching the transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: DatabaseID,
    kind: Kind,
    amount: f64,
    date: Date,
    description: String,
    category_id: Option<DatabaseID>,
    user_id: UserID,
}

impl Transaction {
    /// Create a transaction without validating `amount`.
    ///
    /// Intended for rows read back from the database, which were validated
    /// when they were inserted.
    pub fn new_unchecked(
        id: DatabaseID,
        kind: Kind,
        amount: f64,
        date: Date,
        description: String,
        category_id: Option<DatabaseID>,
        user_id: UserID,
    ) -> Self {
        Self {
            id,
            kind,
            amount,
            date,
            description,
            category_id,
            user_id,
        }
    }

    /// The ID of the transaction.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// Whether the transaction is income or an expense.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The (positive) amount of money that changed hands.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// The date the transaction happened.
    pub fn date(&self) -> Date {
        self.date
    }

    /// A free-form note about the transaction.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The ID of the category the transaction is filed under, if any.
    pub fn category_id(&self) -> Option<DatabaseID> {
        self.category_id
    }

    /// The ID of the user that owns the transaction.
    pub fn user_id(&self) -> UserID {
        self.user_id
    }
}

/// The validated input for creating a transaction.
///
/// Constructing this type through [NewTransaction::new] enforces the
/// positive-amount rule before anything touches storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    kind: Kind,
    amount: f64,
    date: Date,
    description: String,
    category_id: Option<DatabaseID>,
}

impl NewTransaction {
    /// Validate the input for a new transaction.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if `amount` is zero, negative or not
    /// finite.
    pub fn new(
        kind: Kind,
        amount: f64,
        date: Date,
        description: impl Into<String>,
        category_id: Option<DatabaseID>,
    ) -> Result<Self, Error> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidAmount(amount));
        }

        Ok(Self {
            kind,
            amount,
            date,
            description: description.into(),
            category_id,
        })
    }

    /// Whether the transaction is income or an expense.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The (positive) amount of money that changed hands.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// The date the transaction happened.
    pub fn date(&self) -> Date {
        self.date
    }

    /// A free-form note about the transaction.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The ID of the category the transaction is filed under, if any.
    pub fn category_id(&self) -> Option<DatabaseID> {
        self.category_id
    }
}

/// A partial update to a transaction's mutable fields.
///
/// Leaving both fields as `None` makes the update a no-op.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionUpdate {
    /// The new amount, which must be strictly positive.
    pub amount: Option<f64>,
    /// The new description.
    pub description: Option<String>,
}

impl TransactionUpdate {
    /// Whether the update changes anything at all.
    pub fn is_empty(&self) -> bool {
        self.amount.is_none() && self.description.is_none()
    }
}

#[cfg(test)]
mod new_transaction_tests {
    use time::macros::date;

    use crate::{
        Error,
        models::{Kind, NewTransaction},
    };

    #[test]
    fn new_succeeds_on_positive_amount() {
        let result = NewTransaction::new(
            Kind::Expense,
            12.30,
            date!(2024 - 08 - 07),
            "Rust Pie",
            None,
        );

        assert!(result.is_ok());
    }

    #[test]
    fn new_fails_on_zero_amount() {
        let result = NewTransaction::new(Kind::Income, 0.0, date!(2024 - 08 - 07), "", None);

        assert_eq!(result, Err(Error::InvalidAmount(0.0)));
    }

    #[test]
    fn new_fails_on_negative_amount() {
        let result = NewTransaction::new(Kind::Expense, -9.99, date!(2024 - 08 - 07), "", None);

        assert_eq!(result, Err(Error::InvalidAmount(-9.99)));
    }

    #[test]
    fn new_fails_on_non_finite_amount() {
        let result =
            NewTransaction::new(Kind::Expense, f64::INFINITY, date!(2024 - 08 - 07), "", None);

        assert!(matches!(result, Err(Error::InvalidAmount(_))));
    }
}
