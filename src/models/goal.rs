//! This file defines the savings goal type and the validated input for
//! creating one.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    models::{DatabaseID, UserID},
};

/// A savings goal a user is working towards.
///
/// `current_amount` is informational and entered by the user; it is never
/// derived from transaction activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    id: DatabaseID,
    name: String,
    target_amount: f64,
    current_amount: f64,
    target_date: Date,
    user_id: UserID,
}

impl Goal {
    /// Create a goal without validation, e.g., from a database row.
    pub fn new_unchecked(
        id: DatabaseID,
        name: String,
        target_amount: f64,
        current_amount: f64,
        target_date: Date,
        user_id: UserID,
    ) -> Self {
        Self {
            id,
            name,
            target_amount,
            current_amount,
            target_date,
            user_id,
        }
    }

    /// The ID of the goal.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// What the user is saving for.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The amount the user wants to reach.
    pub fn target_amount(&self) -> f64 {
        self.target_amount
    }

    /// How much the user says they have put aside so far.
    pub fn current_amount(&self) -> f64 {
        self.current_amount
    }

    /// When the user wants to reach the target.
    pub fn target_date(&self) -> Date {
        self.target_date
    }

    /// The ID of the user that owns the goal.
    pub fn user_id(&self) -> UserID {
        self.user_id
    }
}

/// The validated input for creating a goal.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    name: String,
    target_amount: f64,
    target_date: Date,
}

impl NewGoal {
    /// Validate the input for a new goal.
    ///
    /// # Errors
    /// Returns [Error::InvalidName] if `name` is empty or whitespace-only and
    /// [Error::InvalidAmount] if `target_amount` is zero, negative or not
    /// finite.
    pub fn new(name: impl Into<String>, target_amount: f64, target_date: Date) -> Result<Self, Error> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(Error::InvalidName);
        }
        if !target_amount.is_finite() || target_amount <= 0.0 {
            return Err(Error::InvalidAmount(target_amount));
        }

        Ok(Self {
            name,
            target_amount,
            target_date,
        })
    }

    /// What the user is saving for.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The amount the user wants to reach.
    pub fn target_amount(&self) -> f64 {
        self.target_amount
    }

    /// When the user wants to reach the target.
    pub fn target_date(&self) -> Date {
        self.target_date
    }
}
