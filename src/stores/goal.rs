//! Defines the savings goal store trait.

use crate::{
    Error, Session,
    models::{Goal, NewGoal},
};

/// Creates and retrieves a user's savings goals.
pub trait GoalStore {
    /// Create a new goal owned by the session user.
    ///
    /// The goal starts with a current amount of zero; transaction activity
    /// never changes it.
    fn create(&mut self, new_goal: NewGoal, session: &Session) -> Result<Goal, Error>;

    /// Get the session user's goals, ordered by target date ascending.
    fn get_all(&self, session: &Session) -> Result<Vec<Goal>, Error>;
}
