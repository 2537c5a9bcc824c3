//! Defines the user store trait.

use crate::{
    Error,
    models::{PasswordHash, User},
};

/// Creates and retrieves user accounts.
///
/// Unlike the other stores this one takes no [Session](crate::Session):
/// accounts are what sessions are made from.
pub trait UserStore {
    /// Create and insert a new user.
    ///
    /// # Errors
    /// Returns [Error::DuplicateUsername] if the username is already taken
    /// (exact, case-sensitive match).
    fn create(
        &mut self,
        username: &str,
        password_hash: PasswordHash,
        email: Option<String>,
    ) -> Result<User, Error>;

    /// Get the user with the specified `username`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no user with that exact
    /// username.
    fn get_by_username(&self, username: &str) -> Result<User, Error>;

    /// The total number of registered users.
    fn count(&self) -> Result<usize, Error>;
}
