//! This file defines the type that handles password hashing and verification.
//!
//! Credentials are salted and hashed with bcrypt before they are stored;
//! nothing in the crate ever persists or compares a raw password.

use std::fmt::Display;

use bcrypt::{hash, verify};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// An alias for the default encryption cost for hashing passwords.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Create a hashed password from a raw password with the specified `cost`.
    ///
    /// `cost` increases the rounds of hashing and therefore the time needed to
    /// verify a password. A value of at least 12 is recommended, pass in
    /// [PasswordHash::DEFAULT_COST] unless hashing time matters more than
    /// hardness (e.g., tests).
    ///
    /// # Errors
    /// Returns [Error::HashingError] if the password could not be hashed.
    pub fn new(raw_password: &str, cost: u32) -> Result<Self, Error> {
        hash(raw_password, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Create a new `PasswordHash` without any validation.
    ///
    /// The caller should ensure that `raw_hash` is a valid bcrypt hash, e.g.,
    /// a value read back from the application database.
    pub fn new_unchecked(raw_hash: &str) -> Self {
        Self(raw_hash.to_string())
    }

    /// Check that `raw_password` matches the stored password.
    ///
    /// # Errors
    /// Returns [Error::HashingError] if the stored hash cannot be parsed.
    pub fn verify(&self, raw_password: &str) -> Result<bool, Error> {
        verify(raw_password, &self.0).map_err(|error| Error::HashingError(error.to_string()))
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod password_hash_tests {
    use crate::models::PasswordHash;

    /// The lowest cost bcrypt accepts, used to keep the tests fast.
    const TEST_COST: u32 = 4;

    #[test]
    fn verify_accepts_the_original_password() {
        let hash = PasswordHash::new("hunter2", TEST_COST).unwrap();

        assert_eq!(hash.verify("hunter2"), Ok(true));
    }

    #[test]
    fn verify_rejects_a_different_password() {
        let hash = PasswordHash::new("hunter2", TEST_COST).unwrap();

        assert_eq!(hash.verify("hunter3"), Ok(false));
    }

    #[test]
    fn hash_is_not_the_raw_password() {
        let hash = PasswordHash::new("hunter2", TEST_COST).unwrap();

        assert_ne!(hash.as_ref(), "hunter2");
    }
}
