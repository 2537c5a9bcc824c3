//! This file defines a user of the application and its supporting types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::PasswordHash;

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better
/// compile time errors, and more flexible generics that can have distinct
/// implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserID(i64);

impl UserID {
    /// Create a user ID from a raw integer.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw integer form of the ID.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user of the application.
///
/// A user owns every category, transaction and goal created under their
/// session; nothing is ever shared between users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: UserID,
    username: String,
    password_hash: PasswordHash,
    email: Option<String>,
    created_at: OffsetDateTime,
}

impl User {
    /// Create a new user.
    pub fn new(
        id: UserID,
        username: String,
        password_hash: PasswordHash,
        email: Option<String>,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            username,
            password_hash,
            email,
            created_at,
        }
    }

    /// The user's ID in the database.
    pub fn id(&self) -> UserID {
        self.id
    }

    /// The unique name the user registered with.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The user's password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// The user's contact email, if they gave one.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// When the user registered.
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}
