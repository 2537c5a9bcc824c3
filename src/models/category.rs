//! This file defines the `Category` type and the types needed to create one.
//! A category acts like a label for a transaction, however a transaction may
//! only have one category.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    models::{DatabaseID, Kind, UserID},
};

/// The name of a category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    /// Returns [Error::InvalidName] if `name` is empty or whitespace-only.
    pub fn new(name: &str) -> Result<Self, Error> {
        if name.trim().is_empty() {
            Err(Error::InvalidName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty. This function
    /// has `_unchecked` in the name but is not `unsafe`, because violating the
    /// non-empty invariant causes incorrect behaviour but does not affect
    /// memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A category for expenses and income, e.g., 'Groceries', 'Wages'.
///
/// Category names are unique per user, not globally; two users can each have
/// their own 'Food'.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    id: DatabaseID,
    name: CategoryName,
    kind: Kind,
    user_id: UserID,
}

impl Category {
    /// Create a new category.
    pub fn new(id: DatabaseID, name: CategoryName, kind: Kind, user_id: UserID) -> Self {
        Self {
            id,
            name,
            kind,
            user_id,
        }
    }

    /// The ID of the category.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// The name of the category.
    pub fn name(&self) -> &CategoryName {
        &self.name
    }

    /// Whether the category labels income or expenses.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The ID of the user that owns the category.
    pub fn user_id(&self) -> UserID {
        self.user_id
    }
}

#[cfg(test)]
mod category_name_tests {
    use crate::{Error, models::CategoryName};

    #[test]
    fn new_fails_on_empty_string() {
        let category_name = CategoryName::new("");

        assert_eq!(category_name, Err(Error::InvalidName));
    }

    #[test]
    fn new_fails_on_whitespace_only_string() {
        let category_name = CategoryName::new("   ");

        assert_eq!(category_name, Err(Error::InvalidName));
    }

    #[test]
    fn new_succeeds_on_non_empty_string() {
        let category_name = CategoryName::new("🔥");

        assert!(category_name.is_ok())
    }
}
