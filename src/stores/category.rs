//! Defines the category store trait.

use crate::{
    Error, Session,
    models::{Category, CategoryName, DatabaseID, Kind},
};

/// Creates, retrieves and deletes transaction categories.
pub trait CategoryStore {
    /// Create a new category owned by the session user.
    ///
    /// # Errors
    /// Returns [Error::DuplicateCategory] if the user already has a category
    /// with this name.
    fn create(
        &mut self,
        name: CategoryName,
        kind: Kind,
        session: &Session,
    ) -> Result<Category, Error>;

    /// Create a category unless the session user already has one with the
    /// same name, in which case nothing happens.
    ///
    /// This is what seeds the default categories at registration; repeating
    /// the seeding never produces duplicates.
    fn create_if_absent(
        &mut self,
        name: CategoryName,
        kind: Kind,
        session: &Session,
    ) -> Result<(), Error>;

    /// Get one of the session user's categories by its ID.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the ID does not resolve to a category
    /// owned by the session user.
    fn get(&self, category_id: DatabaseID, session: &Session) -> Result<Category, Error>;

    /// Get the session user's categories, optionally restricted to one kind,
    /// ordered by kind then name.
    fn get_all(&self, kind: Option<Kind>, session: &Session) -> Result<Vec<Category>, Error>;

    /// Delete one of the session user's categories.
    ///
    /// Transactions that referenced the category keep existing; their
    /// category reference is cleared in the same storage transaction as the
    /// deletion, so no reader ever observes a dangling reference.
    ///
    /// # Errors
    /// Returns [Error::NotFoundOrForbidden] if the ID does not exist or the
    /// category belongs to another user.
    fn delete(&mut self, category_id: DatabaseID, session: &Session) -> Result<(), Error>;
}
