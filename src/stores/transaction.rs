//! Defines the transaction store trait and its query type.

use std::ops::RangeInclusive;

use time::Date;

use crate::{
    Error, Session,
    models::{DatabaseID, NewTransaction, Transaction, TransactionUpdate},
};

/// The filters used to query transactions.
///
/// The result ordering is fixed: newest date first, with ties broken by
/// newest ID first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    /// Only include transactions dated within the inclusive range.
    pub date_range: Option<RangeInclusive<Date>>,
    /// Only include transactions filed under this category.
    pub category_id: Option<DatabaseID>,
}

/// Creates, retrieves, updates and deletes a user's transactions.
pub trait TransactionStore {
    /// Create a new transaction owned by the session user.
    ///
    /// # Errors
    /// Returns [Error::ForeignKeyViolation] if the new transaction references
    /// a category that does not resolve to one owned by the session user.
    fn create(
        &mut self,
        new_transaction: NewTransaction,
        session: &Session,
    ) -> Result<Transaction, Error>;

    /// Get one of the session user's transactions by its ID.
    ///
    /// # Errors
    /// Returns [Error::NotFoundOrForbidden] if the ID does not exist or the
    /// transaction belongs to another user.
    fn get(&self, id: DatabaseID, session: &Session) -> Result<Transaction, Error>;

    /// Query the session user's transactions.
    fn get_query(
        &self,
        query: TransactionQuery,
        session: &Session,
    ) -> Result<Vec<Transaction>, Error>;

    /// Apply a partial update to one of the session user's transactions.
    ///
    /// An empty update succeeds without touching storage.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if the new amount is not strictly
    /// positive, and [Error::NotFoundOrForbidden] if the ID does not exist or
    /// the transaction belongs to another user.
    fn update(
        &mut self,
        id: DatabaseID,
        changes: TransactionUpdate,
        session: &Session,
    ) -> Result<(), Error>;

    /// Delete one of the session user's transactions.
    ///
    /// # Errors
    /// Returns [Error::NotFoundOrForbidden] if the ID does not exist or the
    /// transaction belongs to another user.
    fn delete(&mut self, id: DatabaseID, session: &Session) -> Result<(), Error>;
}
