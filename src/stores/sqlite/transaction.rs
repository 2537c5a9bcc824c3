//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, params_from_iter, types::Value};

use crate::{
    Error, Session,
    db::{CreateTable, MapRow},
    models::{DatabaseID, NewTransaction, Transaction, TransactionUpdate, UserID},
    stores::{TransactionStore, transaction::TransactionQuery},
};

/// Stores transactions in a SQLite database.
///
/// Note that because a transaction depends on the [User](crate::models::User)
/// and [Category](crate::models::Category) models, these models must be set up
/// in the database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// Returns [Error::ForeignKeyViolation] if the new transaction references
    /// a category that does not resolve to one owned by the session user, or
    /// [Error::StorageUnavailable] if there is some other SQL error.
    fn create(
        &mut self,
        new_transaction: NewTransaction,
        session: &Session,
    ) -> Result<Transaction, Error> {
        let connection = self.connection.lock().unwrap();

        // The category reference is checked against the session user before
        // the insert. A category that exists but belongs to someone else must
        // produce the same error as one that does not exist.
        if let Some(category_id) = new_transaction.category_id() {
            connection
                .prepare("SELECT id FROM categories WHERE id = ?1 AND user_id = ?2")?
                .query_row((category_id, session.user_id().as_i64()), |row| {
                    row.get::<_, DatabaseID>(0)
                })
                .map_err(|error| match error {
                    rusqlite::Error::QueryReturnedNoRows => Error::ForeignKeyViolation,
                    error => error.into(),
                })?;
        }

        let transaction = connection
            .prepare(
                "INSERT INTO transactions (kind, amount, date, description, category_id, user_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING id, kind, amount, date, description, category_id, user_id",
            )?
            .query_row(
                (
                    new_transaction.kind(),
                    new_transaction.amount(),
                    new_transaction.date(),
                    new_transaction.description(),
                    new_transaction.category_id(),
                    session.user_id().as_i64(),
                ),
                Self::map_row,
            )?;

        Ok(transaction)
    }

    /// Retrieve the session user's transaction with `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFoundOrForbidden] if `id` does not refer to a
    /// transaction owned by the session user, or [Error::StorageUnavailable]
    /// if there is some other SQL error.
    fn get(&self, id: DatabaseID, session: &Session) -> Result<Transaction, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, kind, amount, date, description, category_id, user_id
                 FROM transactions
                 WHERE id = ?1 AND user_id = ?2",
            )?
            .query_row((id, session.user_id().as_i64()), Self::map_row)
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::NotFoundOrForbidden,
                error => error.into(),
            })
    }

    /// Query the session user's transactions.
    ///
    /// Results are ordered by date descending, then ID descending.
    ///
    /// # Errors
    /// Returns [Error::StorageUnavailable] if there is an SQL error.
    fn get_query(
        &self,
        query: TransactionQuery,
        session: &Session,
    ) -> Result<Vec<Transaction>, Error> {
        let mut query_string_parts = vec![
            "SELECT id, kind, amount, date, description, category_id, user_id FROM transactions"
                .to_string(),
        ];
        let mut where_clause_parts = vec!["user_id = ?1".to_string()];
        let mut query_parameters = vec![Value::Integer(session.user_id().as_i64())];

        if let Some(date_range) = query.date_range {
            where_clause_parts.push(format!(
                "date BETWEEN ?{} AND ?{}",
                query_parameters.len() + 1,
                query_parameters.len() + 2,
            ));
            query_parameters.push(Value::Text(date_range.start().to_string()));
            query_parameters.push(Value::Text(date_range.end().to_string()));
        }

        if let Some(category_id) = query.category_id {
            where_clause_parts.push(format!("category_id = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Integer(category_id));
        }

        query_string_parts.push(String::from("WHERE ") + &where_clause_parts.join(" AND "));
        query_string_parts.push("ORDER BY date DESC, id DESC".to_string());

        let query_string = query_string_parts.join(" ");
        let params = params_from_iter(query_parameters.iter());

        self.connection
            .lock()
            .unwrap()
            .prepare(&query_string)?
            .query_map(params, Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::StorageUnavailable))
            .collect()
    }

    /// Apply a partial update to the session user's transaction with `id`.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if the new amount is not strictly
    /// positive, [Error::NotFoundOrForbidden] if `id` does not refer to a
    /// transaction owned by the session user, or [Error::StorageUnavailable]
    /// if there is some other SQL error.
    fn update(
        &mut self,
        id: DatabaseID,
        changes: TransactionUpdate,
        session: &Session,
    ) -> Result<(), Error> {
        if changes.is_empty() {
            return Ok(());
        }

        if let Some(amount) = changes.amount {
            if !amount.is_finite() || amount <= 0.0 {
                return Err(Error::InvalidAmount(amount));
            }
        }

        let mut set_clause_parts = vec![];
        let mut query_parameters = vec![];

        if let Some(amount) = changes.amount {
            set_clause_parts.push(format!("amount = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Real(amount));
        }

        if let Some(description) = changes.description {
            set_clause_parts.push(format!("description = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(description));
        }

        let query_string = format!(
            "UPDATE transactions SET {} WHERE id = ?{} AND user_id = ?{}",
            set_clause_parts.join(", "),
            query_parameters.len() + 1,
            query_parameters.len() + 2,
        );
        query_parameters.push(Value::Integer(id));
        query_parameters.push(Value::Integer(session.user_id().as_i64()));

        let updated = self
            .connection
            .lock()
            .unwrap()
            .execute(&query_string, params_from_iter(query_parameters.iter()))?;

        if updated == 0 {
            return Err(Error::NotFoundOrForbidden);
        }

        Ok(())
    }

    /// Delete the session user's transaction with `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFoundOrForbidden] if `id` does not refer to a
    /// transaction owned by the session user, or [Error::StorageUnavailable]
    /// if there is some other SQL error.
    fn delete(&mut self, id: DatabaseID, session: &Session) -> Result<(), Error> {
        let deleted = self.connection.lock().unwrap().execute(
            "DELETE FROM transactions WHERE id = ?1 AND user_id = ?2",
            (id, session.user_id().as_i64()),
        )?;

        if deleted == 0 {
            return Err(Error::NotFoundOrForbidden);
        }

        Ok(())
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS transactions (
                    id INTEGER PRIMARY KEY,
                    kind TEXT NOT NULL CHECK (kind IN ('INCOME', 'EXPENSE')),
                    amount REAL NOT NULL,
                    date TEXT NOT NULL,
                    description TEXT NOT NULL,
                    category_id INTEGER,
                    user_id INTEGER NOT NULL,
                    FOREIGN KEY(category_id) REFERENCES categories(id) ON UPDATE CASCADE ON DELETE SET NULL,
                    FOREIGN KEY(user_id) REFERENCES users(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let kind = row.get(offset + 1)?;
        let amount = row.get(offset + 2)?;
        let date = row.get(offset + 3)?;
        let description = row.get(offset + 4)?;
        let category_id = row.get(offset + 5)?;
        let user_id = UserID::new(row.get(offset + 6)?);

        Ok(Transaction::new_unchecked(
            id,
            kind,
            amount,
            date,
            description,
            category_id,
            user_id,
        ))
    }
}
