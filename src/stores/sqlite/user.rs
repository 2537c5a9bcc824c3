//! Implements a SQLite backed user store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{PasswordHash, User, UserID},
    stores::UserStore,
};

/// Handles the creation and retrieval of user accounts in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new user store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    /// Create and insert a new user into the database.
    ///
    /// # Panics
    /// Panics if the database lock is already acquired by the same thread or
    /// is poisoned.
    ///
    /// # Errors
    /// Returns [Error::DuplicateUsername] if the username is already taken,
    /// or [Error::StorageUnavailable] if an SQL related error occurred.
    fn create(
        &mut self,
        username: &str,
        password_hash: PasswordHash,
        email: Option<String>,
    ) -> Result<User, Error> {
        let created_at = OffsetDateTime::now_utc();
        let connection = self.connection.lock().unwrap();

        connection
            .execute(
                "INSERT INTO users (username, password, email, created_at) VALUES (?1, ?2, ?3, ?4)",
                (username, password_hash.as_ref(), &email, created_at),
            )
            .map_err(|error| match error {
                // Code 2067 occurs when a UNIQUE constraint failed.
                rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                    if sql_error.extended_code == 2067 && desc.contains("username") =>
                {
                    Error::DuplicateUsername(username.to_string())
                }
                error => error.into(),
            })?;

        let id = UserID::new(connection.last_insert_rowid());

        Ok(User::new(
            id,
            username.to_string(),
            password_hash,
            email,
            created_at,
        ))
    }

    /// Get the user with the specified `username`.
    ///
    /// The match is exact and case-sensitive: `Alice` and `alice` are
    /// different accounts.
    ///
    /// # Panics
    /// Panics if the database lock is already acquired by the same thread or
    /// is poisoned.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no user with the specified
    /// username, or [Error::StorageUnavailable] if there are SQL related
    /// errors.
    fn get_by_username(&self, username: &str) -> Result<User, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, username, password, email, created_at FROM users
                 WHERE username = :username",
            )?
            .query_row(&[(":username", username)], Self::map_row)
            .map_err(|error| error.into())
    }

    fn count(&self) -> Result<usize, Error> {
        self.connection
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(id) FROM users;", [], |row| {
                row.get::<_, i64>(0).map(|count| count as usize)
            })
            .map_err(|error| error.into())
    }
}

impl CreateTable for SQLiteUserStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS users (
                    id INTEGER PRIMARY KEY,
                    username TEXT UNIQUE NOT NULL,
                    password TEXT NOT NULL,
                    email TEXT,
                    created_at TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteUserStore {
    type ReturnType = User;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_id = row.get(offset)?;
        let username = row.get(offset + 1)?;
        let raw_password_hash: String = row.get(offset + 2)?;
        let email = row.get(offset + 3)?;
        let created_at = row.get(offset + 4)?;

        Ok(Self::ReturnType::new(
            UserID::new(raw_id),
            username,
            PasswordHash::new_unchecked(&raw_password_hash),
            email,
            created_at,
        ))
    }
}
