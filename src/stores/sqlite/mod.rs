//! Contains the SQLite backed store implementations and the function that
//! wires them into an [AppState].

mod category;
mod goal;
mod transaction;
mod user;

pub use category::SQLiteCategoryStore;
pub use goal::SQLiteGoalStore;
pub use transaction::SQLiteTransactionStore;
pub use user::SQLiteUserStore;

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{AppState, Error, db::CreateTable};

/// An alias for an [AppState] that uses SQLite for the backend.
pub type SqliteAppState =
    AppState<SQLiteCategoryStore, SQLiteGoalStore, SQLiteTransactionStore, SQLiteUserStore>;

/// Creates an [AppState] instance that uses SQLite for the backend.
///
/// This function enables foreign key enforcement and adds the tables for the
/// domain models to the database if they do not exist yet.
pub fn create_app_state(db_connection: Connection) -> Result<SqliteAppState, Error> {
    db_connection.execute_batch("PRAGMA foreign_keys = ON;")?;
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));

    Ok(AppState::new(
        SQLiteCategoryStore::new(connection.clone()),
        SQLiteGoalStore::new(connection.clone()),
        SQLiteTransactionStore::new(connection.clone()),
        SQLiteUserStore::new(connection),
    ))
}

/// Create the tables for all domain models as a single exclusive transaction.
fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    SQLiteUserStore::create_table(&transaction)?;
    SQLiteCategoryStore::create_table(&transaction)?;
    SQLiteTransactionStore::create_table(&transaction)?;
    SQLiteGoalStore::create_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
