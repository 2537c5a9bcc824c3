//! Implements a SQLite backed category store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error, Session,
    db::{CreateTable, MapRow},
    models::{Category, CategoryName, DatabaseID, Kind, UserID},
    stores::CategoryStore,
};

/// Creates and retrieves transaction categories to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new category store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl CategoryStore for SQLiteCategoryStore {
    /// Create a category in the database.
    ///
    /// # Errors
    /// Returns [Error::DuplicateCategory] if the session user already has a
    /// category called `name`, or [Error::StorageUnavailable] if there is
    /// some other SQL error.
    fn create(
        &mut self,
        name: CategoryName,
        kind: Kind,
        session: &Session,
    ) -> Result<Category, Error> {
        let connection = self.connection.lock().unwrap();

        connection
            .execute(
                "INSERT INTO categories (name, kind, user_id) VALUES (?1, ?2, ?3)",
                (name.as_ref(), kind, session.user_id().as_i64()),
            )
            .map_err(|error| match error {
                // Code 2067 occurs when a UNIQUE constraint failed.
                rusqlite::Error::SqliteFailure(sql_error, Some(_))
                    if sql_error.extended_code == 2067 =>
                {
                    Error::DuplicateCategory(name.to_string())
                }
                error => error.into(),
            })?;

        let id = connection.last_insert_rowid();

        Ok(Category::new(id, name, kind, session.user_id()))
    }

    /// Create a category unless the session user already has one with the
    /// same name.
    ///
    /// # Errors
    /// Returns [Error::StorageUnavailable] if there is an SQL error.
    fn create_if_absent(
        &mut self,
        name: CategoryName,
        kind: Kind,
        session: &Session,
    ) -> Result<(), Error> {
        self.connection.lock().unwrap().execute(
            "INSERT OR IGNORE INTO categories (name, kind, user_id) VALUES (?1, ?2, ?3)",
            (name.as_ref(), kind, session.user_id().as_i64()),
        )?;

        Ok(())
    }

    /// Retrieve the session user's category with `category_id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the ID does not resolve to a category
    /// owned by the session user, or [Error::StorageUnavailable] if there is
    /// some other SQL error.
    fn get(&self, category_id: DatabaseID, session: &Session) -> Result<Category, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, name, kind, user_id FROM categories
                 WHERE id = ?1 AND user_id = ?2",
            )?
            .query_row((category_id, session.user_id().as_i64()), Self::map_row)
            .map_err(|error| error.into())
    }

    /// Retrieve the session user's categories ordered by kind then name.
    ///
    /// # Errors
    /// Returns [Error::StorageUnavailable] if there is an SQL error.
    fn get_all(&self, kind: Option<Kind>, session: &Session) -> Result<Vec<Category>, Error> {
        let connection = self.connection.lock().unwrap();

        let mut statement = match kind {
            Some(_) => connection.prepare(
                "SELECT id, name, kind, user_id FROM categories
                 WHERE user_id = ?1 AND kind = ?2
                 ORDER BY kind, name",
            )?,
            None => connection.prepare(
                "SELECT id, name, kind, user_id FROM categories
                 WHERE user_id = ?1
                 ORDER BY kind, name",
            )?,
        };

        let rows = match kind {
            Some(kind) => statement.query_map((session.user_id().as_i64(), kind), Self::map_row)?,
            None => statement.query_map((session.user_id().as_i64(),), Self::map_row)?,
        };

        rows.map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect()
    }

    /// Delete the session user's category with `category_id`.
    ///
    /// The deletion and the clearing of the category reference on dependent
    /// transactions happen in one storage transaction.
    ///
    /// # Errors
    /// Returns [Error::NotFoundOrForbidden] if the ID does not exist or the
    /// category belongs to another user, or [Error::StorageUnavailable] if
    /// there is some other SQL error.
    fn delete(&mut self, category_id: DatabaseID, session: &Session) -> Result<(), Error> {
        let connection = self.connection.lock().unwrap();
        let transaction = connection.unchecked_transaction()?;

        transaction.execute(
            "UPDATE transactions SET category_id = NULL
             WHERE category_id = ?1 AND user_id = ?2",
            (category_id, session.user_id().as_i64()),
        )?;

        let deleted = transaction.execute(
            "DELETE FROM categories WHERE id = ?1 AND user_id = ?2",
            (category_id, session.user_id().as_i64()),
        )?;

        if deleted == 0 {
            // Dropping the transaction rolls back the dependent update.
            return Err(Error::NotFoundOrForbidden);
        }

        transaction.commit()?;

        Ok(())
    }
}

impl CreateTable for SQLiteCategoryStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS categories (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    kind TEXT NOT NULL CHECK (kind IN ('INCOME', 'EXPENSE')),
                    user_id INTEGER NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES users(id) ON UPDATE CASCADE ON DELETE CASCADE,
                    UNIQUE(name, user_id)
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteCategoryStore {
    type ReturnType = Category;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;

        let raw_name: String = row.get(offset + 1)?;
        let name = CategoryName::new_unchecked(&raw_name);

        let kind = row.get(offset + 2)?;
        let user_id = UserID::new(row.get(offset + 3)?);

        Ok(Self::ReturnType::new(id, name, kind, user_id))
    }
}

#[cfg(test)]
mod category_tests {
    use rusqlite::Connection;

    use crate::{
        Session,
        models::{CategoryName, Kind, NewTransaction, PasswordHash},
        stores::{
            TransactionStore, UserStore,
            sqlite::{SqliteAppState, create_app_state},
        },
    };
    use time::macros::date;

    use super::{CategoryStore, Error};

    fn get_app_state() -> SqliteAppState {
        let connection = Connection::open_in_memory().unwrap();
        create_app_state(connection).unwrap()
    }

    fn create_test_session(state: &mut SqliteAppState, username: &str) -> Session {
        let user = state
            .user_store
            .create(username, PasswordHash::new_unchecked("hunter2"), None)
            .unwrap();

        Session::new(user.id(), username)
    }

    #[test]
    fn create_category_succeeds() {
        let mut state = get_app_state();
        let session = create_test_session(&mut state, "alice");
        let name = CategoryName::new("Categorically a category").unwrap();

        let category = state
            .category_store
            .create(name.clone(), Kind::Expense, &session)
            .unwrap();

        assert!(category.id() > 0);
        assert_eq!(category.name(), &name);
        assert_eq!(category.kind(), Kind::Expense);
        assert_eq!(category.user_id(), session.user_id());
    }

    #[test]
    fn create_category_fails_on_duplicate_name_for_same_user() {
        let mut state = get_app_state();
        let session = create_test_session(&mut state, "alice");
        let name = CategoryName::new_unchecked("Food");

        state
            .category_store
            .create(name.clone(), Kind::Expense, &session)
            .unwrap();

        let duplicate = state.category_store.create(name, Kind::Expense, &session);

        assert_eq!(
            duplicate,
            Err(Error::DuplicateCategory("Food".to_string()))
        );
    }

    #[test]
    fn create_category_allows_same_name_for_different_users() {
        let mut state = get_app_state();
        let alice = create_test_session(&mut state, "alice");
        let bob = create_test_session(&mut state, "bob");
        let name = CategoryName::new_unchecked("Food");

        state
            .category_store
            .create(name.clone(), Kind::Expense, &alice)
            .unwrap();

        let result = state.category_store.create(name, Kind::Expense, &bob);

        assert!(result.is_ok());
    }

    #[test]
    fn create_if_absent_never_duplicates() {
        let mut state = get_app_state();
        let session = create_test_session(&mut state, "alice");
        let name = CategoryName::new_unchecked("Salary");

        state
            .category_store
            .create_if_absent(name.clone(), Kind::Income, &session)
            .unwrap();
        state
            .category_store
            .create_if_absent(name, Kind::Income, &session)
            .unwrap();

        let categories = state.category_store.get_all(None, &session).unwrap();

        assert_eq!(categories.len(), 1);
    }

    #[test]
    fn get_category_with_other_users_id_returns_not_found() {
        let mut state = get_app_state();
        let alice = create_test_session(&mut state, "alice");
        let bob = create_test_session(&mut state, "bob");

        let category = state
            .category_store
            .create(CategoryName::new_unchecked("Food"), Kind::Expense, &alice)
            .unwrap();

        let selected = state.category_store.get(category.id(), &bob);

        assert_eq!(selected, Err(Error::NotFound));
    }

    #[test]
    fn get_all_orders_by_kind_then_name() {
        let mut state = get_app_state();
        let session = create_test_session(&mut state, "alice");

        for (name, kind) in [
            ("Salary", Kind::Income),
            ("Transport", Kind::Expense),
            ("Food", Kind::Expense),
        ] {
            state
                .category_store
                .create(CategoryName::new_unchecked(name), kind, &session)
                .unwrap();
        }

        let categories = state.category_store.get_all(None, &session).unwrap();
        let names: Vec<&str> = categories
            .iter()
            .map(|category| category.name().as_ref())
            .collect();

        // EXPENSE sorts before INCOME.
        assert_eq!(names, vec!["Food", "Transport", "Salary"]);
    }

    #[test]
    fn get_all_filters_by_kind() {
        let mut state = get_app_state();
        let session = create_test_session(&mut state, "alice");

        state
            .category_store
            .create(CategoryName::new_unchecked("Salary"), Kind::Income, &session)
            .unwrap();
        state
            .category_store
            .create(CategoryName::new_unchecked("Food"), Kind::Expense, &session)
            .unwrap();

        let income_only = state
            .category_store
            .get_all(Some(Kind::Income), &session)
            .unwrap();

        assert_eq!(income_only.len(), 1);
        assert_eq!(income_only[0].name().as_ref(), "Salary");
    }

    #[test]
    fn delete_clears_references_but_keeps_transactions() {
        let mut state = get_app_state();
        let session = create_test_session(&mut state, "alice");

        let category = state
            .category_store
            .create(CategoryName::new_unchecked("Food"), Kind::Expense, &session)
            .unwrap();

        let referencing = [
            state
                .transaction_store
                .create(
                    NewTransaction::new(
                        Kind::Expense,
                        12.30,
                        date!(2024 - 08 - 05),
                        "Groceries",
                        Some(category.id()),
                    )
                    .unwrap(),
                    &session,
                )
                .unwrap(),
            state
                .transaction_store
                .create(
                    NewTransaction::new(
                        Kind::Expense,
                        45.60,
                        date!(2024 - 08 - 06),
                        "Eating out",
                        Some(category.id()),
                    )
                    .unwrap(),
                    &session,
                )
                .unwrap(),
        ];

        state
            .category_store
            .delete(category.id(), &session)
            .unwrap();

        assert_eq!(
            state.category_store.get(category.id(), &session),
            Err(Error::NotFound)
        );

        for want in referencing {
            let got = state.transaction_store.get(want.id(), &session).unwrap();

            assert_eq!(got.category_id(), None);
            assert_eq!(got.amount(), want.amount());
            assert_eq!(got.date(), want.date());
            assert_eq!(got.description(), want.description());
        }
    }

    #[test]
    fn delete_other_users_category_is_forbidden() {
        let mut state = get_app_state();
        let alice = create_test_session(&mut state, "alice");
        let bob = create_test_session(&mut state, "bob");

        let category = state
            .category_store
            .create(CategoryName::new_unchecked("Food"), Kind::Expense, &alice)
            .unwrap();

        let result = state.category_store.delete(category.id(), &bob);

        assert_eq!(result, Err(Error::NotFoundOrForbidden));

        // Alice still has her category.
        assert!(state.category_store.get(category.id(), &alice).is_ok());
    }

    #[test]
    fn delete_non_existent_category_is_forbidden() {
        let mut state = get_app_state();
        let session = create_test_session(&mut state, "alice");

        let result = state.category_store.delete(1337, &session);

        assert_eq!(result, Err(Error::NotFoundOrForbidden));
    }
}
