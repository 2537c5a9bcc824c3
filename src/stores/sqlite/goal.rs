//! Implements a SQLite backed savings goal store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error, Session,
    db::{CreateTable, MapRow},
    models::{Goal, NewGoal, UserID},
    stores::GoalStore,
};

/// Stores savings goals in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteGoalStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteGoalStore {
    /// Create a new goal store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl GoalStore for SQLiteGoalStore {
    /// Create a new goal in the database.
    ///
    /// # Errors
    /// Returns [Error::StorageUnavailable] if there is an SQL error.
    fn create(&mut self, new_goal: NewGoal, session: &Session) -> Result<Goal, Error> {
        let goal = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "INSERT INTO goals (name, target_amount, target_date, user_id)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id, name, target_amount, current_amount, target_date, user_id",
            )?
            .query_row(
                (
                    new_goal.name(),
                    new_goal.target_amount(),
                    new_goal.target_date(),
                    session.user_id().as_i64(),
                ),
                Self::map_row,
            )?;

        Ok(goal)
    }

    /// Retrieve the session user's goals, soonest target date first.
    ///
    /// # Errors
    /// Returns [Error::StorageUnavailable] if there is an SQL error.
    fn get_all(&self, session: &Session) -> Result<Vec<Goal>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, name, target_amount, current_amount, target_date, user_id
                 FROM goals
                 WHERE user_id = ?1
                 ORDER BY target_date, id",
            )?
            .query_map((session.user_id().as_i64(),), Self::map_row)?
            .map(|maybe_goal| maybe_goal.map_err(|error| error.into()))
            .collect()
    }
}

impl CreateTable for SQLiteGoalStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS goals (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    target_amount REAL NOT NULL,
                    current_amount REAL NOT NULL DEFAULT 0,
                    target_date TEXT NOT NULL,
                    user_id INTEGER NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES users(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteGoalStore {
    type ReturnType = Goal;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let name = row.get(offset + 1)?;
        let target_amount = row.get(offset + 2)?;
        let current_amount = row.get(offset + 3)?;
        let target_date = row.get(offset + 4)?;
        let user_id = UserID::new(row.get(offset + 5)?);

        Ok(Goal::new_unchecked(
            id,
            name,
            target_amount,
            current_amount,
            target_date,
            user_id,
        ))
    }
}

#[cfg(test)]
mod goal_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Session,
        models::{NewGoal, PasswordHash},
        stores::{
            UserStore,
            sqlite::{SqliteAppState, create_app_state},
        },
    };

    use super::GoalStore;

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
    fn create_goal_starts_with_zero_current_amount() {
        let mut state = get_app_state();
        let session = create_test_session(&mut state, "alice");

        let goal = state
            .goal_store
            .create(
                NewGoal::new("Holiday", 2500.0, date!(2025 - 12 - 01)).unwrap(),
                &session,
            )
            .unwrap();

        assert!(goal.id() > 0);
        assert_eq!(goal.name(), "Holiday");
        assert_eq!(goal.target_amount(), 2500.0);
        assert_eq!(goal.current_amount(), 0.0);
        assert_eq!(goal.target_date(), date!(2025 - 12 - 01));
        assert_eq!(goal.user_id(), session.user_id());
    }

    #[test]
    fn get_all_orders_by_target_date_ascending() {
        let mut state = get_app_state();
        let session = create_test_session(&mut state, "alice");

        for (name, target_date) in [
            ("Car", date!(2026 - 06 - 01)),
            ("Holiday", date!(2025 - 12 - 01)),
            ("Laptop", date!(2026 - 01 - 15)),
        ] {
            state
                .goal_store
                .create(NewGoal::new(name, 1000.0, target_date).unwrap(), &session)
                .unwrap();
        }

        let goals = state.goal_store.get_all(&session).unwrap();
        let names: Vec<&str> = goals.iter().map(|goal| goal.name()).collect();

        assert_eq!(names, vec!["Holiday", "Laptop", "Car"]);
    }

    #[test]
    fn get_all_is_scoped_to_the_session_user() {
        let mut state = get_app_state();
        let alice = create_test_session(&mut state, "alice");
        let bob = create_test_session(&mut state, "bob");

        state
            .goal_store
            .create(
                NewGoal::new("Hers", 1000.0, date!(2025 - 12 - 01)).unwrap(),
                &alice,
            )
            .unwrap();

        let bobs_goals = state.goal_store.get_all(&bob).unwrap();

        assert!(bobs_goals.is_empty());
    }
}
