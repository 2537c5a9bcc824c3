//! Defines the application state which bundles the store for each domain
//! model.

use crate::stores::{CategoryStore, GoalStore, TransactionStore, UserStore};

/// The state for the application: one store per domain model, all sharing the
/// same underlying database.
#[derive(Debug, Clone)]
pub struct AppState<C, G, T, U>
where
    C: CategoryStore,
    G: GoalStore,
    T: TransactionStore,
    U: UserStore,
{
    /// The store for categories.
    pub category_store: C,
    /// The store for savings goals.
    pub goal_store: G,
    /// The store for transactions.
    pub transaction_store: T,
    /// The store for users.
    pub user_store: U,
}

impl<C, G, T, U> AppState<C, G, T, U>
where
    C: CategoryStore,
    G: GoalStore,
    T: TransactionStore,
    U: UserStore,
{
    /// Create the app state.
    pub fn new(category_store: C, goal_store: G, transaction_store: T, user_store: U) -> Self {
        Self {
            category_store,
            goal_store,
            transaction_store,
            user_store,
        }
    }
}
