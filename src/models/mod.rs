//! The domain models: users, categories, transactions and savings goals.

mod category;
mod goal;
mod kind;
mod password;
mod transaction;
mod user;

/// An alias for the integer row IDs assigned by the database.
pub type DatabaseID = i64;

pub use category::{Category, CategoryName};
pub use goal::{Goal, NewGoal};
pub use kind::Kind;
pub use password::PasswordHash;
pub use transaction::{NewTransaction, Transaction, TransactionUpdate};
pub use user::{User, UserID};
