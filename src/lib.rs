//! Tally is a console app for tracking personal income, expenses and savings
//! goals.
//!
//! This library provides the ledger core: session-based authentication, an
//! ownership-scoped store layer over SQLite, and read-only analytics over a
//! user's transaction history. The interactive menu lives in the binary and
//! only ever talks to the core through the store traits and the [auth] and
//! [analytics] modules.

#![warn(missing_docs)]

pub mod analytics;
pub mod auth;
pub mod db;
mod error;
pub mod models;
mod session;
mod state;
pub mod stores;

pub use error::Error;
pub use session::Session;
pub use state::AppState;
