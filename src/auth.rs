//! User registration, log-in and log-out.
//!
//! These functions are the only way to obtain a [Session]; every store and
//! analytics call takes the session they return. Passwords are hashed with
//! bcrypt before they reach the store layer.

use crate::{
    Error, Session,
    models::{CategoryName, Kind, PasswordHash},
    stores::{CategoryStore, UserStore},
};

/// The categories every new user starts with.
pub const DEFAULT_CATEGORIES: [(&str, Kind); 5] = [
    ("Salary", Kind::Income),
    ("Freelance", Kind::Income),
    ("Food", Kind::Expense),
    ("Transport", Kind::Expense),
    ("Entertainment", Kind::Expense),
];

/// The credentials of the account seeded into an empty database.
const DEFAULT_ADMIN: (&str, &str, &str) = ("admin", "admin123", "admin@example.com");

/// Register a new user and log them in.
///
/// The password is salted and hashed with bcrypt at the given `cost` before
/// it is stored; pass [PasswordHash::DEFAULT_COST] outside of tests. On
/// success the new user's ledger is seeded with [DEFAULT_CATEGORIES].
///
/// # Errors
/// Returns [Error::DuplicateUsername] if the username is already taken
/// (exact, case-sensitive match).
pub fn register_user<U, C>(
    user_store: &mut U,
    category_store: &mut C,
    username: &str,
    password: &str,
    email: Option<String>,
    cost: u32,
) -> Result<Session, Error>
where
    U: UserStore,
    C: CategoryStore,
{
    let password_hash = PasswordHash::new(password, cost)?;
    let user = user_store.create(username, password_hash, email)?;
    let session = Session::new(user.id(), username);

    seed_default_categories(category_store, &session)?;

    tracing::info!("registered user {} with ID {}", username, user.id());

    Ok(session)
}

/// Give the session user the default set of categories.
///
/// Uses insert-if-absent semantics, so running it again for the same user
/// never produces duplicates.
fn seed_default_categories<C: CategoryStore>(
    category_store: &mut C,
    session: &Session,
) -> Result<(), Error> {
    for (name, kind) in DEFAULT_CATEGORIES {
        category_store.create_if_absent(CategoryName::new_unchecked(name), kind, session)?;
    }

    Ok(())
}

/// Log an existing user in.
///
/// # Errors
/// Returns [Error::NotFound] if no user has this username, and
/// [Error::InvalidCredentials] if the password does not match.
pub fn log_in<U: UserStore>(
    user_store: &U,
    username: &str,
    password: &str,
) -> Result<Session, Error> {
    let user = user_store.get_by_username(username)?;

    if !user.password_hash().verify(password)? {
        return Err(Error::InvalidCredentials);
    }

    tracing::info!("user {} logged in", username);

    Ok(Session::new(user.id(), username))
}

/// Log out by discarding the session.
///
/// Consuming the session makes log-out idempotent: once it is gone there is
/// nothing left to clear.
pub fn log_out(session: Session) {
    tracing::info!("user {} logged out", session.username());
}

/// Insert the default admin account if the database has no users yet.
///
/// Returns whether the account was created.
///
/// # Errors
/// Returns [Error::StorageUnavailable] if the user count or insert fails.
pub fn ensure_default_admin<U: UserStore>(user_store: &mut U, cost: u32) -> Result<bool, Error> {
    if user_store.count()? > 0 {
        return Ok(false);
    }

    let (username, password, email) = DEFAULT_ADMIN;
    let password_hash = PasswordHash::new(password, cost)?;
    user_store.create(username, password_hash, Some(email.to_string()))?;

    tracing::info!("created default account {}", username);

    Ok(true)
}
