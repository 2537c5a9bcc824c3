//! Defines the app level error type shared across the crate.

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An operation that needs a logged-in user was attempted without one.
    #[error("you must be logged in to do that")]
    Unauthenticated,

    /// The user provided a password that does not match the stored credential.
    #[error("incorrect password")]
    InvalidCredentials,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The username chosen at registration is already taken.
    #[error("the username \"{0}\" already exists")]
    DuplicateUsername(String),

    /// The user already has a category with the given name.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategory(String),

    /// A zero, negative or non-finite number was used where a strictly
    /// positive amount is required.
    ///
    /// Amounts are always positive: whether money came in or went out is
    /// carried by [Kind](crate::models::Kind), never by the sign.
    #[error("{0} is not a valid amount, amounts must be positive")]
    InvalidAmount(f64),

    /// A string other than `INCOME` or `EXPENSE` was used as a kind.
    #[error("\"{0}\" is not a valid kind, expected INCOME or EXPENSE")]
    InvalidKind(String),

    /// An empty or whitespace-only string was used where a name is required.
    #[error("names cannot be empty")]
    InvalidName,

    /// A category reference did not resolve to a category owned by the
    /// current user.
    #[error("the category ID does not refer to one of your categories")]
    ForeignKeyViolation,

    /// The row either does not exist or belongs to another user.
    ///
    /// The two cases are collapsed into a single variant so that no caller
    /// can learn whether another user's row exists. Keeping the merge in the
    /// type rather than in error messages makes the opacity structural.
    #[error("the requested item was not found, or you do not have permission to change it")]
    NotFoundOrForbidden,

    /// An unexpected error occurred in the underlying hashing library.
    ///
    /// The error string should only be logged for debugging; when talking to
    /// the user it should be replaced with a generic failure message.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An unhandled/unexpected error from the persistence layer.
    #[error("the storage layer failed: {0}")]
    StorageUnavailable(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(_)) if sql_error.extended_code == 787 => {
                Error::ForeignKeyViolation
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::StorageUnavailable(error)
            }
        }
    }
}
