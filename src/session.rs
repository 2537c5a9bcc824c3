//! The session context that scopes every ledger operation to one user.

use crate::models::UserID;

/// Proof of a successful log-in, carrying the user all ledger operations are
/// scoped to.
///
/// A session is only handed out by [register_user](crate::auth::register_user)
/// and [log_in](crate::auth::log_in), and is discarded by
/// [log_out](crate::auth::log_out). Store and analytics calls take the session
/// explicitly; there is no process-global current user.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    user_id: UserID,
    username: String,
}

impl Session {
    pub(crate) fn new(user_id: UserID, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
        }
    }

    /// The ID of the logged-in user.
    pub fn user_id(&self) -> UserID {
        self.user_id
    }

    /// The name of the logged-in user.
    pub fn username(&self) -> &str {
        &self.username
    }
}
