//! This file defines the income/expense discriminator shared by categories
//! and transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Whether a category or transaction records money coming in or going out.
///
/// This is a closed enumeration: the database stores the strings `INCOME` and
/// `EXPENSE`, and nothing else is ever persisted or accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    /// Money coming in (salary, freelance work, ...).
    Income,
    /// Money going out (food, transport, ...).
    Expense,
}

impl Kind {
    /// The string stored in the database for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Income => "INCOME",
            Kind::Expense => "EXPENSE",
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Kind {
    type Err = Error;

    /// Parse a kind from user or database input, ignoring case.
    ///
    /// # Errors
    /// Returns [Error::InvalidKind] for anything other than `INCOME` or
    /// `EXPENSE`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INCOME" => Ok(Kind::Income),
            "EXPENSE" => Ok(Kind::Expense),
            _ => Err(Error::InvalidKind(s.to_string())),
        }
    }
}

impl ToSql for Kind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for Kind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().and_then(|text| {
            text.parse()
                .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
        })
    }
}
