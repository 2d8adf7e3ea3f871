//! Named key-value persistence for serialized content.
//!
//! # Responsibility
//! - Define the `Store` seam content managers are constructed with.
//! - Provide in-memory and SQLite backends plus typed JSON list helpers.
//!
//! # Invariants
//! - Keys are non-empty; values are opaque strings to every backend.
//! - `set` overwrites any prior value for the key in full.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub mod json;
pub mod memory;
pub mod sqlite;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure raised by a store backend or by the JSON codec above it.
#[derive(Debug)]
pub enum StoreError {
    /// Key was empty or whitespace.
    InvalidKey(String),
    /// Backend could not read or write.
    Db(DbError),
    /// Value could not be encoded for `key`.
    Serialize {
        key: String,
        source: serde_json::Error,
    },
    /// Stored value under `key` is not valid JSON for the expected shape.
    Corrupt {
        key: String,
        source: serde_json::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKey(key) => write!(f, "invalid store key: `{key}`"),
            Self::Db(err) => Display::fmt(err, f),
            Self::Serialize { key, .. } => write!(f, "failed to serialize value for `{key}`"),
            Self::Corrupt { key, .. } => write!(f, "stored value for `{key}` is corrupt"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidKey(_) => None,
            // Transparent: `Display` already forwards to the backend error.
            Self::Db(err) => err.source(),
            Self::Serialize { source, .. } | Self::Corrupt { source, .. } => Some(source),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// String-keyed persistence backend.
///
/// Methods take `&self` so several content managers can share one store
/// through `&S` or `Rc<S>`.
pub trait Store {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;

    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: Store + ?Sized> Store for &S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }

    fn contains(&self, key: &str) -> StoreResult<bool> {
        (**self).contains(key)
    }
}

impl<S: Store + ?Sized> Store for Rc<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }

    fn contains(&self, key: &str) -> StoreResult<bool> {
        (**self).contains(key)
    }
}

pub(crate) fn check_key(key: &str) -> StoreResult<()> {
    if key.trim().is_empty() {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Renders `err` followed by each `source()` cause, `: `-separated.
pub(crate) fn error_chain(err: &dyn Error) -> String {
    let mut rendered = err.to_string();
    let mut cause = err.source();
    while let Some(inner) = cause {
        rendered.push_str(": ");
        rendered.push_str(&inner.to_string());
        cause = inner.source();
    }
    rendered
}
