/// SQLite implementation of the contact table.
pub mod sqlite;

use std::fmt;

use crate::{contact::Contact, types::ContactId};

/// Storage failure surfaced by the contact table.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite failure.
    Sqlite(rusqlite::Error),
    /// Any other storage failure, described in text.
    Message(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Sqlite(e) => write!(f, "sqlite error: {e}"),
            StoreError::Message(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Sqlite(e) => Some(e),
            StoreError::Message(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Result alias for contact table operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Durable contact table: the single owner of persisted rows.
pub trait ContactTable: Send {
    /// Inserts `contact` when its id is unassigned (a fresh unique id is
    /// generated), otherwise replaces the row with the matching id in
    /// place. Returns the effective id.
    fn upsert(&mut self, contact: &Contact) -> StoreResult<ContactId>;

    /// Removes the row with the matching id. Returns whether a row was
    /// removed; an absent id is a no-op, not an error.
    fn delete(&mut self, id: ContactId) -> StoreResult<bool>;

    /// The full table in store order. Re-run after every committed write to
    /// feed the live query.
    fn all(&mut self) -> StoreResult<Vec<Contact>>;
}
