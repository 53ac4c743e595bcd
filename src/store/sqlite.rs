//! SQLite-backed contact table.

use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use rusqlite::{Connection, params};

use crate::{
    contact::Contact,
    types::{ContactId, UNASSIGNED_CONTACT_ID},
};

use super::{ContactTable, StoreError, StoreResult};

const SCHEMA_VERSION: i64 = 1;

/// Folder name used beneath the user's home directory for the database.
const DATA_DIR_NAME: &str = ".rolodex";
/// SQLite file name stored inside that folder.
const DB_FILE_NAME: &str = "contacts.sqlite";

/// SQLite implementation of [`crate::store::ContactTable`].
pub struct SqliteContactTable {
    conn: Connection,
}

impl SqliteContactTable {
    /// Opens or creates the contact table at `path`, creating parent
    /// directories as needed.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::Message(format!("create data directory: {e}")))?;
        }
        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened contact table");
        Self::init_connection(conn)
    }

    /// Opens an in-memory contact table.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    /// Conventional per-user database location
    /// (`~/.rolodex/contacts.sqlite`).
    pub fn default_path() -> StoreResult<PathBuf> {
        let base_dirs = BaseDirs::new()
            .ok_or_else(|| StoreError::Message("could not locate home directory".to_string()))?;
        Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
    }

    fn init_connection(conn: Connection) -> StoreResult<Self> {
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if version > SCHEMA_VERSION {
            return Err(StoreError::Message(format!(
                "unsupported schema version: {version}"
            )));
        }
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        Ok(Self { conn })
    }
}

impl ContactTable for SqliteContactTable {
    fn upsert(&mut self, contact: &Contact) -> StoreResult<ContactId> {
        if contact.id == UNASSIGNED_CONTACT_ID {
            self.conn.execute(
                "INSERT INTO contact_table(name, lastName, phoneNumber, profileImage, lastEdited) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    contact.name,
                    contact.email,
                    contact.phone_number,
                    contact.profile_image,
                    contact.last_edited,
                ],
            )?;
            Ok(self.conn.last_insert_rowid())
        } else {
            // ON CONFLICT UPDATE keeps the rowid, so an edited contact keeps
            // its position in the emitted list.
            self.conn.execute(
                "INSERT INTO contact_table(id, name, lastName, phoneNumber, profileImage, lastEdited) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
                 ON CONFLICT(id) DO UPDATE SET \
                 name = excluded.name, lastName = excluded.lastName, \
                 phoneNumber = excluded.phoneNumber, profileImage = excluded.profileImage, \
                 lastEdited = excluded.lastEdited",
                params![
                    contact.id,
                    contact.name,
                    contact.email,
                    contact.phone_number,
                    contact.profile_image,
                    contact.last_edited,
                ],
            )?;
            Ok(contact.id)
        }
    }

    fn delete(&mut self, id: ContactId) -> StoreResult<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM contact_table WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    fn all(&mut self) -> StoreResult<Vec<Contact>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, lastName, phoneNumber, profileImage, lastEdited \
             FROM contact_table ORDER BY id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Contact {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                phone_number: row.get(3)?,
                profile_image: row.get(4)?,
                last_edited: row.get(5)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}
