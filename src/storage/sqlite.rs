//! SQLite-backed remote store.
//!
//! The record is kept as JSON text in a table that holds at most one row.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension};

use crate::model::RemoteRepository;

use super::{RemoteStore, Result};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS remote (
    slot INTEGER PRIMARY KEY CHECK (slot = 0),
    record TEXT NOT NULL
)";

pub struct SqliteRemoteStore {
    conn: Connection,
}

impl SqliteRemoteStore {
    /// Opens (or creates) the store at `<dir>/remote.sqlite`.
    ///
    /// The directory is created if it doesn't exist.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let conn = Connection::open(Self::path(dir))?;
        conn.execute(SCHEMA, [])?;
        Ok(Self { conn })
    }

    /// The database file inside a state directory.
    pub fn path(dir: &Path) -> PathBuf {
        dir.join("remote.sqlite")
    }
}

impl RemoteStore for SqliteRemoteStore {
    fn load(&self) -> Result<Option<RemoteRepository>> {
        let record: Option<String> = self
            .conn
            .query_row("SELECT record FROM remote WHERE slot = 0", [], |row| {
                row.get(0)
            })
            .optional()?;
        match record {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, remote: &RemoteRepository) -> Result<()> {
        let json = serde_json::to_string(remote)?;
        self.conn.execute(
            "INSERT INTO remote (slot, record) VALUES (0, ?1)
             ON CONFLICT(slot) DO UPDATE SET record = excluded.record",
            rusqlite::params![json],
        )?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.conn.execute("DELETE FROM remote", [])?;
        Ok(())
    }
}
