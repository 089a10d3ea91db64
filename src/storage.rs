//! Persistence for the simulated remote.
//!
//! The remote is a single JSON record. Absence of a record is a valid
//! state: no remote has been created yet.
//!
//! ```text
//! <state-dir>/
//!   remote.sqlite    # one row: the RemoteRepository as JSON
//! ```

mod memory;
mod sqlite;

use std::io;

pub use memory::MemoryRemoteStore;
pub use sqlite::SqliteRemoteStore;

use crate::model::RemoteRepository;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// Where the remote record lives between commands.
pub trait RemoteStore {
    /// The stored record, or `None` when no remote exists.
    fn load(&self) -> Result<Option<RemoteRepository>>;

    /// Replaces the stored record.
    fn save(&mut self, remote: &RemoteRepository) -> Result<()>;

    /// Removes the stored record. Idempotent.
    fn clear(&mut self) -> Result<()>;
}
