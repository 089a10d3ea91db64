//! The version-control engine the trainer drives.
//!
//! `VersionControl` is the collaborator contract: everything the dispatcher,
//! the remote simulator and the missions need from a repository.
//! `MemoryRepository` is the in-process implementation used by sessions.

mod memory;
mod merge;

use std::fmt;

pub use memory::MemoryRepository;
pub use merge::{CONFLICT_DIVIDER, CONFLICT_END, CONFLICT_START, has_conflict_markers};

/// Name of the metadata directory, hidden from learner-facing listings.
pub const METADATA_DIR: &str = ".git";

/// Errors reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VcsError {
    #[error("repository not initialized")]
    NotInitialized,

    #[error("unknown reference: {0}")]
    UnknownRef(String),

    #[error("branch '{0}' has no commits yet")]
    UnbornBranch(String),

    #[error("branch already exists: {0}")]
    BranchExists(String),

    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("no such file: {0}")]
    FileNotFound(String),

    #[error("nothing to commit")]
    NothingToCommit,

    #[error("unresolved conflicts in: {}", .0.join(", "))]
    UnresolvedConflicts(Vec<String>),

    #[error("local changes would be overwritten: {}", .0.join(", "))]
    LocalChanges(Vec<String>),

    #[error("untracked files would be overwritten: {}", .0.join(", "))]
    UntrackedOverwritten(Vec<String>),

    #[error("merge conflict between {ours} and {theirs} in: {}", paths.join(", "))]
    MergeConflict {
        ours: String,
        theirs: String,
        paths: Vec<String>,
    },

    #[error("remote already exists: {0}")]
    RemoteExists(String),

    #[error("no such remote: {0}")]
    RemoteNotFound(String),
}

pub type Result<T> = core::result::Result<T, VcsError>;

/// A commit identifier: 40 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Oid(String);

impl Oid {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The seven-character abbreviation shown to learners.
    pub fn short(&self) -> &str {
        &self.0[..7.min(self.0.len())]
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who made a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub email: String,
}

/// One commit as reported by `log`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub oid: Oid,
    pub message: String,
    pub author: Signature,
    pub timestamp: i64,
    pub parents: Vec<Oid>,
}

/// How a file compares across HEAD, the index and the working tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Only in the working tree.
    Untracked,
    /// Staged, absent from HEAD.
    StagedNew,
    /// Staged, differs from HEAD.
    StagedModified,
    /// Working tree differs from the index.
    Modified,
    /// Tracked but removed from the working tree.
    Deleted,
    /// Changed on both sides of a merge and not yet resolved.
    Conflicted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub path: String,
    pub status: FileStatus,
}

/// The successful outcomes of a merge. Conflicts are reported as
/// [`VcsError::MergeConflict`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The current branch moved to the other branch's tip.
    FastForward { oid: Oid },
    /// A new merge commit joined both histories.
    Merged { oid: Oid },
    /// The other branch is already contained in the current one.
    UpToDate,
}

/// The repository contract.
///
/// Working-tree access lives here too: the engine owns the files it
/// versions, and the shell commands read and write through it.
pub trait VersionControl {
    /// Creates the repository with an unborn `default_branch`.
    /// Re-initializing an existing repository keeps its history.
    fn init(&mut self, default_branch: &str) -> Result<()>;

    fn is_initialized(&self) -> bool;

    /// Discards the repository and the working tree.
    fn clear(&mut self);

    /// Changed files only; unchanged files are omitted.
    fn status(&self) -> Result<Vec<StatusEntry>>;

    fn add(&mut self, path: &str) -> Result<()>;

    fn commit(&mut self, message: &str, author: &Signature) -> Result<Oid>;

    /// History reachable from `reference`, newest first.
    fn log(&self, reference: &str) -> Result<Vec<LogEntry>>;

    fn list_branches(&self) -> Result<Vec<String>>;

    fn create_branch(&mut self, name: &str) -> Result<()>;

    /// Switches to a branch, or detaches HEAD at a commit.
    fn checkout(&mut self, reference: &str) -> Result<()>;

    /// `None` when HEAD is detached.
    fn current_branch(&self) -> Result<Option<String>>;

    fn resolve_ref(&self, reference: &str) -> Result<Oid>;

    /// Merges `theirs` into the current branch.
    fn merge(&mut self, theirs: &str, author: &Signature) -> Result<MergeOutcome>;

    fn add_remote(&mut self, name: &str, url: &str) -> Result<()>;

    fn remove_remote(&mut self, name: &str) -> Result<()>;

    /// `(name, url)` pairs sorted by name.
    fn list_remotes(&self) -> Result<Vec<(String, String)>>;

    /// Working-tree entries, including [`METADATA_DIR`] once initialized.
    fn list_entries(&self) -> Vec<String>;

    fn read_file(&self, path: &str) -> Option<&str>;

    fn write_file(&mut self, path: &str, content: &str);

    fn file_exists(&self, path: &str) -> bool {
        self.read_file(path).is_some()
    }

    /// Working-tree files without the metadata directory.
    fn visible_files(&self) -> Vec<String> {
        self.list_entries()
            .into_iter()
            .filter(|name| name != METADATA_DIR)
            .collect()
    }
}
