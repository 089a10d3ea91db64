//! Missions: declarative success predicates attached to a lesson.

use serde::{Deserialize, Serialize};

/// A mission as listed in a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionRef {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub check: MissionCheck,
}

/// The predicate a mission evaluates, with its parameters.
///
/// Adding a new kind of mission means adding a variant here
/// and its evaluation in the mission validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case", rename_all_fields = "kebab-case")]
pub enum MissionCheck {
    /// A file exists and the latest commit message contains a phrase.
    FirstCommit { file: String, phrase: String },

    /// A remote was created and has received at least one push.
    RemotePushed,

    /// Both the local history and the remote hold at least `min_commits`.
    RemoteHistory { min_commits: usize },

    /// A branch exists, has commits, and was the last one pushed.
    BranchPushed { branch: String },

    /// An HTML file has an `<h1>` whose text mentions a word.
    HeadingMentions { file: String, word: String },

    /// `target` and `source` point at the same commit.
    BranchesConverged { target: String, source: String },

    /// The working tree holds an unresolved merge conflict.
    ConflictProduced,

    /// No conflict markers remain and the latest commit mentions a phrase.
    ConflictResolved { phrase: String },

    /// A pull request into `to` exists from a local branch.
    PullRequestOpened { to: String },

    /// The remote's pages site is published and the page exists locally.
    PagesPublished { file: String },
}

/// The verdict of one mission evaluation. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MissionResult {
    pub ok: bool,
    pub errors: Vec<String>,
}

impl MissionResult {
    /// A verdict from accumulated errors: passing iff there are none.
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            ok: errors.is_empty(),
            errors,
        }
    }

    pub fn pass() -> Self {
        Self::from_errors(Vec::new())
    }

    /// A failing verdict with a single error.
    pub fn fail(error: impl Into<String>) -> Self {
        Self::from_errors(vec![error.into()])
    }
}
