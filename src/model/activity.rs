//! Activities: the lessons a learner can select.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::MissionRef;

/// One lesson: its allow-list, its missions, and the files it starts with.
///
/// Read-only for the lifetime of a session; switching lessons resets
/// the whole environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ActivityConfig {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,

    /// Canonical command keys this lesson permits.
    /// `None` allows every command.
    #[serde(default)]
    pub allowed_commands: Option<BTreeSet<String>>,

    #[serde(default)]
    pub missions: Vec<MissionRef>,

    /// Written into the fresh working tree when the lesson starts.
    #[serde(default)]
    pub seed_files: Vec<SeedFile>,
}

/// A file present in the working tree when a lesson starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedFile {
    pub path: String,
    pub content: String,
}
