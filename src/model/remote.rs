//! The simulated hosting service's repository record.
//!
//! Serialized as a single camelCase JSON document by the remote store.

use serde::{Deserialize, Serialize};

/// The one remote repository a session may have.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRepository {
    pub name: String,
    pub url: String,
    pub default_branch: String,

    /// The branch whose history `commits` mirrors.
    pub last_pushed_branch: Option<String>,

    /// Full log of `last_pushed_branch` as of the last push, newest first.
    pub commits: Vec<CommitRecord>,

    /// In creation order.
    #[serde(default)]
    pub pull_requests: Vec<PullRequest>,

    #[serde(default)]
    pub pages_state: PagesState,
}

impl RemoteRepository {
    /// Site address for the pages deployment.
    pub fn pages_url(&self) -> String {
        format!("https://{}.github-sim.local/", self.name)
    }
}

/// A snapshot of one pushed commit, copied out of the local history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    pub oid: String,
    pub message: String,
    pub author: String,
    pub timestamp_seconds: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub id: u64,
    pub from_branch: String,
    pub to_branch: String,
    pub title: String,
    pub status: PullRequestStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PullRequestStatus {
    Open,
    Merged,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PagesState {
    #[default]
    Unpublished,
    Published,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_in_the_persisted_shape() {
        let remote = RemoteRepository {
            name: "demo".into(),
            url: "https://github-sim.local/demo.git".into(),
            default_branch: "main".into(),
            last_pushed_branch: None,
            commits: vec![CommitRecord {
                oid: "abc".into(),
                message: "Primer commit".into(),
                author: "Learner".into(),
                timestamp_seconds: 1_700_000_000,
            }],
            pull_requests: vec![],
            pages_state: PagesState::Unpublished,
        };

        let json = serde_json::to_value(&remote).unwrap();
        assert_eq!(json["defaultBranch"], "main");
        assert!(json["lastPushedBranch"].is_null());
        assert_eq!(json["commits"][0]["timestampSeconds"], 1_700_000_000);
        assert_eq!(json["pagesState"], "UNPUBLISHED");
    }

    #[test]
    fn older_records_without_pull_requests_still_load() {
        let json = r#"{
            "name": "demo",
            "url": "https://github-sim.local/demo.git",
            "defaultBranch": "main",
            "lastPushedBranch": "main",
            "commits": []
        }"#;
        let remote: RemoteRepository = serde_json::from_str(json).unwrap();
        assert!(remote.pull_requests.is_empty());
        assert_eq!(remote.pages_state, PagesState::Unpublished);
    }

    #[test]
    fn pages_url_uses_repository_name() {
        let json = r#"{
            "name": "site",
            "url": "u",
            "defaultBranch": "main",
            "lastPushedBranch": null,
            "commits": []
        }"#;
        let remote: RemoteRepository = serde_json::from_str(json).unwrap();
        assert_eq!(remote.pages_url(), "https://site.github-sim.local/");
    }
}
