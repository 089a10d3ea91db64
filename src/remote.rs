//! The simulated hosting service.
//!
//! One repository record per session, persisted through a [`RemoteStore`].
//! Pushes copy the pushed branch's whole history into the record; pull
//! requests and pages publication are bookkeeping on the same record and
//! never touch local refs.

use tracing::info;

use crate::model::{
    CommitRecord, PagesState, PullRequest, PullRequestStatus, RemoteRepository,
};
use crate::storage::{RemoteStore, StorageError};
use crate::vcs::{VcsError, VersionControl};

/// Base URL of the fake hosting service.
pub const HOST_URL: &str = "https://github-sim.local";

/// The only remote name the simulator accepts.
pub const ORIGIN: &str = "origin";

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("no simulated remote repository exists")]
    NoRepository,

    #[error("unsupported remote '{0}'")]
    UnsupportedRemote(String),

    #[error("branch '{0}' is unreadable")]
    BranchUnreadable(String),

    #[error("the remote has no commits yet")]
    NothingPushed,

    #[error("no simulated repository matches '{0}'")]
    NoMatchingRepository(String),

    #[error("pull request #{0} not found")]
    PullRequestNotFound(u64),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("engine error: {0}")]
    Engine(#[from] VcsError),
}

pub type Result<T> = core::result::Result<T, RemoteError>;

/// What `pull` found on the remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullReport {
    pub url: String,
    pub branch: String,
    /// Remote commits absent from the local HEAD history.
    pub missing: usize,
}

/// The result of a pages publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagesReport {
    pub url: String,
    pub was_published: bool,
}

pub struct RemoteSimulator {
    store: Box<dyn RemoteStore>,
    next_pull_request_id: u64,
}

impl RemoteSimulator {
    pub fn new(store: Box<dyn RemoteStore>) -> Self {
        Self {
            store,
            next_pull_request_id: 1,
        }
    }

    /// The current record, if a remote has been created.
    pub fn repository(&self) -> Result<Option<RemoteRepository>> {
        Ok(self.store.load()?)
    }

    fn require(&self) -> Result<RemoteRepository> {
        self.repository()?.ok_or(RemoteError::NoRepository)
    }

    /// A human-readable summary of the record, or `None` without one.
    pub fn status(&self) -> Result<Option<String>> {
        let Some(remote) = self.repository()? else {
            return Ok(None);
        };

        let mut lines = vec![
            "Simulated GitHub:".to_string(),
            format!("  Repository:     {}", remote.name),
            format!("  URL:            {}", remote.url),
            format!("  Default branch: {}", remote.default_branch),
        ];
        match &remote.last_pushed_branch {
            Some(branch) if !remote.commits.is_empty() => {
                lines.push(format!("  Last pushed:    {branch}"));
                lines.push("  Remote commits:".to_string());
                for commit in &remote.commits {
                    let short: String = commit.oid.chars().take(7).collect();
                    lines.push(format!("    {short}  {}", commit.message));
                }
            }
            _ => lines.push("  (nothing pushed yet)".to_string()),
        }
        let open = remote
            .pull_requests
            .iter()
            .filter(|pr| pr.status == PullRequestStatus::Open)
            .count();
        if !remote.pull_requests.is_empty() {
            lines.push(format!(
                "  Pull requests:  {} ({open} open)",
                remote.pull_requests.len()
            ));
        }
        if remote.pages_state == PagesState::Published {
            lines.push(format!("  Pages:          {}", remote.pages_url()));
        }
        Ok(Some(lines.join("\n")))
    }

    /// Forgets the remote. Part of a lesson switch.
    pub fn reset(&mut self) -> Result<()> {
        self.store.clear()?;
        self.next_pull_request_id = 1;
        Ok(())
    }

    /// Creates a fresh repository record, replacing any previous one.
    pub fn create(&mut self, name: &str) -> Result<RemoteRepository> {
        let remote = RemoteRepository {
            name: name.to_string(),
            url: format!("{HOST_URL}/{name}.git"),
            default_branch: "main".to_string(),
            last_pushed_branch: None,
            commits: Vec::new(),
            pull_requests: Vec::new(),
            pages_state: PagesState::Unpublished,
        };
        self.store.save(&remote)?;
        info!(name, url = %remote.url, "created simulated remote");
        Ok(remote)
    }

    /// Replaces the remote's commits with the full history of `branch`.
    pub fn push(
        &mut self,
        engine: &dyn VersionControl,
        remote_name: &str,
        branch: &str,
    ) -> Result<RemoteRepository> {
        if remote_name != ORIGIN {
            return Err(RemoteError::UnsupportedRemote(remote_name.to_string()));
        }
        let mut remote = self.require()?;
        let log = engine
            .log(branch)
            .map_err(|_| RemoteError::BranchUnreadable(branch.to_string()))?;

        remote.commits = log
            .into_iter()
            .map(|entry| CommitRecord {
                oid: entry.oid.to_string(),
                message: entry.message,
                author: entry.author.name,
                timestamp_seconds: entry.timestamp,
            })
            .collect();
        remote.last_pushed_branch = Some(branch.to_string());
        self.store.save(&remote)?;
        info!(branch, commits = remote.commits.len(), "pushed to simulated remote");
        Ok(remote)
    }

    /// Counts remote commits missing locally. Nothing is integrated.
    pub fn pull(
        &self,
        engine: &dyn VersionControl,
        remote_name: &str,
        branch: &str,
    ) -> Result<PullReport> {
        if remote_name != ORIGIN {
            return Err(RemoteError::UnsupportedRemote(remote_name.to_string()));
        }
        let remote = self.require()?;
        if remote.commits.is_empty() {
            return Err(RemoteError::NothingPushed);
        }

        let local = engine.log("HEAD").unwrap_or_default();
        let missing = remote
            .commits
            .iter()
            .filter(|c| !local.iter().any(|entry| entry.oid.as_str() == c.oid))
            .count();

        Ok(PullReport {
            url: remote.url,
            branch: branch.to_string(),
            missing,
        })
    }

    /// Starts a fresh working tree whose `origin` points at the record.
    ///
    /// `url` may be the record's URL or its bare name.
    pub fn clone_into(
        &self,
        engine: &mut dyn VersionControl,
        url: &str,
    ) -> Result<RemoteRepository> {
        let remote = self
            .repository()?
            .filter(|r| r.url == url || r.name == url)
            .ok_or_else(|| RemoteError::NoMatchingRepository(url.to_string()))?;

        engine.clear();
        engine.init(&remote.default_branch)?;
        engine.add_remote(ORIGIN, &remote.url)?;
        info!(url = %remote.url, "cloned simulated remote");
        Ok(remote)
    }

    pub fn create_pull_request(
        &mut self,
        from: &str,
        to: Option<&str>,
        title: Option<&str>,
    ) -> Result<PullRequest> {
        let mut remote = self.require()?;
        let to = to.unwrap_or(&remote.default_branch).to_string();
        let title = title.map_or_else(|| format!("Merge {from} into {to}"), str::to_string);

        let stored_max = remote.pull_requests.iter().map(|pr| pr.id).max().unwrap_or(0);
        let id = self.next_pull_request_id.max(stored_max + 1);
        self.next_pull_request_id = id + 1;

        let pr = PullRequest {
            id,
            from_branch: from.to_string(),
            to_branch: to,
            title,
            status: PullRequestStatus::Open,
        };
        remote.pull_requests.push(pr.clone());
        self.store.save(&remote)?;
        info!(id, from, to = %pr.to_branch, "opened pull request");
        Ok(pr)
    }

    /// All pull requests in creation order.
    pub fn list_pull_requests(&self) -> Result<Vec<PullRequest>> {
        Ok(self.require()?.pull_requests)
    }

    /// Marks a pull request merged. Branches are left alone.
    pub fn merge_pull_request(&mut self, id: u64) -> Result<PullRequest> {
        let mut remote = self.require()?;
        let pr = remote
            .pull_requests
            .iter_mut()
            .find(|pr| pr.id == id)
            .ok_or(RemoteError::PullRequestNotFound(id))?;
        pr.status = PullRequestStatus::Merged;
        let merged = pr.clone();
        self.store.save(&remote)?;
        info!(id, "merged pull request");
        Ok(merged)
    }

    pub fn pages_publish(&mut self) -> Result<PagesReport> {
        self.publish_pages()
    }

    /// Same transition as publishing; allowed when already published.
    pub fn pages_republish(&mut self) -> Result<PagesReport> {
        self.publish_pages()
    }

    fn publish_pages(&mut self) -> Result<PagesReport> {
        let mut remote = self.require()?;
        if remote.commits.is_empty() {
            return Err(RemoteError::NothingPushed);
        }
        let was_published = remote.pages_state == PagesState::Published;
        remote.pages_state = PagesState::Published;
        self.store.save(&remote)?;
        info!(url = %remote.pages_url(), was_published, "published pages");
        Ok(PagesReport {
            url: remote.pages_url(),
            was_published,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::storage::MemoryRemoteStore;
    use crate::vcs::{MemoryRepository, Signature};

    fn author() -> Signature {
        Signature {
            name: "Learner".into(),
            email: "learner@example.com".into(),
        }
    }

    fn simulator() -> RemoteSimulator {
        RemoteSimulator::new(Box::new(MemoryRemoteStore::new()))
    }

    fn commit(repo: &mut MemoryRepository, file: &str, content: &str, message: &str) {
        repo.write_file(file, content);
        repo.add(file).unwrap();
        repo.commit(message, &author()).unwrap();
    }

    fn repo_with_commits(n: usize) -> MemoryRepository {
        let mut repo = MemoryRepository::new();
        repo.init("main").unwrap();
        for i in 0..n {
            commit(&mut repo, "index.html", &format!("v{i}"), &format!("commit {i}"));
        }
        repo
    }

    #[test]
    fn create_starts_empty_and_unpublished() {
        let mut remote = simulator();
        let repo = remote.create("demo").unwrap();
        assert_eq!(repo.url, "https://github-sim.local/demo.git");
        assert!(repo.commits.is_empty());
        assert!(repo.pull_requests.is_empty());
        assert_eq!(repo.pages_state, PagesState::Unpublished);
        assert_eq!(remote.repository().unwrap(), Some(repo));
    }

    #[test]
    fn push_requires_origin_and_a_repository() {
        let mut remote = simulator();
        let repo = repo_with_commits(1);
        assert!(matches!(
            remote.push(&repo, "origin", "main").unwrap_err(),
            RemoteError::NoRepository
        ));

        remote.create("demo").unwrap();
        assert!(matches!(
            remote.push(&repo, "upstream", "main").unwrap_err(),
            RemoteError::UnsupportedRemote(name) if name == "upstream"
        ));
    }

    #[test]
    fn push_without_commits_leaves_remote_untouched() {
        let mut remote = simulator();
        remote.create("demo").unwrap();
        let repo = repo_with_commits(0);

        let err = remote.push(&repo, "origin", "main").unwrap_err();
        assert!(matches!(err, RemoteError::BranchUnreadable(b) if b == "main"));

        let stored = remote.repository().unwrap().unwrap();
        assert!(stored.commits.is_empty());
        assert_eq!(stored.last_pushed_branch, None);
    }

    #[test]
    fn push_copies_full_history_and_is_idempotent() {
        let mut remote = simulator();
        remote.create("demo").unwrap();
        let repo = repo_with_commits(2);

        let first = remote.push(&repo, "origin", "main").unwrap();
        let second = remote.push(&repo, "origin", "main").unwrap();
        assert_eq!(first.commits, second.commits);
        assert_eq!(second.commits.len(), 2);
        assert_eq!(second.commits[0].message, "commit 1");
        assert_eq!(second.commits[0].author, "Learner");
        assert_eq!(second.last_pushed_branch.as_deref(), Some("main"));
    }

    #[test]
    fn push_replaces_rather_than_appends() {
        let mut remote = simulator();
        remote.create("demo").unwrap();
        let mut repo = repo_with_commits(2);
        remote.push(&repo, "origin", "main").unwrap();

        repo.create_branch("feature/login").unwrap();
        repo.checkout("feature/login").unwrap();
        commit(&mut repo, "login.html", "login", "Login");
        let pushed = remote.push(&repo, "origin", "feature/login").unwrap();

        assert_eq!(pushed.commits.len(), 3);
        assert_eq!(pushed.last_pushed_branch.as_deref(), Some("feature/login"));
    }

    #[test]
    fn pull_counts_commits_missing_locally() {
        let mut remote = simulator();
        remote.create("demo").unwrap();
        let mut repo = repo_with_commits(1);
        repo.create_branch("feature").unwrap();
        repo.checkout("feature").unwrap();
        commit(&mut repo, "a.txt", "a", "a");
        commit(&mut repo, "b.txt", "b", "b");
        remote.push(&repo, "origin", "feature").unwrap();

        repo.checkout("main").unwrap();
        let report = remote.pull(&repo, "origin", "main").unwrap();
        assert_eq!(report.missing, 2);

        repo.checkout("feature").unwrap();
        assert_eq!(remote.pull(&repo, "origin", "feature").unwrap().missing, 0);
    }

    #[test]
    fn pull_needs_pushed_commits() {
        let mut remote = simulator();
        let repo = repo_with_commits(1);
        assert!(matches!(
            remote.pull(&repo, "origin", "main").unwrap_err(),
            RemoteError::NoRepository
        ));
        remote.create("demo").unwrap();
        assert!(matches!(
            remote.pull(&repo, "origin", "main").unwrap_err(),
            RemoteError::NothingPushed
        ));
    }

    #[test]
    fn clone_reinitializes_with_origin() {
        let mut remote = simulator();
        remote.create("demo").unwrap();
        let mut repo = repo_with_commits(1);

        assert!(matches!(
            remote.clone_into(&mut repo, "https://elsewhere/x.git").unwrap_err(),
            RemoteError::NoMatchingRepository(_)
        ));

        remote
            .clone_into(&mut repo, "https://github-sim.local/demo.git")
            .unwrap();
        assert!(repo.is_initialized());
        assert!(repo.visible_files().is_empty());
        assert_eq!(
            repo.list_remotes().unwrap(),
            vec![(
                "origin".to_string(),
                "https://github-sim.local/demo.git".to_string()
            )]
        );
    }

    #[test]
    fn pull_request_defaults_and_merge() {
        let mut remote = simulator();
        remote.create("demo").unwrap();

        let pr = remote
            .create_pull_request("feature/login", None, None)
            .unwrap();
        assert_eq!(pr.id, 1);
        assert_eq!(pr.to_branch, "main");
        assert_eq!(pr.title, "Merge feature/login into main");
        assert_eq!(pr.status, PullRequestStatus::Open);

        let second = remote
            .create_pull_request("fix", Some("develop"), Some("Fix typo"))
            .unwrap();
        assert_eq!(second.id, 2);
        assert_eq!(second.title, "Fix typo");

        let merged = remote.merge_pull_request(1).unwrap();
        assert_eq!(merged.status, PullRequestStatus::Merged);

        let listed = remote.list_pull_requests().unwrap();
        assert_eq!(listed.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(listed[0].status, PullRequestStatus::Merged);
    }

    #[test]
    fn merging_unknown_pull_request_changes_nothing() {
        let mut remote = simulator();
        remote.create("demo").unwrap();
        remote.create_pull_request("feature", None, None).unwrap();
        let before = remote.list_pull_requests().unwrap();

        assert!(matches!(
            remote.merge_pull_request(42).unwrap_err(),
            RemoteError::PullRequestNotFound(42)
        ));
        assert_eq!(remote.list_pull_requests().unwrap(), before);
    }

    #[test]
    fn pull_request_ids_survive_recreating_the_remote() {
        let mut remote = simulator();
        remote.create("demo").unwrap();
        remote.create_pull_request("a", None, None).unwrap();
        remote.create_pull_request("b", None, None).unwrap();

        remote.create("again").unwrap();
        let pr = remote.create_pull_request("c", None, None).unwrap();
        assert_eq!(pr.id, 3);
    }

    #[test]
    fn pages_publish_needs_a_push_and_can_repeat() {
        let mut remote = simulator();
        remote.create("site").unwrap();
        assert!(matches!(
            remote.pages_publish().unwrap_err(),
            RemoteError::NothingPushed
        ));

        let repo = repo_with_commits(1);
        remote.push(&repo, "origin", "main").unwrap();

        let first = remote.pages_publish().unwrap();
        assert_eq!(first.url, "https://site.github-sim.local/");
        assert!(!first.was_published);

        let again = remote.pages_republish().unwrap();
        assert!(again.was_published);
        assert_eq!(
            remote.repository().unwrap().unwrap().pages_state,
            PagesState::Published
        );
    }

    #[test]
    fn status_summarizes_the_record() {
        let mut remote = simulator();
        assert_eq!(remote.status().unwrap(), None);

        remote.create("demo").unwrap();
        let empty = remote.status().unwrap().unwrap();
        assert!(empty.contains("https://github-sim.local/demo.git"));
        assert!(empty.contains("(nothing pushed yet)"));

        let repo = repo_with_commits(2);
        remote.push(&repo, "origin", "main").unwrap();
        remote.create_pull_request("feature", None, None).unwrap();
        let pushed = remote.status().unwrap().unwrap();
        assert!(pushed.contains("Last pushed:    main"));
        assert!(pushed.contains("commit 1"));
        assert!(pushed.contains("Pull requests:  1 (1 open)"));
    }

    #[test]
    fn status_tolerates_hand_edited_ids() {
        let mut remote = simulator();
        remote.create("demo").unwrap();
        remote.push(&repo_with_commits(1), "origin", "main").unwrap();
        let mut record = remote.repository().unwrap().unwrap();
        record.commits[0].oid = "çaféçaféçafé".into();

        let mut store = MemoryRemoteStore::new();
        store.save(&record).unwrap();
        let edited = RemoteSimulator::new(Box::new(store));
        let status = edited.status().unwrap().unwrap();
        assert!(status.contains("    çaféçaf  commit 0"), "{status}");
    }

    #[test]
    fn reset_forgets_the_remote() {
        let mut remote = simulator();
        remote.create("demo").unwrap();
        remote.create_pull_request("a", None, None).unwrap();
        remote.reset().unwrap();
        assert!(remote.repository().unwrap().is_none());

        remote.create("demo").unwrap();
        assert_eq!(remote.create_pull_request("b", None, None).unwrap().id, 1);
    }
}
