//! In-memory repository: working tree, index, commits and refs.
//!
//! Trees are full content snapshots keyed by path. Commit ids are
//! SHA-256 digests of the commit's contents, hex-encoded and cut to
//! 40 characters so they look like the ids learners see elsewhere.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use jiff::Timestamp;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::merge::{FileMerge, Labels, merge_text};
use super::{
    FileStatus, LogEntry, METADATA_DIR, MergeOutcome, Oid, Result, Signature, StatusEntry,
    VcsError, VersionControl,
};

type Tree = BTreeMap<String, String>;

#[derive(Debug, Clone)]
struct Commit {
    message: String,
    author: Signature,
    timestamp: i64,
    parents: Vec<Oid>,
    tree: Tree,
    /// Creation order, used to sort history.
    seq: u64,
}

impl Commit {
    fn id(&self) -> Oid {
        let mut hasher = Sha256::new();
        for (path, content) in &self.tree {
            hasher.update(path.as_bytes());
            hasher.update([0u8]);
            hasher.update(content.as_bytes());
            hasher.update([0u8]);
        }
        for parent in &self.parents {
            hasher.update(format!("parent {parent}\n"));
        }
        hasher.update(format!(
            "author {} <{}> {}\nseq {}\n\n{}",
            self.author.name, self.author.email, self.timestamp, self.seq, self.message
        ));
        let mut hex = hex::encode(hasher.finalize());
        hex.truncate(40);
        Oid(hex)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Head {
    Branch(String),
    Detached(Oid),
}

/// Repository metadata: present once `init` has run.
#[derive(Debug, Clone)]
struct GitDir {
    commits: HashMap<Oid, Commit>,
    branches: BTreeMap<String, Oid>,
    head: Head,
    index: Tree,
    /// Paths left conflicted by the last merge.
    conflicts: BTreeSet<String>,
    /// The other side of an in-progress merge.
    merge_head: Option<Oid>,
    remotes: BTreeMap<String, String>,
}

impl GitDir {
    fn new(default_branch: &str) -> Self {
        Self {
            commits: HashMap::new(),
            branches: BTreeMap::new(),
            head: Head::Branch(default_branch.to_string()),
            index: Tree::new(),
            conflicts: BTreeSet::new(),
            merge_head: None,
            remotes: BTreeMap::new(),
        }
    }

    fn head_oid(&self) -> Option<Oid> {
        match &self.head {
            Head::Branch(name) => self.branches.get(name).cloned(),
            Head::Detached(oid) => Some(oid.clone()),
        }
    }

    fn head_label(&self) -> String {
        match &self.head {
            Head::Branch(name) => name.clone(),
            Head::Detached(oid) => oid.short().to_string(),
        }
    }

    fn tree_of(&self, oid: &Oid) -> Tree {
        self.commits
            .get(oid)
            .map(|c| c.tree.clone())
            .unwrap_or_default()
    }

    fn head_tree(&self) -> Tree {
        self.head_oid()
            .map(|oid| self.tree_of(&oid))
            .unwrap_or_default()
    }

    fn resolve(&self, reference: &str) -> Result<Oid> {
        if reference == "HEAD" {
            return self
                .head_oid()
                .ok_or_else(|| VcsError::UnbornBranch(self.head_label()));
        }
        if let Some(oid) = self.branches.get(reference) {
            return Ok(oid.clone());
        }
        if self.head == Head::Branch(reference.to_string()) {
            return Err(VcsError::UnbornBranch(reference.to_string()));
        }
        let is_hex = reference.len() >= 4 && reference.chars().all(|c| c.is_ascii_hexdigit());
        if is_hex {
            let needle = reference.to_ascii_lowercase();
            let matches: Vec<&Oid> = self
                .commits
                .keys()
                .filter(|oid| oid.as_str().starts_with(&needle))
                .collect();
            if let [oid] = matches.as_slice() {
                return Ok((*oid).clone());
            }
        }
        Err(VcsError::UnknownRef(reference.to_string()))
    }

    /// `oid` and everything reachable from it.
    fn ancestors(&self, oid: &Oid) -> BTreeSet<Oid> {
        let mut seen = BTreeSet::new();
        let mut stack = vec![oid.clone()];
        while let Some(next) = stack.pop() {
            if !seen.insert(next.clone()) {
                continue;
            }
            if let Some(commit) = self.commits.get(&next) {
                stack.extend(commit.parents.iter().cloned());
            }
        }
        seen
    }

    /// The most recent common ancestor.
    fn merge_base(&self, a: &Oid, b: &Oid) -> Option<Oid> {
        let ours = self.ancestors(a);
        self.ancestors(b)
            .into_iter()
            .filter(|oid| ours.contains(oid))
            .max_by_key(|oid| self.commits.get(oid).map_or(0, |c| c.seq))
    }

    fn record_commit(
        &mut self,
        tree: Tree,
        parents: Vec<Oid>,
        message: &str,
        author: &Signature,
    ) -> Oid {
        let commit = Commit {
            message: message.to_string(),
            author: author.clone(),
            timestamp: Timestamp::now().as_second(),
            parents,
            tree,
            seq: self.commits.len() as u64,
        };
        let oid = commit.id();
        self.commits.insert(oid.clone(), commit);
        self.advance_head(oid.clone());
        debug!(oid = %oid, head = %self.head_label(), "recorded commit");
        oid
    }

    fn advance_head(&mut self, oid: Oid) {
        match &self.head {
            Head::Branch(name) => {
                self.branches.insert(name.clone(), oid);
            }
            Head::Detached(_) => self.head = Head::Detached(oid),
        }
    }
}

/// A repository that lives entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    worktree: Tree,
    git: Option<GitDir>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn repo(&self) -> Result<&GitDir> {
        self.git.as_ref().ok_or(VcsError::NotInitialized)
    }

    fn repo_mut(&mut self) -> Result<&mut GitDir> {
        self.git.as_mut().ok_or(VcsError::NotInitialized)
    }

    /// Tracked files with staged or unstaged changes.
    fn tracked_changes(&self) -> Result<Vec<String>> {
        Ok(self
            .status()?
            .into_iter()
            .filter(|entry| entry.status != FileStatus::Untracked)
            .map(|entry| entry.path)
            .collect())
    }

    /// Untracked working-tree files that writing `incoming` would replace.
    fn untracked_in_the_way(&self, old: &Tree, incoming: &Tree) -> Vec<String> {
        incoming
            .iter()
            .filter(|(path, content)| {
                !old.contains_key(*path)
                    && self.worktree.get(*path).is_some_and(|local| local != *content)
            })
            .map(|(path, _)| path.clone())
            .collect()
    }

    /// Swaps the tracked files of `old` for those of `new` and stages `new`.
    ///
    /// Refuses without touching anything when an untracked file would be
    /// overwritten.
    fn apply_tree(&mut self, old: &Tree, new: Tree) -> Result<()> {
        let in_the_way = self.untracked_in_the_way(old, &new);
        if !in_the_way.is_empty() {
            return Err(VcsError::UntrackedOverwritten(in_the_way));
        }
        for path in old.keys() {
            self.worktree.remove(path);
        }
        for (path, content) in &new {
            self.worktree.insert(path.clone(), content.clone());
        }
        self.repo_mut()?.index = new;
        Ok(())
    }
}

fn classify(
    head: Option<&String>,
    index: Option<&String>,
    work: Option<&String>,
) -> Option<FileStatus> {
    match (head, index, work) {
        (_, None, Some(_)) => Some(FileStatus::Untracked),
        (_, Some(_), None) | (Some(_), None, None) => Some(FileStatus::Deleted),
        (_, Some(i), Some(w)) if i != w => Some(FileStatus::Modified),
        (None, Some(_), Some(_)) => Some(FileStatus::StagedNew),
        (Some(h), Some(i), Some(_)) if h != i => Some(FileStatus::StagedModified),
        _ => None,
    }
}

fn validate_branch_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == "HEAD"
        || name.starts_with('-')
        || name.starts_with('/')
        || name.ends_with('/')
        || name.ends_with(".lock")
        || name.contains("..")
        || name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '~' | '^' | ':' | '?' | '*' | '[' | '\\'));
    if invalid {
        return Err(VcsError::InvalidBranchName(name.to_string()));
    }
    Ok(())
}

impl VersionControl for MemoryRepository {
    fn init(&mut self, default_branch: &str) -> Result<()> {
        if self.git.is_none() {
            validate_branch_name(default_branch)?;
            self.git = Some(GitDir::new(default_branch));
        }
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.git.is_some()
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn status(&self) -> Result<Vec<StatusEntry>> {
        let repo = self.repo()?;
        let head = repo.head_tree();
        let paths: BTreeSet<&String> = head
            .keys()
            .chain(repo.index.keys())
            .chain(self.worktree.keys())
            .collect();

        Ok(paths
            .into_iter()
            .filter_map(|path| {
                let status = if repo.conflicts.contains(path) {
                    Some(FileStatus::Conflicted)
                } else {
                    classify(
                        head.get(path),
                        repo.index.get(path),
                        self.worktree.get(path),
                    )
                };
                status.map(|status| StatusEntry {
                    path: path.clone(),
                    status,
                })
            })
            .collect())
    }

    fn add(&mut self, path: &str) -> Result<()> {
        let content = self.worktree.get(path).cloned();
        let repo = self.repo_mut()?;
        match content {
            Some(content) => {
                repo.index.insert(path.to_string(), content);
            }
            None if repo.index.contains_key(path) => {
                repo.index.remove(path);
            }
            None => return Err(VcsError::FileNotFound(path.to_string())),
        }
        repo.conflicts.remove(path);
        Ok(())
    }

    fn commit(&mut self, message: &str, author: &Signature) -> Result<Oid> {
        let repo = self.repo_mut()?;
        if !repo.conflicts.is_empty() {
            return Err(VcsError::UnresolvedConflicts(
                repo.conflicts.iter().cloned().collect(),
            ));
        }
        if repo.index == repo.head_tree() && repo.merge_head.is_none() {
            return Err(VcsError::NothingToCommit);
        }

        let mut parents: Vec<Oid> = repo.head_oid().into_iter().collect();
        parents.extend(repo.merge_head.take());
        let tree = repo.index.clone();
        Ok(repo.record_commit(tree, parents, message, author))
    }

    fn log(&self, reference: &str) -> Result<Vec<LogEntry>> {
        let repo = self.repo()?;
        let tip = repo.resolve(reference)?;

        let mut commits: Vec<(&Oid, &Commit)> = repo
            .ancestors(&tip)
            .into_iter()
            .filter_map(|oid| repo.commits.get_key_value(&oid))
            .collect();
        commits.sort_by(|a, b| b.1.seq.cmp(&a.1.seq));

        Ok(commits
            .into_iter()
            .map(|(oid, commit)| LogEntry {
                oid: oid.clone(),
                message: commit.message.clone(),
                author: commit.author.clone(),
                timestamp: commit.timestamp,
                parents: commit.parents.clone(),
            })
            .collect())
    }

    fn list_branches(&self) -> Result<Vec<String>> {
        Ok(self.repo()?.branches.keys().cloned().collect())
    }

    fn create_branch(&mut self, name: &str) -> Result<()> {
        validate_branch_name(name)?;
        let repo = self.repo_mut()?;
        if repo.branches.contains_key(name) {
            return Err(VcsError::BranchExists(name.to_string()));
        }
        let tip = repo
            .head_oid()
            .ok_or_else(|| VcsError::UnbornBranch(repo.head_label()))?;
        repo.branches.insert(name.to_string(), tip);
        Ok(())
    }

    fn checkout(&mut self, reference: &str) -> Result<()> {
        let repo = self.repo()?;
        if !repo.conflicts.is_empty() {
            return Err(VcsError::UnresolvedConflicts(
                repo.conflicts.iter().cloned().collect(),
            ));
        }

        let (target_head, target_oid) = match repo.branches.get(reference) {
            Some(oid) => (Head::Branch(reference.to_string()), oid.clone()),
            None if repo.head == Head::Branch(reference.to_string()) => return Ok(()),
            None => {
                let oid = repo.resolve(reference)?;
                (Head::Detached(oid.clone()), oid)
            }
        };

        if repo.head_oid().as_ref() == Some(&target_oid) {
            // Same commit: only HEAD moves, local changes carry over.
            let repo = self.repo_mut()?;
            repo.head = target_head;
            return Ok(());
        }

        let changed = self.tracked_changes()?;
        if !changed.is_empty() {
            return Err(VcsError::LocalChanges(changed));
        }

        let repo = self.repo()?;
        let old = repo.head_tree();
        let new = repo.tree_of(&target_oid);
        self.apply_tree(&old, new)?;

        let repo = self.repo_mut()?;
        repo.head = target_head;
        repo.merge_head = None;
        Ok(())
    }

    fn current_branch(&self) -> Result<Option<String>> {
        Ok(match &self.repo()?.head {
            Head::Branch(name) => Some(name.clone()),
            Head::Detached(_) => None,
        })
    }

    fn resolve_ref(&self, reference: &str) -> Result<Oid> {
        self.repo()?.resolve(reference)
    }

    fn merge(&mut self, theirs: &str, author: &Signature) -> Result<MergeOutcome> {
        let repo = self.repo()?;
        if !repo.conflicts.is_empty() {
            return Err(VcsError::UnresolvedConflicts(
                repo.conflicts.iter().cloned().collect(),
            ));
        }
        let ours = repo.head_label();
        let ours_oid = repo
            .head_oid()
            .ok_or_else(|| VcsError::UnbornBranch(ours.clone()))?;
        let theirs_oid = repo.resolve(theirs)?;

        let changed = self.tracked_changes()?;
        if !changed.is_empty() {
            return Err(VcsError::LocalChanges(changed));
        }

        let repo = self.repo()?;
        let base = repo.merge_base(&ours_oid, &theirs_oid);
        if base.as_ref() == Some(&theirs_oid) {
            return Ok(MergeOutcome::UpToDate);
        }

        let ours_tree = repo.tree_of(&ours_oid);
        let theirs_tree = repo.tree_of(&theirs_oid);

        if base.as_ref() == Some(&ours_oid) {
            self.apply_tree(&ours_tree, theirs_tree)?;
            self.repo_mut()?.advance_head(theirs_oid.clone());
            debug!(%ours, %theirs, "fast-forward merge");
            return Ok(MergeOutcome::FastForward { oid: theirs_oid });
        }

        let base_tree = base.map(|oid| repo.tree_of(&oid)).unwrap_or_default();
        let labels = Labels {
            ours: "HEAD",
            theirs,
        };

        let paths: BTreeSet<&String> = base_tree
            .keys()
            .chain(ours_tree.keys())
            .chain(theirs_tree.keys())
            .collect();

        let mut merged = Tree::new();
        let mut conflicted = Tree::new();
        for path in paths {
            let (b, o, t) = (base_tree.get(path), ours_tree.get(path), theirs_tree.get(path));
            let clean = if o == t || t == b {
                o
            } else if o == b {
                t
            } else {
                match (o, t) {
                    (Some(o), Some(t)) => {
                        let base_text = b.map_or("", String::as_str);
                        match merge_text(base_text, o, t, &labels) {
                            FileMerge::Clean(text) => {
                                merged.insert(path.clone(), text);
                            }
                            FileMerge::Conflict(text) => {
                                conflicted.insert(path.clone(), text);
                            }
                        }
                    }
                    // Modified on one side, deleted on the other.
                    (Some(kept), None) | (None, Some(kept)) => {
                        conflicted.insert(path.clone(), kept.clone());
                    }
                    (None, None) => {}
                }
                None
            };
            if let Some(content) = clean {
                merged.insert(path.clone(), content.clone());
            }
        }

        if !conflicted.is_empty() {
            let in_the_way = self.untracked_in_the_way(&ours_tree, &conflicted);
            if !in_the_way.is_empty() {
                return Err(VcsError::UntrackedOverwritten(in_the_way));
            }
            let paths: Vec<String> = conflicted.keys().cloned().collect();
            self.apply_tree(&ours_tree, merged)?;
            for (path, text) in conflicted {
                self.worktree.insert(path, text);
            }
            let repo = self.repo_mut()?;
            for path in &paths {
                if let Some(content) = ours_tree.get(path) {
                    repo.index.insert(path.clone(), content.clone());
                }
            }
            repo.conflicts = paths.iter().cloned().collect();
            repo.merge_head = Some(theirs_oid);
            debug!(%ours, %theirs, ?paths, "merge stopped on conflicts");
            return Err(VcsError::MergeConflict {
                ours,
                theirs: theirs.to_string(),
                paths,
            });
        }

        self.apply_tree(&ours_tree, merged.clone())?;
        let message = format!("Merge branch '{theirs}' into {ours}");
        let oid = self
            .repo_mut()?
            .record_commit(merged, vec![ours_oid, theirs_oid], &message, author);
        Ok(MergeOutcome::Merged { oid })
    }

    fn add_remote(&mut self, name: &str, url: &str) -> Result<()> {
        let repo = self.repo_mut()?;
        if repo.remotes.contains_key(name) {
            return Err(VcsError::RemoteExists(name.to_string()));
        }
        repo.remotes.insert(name.to_string(), url.to_string());
        Ok(())
    }

    fn remove_remote(&mut self, name: &str) -> Result<()> {
        self.repo_mut()?
            .remotes
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| VcsError::RemoteNotFound(name.to_string()))
    }

    fn list_remotes(&self) -> Result<Vec<(String, String)>> {
        Ok(self
            .repo()?
            .remotes
            .iter()
            .map(|(name, url)| (name.clone(), url.clone()))
            .collect())
    }

    fn list_entries(&self) -> Vec<String> {
        let metadata = self.git.as_ref().map(|_| METADATA_DIR.to_string());
        metadata
            .into_iter()
            .chain(self.worktree.keys().cloned())
            .collect()
    }

    fn read_file(&self, path: &str) -> Option<&str> {
        self.worktree.get(path).map(String::as_str)
    }

    fn write_file(&mut self, path: &str, content: &str) {
        self.worktree.insert(path.to_string(), content.to_string());
    }
}
