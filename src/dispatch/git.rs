//! `git` subcommands: engine calls plus response templates.

use crate::error::{CommandError, Result};
use crate::vcs::{FileStatus, LogEntry, MergeOutcome, VcsError, has_conflict_markers};

use super::{DEFAULT_BRANCH, Dispatcher, REPO_DIR, remote_failure};

impl Dispatcher<'_> {
    pub(super) fn init(&mut self) -> Result<String> {
        let existed = self.engine.is_initialized();
        self.engine
            .init(DEFAULT_BRANCH)
            .map_err(|err| CommandError::engine(err, "Could not initialize the repository."))?;
        Ok(if existed {
            format!("Reinitialized existing Git repository in {REPO_DIR}/.git")
        } else {
            format!("Initialized empty Git repository in {REPO_DIR}/.git")
        })
    }

    pub(super) fn status(&self) -> Result<String> {
        let branch = self.head_description();
        let entries = self
            .engine
            .status()
            .map_err(|err| CommandError::engine(err, "Could not read the repository status."))?;

        if entries.is_empty() {
            return Ok(format!(
                "On branch {branch}\nNothing to commit, working tree clean."
            ));
        }
        let mut lines = vec![
            format!("On branch {branch}"),
            "Changes in the repository:".to_string(),
        ];
        for entry in entries {
            let label = match entry.status {
                FileStatus::Untracked => "untracked",
                FileStatus::StagedNew => "new file (staged)",
                FileStatus::StagedModified => "modified (staged)",
                FileStatus::Modified => "modified",
                FileStatus::Deleted => "deleted",
                FileStatus::Conflicted => "both modified (conflict)",
            };
            lines.push(format!("  {label:<24}{}", entry.path));
        }
        Ok(lines.join("\n"))
    }

    pub(super) fn add(&mut self, file: &str) -> Result<String> {
        self.engine.add(file).map_err(|err| {
            let guidance = match &err {
                VcsError::FileNotFound(_) => format!(
                    "pathspec '{file}' did not match any files.\nCheck the name with \"ls\"."
                ),
                _ => format!("Could not stage {file}: {err}"),
            };
            CommandError::engine(err, guidance)
        })?;
        Ok(format!("Added to the index: {file}"))
    }

    pub(super) fn add_all_refusal(&self) -> CommandError {
        let mut lines = vec![
            "This trainer does not use \"git add .\".".to_string(),
            String::new(),
            "Stage files one at a time instead, for example:".to_string(),
            "    git add index.html".to_string(),
        ];
        let visible = self.engine.visible_files();
        if !visible.is_empty() {
            lines.push(String::new());
            lines.push(format!("Files in {REPO_DIR}:"));
            lines.extend(visible.iter().map(|file| format!("  - {file}")));
        }
        CommandError::usage(lines.join("\n"))
    }

    pub(super) fn commit(&mut self, message: &str) -> Result<String> {
        let oid = self.engine.commit(message, self.author).map_err(|err| {
            let guidance = match &err {
                VcsError::NothingToCommit => {
                    "Nothing to commit.\nStage a change first with: git add <file>".to_string()
                }
                VcsError::UnresolvedConflicts(paths) => format!(
                    "These files still have unresolved conflicts:\n{}\n\
                     Fix them, then run git add <file> before committing.",
                    bullet_list(paths)
                ),
                _ => format!("Could not create the commit: {err}"),
            };
            CommandError::engine(err, guidance)
        })?;
        Ok(format!("Commit created: {} - \"{message}\"", oid.short()))
    }

    pub(super) fn log(&self, reference: Option<&str>) -> Result<String> {
        let reference = reference.unwrap_or("HEAD");
        let entries = self.engine.log(reference).map_err(|err| {
            let guidance = match &err {
                VcsError::UnbornBranch(branch) => format!(
                    "No commits yet on branch {branch}.\nCreate one with: git commit -m \"message\""
                ),
                VcsError::UnknownRef(name) => format!(
                    "Unknown branch or commit: {name}\nList branches with: git branch"
                ),
                _ => format!("Could not read the history: {err}"),
            };
            CommandError::engine(err, guidance)
        })?;
        Ok(entries.iter().map(render_log_entry).collect::<Vec<_>>().join("\n"))
    }

    pub(super) fn branch_list(&self) -> Result<String> {
        let branches = self
            .engine
            .list_branches()
            .map_err(|err| CommandError::engine(err, "Could not list branches."))?;
        if branches.is_empty() {
            return Ok(format!(
                "No branches yet. The first commit creates {DEFAULT_BRANCH}."
            ));
        }
        let current = self.engine.current_branch().ok().flatten();
        Ok(branches
            .iter()
            .map(|branch| {
                if current.as_deref() == Some(branch.as_str()) {
                    format!("* {branch}")
                } else {
                    format!("  {branch}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n"))
    }

    pub(super) fn branch_create(&mut self, name: &str) -> Result<String> {
        self.create_branch(name)?;
        Ok(format!(
            "Branch created: {name}\nSwitch to it with: git checkout {name}"
        ))
    }

    pub(super) fn checkout(&mut self, branch: &str) -> Result<String> {
        self.switch(branch)?;
        Ok(format!("Switched to branch '{branch}'"))
    }

    pub(super) fn checkout_new_branch(&mut self, name: &str) -> Result<String> {
        self.create_branch(name)?;
        self.switch(name)?;
        Ok(format!("Switched to a new branch '{name}'"))
    }

    pub(super) fn checkout_commit(&mut self, oid: &str) -> Result<String> {
        self.switch(oid)?;
        let short = self
            .engine
            .resolve_ref("HEAD")
            .map_or_else(|_| oid.to_string(), |resolved| resolved.short().to_string());
        Ok(format!(
            "HEAD is now detached at {short}.\n\
             You are looking at an old snapshot. Go back with: git checkout {DEFAULT_BRANCH}"
        ))
    }

    pub(super) fn merge(&mut self, theirs: &str) -> Result<String> {
        let ours = self.head_description();
        let outcome = self.engine.merge(theirs, self.author).map_err(|err| {
            let guidance = match &err {
                VcsError::MergeConflict { ours, theirs, paths } => {
                    conflict_guidance(ours, theirs, paths)
                }
                VcsError::UnknownRef(name) => format!(
                    "Branch '{name}' does not exist.\nList branches with: git branch"
                ),
                VcsError::UnbornBranch(branch) => {
                    format!("Branch {branch} has no commits yet; commit before merging.")
                }
                _ => checkout_guidance(&err),
            };
            CommandError::engine(err, guidance)
        })?;

        Ok(match outcome {
            MergeOutcome::FastForward { oid } => format!(
                "Fast-forward merge completed.\n\
                 Branch {ours} now points to the same commit as {theirs} ({}).",
                oid.short()
            ),
            MergeOutcome::Merged { oid } => format!(
                "Merge completed: \"{theirs}\" was merged into \"{ours}\".\nNew merge commit: {}",
                oid.short()
            ),
            MergeOutcome::UpToDate => format!("Already up to date with {theirs}."),
        })
    }

    pub(super) fn conflicts(&self) -> String {
        let conflicted: Vec<String> = self
            .engine
            .visible_files()
            .into_iter()
            .filter(|file| {
                self.engine
                    .read_file(file)
                    .is_some_and(has_conflict_markers)
            })
            .collect();
        if conflicted.is_empty() {
            return "No files with conflict markers.".to_string();
        }
        format!("Files with conflicts:\n{}", bullet_list(&conflicted))
    }

    pub(super) fn push(&mut self, remote: &str, branch: Option<&str>) -> Result<String> {
        let branch = branch.map_or_else(|| self.default_branch(), str::to_string);
        let pushed = self
            .remote
            .push(&*self.engine, remote, &branch)
            .map_err(remote_failure)?;
        Ok(format!(
            "Pushed to {}\nBranch: {branch}\nCommits sent: {}",
            pushed.url,
            pushed.commits.len()
        ))
    }

    pub(super) fn pull(&mut self, remote: &str, branch: Option<&str>) -> Result<String> {
        let branch = branch.map_or_else(|| self.default_branch(), str::to_string);
        let report = self
            .remote
            .pull(&*self.engine, remote, &branch)
            .map_err(remote_failure)?;
        Ok(if report.missing == 0 {
            format!("From {}\nAlready up to date with origin/{}.", report.url, report.branch)
        } else {
            format!(
                "From {}\nBranch: {}\nThe remote has {} commit(s) that are not in your history.",
                report.url, report.branch, report.missing
            )
        })
    }

    pub(super) fn clone_remote(&mut self, url: &str) -> Result<String> {
        let cloned = self
            .remote
            .clone_into(&mut *self.engine, url)
            .map_err(remote_failure)?;
        Ok(format!(
            "Cloned {} into {REPO_DIR}.\nThe remote is registered as origin.",
            cloned.url
        ))
    }

    pub(super) fn remote_list(&self, verbose: bool) -> Result<String> {
        let remotes = self
            .engine
            .list_remotes()
            .map_err(|err| CommandError::engine(err, "Could not list remotes."))?;
        if remotes.is_empty() {
            return Ok(
                "No remotes configured.\nAdd one with: git remote add origin <url>".to_string(),
            );
        }
        let lines: Vec<String> = if verbose {
            remotes
                .iter()
                .flat_map(|(name, url)| {
                    [format!("{name}\t{url} (fetch)"), format!("{name}\t{url} (push)")]
                })
                .collect()
        } else {
            remotes.into_iter().map(|(name, _)| name).collect()
        };
        Ok(lines.join("\n"))
    }

    pub(super) fn remote_add(&mut self, name: &str, url: &str) -> Result<String> {
        self.engine.add_remote(name, url).map_err(|err| {
            let guidance = match &err {
                VcsError::RemoteExists(_) => format!(
                    "Remote '{name}' already exists.\nSee it with: git remote -v"
                ),
                _ => format!("Could not add remote '{name}': {err}"),
            };
            CommandError::engine(err, guidance)
        })?;
        Ok(format!("Remote '{name}' added: {url}"))
    }

    pub(super) fn remote_remove(&mut self, name: &str) -> Result<String> {
        self.engine.remove_remote(name).map_err(|err| {
            let guidance = match &err {
                VcsError::RemoteNotFound(_) => format!("No such remote: '{name}'"),
                _ => format!("Could not remove remote '{name}': {err}"),
            };
            CommandError::engine(err, guidance)
        })?;
        Ok(format!("Remote '{name}' removed."))
    }

    pub(super) fn pages(&mut self, republish: bool) -> Result<String> {
        let published = if republish {
            self.remote.pages_republish()
        } else {
            self.remote.pages_publish()
        };
        let report = published.map_err(remote_failure)?;

        Ok(match (republish, report.was_published) {
            (true, _) => format!("Site republished at {}", report.url),
            (false, true) => format!("Site already published; updated at {}", report.url),
            (false, false) => format!("Site published at {}", report.url),
        })
    }

    fn create_branch(&mut self, name: &str) -> Result<()> {
        self.engine.create_branch(name).map_err(|err| {
            let guidance = match &err {
                VcsError::BranchExists(_) => format!(
                    "A branch named '{name}' already exists.\n\
                     Switch to it with: git checkout {name}"
                ),
                VcsError::InvalidBranchName(_) => format!("'{name}' is not a valid branch name."),
                VcsError::UnbornBranch(_) => {
                    "Make a first commit before creating branches.".to_string()
                }
                _ => format!("Could not create branch '{name}': {err}"),
            };
            CommandError::engine(err, guidance)
        })
    }

    fn switch(&mut self, reference: &str) -> Result<()> {
        self.engine.checkout(reference).map_err(|err| {
            let guidance = match &err {
                VcsError::UnknownRef(_) | VcsError::UnbornBranch(_) => format!(
                    "'{reference}' is not a branch or commit you can switch to.\n\
                     Create a branch with: git branch {reference}"
                ),
                _ => checkout_guidance(&err),
            };
            CommandError::engine(err, guidance)
        })
    }

    /// Current branch name, or a detached-HEAD label.
    fn head_description(&self) -> String {
        match self.engine.current_branch() {
            Ok(Some(branch)) => branch,
            Ok(None) => "HEAD (detached)".to_string(),
            Err(_) => DEFAULT_BRANCH.to_string(),
        }
    }
}

/// Guidance for errors that block switching or merging.
fn checkout_guidance(err: &VcsError) -> String {
    match err {
        VcsError::LocalChanges(paths) => format!(
            "Your local changes to these files would be overwritten:\n{}\n\
             Commit them first.",
            bullet_list(paths)
        ),
        VcsError::UntrackedOverwritten(paths) => format!(
            "These untracked files would be overwritten:\n{}\n\
             Add and commit them, or rename them first.",
            bullet_list(paths)
        ),
        VcsError::UnresolvedConflicts(paths) => format!(
            "Resolve the conflicts first:\n{}\nThen run git add <file> and git commit.",
            bullet_list(paths)
        ),
        other => other.to_string(),
    }
}

fn conflict_guidance(ours: &str, theirs: &str, paths: &[String]) -> String {
    [
        format!("Merge conflict between {ours} and {theirs}."),
        String::new(),
        "Conflicting files:".to_string(),
        bullet_list(paths),
        String::new(),
        "They are marked with:".to_string(),
        "  <<<<<<< HEAD".to_string(),
        "  =======".to_string(),
        format!("  >>>>>>> {theirs}"),
        String::new(),
        "To resolve:".to_string(),
        "  1. Edit each file and keep only the right version.".to_string(),
        "  2. Stage it: git add <file>".to_string(),
        "  3. Commit: git commit -m \"Resolve merge conflict\"".to_string(),
    ]
    .join("\n")
}

fn render_log_entry(entry: &LogEntry) -> String {
    let date = jiff::Timestamp::from_second(entry.timestamp).map_or_else(
        |_| entry.timestamp.to_string(),
        |ts| ts.strftime("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );
    let mut lines = vec![format!("commit {}", entry.oid)];
    if entry.parents.len() > 1 {
        let parents: Vec<&str> = entry.parents.iter().map(|p| p.short()).collect();
        lines.push(format!("Merge: {}", parents.join(" ")));
    }
    lines.push(format!("Author: {} <{}>", entry.author.name, entry.author.email));
    lines.push(format!("Date:   {date}"));
    lines.push(String::new());
    lines.push(format!("    {}", entry.message));
    lines.push(String::new());
    lines.join("\n")
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("  - {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
