//! Routes parsed commands to the engine and the simulated host.
//!
//! A [`Dispatcher`] borrows the session's stores for one command. Every
//! successful response passes through the [`HintEngine`] under the
//! command family's hint key; failures come back as [`CommandError`]s
//! whose text already carries the learner-facing guidance.

mod git;
mod github;
mod hints;
mod shell;

use tracing::debug;

use crate::error::{CommandError, Result};
use crate::hint::HintEngine;
use crate::model::CommandIntent;
use crate::remote::{RemoteError, RemoteSimulator};
use crate::vcs::{Signature, VersionControl};

/// Working directory shown by `pwd` and in messages.
pub const REPO_DIR: &str = "/repo";

/// Branch created by `git init` and used when nothing else is known.
pub const DEFAULT_BRANCH: &str = "main";

pub struct Dispatcher<'a> {
    engine: &'a mut dyn VersionControl,
    remote: &'a mut RemoteSimulator,
    hints: &'a mut HintEngine,
    author: &'a Signature,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        engine: &'a mut dyn VersionControl,
        remote: &'a mut RemoteSimulator,
        hints: &'a mut HintEngine,
        author: &'a Signature,
    ) -> Self {
        Self {
            engine,
            remote,
            hints,
            author,
        }
    }

    pub fn execute(&mut self, intent: CommandIntent) -> Result<String> {
        if intent.requires_repository() && !self.engine.is_initialized() {
            return Err(CommandError::NotInitialized);
        }
        let hint_key = hints::key(&intent);
        debug!(key = intent.canonical_key(), hint_key, "dispatching");

        let response = match intent {
            CommandIntent::Help => shell::help(),
            CommandIntent::Ls => shell::ls(&*self.engine),
            CommandIntent::Cat { file } => shell::cat(&*self.engine, &file),
            CommandIntent::Touch { file } => shell::touch(&mut *self.engine, &file),
            CommandIntent::Pwd => REPO_DIR.to_string(),

            CommandIntent::GitInit => self.init()?,
            CommandIntent::GitStatus => self.status()?,
            CommandIntent::GitAdd { file } => self.add(&file)?,
            CommandIntent::GitAddAll => return Err(self.add_all_refusal()),
            CommandIntent::GitCommit { message } => self.commit(&message)?,
            CommandIntent::GitLog { reference } => self.log(reference.as_deref())?,
            CommandIntent::GitBranchList => self.branch_list()?,
            CommandIntent::GitBranchCreate { name } => self.branch_create(&name)?,
            CommandIntent::GitCheckout { branch } => self.checkout(&branch)?,
            CommandIntent::GitCheckoutNewBranch { name } => self.checkout_new_branch(&name)?,
            CommandIntent::GitCheckoutCommit { oid } => self.checkout_commit(&oid)?,
            CommandIntent::GitMerge { branch } => self.merge(&branch)?,
            CommandIntent::GitConflicts => self.conflicts(),
            CommandIntent::GitPush { remote, branch } => self.push(&remote, branch.as_deref())?,
            CommandIntent::GitPull { remote, branch } => self.pull(&remote, branch.as_deref())?,
            CommandIntent::GitClone { url } => self.clone_remote(&url)?,
            CommandIntent::GitRemoteList { verbose } => self.remote_list(verbose)?,
            CommandIntent::GitRemoteAdd { name, url } => self.remote_add(&name, &url)?,
            CommandIntent::GitRemoteRemove { name } => self.remote_remove(&name)?,
            CommandIntent::GitPagesPublish => self.pages(false)?,
            CommandIntent::GitPagesRepublish => self.pages(true)?,

            CommandIntent::GithubCreate { name } => self.github_create(&name)?,
            CommandIntent::GithubStatus => self.github_status()?,
            CommandIntent::GithubPrCreate { from, to, title } => {
                self.pr_create(&from, to.as_deref(), title.as_deref())?
            }
            CommandIntent::GithubPrList => self.pr_list()?,
            CommandIntent::GithubPrMerge { id } => self.pr_merge(id)?,
        };

        Ok(match hint_key {
            Some(key) => self.hints.with_hint(key, &response, hints::lines(key)),
            None => response,
        })
    }

    /// The branch a push or pull without an explicit branch refers to.
    fn default_branch(&self) -> String {
        self.engine
            .current_branch()
            .ok()
            .flatten()
            .unwrap_or_else(|| DEFAULT_BRANCH.to_string())
    }
}

/// Guidance for remote failures shared by every command that touches the
/// simulated host.
fn remote_failure(err: RemoteError) -> CommandError {
    let guidance = match &err {
        RemoteError::NoRepository => "There is no simulated remote repository yet.\n\
             Create one first with:\n  github create <repository-name>"
            .to_string(),
        RemoteError::UnsupportedRemote(_) => {
            "Only the origin remote is supported: git push origin <branch>".to_string()
        }
        RemoteError::BranchUnreadable(branch) => {
            format!("Could not read branch '{branch}'. Have you made any commits on it?")
        }
        RemoteError::NothingPushed => "The remote has no commits yet.\n\
             Push your work first with:\n  git push origin main"
            .to_string(),
        RemoteError::NoMatchingRepository(url) => format!(
            "Repository not found: {url}\nCheck the URL with \"github status\"."
        ),
        RemoteError::PullRequestNotFound(id) => {
            format!("Pull request #{id} does not exist. See \"github pr list\".")
        }
        RemoteError::Storage(_) | RemoteError::Engine(_) => {
            format!("The simulated remote is unavailable: {err}")
        }
    };
    CommandError::remote(err, guidance)
}
