//! Command intents: the structured form of one learner command.

/// A validated command, ready for dispatch.
///
/// One variant per command kind. Produced by the parser and consumed
/// exactly once by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandIntent {
    // ── Shell ──
    Help,
    Ls,
    Cat { file: String },
    Touch { file: String },
    Pwd,

    // ── Local git ──
    GitInit,
    GitStatus,
    GitAdd { file: String },
    /// `git add .`, which the trainer refuses on purpose.
    GitAddAll,
    GitCommit { message: String },
    /// `None` means `HEAD`.
    GitLog { reference: Option<String> },
    GitBranchList,
    GitBranchCreate { name: String },
    GitCheckout { branch: String },
    /// `git checkout -b <name>`.
    GitCheckoutNewBranch { name: String },
    /// Detached checkout of a commit id (7 to 40 hex characters).
    GitCheckoutCommit { oid: String },
    GitMerge { branch: String },
    GitConflicts,
    /// `branch: None` means the current branch.
    GitPush { remote: String, branch: Option<String> },
    GitPull { remote: String, branch: Option<String> },
    GitClone { url: String },
    GitRemoteList { verbose: bool },
    GitRemoteAdd { name: String, url: String },
    GitRemoteRemove { name: String },
    GitPagesPublish,
    GitPagesRepublish,

    // ── Simulated hosting ──
    GithubCreate { name: String },
    GithubStatus,
    GithubPrCreate {
        from: String,
        to: Option<String>,
        title: Option<String>,
    },
    GithubPrList,
    GithubPrMerge { id: u64 },
}

impl CommandIntent {
    /// The allow-list key for this command (e.g. `"git commit"`).
    pub fn canonical_key(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Ls => "ls",
            Self::Cat { .. } => "cat",
            Self::Touch { .. } => "touch",
            Self::Pwd => "pwd",
            Self::GitInit => "git init",
            Self::GitStatus => "git status",
            Self::GitAdd { .. } | Self::GitAddAll => "git add",
            Self::GitCommit { .. } => "git commit",
            Self::GitLog { .. } => "git log",
            Self::GitBranchList | Self::GitBranchCreate { .. } => "git branch",
            Self::GitCheckout { .. }
            | Self::GitCheckoutNewBranch { .. }
            | Self::GitCheckoutCommit { .. } => "git checkout",
            Self::GitMerge { .. } => "git merge",
            Self::GitConflicts => "git conflicts",
            Self::GitPush { .. } => "git push",
            Self::GitPull { .. } => "git pull",
            Self::GitClone { .. } => "git clone",
            Self::GitRemoteList { .. }
            | Self::GitRemoteAdd { .. }
            | Self::GitRemoteRemove { .. } => "git remote",
            Self::GitPagesPublish | Self::GitPagesRepublish => "git pages",
            Self::GithubCreate { .. } => "github create",
            Self::GithubStatus => "github status",
            Self::GithubPrCreate { .. } | Self::GithubPrList | Self::GithubPrMerge { .. } => {
                "github pr"
            }
        }
    }

    /// Whether this command needs an initialized repository before it runs.
    ///
    /// Shell commands, the hosting service, `git init` and `git clone`
    /// work without one.
    pub fn requires_repository(&self) -> bool {
        let key = self.canonical_key();
        key.starts_with("git ") && !matches!(self, Self::GitInit | Self::GitClone { .. })
    }
}
