//! Hint keys and texts, one per command family.

use crate::model::CommandIntent;

/// The hint key for a command family; shell commands carry none.
pub(super) fn key(intent: &CommandIntent) -> Option<&'static str> {
    use CommandIntent as C;

    let key = match intent {
        C::Help | C::Ls | C::Cat { .. } | C::Touch { .. } | C::Pwd => return None,
        C::GitInit => "init",
        C::GitStatus => "status",
        C::GitAdd { .. } | C::GitAddAll => "add",
        C::GitCommit { .. } => "commit",
        C::GitLog { .. } => "log",
        C::GitBranchList | C::GitBranchCreate { .. } => "branch",
        C::GitCheckout { .. } | C::GitCheckoutNewBranch { .. } | C::GitCheckoutCommit { .. } => {
            "checkout"
        }
        C::GitMerge { .. } => "merge",
        C::GitConflicts => "conflicts",
        C::GitPush { .. } => "push",
        C::GitPull { .. } => "pull",
        C::GitClone { .. } => "clone",
        C::GitRemoteList { .. } | C::GitRemoteAdd { .. } | C::GitRemoteRemove { .. } => "remote",
        C::GitPagesPublish | C::GitPagesRepublish => "pages",
        C::GithubCreate { .. } => "github-create",
        C::GithubStatus => "github-status",
        C::GithubPrCreate { .. } | C::GithubPrList | C::GithubPrMerge { .. } => "pr",
    };
    Some(key)
}

pub(super) fn lines(key: &str) -> &'static [&'static str] {
    match key {
        "init" => &[
            "Tip: Git now tracks this folder inside the hidden .git directory.",
            "Create a file (touch index.html) and check \"git status\".",
        ],
        "status" => &[
            "Tip: \"untracked\" files are new to Git.",
            "Stage one with: git add <file>",
        ],
        "add" => &[
            "Tip: the file is now staged, ready for the next snapshot.",
            "Save it with: git commit -m \"describe your change\"",
        ],
        "commit" => &[
            "Tip: a commit is a permanent snapshot with a message.",
            "Review your history with: git log",
        ],
        "log" => &[
            "Tip: newest commits come first.",
            "The long hex string after \"commit\" is the commit id.",
        ],
        "branch" => &[
            "Tip: a branch is a movable label pointing at a commit.",
            "Switch to it with: git checkout <branch>",
        ],
        "checkout" => &[
            "Tip: checkout rewrites your files to match the branch or commit.",
            "Check where you are with: git status",
        ],
        "merge" => &[
            "Tip: merging brings another branch's commits into the current one.",
            "Look at the result with: git log",
        ],
        "conflicts" => &[
            "Tip: keep the right version between the <<<<<<<, ======= and >>>>>>> markers,",
            "delete the markers, then run git add <file> and git commit.",
        ],
        "push" => &[
            "Tip: the remote now has a copy of this branch's history.",
            "Inspect it with: github status",
        ],
        "pull" => &[
            "Tip: pull tells you what the remote has that you don't.",
            "Compare with your history using: git log",
        ],
        "clone" => &[
            "Tip: a clone starts a fresh working copy linked to the remote as origin.",
            "Check the link with: git remote -v",
        ],
        "remote" => &[
            "Tip: a remote is a named URL for another copy of the repository.",
            "The usual name for the main one is origin.",
        ],
        "pages" => &[
            "Tip: pages serves the files from your last push as a website.",
            "Push again and run \"git pages republish\" to update it.",
        ],
        "github-create" => &[
            "Tip: this repository lives on the simulated host, not in /repo.",
            "Send your commits there with: git push origin main",
        ],
        "github-status" => &[
            "Tip: compare the remote commits with \"git log\" to see what is missing.",
        ],
        "pr" => &[
            "Tip: a pull request asks to merge one branch into another.",
            "List them with \"github pr list\" and merge with \"github pr merge <id>\".",
        ],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_family_key_has_text() {
        let intents = [
            CommandIntent::GitInit,
            CommandIntent::GitStatus,
            CommandIntent::GitAddAll,
            CommandIntent::GitCommit {
                message: "m".into(),
            },
            CommandIntent::GitConflicts,
            CommandIntent::GitPagesRepublish,
            CommandIntent::GithubStatus,
            CommandIntent::GithubPrMerge { id: 1 },
        ];
        for intent in intents {
            let key = key(&intent).unwrap();
            assert!(!lines(key).is_empty(), "{key}");
        }
    }

    #[test]
    fn shell_commands_have_no_hint() {
        assert_eq!(key(&CommandIntent::Ls), None);
        assert_eq!(
            key(&CommandIntent::Touch {
                file: "a".into()
            }),
            None
        );
    }
}
