//! Mission evaluation.
//!
//! Checks read the engine and the remote record and never change them.
//! Errors accumulate so the learner sees everything still missing, except
//! when a prerequisite is absent and the remaining checks would be noise.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{MissionCheck, MissionResult, PagesState, RemoteRepository};
use crate::remote::RemoteSimulator;
use crate::vcs::{FileStatus, VersionControl, has_conflict_markers};

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").expect("static regex"));

/// Evaluates one mission against the current state.
pub fn validate(
    check: &MissionCheck,
    engine: &dyn VersionControl,
    remote: &RemoteSimulator,
) -> MissionResult {
    let record = match remote.repository() {
        Ok(record) => record,
        Err(err) => return MissionResult::fail(format!("Could not read the remote: {err}")),
    };
    let record = record.as_ref();

    match check {
        MissionCheck::FirstCommit { file, phrase } => first_commit(engine, file, phrase),
        MissionCheck::RemotePushed => remote_pushed(record),
        MissionCheck::RemoteHistory { min_commits } => {
            remote_history(engine, record, *min_commits)
        }
        MissionCheck::BranchPushed { branch } => branch_pushed(engine, record, branch),
        MissionCheck::HeadingMentions { file, word } => heading_mentions(engine, file, word),
        MissionCheck::BranchesConverged { target, source } => {
            branches_converged(engine, target, source)
        }
        MissionCheck::ConflictProduced => conflict_produced(engine),
        MissionCheck::ConflictResolved { phrase } => conflict_resolved(engine, phrase),
        MissionCheck::PullRequestOpened { to } => pull_request_opened(engine, record, to),
        MissionCheck::PagesPublished { file } => pages_published(engine, record, file),
    }
}

/// Case-insensitive substring match.
fn mentions(text: &str, phrase: &str) -> bool {
    text.to_lowercase().contains(&phrase.to_lowercase())
}

/// Message of the newest commit on HEAD, if any.
fn last_message(engine: &dyn VersionControl) -> Option<String> {
    engine
        .log("HEAD")
        .ok()
        .and_then(|log| log.into_iter().next())
        .map(|entry| entry.message)
}

fn head_commit_count(engine: &dyn VersionControl) -> usize {
    engine.log("HEAD").map_or(0, |log| log.len())
}

fn first_commit(engine: &dyn VersionControl, file: &str, phrase: &str) -> MissionResult {
    let mut errors = Vec::new();
    if !engine.visible_files().iter().any(|f| f == file) {
        errors.push(format!("You haven't created \"{file}\" in the repository yet."));
    }

    let Some(message) = last_message(engine) else {
        errors.push("You haven't made any commits yet.".to_string());
        return MissionResult::from_errors(errors);
    };
    if !mentions(&message, phrase) {
        errors.push(format!(
            "The last commit message must contain the phrase \"{phrase}\"."
        ));
    }
    MissionResult::from_errors(errors)
}

fn remote_pushed(record: Option<&RemoteRepository>) -> MissionResult {
    let Some(remote) = record else {
        return MissionResult::fail(
            "You haven't created a simulated remote yet. Use: github create <name>",
        );
    };
    if remote.commits.is_empty() {
        return MissionResult::fail(
            "You haven't pushed to the remote yet. Try: git push origin main",
        );
    }
    MissionResult::pass()
}

fn remote_history(
    engine: &dyn VersionControl,
    record: Option<&RemoteRepository>,
    min_commits: usize,
) -> MissionResult {
    let mut errors = Vec::new();
    if head_commit_count(engine) < min_commits {
        errors.push(format!(
            "You need at least {min_commits} commits in the local repository."
        ));
    }
    if record.map_or(0, |remote| remote.commits.len()) < min_commits {
        errors.push(format!(
            "The simulated remote doesn't have {min_commits} commits yet. \
             Push again after your latest commit: git push origin main"
        ));
    }
    MissionResult::from_errors(errors)
}

fn branch_pushed(
    engine: &dyn VersionControl,
    record: Option<&RemoteRepository>,
    branch: &str,
) -> MissionResult {
    let mut errors = Vec::new();
    let exists = engine
        .list_branches()
        .is_ok_and(|branches| branches.iter().any(|b| b == branch));
    if !exists {
        errors.push(format!(
            "You haven't created the branch \"{branch}\". Use: git branch {branch}"
        ));
    }
    if !engine.log(branch).is_ok_and(|log| !log.is_empty()) {
        errors.push(format!(
            "The branch \"{branch}\" has no commits. Switch to it \
             (git checkout {branch}) and commit at least once."
        ));
    }
    match record {
        None => errors.push(
            "You haven't created a simulated remote yet. Use: github create <name>".to_string(),
        ),
        Some(remote) if remote.last_pushed_branch.as_deref() != Some(branch) => {
            errors.push(format!(
                "You haven't pushed \"{branch}\". Try: git push origin {branch}"
            ));
        }
        Some(_) => {}
    }
    MissionResult::from_errors(errors)
}

fn heading_mentions(engine: &dyn VersionControl, file: &str, word: &str) -> MissionResult {
    let Some(html) = engine.read_file(file) else {
        return MissionResult::fail(format!("\"{file}\" was not found in /repo."));
    };

    let mut errors = Vec::new();
    let html = html.trim();
    if html.is_empty() {
        errors.push(format!("\"{file}\" is empty. Write some content in it."));
    }
    match HEADING.captures(html).and_then(|caps| caps.get(1)) {
        None => errors.push(format!(
            "No <h1> heading found in {file}. Add an <h1> with a main title."
        )),
        Some(text) if !mentions(text.as_str(), word) => errors.push(format!(
            "The text inside <h1> should mention the word \"{word}\"."
        )),
        Some(_) => {}
    }
    MissionResult::from_errors(errors)
}

fn branches_converged(engine: &dyn VersionControl, target: &str, source: &str) -> MissionResult {
    let mut errors = Vec::new();
    let target_oid = engine.resolve_ref(target).ok();
    if target_oid.is_none() {
        errors.push(format!(
            "The branch \"{target}\" was not found. Make sure it exists and has a commit."
        ));
    }
    let source_oid = engine.resolve_ref(source).ok();
    if source_oid.is_none() {
        errors.push(format!(
            "The branch \"{source}\" was not found. Create it with: git branch {source}"
        ));
    }

    let (Some(target_oid), Some(source_oid)) = (target_oid, source_oid) else {
        return MissionResult::from_errors(errors);
    };
    if target_oid != source_oid {
        errors.push(format!(
            "\"{target}\" doesn't contain the changes from \"{source}\" yet. \
             From {target}, run: git merge {source}"
        ));
    }
    MissionResult::from_errors(errors)
}

fn conflict_produced(engine: &dyn VersionControl) -> MissionResult {
    let conflicted = engine.status().is_ok_and(|entries| {
        entries
            .iter()
            .any(|entry| entry.status == FileStatus::Conflicted)
    });
    if conflicted {
        MissionResult::pass()
    } else {
        MissionResult::fail(
            "No conflicted files detected. Change the same line on two \
             different branches and merge them.",
        )
    }
}

fn conflict_resolved(engine: &dyn VersionControl, phrase: &str) -> MissionResult {
    let mut errors = Vec::new();
    let markers_left = engine
        .visible_files()
        .iter()
        .any(|file| engine.read_file(file).is_some_and(has_conflict_markers));
    if markers_left {
        errors.push(
            "Conflict markers (<<<<<<< ======= >>>>>>>) are still present. \
             Resolve them and commit."
                .to_string(),
        );
    }

    let Some(message) = last_message(engine) else {
        errors.push("You haven't made any commits yet.".to_string());
        return MissionResult::from_errors(errors);
    };
    if !mentions(&message, phrase) {
        errors.push(format!(
            "After resolving, run git add <file> and then a commit whose \
             message mentions \"{phrase}\"."
        ));
    }
    MissionResult::from_errors(errors)
}

fn pull_request_opened(
    engine: &dyn VersionControl,
    record: Option<&RemoteRepository>,
    to: &str,
) -> MissionResult {
    let Some(remote) = record else {
        return MissionResult::fail(
            "You haven't created a simulated remote yet. Use: github create <name>",
        );
    };
    let local = engine.list_branches().unwrap_or_default();
    let opened = remote.pull_requests.iter().any(|pr| {
        pr.to_branch == to && pr.from_branch != to && local.contains(&pr.from_branch)
    });
    if opened {
        MissionResult::pass()
    } else {
        MissionResult::fail(format!(
            "Open a pull request from one of your branches into \"{to}\": \
             github pr create <branch> {to}"
        ))
    }
}

fn pages_published(
    engine: &dyn VersionControl,
    record: Option<&RemoteRepository>,
    file: &str,
) -> MissionResult {
    let Some(remote) = record else {
        return MissionResult::fail(
            "You haven't created a simulated remote yet. Use: github create <name>",
        );
    };
    let mut errors = Vec::new();
    if remote.commits.is_empty() {
        errors.push("Push your site first: git push origin main".to_string());
    }
    if remote.pages_state != PagesState::Published {
        errors.push("The site isn't published yet. Run: git pages publish".to_string());
    }
    if !engine.file_exists(file) {
        errors.push(format!("The site needs a \"{file}\" page."));
    }
    MissionResult::from_errors(errors)
}
