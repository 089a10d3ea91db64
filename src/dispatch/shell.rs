//! `help`, `ls`, `cat` and `touch` over the engine's working tree.

use crate::vcs::VersionControl;

pub(super) fn help() -> String {
    [
        "Available commands:",
        "  help                          Show this help",
        "  ls                            List files in /repo",
        "  cat <file>                    Print a file",
        "  touch <file>                  Create an empty file",
        "  pwd                           Print the current directory",
        "",
        "Local Git:",
        "  git init                      Start a repository",
        "  git status                    Show changed files",
        "  git add <file>                Stage one file (git add . is not supported)",
        "  git commit -m \"message\"       Record a commit",
        "  git log [<ref>]               Show history",
        "  git branch [<name>]           List or create branches",
        "  git checkout [-b] <name>      Switch branch (or create and switch)",
        "  git checkout <commit>         Look at an old commit",
        "  git merge <branch>            Merge a branch into the current one",
        "  git conflicts                 List files with conflict markers",
        "  git remote [-v]               List remotes",
        "  git remote add <name> <url>   Register a remote",
        "  git remote remove <name>      Forget a remote",
        "  git clone <url>               Start over from the simulated remote",
        "  git push [origin] [<branch>]  Send a branch to the simulated remote",
        "  git pull [origin] [<branch>]  See what the remote has",
        "  git pages publish|republish   Publish the pushed site",
        "",
        "Simulated GitHub:",
        "  github create <name>          Create the remote repository",
        "  github status                 Show the remote repository",
        "  github pr create <from> [<to>] [-t \"title\"]",
        "  github pr list",
        "  github pr merge <id>",
    ]
    .join("\n")
}

pub(super) fn ls(engine: &dyn VersionControl) -> String {
    engine.list_entries().join("  ")
}

pub(super) fn cat(engine: &dyn VersionControl, file: &str) -> String {
    match engine.read_file(file) {
        Some(content) => content.to_string(),
        None => format!("cat: {file}: No such file"),
    }
}

/// Creates an empty file; existing content is left alone.
pub(super) fn touch(engine: &mut dyn VersionControl, file: &str) -> String {
    if engine.file_exists(file) {
        return format!("File already exists: {file}");
    }
    engine.write_file(file, "");
    format!("File created: {file}")
}
