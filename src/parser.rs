//! Raw input to [`CommandIntent`].
//!
//! Tokens are whitespace-separated; a token starting with `"` or `'` runs
//! to the matching quote (or the end of input) and keeps its spaces.

mod suggest;

use suggest::closest;

use crate::error::{CommandError, Result};
use crate::model::CommandIntent;

const COMMIT_USAGE: &str = "Usage: git commit -m \"message\"\n\
Every commit needs a message describing the change.";

/// Parses one line of input. Blank input is `Ok(None)`.
pub fn parse(input: &str) -> Result<Option<CommandIntent>> {
    let tokens = tokenize(input);
    let Some(first) = tokens.first() else {
        return Ok(None);
    };
    let args = &tokens[1..];

    let intent = match first.as_str() {
        "help" => CommandIntent::Help,
        "ls" => CommandIntent::Ls,
        "pwd" => CommandIntent::Pwd,
        "cat" => CommandIntent::Cat {
            file: required(args, 0, "Usage: cat <file>")?,
        },
        "touch" => CommandIntent::Touch {
            file: required(args, 0, "Usage: touch <file>")?,
        },
        "git" => parse_git(&tokens)?,
        "github" => parse_github(&tokens)?,
        _ => return Err(unknown(&tokens, "")),
    };
    Ok(Some(intent))
}

/// Splits input into tokens, honoring quotes at token starts.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if !in_token && (c == '"' || c == '\'') => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }
    tokens
}

/// 7 to 40 hex digits: a commit id rather than a branch name.
pub fn is_commit_id(reference: &str) -> bool {
    (7..=40).contains(&reference.len()) && reference.chars().all(|c| c.is_ascii_hexdigit())
}

fn parse_git(tokens: &[String]) -> Result<CommandIntent> {
    let Some(sub) = tokens.get(1) else {
        return Err(CommandError::usage(
            "Usage: git <command>\nType \"help\" to see the available commands.",
        ));
    };
    let args = &tokens[2..];

    let intent = match sub.as_str() {
        "init" => CommandIntent::GitInit,
        "status" => CommandIntent::GitStatus,
        "add" => match args.first().map(String::as_str) {
            None => return Err(CommandError::usage("Usage: git add <file>")),
            Some(".") => CommandIntent::GitAddAll,
            Some(file) => CommandIntent::GitAdd {
                file: file.to_string(),
            },
        },
        "commit" => CommandIntent::GitCommit {
            message: commit_message(args)?,
        },
        "log" => CommandIntent::GitLog {
            reference: args.first().cloned(),
        },
        "branch" => match args.first() {
            None => CommandIntent::GitBranchList,
            Some(name) => CommandIntent::GitBranchCreate { name: name.clone() },
        },
        "checkout" => match args.first().map(String::as_str) {
            None => return Err(CommandError::usage("Usage: git checkout <branch|commit>")),
            Some("-b") => CommandIntent::GitCheckoutNewBranch {
                name: required(args, 1, "Usage: git checkout -b <new-branch>")?,
            },
            Some(reference) if is_commit_id(reference) => CommandIntent::GitCheckoutCommit {
                oid: reference.to_string(),
            },
            Some(branch) => CommandIntent::GitCheckout {
                branch: branch.to_string(),
            },
        },
        "merge" => CommandIntent::GitMerge {
            branch: required(args, 0, "Usage: git merge <branch>")?,
        },
        "conflicts" => CommandIntent::GitConflicts,
        "push" => CommandIntent::GitPush {
            remote: remote_arg(args),
            branch: args.get(1).cloned(),
        },
        "pull" => CommandIntent::GitPull {
            remote: remote_arg(args),
            branch: args.get(1).cloned(),
        },
        "clone" => CommandIntent::GitClone {
            url: required(args, 0, "Usage: git clone <url>")?,
        },
        "remote" => parse_remote(tokens, args)?,
        "pages" => match args.first().map(String::as_str) {
            Some("publish") => CommandIntent::GitPagesPublish,
            Some("republish") => CommandIntent::GitPagesRepublish,
            None => return Err(CommandError::usage("Usage: git pages publish|republish")),
            Some(_) => return Err(unknown(tokens, "git pages")),
        },
        _ => return Err(unknown(tokens, "git")),
    };
    Ok(intent)
}

fn parse_remote(tokens: &[String], args: &[String]) -> Result<CommandIntent> {
    let intent = match args.first().map(String::as_str) {
        None => CommandIntent::GitRemoteList { verbose: false },
        Some("-v") => CommandIntent::GitRemoteList { verbose: true },
        Some("add") => {
            const USAGE: &str = "Usage: git remote add <name> <url>";
            CommandIntent::GitRemoteAdd {
                name: required(args, 1, USAGE)?,
                url: required(args, 2, USAGE)?,
            }
        }
        Some("remove" | "rm") => CommandIntent::GitRemoteRemove {
            name: required(args, 1, "Usage: git remote remove <name>")?,
        },
        Some(_) => return Err(unknown(tokens, "git remote")),
    };
    Ok(intent)
}

fn parse_github(tokens: &[String]) -> Result<CommandIntent> {
    let Some(sub) = tokens.get(1) else {
        return Err(CommandError::usage(
            "Usage: github <command>\nExamples: github create my-site, github status",
        ));
    };
    let args = &tokens[2..];

    let intent = match sub.as_str() {
        "create" => CommandIntent::GithubCreate {
            name: required(args, 0, "Usage: github create <repository-name>")?,
        },
        "status" => CommandIntent::GithubStatus,
        "pr" => match args.first().map(String::as_str) {
            Some("create") => pr_create(&args[1..])?,
            Some("list") => CommandIntent::GithubPrList,
            Some("merge") => CommandIntent::GithubPrMerge {
                id: pr_id(args.get(1))?,
            },
            None => return Err(CommandError::usage("Usage: github pr create|list|merge")),
            Some(_) => return Err(unknown(tokens, "github pr")),
        },
        _ => return Err(unknown(tokens, "github")),
    };
    Ok(intent)
}

fn pr_create(args: &[String]) -> Result<CommandIntent> {
    const USAGE: &str = "Usage: github pr create <from-branch> [<to-branch>] [-t \"title\"]";

    let mut positional = Vec::new();
    let mut title = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-t" | "--title" => {
                let value = iter.next().ok_or_else(|| CommandError::usage(USAGE))?;
                title = Some(value.clone());
            }
            _ => positional.push(arg.clone()),
        }
    }

    let mut positional = positional.into_iter();
    let from = positional.next().ok_or_else(|| CommandError::usage(USAGE))?;
    Ok(CommandIntent::GithubPrCreate {
        from,
        to: positional.next(),
        title,
    })
}

fn pr_id(arg: Option<&String>) -> Result<u64> {
    const USAGE: &str =
        "Usage: github pr merge <id>\nThe id is the number shown by \"github pr list\".";
    arg.and_then(|raw| raw.trim_start_matches('#').parse::<u64>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| CommandError::usage(USAGE))
}

fn commit_message(args: &[String]) -> Result<String> {
    let position = args
        .iter()
        .position(|arg| arg == "-m")
        .ok_or_else(|| CommandError::usage(COMMIT_USAGE))?;
    let message = args[position + 1..].join(" ");
    if message.trim().is_empty() {
        return Err(CommandError::usage(COMMIT_USAGE));
    }
    Ok(message)
}

fn remote_arg(args: &[String]) -> String {
    args.first().cloned().unwrap_or_else(|| "origin".to_string())
}

fn required(args: &[String], index: usize, usage: &str) -> Result<String> {
    args.get(index)
        .cloned()
        .ok_or_else(|| CommandError::usage(usage))
}

fn unknown(tokens: &[String], scope: &str) -> CommandError {
    CommandError::Unknown {
        input: tokens.join(" "),
        suggestion: closest(tokens, scope).map(str::to_string),
    }
}
