//! Per-lesson command allow-lists.

use crate::model::ActivityConfig;
use crate::parser;

const SHELL_COMMANDS: [&str; 5] = ["help", "ls", "cat", "touch", "pwd"];

/// The allow-list key for raw input, or `None` for input outside the
/// shell/`git`/`github` families (never gated).
///
/// Reads the same tokens the parser does, so quoting a word cannot change
/// the key.
pub fn canonicalize(input: &str) -> Option<String> {
    let tokens = parser::tokenize(input);
    let mut tokens = tokens.iter().map(String::as_str);
    match tokens.next()? {
        cmd if SHELL_COMMANDS.contains(&cmd) => Some(cmd.to_string()),
        "git" => tokens.next().map(|sub| format!("git {sub}")),
        "github" => tokens.next().map(|sub| format!("github {sub}")),
        _ => None,
    }
}

/// Filters commands against the active lesson.
#[derive(Debug, Clone, Copy)]
pub struct ActivityGate<'a> {
    activity: Option<&'a ActivityConfig>,
}

impl<'a> ActivityGate<'a> {
    pub fn new(activity: Option<&'a ActivityConfig>) -> Self {
        Self { activity }
    }

    pub fn is_allowed(&self, key: &str) -> bool {
        match self.activity.and_then(|a| a.allowed_commands.as_ref()) {
            None => true,
            Some(allowed) => allowed.contains(key),
        }
    }

    /// Title used in the denial message.
    pub fn activity_title(&self) -> &str {
        self.activity.map_or("this activity", |a| a.title.as_str())
    }
}
