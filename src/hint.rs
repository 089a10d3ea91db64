//! One-time educational hints.
//!
//! Each hint key moves from unseen to shown the first time its hint is
//! attached to a response, and stays shown for the rest of the session.
//! The hint travels inside the response text between sentinel markers;
//! the presentation layer splits it out.

use std::collections::HashMap;

pub const HINT_START: &str = "[[HINT_START]]";
pub const HINT_END: &str = "[[HINT_END]]";

#[derive(Debug, Default)]
pub struct HintEngine {
    /// Hint key → whether its hint has been shown.
    shown: HashMap<String, bool>,
}

impl HintEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_shown(&self, key: &str) -> bool {
        self.shown.get(key).copied().unwrap_or(false)
    }

    /// `base` followed by the hint block the first time `key` is seen,
    /// `base` alone afterwards.
    pub fn with_hint(&mut self, key: &str, base: &str, hint_lines: &[&str]) -> String {
        if hint_lines.is_empty() || self.is_shown(key) {
            return base.to_string();
        }
        self.shown.insert(key.to_string(), true);

        let block = format!("{HINT_START}\n{}\n{HINT_END}", hint_lines.join("\n"));
        if base.is_empty() {
            block
        } else {
            format!("{base}\n\n{block}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_shown_once_per_key() {
        let mut hints = HintEngine::new();
        assert_eq!(
            hints.with_hint("k", "base", &["a"]),
            "base\n\n[[HINT_START]]\na\n[[HINT_END]]"
        );
        assert_eq!(hints.with_hint("k", "base", &["a"]), "base");
    }

    #[test]
    fn keys_are_independent() {
        let mut hints = HintEngine::new();
        hints.with_hint("commit", "done", &["tip"]);
        assert!(hints.is_shown("commit"));
        assert!(!hints.is_shown("push"));
        assert!(hints.with_hint("push", "pushed", &["tip"]).contains(HINT_START));
    }

    #[test]
    fn empty_base_still_carries_the_block() {
        let mut hints = HintEngine::new();
        assert_eq!(
            hints.with_hint("k", "", &["one", "two"]),
            "[[HINT_START]]\none\ntwo\n[[HINT_END]]"
        );
    }

    #[test]
    fn empty_base_without_lines_is_empty() {
        let mut hints = HintEngine::new();
        assert_eq!(hints.with_hint("k", "", &[]), "");
        assert!(!hints.is_shown("k"));
    }
}
