//! "Did you mean …?" suggestions by edit distance.

/// Every complete command, in suggestion priority order.
pub const VOCABULARY: &[&str] = &[
    "help",
    "ls",
    "cat",
    "touch",
    "pwd",
    "git init",
    "git status",
    "git add",
    "git commit",
    "git log",
    "git branch",
    "git checkout",
    "git merge",
    "git conflicts",
    "git push",
    "git pull",
    "git clone",
    "git remote",
    "git remote add",
    "git remote remove",
    "git pages publish",
    "git pages republish",
    "github create",
    "github status",
    "github pr create",
    "github pr list",
    "github pr merge",
];

/// Largest distance still worth suggesting.
pub const MAX_DISTANCE: usize = 3;

/// Levenshtein distance with unit costs, over chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// The closest vocabulary entry for `tokens`, if within [`MAX_DISTANCE`].
///
/// `scope` restricts candidates to entries extending a known prefix
/// (`"git remote"` for an unknown `git remote` subcommand); pass `""` for
/// top-level input. An entry of `k` words is compared against the first
/// `j ≤ k` tokens joined by spaces, so glued input such as `gitstatus`
/// still finds `git status`. Ties go to the earlier entry.
pub fn closest(tokens: &[String], scope: &str) -> Option<&'static str> {
    let scope_words = scope.split_whitespace().count();

    VOCABULARY
        .iter()
        .filter(|entry| in_scope(entry, scope, scope_words))
        .map(|entry| (distance_to(tokens, entry), *entry))
        .min_by_key(|(distance, _)| *distance)
        .filter(|(distance, _)| *distance <= MAX_DISTANCE)
        .map(|(_, entry)| entry)
}

fn in_scope(entry: &str, scope: &str, scope_words: usize) -> bool {
    if scope.is_empty() {
        return true;
    }
    entry.split(' ').count() > scope_words
        && entry.starts_with(scope)
        && entry[scope.len()..].starts_with(' ')
}

fn distance_to(tokens: &[String], entry: &str) -> usize {
    let words = entry.split(' ').count();
    (1..=words.min(tokens.len()))
        .map(|j| levenshtein(&tokens[..j].join(" "), entry))
        .min()
        .unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<String> {
        input.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn distances() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("status", "status"), 0);
        assert_eq!(levenshtein("stauts", "status"), 2);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("ñu", "nu"), 1);
    }

    #[test]
    fn near_misses_get_suggestions() {
        assert_eq!(closest(&tokens("git stauts"), "git"), Some("git status"));
        assert_eq!(closest(&tokens("git comit -m x"), "git"), Some("git commit"));
        assert_eq!(closest(&tokens("gti status"), ""), Some("git status"));
        assert_eq!(closest(&tokens("cta index.html"), ""), Some("cat"));
    }

    #[test]
    fn glued_commands_are_recognized() {
        assert_eq!(closest(&tokens("gitstatus"), ""), Some("git status"));
        assert_eq!(closest(&tokens("gitinit"), ""), Some("git init"));
        assert_eq!(closest(&tokens("githubcreate demo"), ""), Some("github create"));
    }

    #[test]
    fn scope_prefers_subcommands() {
        assert_eq!(
            closest(&tokens("git remote ad origin x"), "git remote"),
            Some("git remote add")
        );
        assert_eq!(closest(&tokens("github pr lst"), "github pr"), Some("github pr list"));
        assert_eq!(
            closest(&tokens("git pages publsh"), "git pages"),
            Some("git pages publish")
        );
    }

    #[test]
    fn ties_go_to_the_earlier_entry() {
        // "pu" is two edits from both push and pull.
        assert_eq!(closest(&tokens("git pu"), "git"), Some("git push"));
    }

    #[test]
    fn distant_input_gets_nothing() {
        assert_eq!(closest(&tokens("git frobnicate"), "git"), None);
        assert_eq!(closest(&tokens("photoshop"), ""), None);
    }

    #[test]
    fn every_entry_within_threshold_is_suggested() {
        for entry in VOCABULARY {
            let mut mangled = entry.to_string();
            mangled.pop();
            assert!(closest(&tokens(&mangled), "").is_some(), "{mangled}");
        }
    }
}
