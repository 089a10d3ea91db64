//! Trainer configuration.
//!
//! Loaded from `~/.git-trainer/config.toml`. Every key is optional and a
//! missing file means defaults.
//!
//! The commit author and the starting activity are resolved through a chain:
//!
//! 1. `--author` / `--activity` on the command line
//! 2. `GIT_TRAINER_AUTHOR` / `GIT_TRAINER_ACTIVITY` in the environment
//! 3. the config file
//! 4. built-in defaults

use std::path::PathBuf;
use std::{env, fs, io};

use serde::{Deserialize, Serialize};

use crate::vcs::Signature;

pub const AUTHOR_ENV: &str = "GIT_TRAINER_AUTHOR";
pub const ACTIVITY_ENV: &str = "GIT_TRAINER_ACTIVITY";

const DEFAULT_AUTHOR_NAME: &str = "Git Trainer User";
const DEFAULT_AUTHOR_EMAIL: &str = "user@example.com";
const DEFAULT_ACTIVITY: &str = "act-1";
const DIR_NAME: &str = ".git-trainer";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Name recorded on commits.
    pub author_name: Option<String>,

    /// Email recorded on commits.
    pub author_email: Option<String>,

    /// Where the simulated remote is persisted. Defaults to `~/.git-trainer`.
    pub state_dir: Option<PathBuf>,

    /// Activity the shell starts in when `--activity` is not given.
    pub default_activity: Option<String>,

    /// `tracing` filter directive, used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}

impl Config {
    /// Load config from `~/.git-trainer/config.toml`.
    /// A missing file yields the defaults; an unreadable or invalid one is an error.
    pub fn load() -> Result<Self, String> {
        let Some(path) = Self::path() else {
            return Ok(Self::default());
        };

        let contents = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        Self::parse(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// The config file path: `~/.git-trainer/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(DIR_NAME).join("config.toml"))
    }

    /// The state directory: an explicit `--state-dir`, then `state-dir`,
    /// then `~/.git-trainer`.
    pub fn state_dir(&self, explicit: Option<PathBuf>) -> Option<PathBuf> {
        explicit
            .or_else(|| self.state_dir.clone())
            .or_else(|| dirs::home_dir().map(|h| h.join(DIR_NAME)))
    }

    /// Resolve the commit author from the chain.
    pub fn author(&self, explicit: Option<&str>) -> Signature {
        self.author_from(explicit, env_value(AUTHOR_ENV).as_deref())
    }

    /// Resolve the starting activity id from the chain.
    pub fn activity(&self, explicit: Option<&str>) -> String {
        self.activity_from(explicit, env_value(ACTIVITY_ENV).as_deref())
    }

    fn author_from(&self, explicit: Option<&str>, from_env: Option<&str>) -> Signature {
        let configured_email = self
            .author_email
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_AUTHOR_EMAIL.to_string());

        if let Some(value) = explicit.or(from_env).filter(|s| !s.trim().is_empty()) {
            return parse_signature(value, &configured_email);
        }

        Signature {
            name: self
                .author_name
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_AUTHOR_NAME.to_string()),
            email: configured_email,
        }
    }

    fn activity_from(&self, explicit: Option<&str>, from_env: Option<&str>) -> String {
        explicit
            .or(from_env)
            .or(self.default_activity.as_deref())
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_ACTIVITY)
            .to_string()
    }
}

fn env_value(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Accepts `Name <email>` or a bare name.
fn parse_signature(value: &str, fallback_email: &str) -> Signature {
    let value = value.trim();
    if let Some((name, rest)) = value.split_once('<')
        && let Some(email) = rest.strip_suffix('>')
        && !name.trim().is_empty()
    {
        return Signature {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
        };
    }
    Signature {
        name: value.to_string(),
        email: fallback_email.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(
            config.author_from(None, None),
            Signature {
                name: "Git Trainer User".into(),
                email: "user@example.com".into(),
            }
        );
        assert_eq!(config.activity_from(None, None), "act-1");
    }

    #[test]
    fn keys_are_kebab_case() {
        let config = Config::parse(
            r#"
            author-name = "Ada"
            author-email = "ada@example.com"
            state-dir = "/tmp/trainer"
            default-activity = "act-3"
            log-filter = "git_trainer=debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.author_name.as_deref(), Some("Ada"));
        assert_eq!(config.state_dir, Some(PathBuf::from("/tmp/trainer")));
        assert_eq!(config.log_filter.as_deref(), Some("git_trainer=debug"));
        assert_eq!(config.activity_from(None, None), "act-3");
    }

    #[test]
    fn unknown_types_are_rejected() {
        assert!(Config::parse("author-name = 3").is_err());
    }

    #[test]
    fn explicit_wins() {
        let config = Config {
            author_name: Some("From config".into()),
            default_activity: Some("act-2".into()),
            ..Config::default()
        };
        let author = config.author_from(Some("Grace <grace@example.com>"), Some("Env"));
        assert_eq!(author.name, "Grace");
        assert_eq!(author.email, "grace@example.com");
        assert_eq!(config.activity_from(Some("act-4"), Some("act-3")), "act-4");
    }

    #[test]
    fn environment_beats_config() {
        let config = Config {
            author_name: Some("From config".into()),
            author_email: Some("config@example.com".into()),
            default_activity: Some("act-2".into()),
            ..Config::default()
        };
        let author = config.author_from(None, Some("Env Person"));
        assert_eq!(author.name, "Env Person");
        assert_eq!(author.email, "config@example.com");
        assert_eq!(config.activity_from(None, Some("act-3")), "act-3");
    }

    #[test]
    fn explicit_state_dir_wins() {
        let config = Config {
            state_dir: Some(PathBuf::from("/from/config")),
            ..Config::default()
        };
        assert_eq!(
            config.state_dir(Some(PathBuf::from("/explicit"))),
            Some(PathBuf::from("/explicit"))
        );
        assert_eq!(config.state_dir(None), Some(PathBuf::from("/from/config")));
    }
}
