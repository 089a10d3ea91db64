//! What a command can fail with, as the learner sees it.
//!
//! Lower layers report [`VcsError`] and [`RemoteError`]; the dispatcher
//! wraps them together with operation-specific guidance. The `Display`
//! text of every variant is the exact response shown in the shell.

use crate::remote::RemoteError;
use crate::vcs::VcsError;

/// Response for git commands run before `git init`.
pub const NOT_INITIALIZED: &str = "This folder is not a Git repository yet.\n\
Run \"git init\" first to start tracking it.";

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    Usage(String),

    #[error("{}", unknown_message(.input, .suggestion.as_deref()))]
    Unknown {
        input: String,
        suggestion: Option<String>,
    },

    #[error(
        "\"{key}\" is not available in {activity}.\n\
         Finish this activity's missions or pick another activity to use it."
    )]
    Blocked { key: String, activity: String },

    #[error("{}", NOT_INITIALIZED)]
    NotInitialized,

    #[error("{0}")]
    Prerequisite(String),

    #[error("{guidance}")]
    Engine {
        guidance: String,
        #[source]
        source: VcsError,
    },

    #[error("{guidance}")]
    Remote {
        guidance: String,
        #[source]
        source: RemoteError,
    },
}

pub type Result<T> = core::result::Result<T, CommandError>;

impl CommandError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    pub fn engine(source: VcsError, guidance: impl Into<String>) -> Self {
        Self::Engine {
            guidance: guidance.into(),
            source,
        }
    }

    pub fn remote(source: RemoteError, guidance: impl Into<String>) -> Self {
        Self::Remote {
            guidance: guidance.into(),
            source,
        }
    }

    /// Short category name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Usage(_) => "usage",
            Self::Unknown { .. } => "unknown-command",
            Self::Blocked { .. } => "blocked",
            Self::NotInitialized => "not-initialized",
            Self::Prerequisite(_) => "prerequisite",
            Self::Engine { .. } => "engine",
            Self::Remote { .. } => "remote",
        }
    }
}

fn unknown_message(input: &str, suggestion: Option<&str>) -> String {
    match suggestion {
        Some(suggestion) => {
            format!("Unknown command: \"{input}\".\nDid you mean \"{suggestion}\"?")
        }
        None => format!(
            "Unrecognized command: {input}\nType \"help\" to see the available commands."
        ),
    }
}
