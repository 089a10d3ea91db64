//! Core data model for the trainer.
//!
//! These types are shared by every layer: the parsed command intent,
//! the lesson (activity) definitions, the simulated remote record,
//! and mission verdicts.

mod activity;
mod intent;
mod mission;
mod remote;

pub use activity::{ActivityConfig, SeedFile};
pub use intent::CommandIntent;
pub use mission::{MissionCheck, MissionRef, MissionResult};
pub use remote::{CommitRecord, PagesState, PullRequest, PullRequestStatus, RemoteRepository};
