//! `github` subcommands against the simulated host.

use crate::error::Result;
use crate::model::PullRequestStatus;

use super::{DEFAULT_BRANCH, Dispatcher, remote_failure};

impl Dispatcher<'_> {
    pub(super) fn github_create(&mut self, name: &str) -> Result<String> {
        let created = self.remote.create(name).map_err(remote_failure)?;
        Ok([
            format!("Simulated remote repository created: {}", created.name),
            format!("URL: {}", created.url),
            String::new(),
            "Now simulate a push with:".to_string(),
            format!("  git push origin {DEFAULT_BRANCH}"),
        ]
        .join("\n"))
    }

    pub(super) fn github_status(&self) -> Result<String> {
        let status = self.remote.status().map_err(remote_failure)?;
        Ok(status.unwrap_or_else(|| {
            "There is no simulated remote repository.\nUse: github create <repository-name>"
                .to_string()
        }))
    }

    pub(super) fn pr_create(
        &mut self,
        from: &str,
        to: Option<&str>,
        title: Option<&str>,
    ) -> Result<String> {
        let pr = self
            .remote
            .create_pull_request(from, to, title)
            .map_err(remote_failure)?;
        Ok(format!(
            "Pull request #{} opened: {}\n{} -> {}",
            pr.id, pr.title, pr.from_branch, pr.to_branch
        ))
    }

    pub(super) fn pr_list(&self) -> Result<String> {
        let prs = self.remote.list_pull_requests().map_err(remote_failure)?;
        if prs.is_empty() {
            return Ok("No pull requests yet.".to_string());
        }
        Ok(prs
            .iter()
            .map(|pr| {
                let status = match pr.status {
                    PullRequestStatus::Open => "OPEN",
                    PullRequestStatus::Merged => "MERGED",
                };
                format!(
                    "#{} [{status}] {} ({} -> {})",
                    pr.id, pr.title, pr.from_branch, pr.to_branch
                )
            })
            .collect::<Vec<_>>()
            .join("\n"))
    }

    pub(super) fn pr_merge(&mut self, id: u64) -> Result<String> {
        let pr = self.remote.merge_pull_request(id).map_err(remote_failure)?;
        Ok(format!(
            "Pull request #{} merged: {}\n\
             Local branches are unchanged. To bring the work in locally run:\n  \
             git checkout {}\n  git merge {}",
            pr.id, pr.title, pr.to_branch, pr.from_branch
        ))
    }
}
