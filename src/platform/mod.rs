//! Forge services
//!
//! The merge flow only needs three reads from the forge: the PR itself,
//! the latest status of its head commit, and its labels.

mod github;

pub use github::GitHubService;

use crate::error::Result;
use crate::types::{PrLabels, PrMetadata, PullRequestSummary};
use async_trait::async_trait;
use tracing::debug;

/// Forge service trait for the PR reads the merge flow needs
#[async_trait]
pub trait ForgeService: Send + Sync {
    /// Get the PR's commit count, statuses link and web URL
    async fn get_pull_request(&self, pr_number: u64) -> Result<PullRequestSummary>;

    /// Get the latest status description from a statuses link
    ///
    /// The description is returned as the forge sends it; callers
    /// normalize it with [`crate::types::normalize_status_description`].
    async fn get_status_description(&self, statuses_href: &str) -> Result<Option<String>>;

    /// List the names of the labels on a PR
    async fn list_labels(&self, pr_number: u64) -> Result<Vec<String>>;

    /// Gather everything the gates need in one go.
    ///
    /// Implementors should not override this.
    async fn fetch_pr_state(&self, pr_number: u64) -> Result<PrMetadata> {
        let pr = self.get_pull_request(pr_number).await?;
        let status_description = self
            .get_status_description(&pr.statuses_href)
            .await?
            .map(|d| crate::types::normalize_status_description(&d));
        let labels = PrLabels::from_names(self.list_labels(pr_number).await?);

        debug!(
            pr_number,
            commits = pr.commits,
            status = ?status_description,
            ?labels,
            "fetched PR state"
        );

        Ok(PrMetadata {
            number: pr_number,
            commit_count: pr.commits,
            status_url: pr.statuses_href,
            status_description,
            labels,
            html_url: pr.html_url,
        })
    }
}
