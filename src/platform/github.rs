//! GitHub forge service implementation

use crate::auth::GitHubAuthConfig;
use crate::config::MergeConfig;
use crate::error::{Error, Result};
use crate::platform::ForgeService;
use crate::types::PullRequestSummary;
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

// REST response shapes, reduced to the fields the merge flow reads

#[derive(Deserialize)]
struct PullResponse {
    number: u64,
    commits: u64,
    html_url: String,
    #[serde(rename = "_links")]
    links: PullLinks,
}

#[derive(Deserialize)]
struct PullLinks {
    statuses: Href,
}

#[derive(Deserialize)]
struct Href {
    href: String,
}

#[derive(Deserialize)]
struct LabelResponse {
    name: String,
}

#[derive(Deserialize)]
struct StatusEntry {
    description: Option<String>,
}

/// The statuses link answers with a list (newest first); the combined
/// status endpoint answers with a single object.
#[derive(Deserialize)]
#[serde(untagged)]
enum StatusPayload {
    List(Vec<StatusEntry>),
    Single(StatusEntry),
}

impl StatusPayload {
    fn into_description(self) -> Option<String> {
        match self {
            Self::List(entries) => entries.into_iter().next().and_then(|s| s.description),
            Self::Single(entry) => entry.description,
        }
    }
}

#[derive(Serialize)]
struct PageParams {
    per_page: u8,
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    owner: String,
    repo: String,
    /// Token for raw HTTP requests (statuses link)
    token: Option<String>,
    /// HTTP client for raw requests (statuses link)
    http_client: Client,
}

impl GitHubService {
    /// Create a new GitHub service for the configured repository
    pub fn new(config: &MergeConfig, auth: &GitHubAuthConfig) -> Result<Self> {
        let mut builder = Octocrab::builder()
            .base_uri(config.api_base.as_str())
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        if let Some(ref token) = auth.token {
            builder = builder.personal_token(token.clone());
        }

        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent(concat!("pr-merge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            token: auth.token.clone(),
            http_client,
        })
    }
}

#[async_trait]
impl ForgeService for GitHubService {
    async fn get_pull_request(&self, pr_number: u64) -> Result<PullRequestSummary> {
        debug!(pr_number, "getting PR");
        let route = format!("/repos/{}/{}/pulls/{pr_number}", self.owner, self.repo);
        let pr: PullResponse = self.client.get(route, None::<&()>).await?;

        debug!(pr_number, commits = pr.commits, "got PR");
        Ok(PullRequestSummary {
            number: pr.number,
            commits: pr.commits,
            statuses_href: pr.links.statuses.href,
            html_url: pr.html_url,
        })
    }

    async fn get_status_description(&self, statuses_href: &str) -> Result<Option<String>> {
        let url = Url::parse(statuses_href)
            .map_err(|e| Error::GitHubApi(format!("Invalid statuses link '{statuses_href}': {e}")))?;
        debug!(%url, "getting status");

        let mut request = self
            .http_client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(ref token) = self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to fetch status: {e}")))?
            .error_for_status()
            .map_err(|e| Error::GitHubApi(format!("Failed to fetch status: {e}")))?;

        let payload: StatusPayload = response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse status: {e}")))?;

        let description = payload.into_description();
        debug!(?description, "got status");
        Ok(description)
    }

    async fn list_labels(&self, pr_number: u64) -> Result<Vec<String>> {
        debug!(pr_number, "listing labels");
        let route = format!("/repos/{}/{}/issues/{pr_number}/labels", self.owner, self.repo);
        let labels: Vec<LabelResponse> = self
            .client
            .get(route, Some(&PageParams { per_page: 100 }))
            .await?;

        let names: Vec<String> = labels.into_iter().map(|l| l.name).collect();
        debug!(pr_number, count = names.len(), "listed labels");
        Ok(names)
    }
}
