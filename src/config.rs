//! Compiled-in merge configuration
//!
//! There is no configuration file: the canonical repository and the
//! commits every PR must be based on live here. `--repo` swaps the
//! repository for a run.

use crate::error::{Error, Result};

/// Default repository owner
pub const DEFAULT_OWNER: &str = "octo-org";

/// Default repository name
pub const DEFAULT_REPO: &str = "octo-repo";

/// GitHub REST API root
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Commit that introduced the current CI setup on master.
///
/// PRs merged to master must be based on a descendant of it.
pub const REQUIRED_MASTER_BASE: &str = "5b2e6f0c1d8a4e7b9c3f2a1d0e9b8c7a6f5e4d3c";

/// Counterpart of [`REQUIRED_MASTER_BASE`] on the patch branches.
///
/// Both commits belong to the default repository. They are kept when
/// `--repo` picks another one, where git will not know them and every
/// PR is reported as needing a rebase; set them for that repository.
pub const REQUIRED_PATCH_BASE: &str = "9e8d7c6b5a4f3e2d1c0b9a8f7e6d5c4b3a2f1e0d";

/// Settings for a merge run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// REST API root, without trailing slash
    pub api_base: String,
    /// URL git fetches from and pushes to
    pub remote_url: String,
    /// Name of the main development branch
    pub master_branch: String,
    /// Commit a PR merged to master must contain
    pub required_master_base: String,
    /// Commit a PR merged only to the patch branch must contain
    pub required_patch_base: String,
    /// Prefix for the temporary local branches
    pub local_prefix: String,
}

impl MergeConfig {
    /// Configuration for `owner/repo` with the SSH remote derived from it
    pub fn for_repo(owner: &str, repo: &str) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            api_base: GITHUB_API_BASE.to_string(),
            remote_url: format!("git@github.com:{owner}/{repo}.git"),
            master_branch: "master".to_string(),
            required_master_base: REQUIRED_MASTER_BASE.to_string(),
            required_patch_base: REQUIRED_PATCH_BASE.to_string(),
            local_prefix: "merge/".to_string(),
        }
    }

    /// Parse an `OWNER/REPO` slug
    pub fn from_slug(slug: &str) -> Result<Self> {
        let (owner, repo) = slug
            .split_once('/')
            .filter(|(o, r)| !o.is_empty() && !r.is_empty() && !r.contains('/'))
            .ok_or_else(|| Error::InvalidRepo(slug.to_string()))?;
        Ok(Self::for_repo(owner, repo.trim_end_matches(".git")))
    }

    /// `owner/repo`
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self::for_repo(DEFAULT_OWNER, DEFAULT_REPO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_repo_derives_ssh_remote() {
        let config = MergeConfig::for_repo("acme", "widgets");
        assert_eq!(config.remote_url, "git@github.com:acme/widgets.git");
        assert_eq!(config.master_branch, "master");
        assert_eq!(config.slug(), "acme/widgets");
    }

    #[test]
    fn test_from_slug_strips_git_suffix() {
        let config = MergeConfig::from_slug("acme/widgets.git").unwrap();
        assert_eq!(config.repo, "widgets");
    }

    #[test]
    fn test_from_slug_rejects_malformed() {
        for slug in ["acme", "/widgets", "acme/", "a/b/c"] {
            assert!(
                matches!(MergeConfig::from_slug(slug), Err(Error::InvalidRepo(_))),
                "{slug} should be rejected"
            );
        }
    }
}
