//! Shared command context for the CLI
//!
//! Collects the setup the merge command needs before it can talk to
//! GitHub and the working copy.

use pr_merge::auth::{GitHubAuthConfig, get_github_auth};
use pr_merge::config::MergeConfig;
use pr_merge::error::{Error, Result};
use pr_merge::git::SystemGit;
use pr_merge::merge::msg_filter_command;
use pr_merge::platform::{ForgeService, GitHubService};
use std::path::{Path, PathBuf};

/// Shared context for the merge command
///
/// - Resolving the repository configuration
/// - Reading the API token
/// - Creating the forge service and the git runner
/// - Building the message filter command that points back at this binary
pub struct CommandContext {
    /// Repository configuration
    pub config: MergeConfig,
    /// Resolved authentication
    pub auth: GitHubAuthConfig,
    /// Forge service (GitHub)
    pub forge: Box<dyn ForgeService>,
    /// Git runner for the working copy
    pub git: SystemGit,
    /// Working copy root
    pub workdir: PathBuf,
    /// Command `git filter-branch` runs per message
    pub msg_filter: String,
}

impl CommandContext {
    /// Create a new command context
    pub fn new(path: &Path, repo: Option<&str>, pr_number: u64) -> Result<Self> {
        let workdir = path.canonicalize().map_err(|e| {
            Error::Internal(format!("cannot open working copy {}: {e}", path.display()))
        })?;

        let config = match repo {
            Some(slug) => MergeConfig::from_slug(slug)?,
            None => MergeConfig::default(),
        };

        let auth = get_github_auth();
        let forge = Box::new(GitHubService::new(&config, &auth)?);

        let exe = std::env::current_exe()?;
        let msg_filter = msg_filter_command(&exe, pr_number);

        Ok(Self {
            config,
            auth,
            forge,
            git: SystemGit::new(&workdir),
            workdir,
            msg_filter,
        })
    }
}
