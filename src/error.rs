//! Error types for pr-merge

use crate::gate::GateFailure;
use thiserror::Error;

/// Errors that can occur while merging a pull request
#[derive(Error, Debug)]
pub enum Error {
    /// The PR identifier given on the command line is not a number
    #[error("invalid PR number: '{0}'")]
    InvalidPrNumber(String),

    /// The repository given with `--repo` is not `OWNER/REPO`
    #[error("invalid repository '{0}', expected OWNER/REPO")]
    InvalidRepo(String),

    /// A merge gate rejected the PR
    #[error(transparent)]
    Gate(#[from] GateFailure),

    /// The PR branch predates the required base commit
    #[error(
        "PR branch does not contain required commit {required_sha} (checked via {base_branch}); \
         rebase the PR onto the current target branch and try again"
    )]
    RebaseRequired {
        /// Commit that must be an ancestor of the PR base
        required_sha: String,
        /// Local branch marking the PR base
        base_branch: String,
    },

    /// No `<major>.<minor>.x` branch exists but the PR targets one
    #[error("no patch branch matching <major>.<minor>.x found on {remote}")]
    NoPatchBranch {
        /// Remote that was searched
        remote: String,
    },

    /// A git command exited unsuccessfully
    #[error("git command failed: {command}\n{stderr}")]
    CommandFailed {
        /// Rendered command line
        command: String,
        /// Exit status, if the process exited normally
        status: Option<i32>,
        /// Captured stderr
        stderr: String,
    },

    /// GitHub API request failed
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Octocrab client error
    #[error("GitHub API error: {0}")]
    Octocrab(#[from] octocrab::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;
