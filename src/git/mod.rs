//! Git command descriptors and the runner that executes them.
//!
//! Every git invocation is a [`GitCommand`] value. The same value renders
//! the text shown to the operator ([`std::fmt::Display`]) and the argv/env
//! handed to the process ([`GitCommand::args`], [`GitCommand::envs`]), so
//! what is printed is exactly what runs.

mod branches;

pub use branches::{discover_patch_branch, parse_patch_branches};

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// A `src:dst` refspec, optionally forced with `+`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refspec {
    /// Source ref
    pub src: String,
    /// Destination ref
    pub dst: String,
    /// Allow non-fast-forward updates
    pub force: bool,
}

impl Refspec {
    /// Forced refspec, used when fetching into scratch branches
    pub fn forced(src: impl Into<String>, dst: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            force: true,
        }
    }

    /// Plain refspec
    pub fn new(src: impl Into<String>, dst: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            force: false,
        }
    }
}

impl std::fmt::Display for Refspec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.force {
            write!(f, "+")?;
        }
        write!(f, "{}:{}", self.src, self.dst)
    }
}

/// A typed git invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCommand {
    /// `git rev-parse --abbrev-ref HEAD`
    CurrentBranch,
    /// `git rev-parse <rev>`
    RevParse {
        /// Revision to resolve
        rev: String,
    },
    /// `git ls-remote --heads <remote>`
    ListRemoteHeads {
        /// Remote URL or name
        remote: String,
    },
    /// `git fetch <remote> <refspecs>...`
    Fetch {
        /// Remote URL or name
        remote: String,
        /// Refspecs to fetch
        refspecs: Vec<Refspec>,
    },
    /// `git checkout <target>`
    Checkout {
        /// Branch or commit to check out
        target: String,
    },
    /// `git checkout -B <branch> <start_point>`
    CheckoutNewBranch {
        /// Branch to (re)create
        branch: String,
        /// Commit the branch starts at
        start_point: String,
    },
    /// `git branch --list <branch> --contains <commit>`
    ///
    /// Prints the branch name when it contains the commit, nothing otherwise.
    BranchContains {
        /// Branch to test
        branch: String,
        /// Commit that must be reachable
        commit: String,
    },
    /// `GIT_SEQUENCE_EDITOR=: GIT_EDITOR=: git rebase -i --autosquash <upstream>`
    AutosquashRebase {
        /// Upstream the rebase replays onto
        upstream: String,
    },
    /// `git filter-branch -f --msg-filter <filter> <base>..<head>`
    RewriteMessages {
        /// Shell command that rewrites one message from stdin to stdout
        filter: String,
        /// Exclusive start of the range
        base: String,
        /// Branch whose commits are rewritten
        head: String,
    },
    /// `git cherry-pick <base>..<head>`
    CherryPick {
        /// Exclusive start of the range
        base: String,
        /// Inclusive end of the range
        head: String,
    },
    /// `git push <remote> <refspecs>...`
    Push {
        /// Remote URL or name
        remote: String,
        /// Refspecs to push
        refspecs: Vec<Refspec>,
    },
}

impl GitCommand {
    /// Arguments passed to `git`
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = Vec::new();
        match self {
            Self::CurrentBranch => {
                args.extend(["rev-parse", "--abbrev-ref", "HEAD"].map(String::from));
            }
            Self::RevParse { rev } => {
                args.extend(["rev-parse".to_string(), rev.clone()]);
            }
            Self::ListRemoteHeads { remote } => {
                args.extend(["ls-remote".to_string(), "--heads".to_string(), remote.clone()]);
            }
            Self::Fetch { remote, refspecs } | Self::Push { remote, refspecs } => {
                let verb = if matches!(self, Self::Fetch { .. }) {
                    "fetch"
                } else {
                    "push"
                };
                args.extend([verb.to_string(), remote.clone()]);
                args.extend(refspecs.iter().map(ToString::to_string));
            }
            Self::Checkout { target } => {
                args.extend(["checkout".to_string(), target.clone()]);
            }
            Self::CheckoutNewBranch {
                branch,
                start_point,
            } => {
                args.extend([
                    "checkout".to_string(),
                    "-B".to_string(),
                    branch.clone(),
                    start_point.clone(),
                ]);
            }
            Self::BranchContains { branch, commit } => {
                args.extend([
                    "branch".to_string(),
                    "--list".to_string(),
                    branch.clone(),
                    "--contains".to_string(),
                    commit.clone(),
                ]);
            }
            Self::AutosquashRebase { upstream } => {
                args.extend([
                    "rebase".to_string(),
                    "-i".to_string(),
                    "--autosquash".to_string(),
                    upstream.clone(),
                ]);
            }
            Self::RewriteMessages { filter, base, head } => {
                args.extend([
                    "filter-branch".to_string(),
                    "-f".to_string(),
                    "--msg-filter".to_string(),
                    filter.clone(),
                    format!("{base}..{head}"),
                ]);
            }
            Self::CherryPick { base, head } => {
                args.extend(["cherry-pick".to_string(), format!("{base}..{head}")]);
            }
        }
        args
    }

    /// Extra environment for the process
    pub fn envs(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            // `:` accepts the todo list and squash messages as generated
            Self::AutosquashRebase { .. } => &[("GIT_SEQUENCE_EDITOR", ":"), ("GIT_EDITOR", ":")],
            Self::RewriteMessages { .. } => &[("FILTER_BRANCH_SQUELCH_WARNING", "1")],
            _ => &[],
        }
    }

    /// Whether the command changes refs or the working copy
    pub const fn is_mutating(&self) -> bool {
        !matches!(
            self,
            Self::CurrentBranch
                | Self::RevParse { .. }
                | Self::ListRemoteHeads { .. }
                | Self::BranchContains { .. }
        )
    }
}

impl std::fmt::Display for GitCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (key, value) in self.envs() {
            write!(f, "{key}={value} ")?;
        }
        write!(f, "git")?;
        for arg in self.args() {
            write!(f, " {}", shell_quote(&arg))?;
        }
        Ok(())
    }
}

/// Quote `s` for a POSIX shell when it contains anything beyond a safe set.
pub fn shell_quote(s: &str) -> String {
    let safe = !s.is_empty()
        && s.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | '@' | '+' | '~' | '=' | ',')
        });
    if safe {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

/// Executes git commands
///
/// Implementations return trimmed stdout on success and
/// [`Error::CommandFailed`] when git exits non-zero.
pub trait GitRunner: Send + Sync {
    /// Run one command to completion
    fn run(&self, command: &GitCommand) -> Result<String>;
}

/// Runs the system `git` binary in a working directory
#[derive(Debug, Clone)]
pub struct SystemGit {
    workdir: PathBuf,
}

impl SystemGit {
    /// Runner operating on `workdir`
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Working directory commands run in
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }
}

impl GitRunner for SystemGit {
    fn run(&self, command: &GitCommand) -> Result<String> {
        debug!(%command, "running git");
        let output = Command::new("git")
            .current_dir(&self.workdir)
            .args(command.args())
            .envs(command.envs().iter().copied())
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(Error::CommandFailed {
                command: command.to_string(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

/// The operator's working copy for the duration of a run
///
/// `original_branch` is captured once before any command moves HEAD and is
/// what the run restores at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryContext {
    /// Directory git runs in
    pub workdir: PathBuf,
    /// Branch (or commit, when detached) checked out at startup
    pub original_branch: String,
    /// What the executor last checked out
    pub checked_out: String,
}

impl RepositoryContext {
    /// Capture the current checkout
    pub fn capture(workdir: impl Into<PathBuf>, git: &dyn GitRunner) -> Result<Self> {
        let mut original = git.run(&GitCommand::CurrentBranch)?;
        if original == "HEAD" {
            // detached: remember the commit instead
            original = git.run(&GitCommand::RevParse {
                rev: "HEAD".to_string(),
            })?;
        }
        Ok(Self {
            workdir: workdir.into(),
            checked_out: original.clone(),
            original_branch: original,
        })
    }

    /// Whether HEAD has moved away from the original checkout
    pub fn is_displaced(&self) -> bool {
        self.checked_out != self.original_branch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_args() {
        let cmd = GitCommand::CherryPick {
            base: "merge/pr-5-base".to_string(),
            head: "merge/pr-5".to_string(),
        };
        assert_eq!(cmd.to_string(), "git cherry-pick merge/pr-5-base..merge/pr-5");
        assert_eq!(cmd.args(), vec!["cherry-pick", "merge/pr-5-base..merge/pr-5"]);
    }

    #[test]
    fn test_display_includes_env() {
        let cmd = GitCommand::AutosquashRebase {
            upstream: "base".to_string(),
        };
        assert_eq!(
            cmd.to_string(),
            "GIT_SEQUENCE_EDITOR=: GIT_EDITOR=: git rebase -i --autosquash base"
        );
    }

    #[test]
    fn test_display_quotes_filter() {
        let cmd = GitCommand::RewriteMessages {
            filter: "'/usr/bin/pr-merge' --msg-filter 5".to_string(),
            base: "b".to_string(),
            head: "h".to_string(),
        };
        assert_eq!(
            cmd.to_string(),
            r"FILTER_BRANCH_SQUELCH_WARNING=1 git filter-branch -f --msg-filter ''\''/usr/bin/pr-merge'\'' --msg-filter 5' b..h"
        );
    }

    #[test]
    fn test_refspec_display() {
        assert_eq!(Refspec::forced("a", "b").to_string(), "+a:b");
        assert_eq!(Refspec::new("a", "b").to_string(), "a:b");
    }

    #[test]
    fn test_fetch_and_push_args() {
        let fetch = GitCommand::Fetch {
            remote: "origin".to_string(),
            refspecs: vec![Refspec::forced("refs/pull/1/head", "refs/heads/pr")],
        };
        assert_eq!(fetch.args(), vec!["fetch", "origin", "+refs/pull/1/head:refs/heads/pr"]);

        let push = GitCommand::Push {
            remote: "origin".to_string(),
            refspecs: vec![Refspec::new("merge/master", "master")],
        };
        assert_eq!(push.args(), vec!["push", "origin", "merge/master:master"]);
        assert!(push.is_mutating());
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("plain-arg"), "plain-arg");
        assert_eq!(shell_quote("two words"), "'two words'");
        assert_eq!(shell_quote(""), "''");
    }
}
