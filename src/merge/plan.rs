//! Merge planning - pure functions for creating merge plans
//!
//! This module contains the pure, testable logic for turning gate results
//! and PR metadata into the exact git commands a merge runs.
//! No I/O happens here - all data is passed in, making it easy to unit test.

use crate::config::MergeConfig;
use crate::error::{Error, Result};
use crate::git::{GitCommand, Refspec, RepositoryContext};
use crate::types::{MergeTarget, MergeTargets, PrMetadata};

/// Local branch names used by one merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchNames {
    /// Local copy of the PR head, rewritten in place
    pub head: String,
    /// Marks the commit the PR was branched from
    pub base: String,
    /// Local tracking copy of master
    pub master: String,
    /// Local tracking copy of the patch branch, if one exists
    pub patch: Option<String>,
}

impl BranchNames {
    /// Names for PR `pr_number`
    pub fn new(config: &MergeConfig, pr_number: u64, patch_branch: Option<&str>) -> Self {
        let prefix = &config.local_prefix;
        Self {
            head: format!("{prefix}pr-{pr_number}"),
            base: format!("{prefix}pr-{pr_number}-base"),
            master: format!("{prefix}{}", config.master_branch),
            patch: patch_branch.map(|p| format!("{prefix}{p}")),
        }
    }
}

/// Kind of a merge step, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// Fetch the PR head and target branches
    Fetch,
    /// Create the base marker branch
    MarkBase,
    /// Check the PR contains the required base commit
    VerifyRebased,
    /// Autosquash fixup commits
    Squash,
    /// Append the closing reference to every message
    RewriteMessages,
    /// Apply the PR onto a target branch
    CherryPick(MergeTarget),
    /// Check out the operator's original branch
    RestoreBranch,
    /// Push the target branches
    Push,
}

/// A single step in the merge plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeStep {
    /// Fetch the PR head and both target branches into local branches
    Fetch {
        /// Remote to fetch from
        remote: String,
        /// Forced refspecs into the local scratch branches
        refspecs: Vec<Refspec>,
    },
    /// Point the base marker at the commit the PR started from
    MarkBase {
        /// Base marker branch
        base_branch: String,
        /// PR head branch
        head_branch: String,
        /// Commits on the PR
        commit_count: u64,
    },
    /// Require `required_sha` to be an ancestor of the PR base
    VerifyRebased {
        /// Base marker branch
        base_branch: String,
        /// Commit that must be contained
        required_sha: String,
    },
    /// Run an autosquash rebase of the PR onto its base
    Squash {
        /// PR head branch
        head_branch: String,
        /// Base marker branch
        base_branch: String,
    },
    /// Rewrite every PR commit message through the message filter
    RewriteMessages {
        /// Shell command run once per message
        filter: String,
        /// Base marker branch
        base_branch: String,
        /// PR head branch
        head_branch: String,
    },
    /// Cherry-pick the PR commits onto a target branch
    CherryPick {
        /// Which target
        target: MergeTarget,
        /// Local tracking branch of the target
        branch: String,
        /// Base marker branch
        base_branch: String,
        /// PR head branch
        head_branch: String,
    },
    /// Check out the branch the operator started on
    RestoreBranch {
        /// Original branch or commit
        branch: String,
    },
    /// Push the local target branches in one call
    Push {
        /// Remote to push to
        remote: String,
        /// Local branch to remote branch refspecs
        refspecs: Vec<Refspec>,
    },
}

impl MergeStep {
    /// Step kind
    pub const fn kind(&self) -> StepKind {
        match self {
            Self::Fetch { .. } => StepKind::Fetch,
            Self::MarkBase { .. } => StepKind::MarkBase,
            Self::VerifyRebased { .. } => StepKind::VerifyRebased,
            Self::Squash { .. } => StepKind::Squash,
            Self::RewriteMessages { .. } => StepKind::RewriteMessages,
            Self::CherryPick { target, .. } => StepKind::CherryPick(*target),
            Self::RestoreBranch { .. } => StepKind::RestoreBranch,
            Self::Push { .. } => StepKind::Push,
        }
    }

    /// Git commands this step runs, in order
    pub fn commands(&self) -> Vec<GitCommand> {
        match self {
            Self::Fetch { remote, refspecs } => vec![GitCommand::Fetch {
                remote: remote.clone(),
                refspecs: refspecs.clone(),
            }],
            Self::MarkBase {
                base_branch,
                head_branch,
                commit_count,
            } => vec![GitCommand::CheckoutNewBranch {
                branch: base_branch.clone(),
                start_point: format!("{head_branch}~{commit_count}"),
            }],
            Self::VerifyRebased {
                base_branch,
                required_sha,
            } => vec![GitCommand::BranchContains {
                branch: base_branch.clone(),
                commit: required_sha.clone(),
            }],
            Self::Squash {
                head_branch,
                base_branch,
            } => vec![
                GitCommand::Checkout {
                    target: head_branch.clone(),
                },
                GitCommand::AutosquashRebase {
                    upstream: base_branch.clone(),
                },
            ],
            Self::RewriteMessages {
                filter,
                base_branch,
                head_branch,
            } => vec![GitCommand::RewriteMessages {
                filter: filter.clone(),
                base: base_branch.clone(),
                head: head_branch.clone(),
            }],
            Self::CherryPick {
                branch,
                base_branch,
                head_branch,
                ..
            } => vec![
                GitCommand::Checkout {
                    target: branch.clone(),
                },
                GitCommand::CherryPick {
                    base: base_branch.clone(),
                    head: head_branch.clone(),
                },
            ],
            Self::RestoreBranch { branch } => vec![GitCommand::Checkout {
                target: branch.clone(),
            }],
            Self::Push { remote, refspecs } => vec![GitCommand::Push {
                remote: remote.clone(),
                refspecs: refspecs.clone(),
            }],
        }
    }
}

impl std::fmt::Display for MergeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch { .. } => write!(f, "fetch PR and target branches"),
            Self::MarkBase { commit_count, .. } => {
                write!(f, "mark PR base ({commit_count} commit(s) back)")
            }
            Self::VerifyRebased { required_sha, .. } => {
                write!(f, "verify PR is based on {required_sha}")
            }
            Self::Squash { .. } => write!(f, "squash fixup commits"),
            Self::RewriteMessages { .. } => write!(f, "rewrite commit messages"),
            Self::CherryPick { target, branch, .. } => {
                write!(f, "cherry-pick onto {target} ({branch})")
            }
            Self::RestoreBranch { branch } => write!(f, "restore {branch}"),
            Self::Push { refspecs, .. } => {
                let dsts: Vec<&str> = refspecs.iter().map(|r| r.dst.as_str()).collect();
                write!(f, "push {}", dsts.join(", "))
            }
        }
    }
}

/// Options for merge planning
#[derive(Debug, Clone, Default)]
pub struct MergePlanOptions {
    /// Leave out the push
    pub dry_run: bool,
    /// Message filter command for `git filter-branch`
    pub msg_filter: String,
}

/// Merge plan - the functional core output
///
/// Created by `create_merge_plan()` (pure) and executed by
/// `execute_merge()` (effectful).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    /// PR being merged
    pub pr_number: u64,
    /// Branches the PR lands on
    pub targets: MergeTargets,
    /// Remote master branch name
    pub master_branch: String,
    /// Remote patch branch name, if one was found
    pub patch_branch: Option<String>,
    /// Commit the PR base must contain
    pub required_base_sha: String,
    /// Local branch names
    pub branches: BranchNames,
    /// Ordered steps to perform
    pub steps: Vec<MergeStep>,
}

impl MergePlan {
    /// Whether the plan ends with a push
    pub fn pushes(&self) -> bool {
        self.steps.iter().any(|s| matches!(s, MergeStep::Push { .. }))
    }

    /// All commands the plan runs, in order
    pub fn commands(&self) -> Vec<GitCommand> {
        self.steps.iter().flat_map(MergeStep::commands).collect()
    }
}

/// The required base commit: master's wins whenever master is a target
pub fn required_base_sha<'a>(targets: MergeTargets, config: &'a MergeConfig) -> &'a str {
    if targets.merge_master {
        &config.required_master_base
    } else {
        &config.required_patch_base
    }
}

/// Create a merge plan (PURE - no I/O, easily testable)
///
/// # Arguments
/// * `pr` - PR metadata from the forge
/// * `targets` - Branches selected by the target gate
/// * `patch_branch` - Discovered `<major>.<minor>.x` branch, if any
/// * `ctx` - The working copy, for the branch to restore
/// * `config` - Repository configuration
/// * `options` - Dry-run and message filter
pub fn create_merge_plan(
    pr: &PrMetadata,
    targets: MergeTargets,
    patch_branch: Option<&str>,
    ctx: &RepositoryContext,
    config: &MergeConfig,
    options: &MergePlanOptions,
) -> Result<MergePlan> {
    if targets.merge_patch && patch_branch.is_none() {
        return Err(Error::NoPatchBranch {
            remote: config.remote_url.clone(),
        });
    }

    let branches = BranchNames::new(config, pr.number, patch_branch);
    let remote = config.remote_url.clone();

    let mut fetch = vec![
        Refspec::forced(
            format!("refs/pull/{}/head", pr.number),
            format!("refs/heads/{}", branches.head),
        ),
        Refspec::forced(
            format!("refs/heads/{}", config.master_branch),
            format!("refs/heads/{}", branches.master),
        ),
    ];
    let mut push = vec![Refspec::new(&branches.master, &config.master_branch)];
    if let (Some(remote_patch), Some(local_patch)) = (patch_branch, &branches.patch) {
        fetch.push(Refspec::forced(
            format!("refs/heads/{remote_patch}"),
            format!("refs/heads/{local_patch}"),
        ));
        push.push(Refspec::new(local_patch, remote_patch));
    }

    let required = required_base_sha(targets, config).to_string();

    let mut steps = vec![
        MergeStep::Fetch {
            remote: remote.clone(),
            refspecs: fetch,
        },
        MergeStep::MarkBase {
            base_branch: branches.base.clone(),
            head_branch: branches.head.clone(),
            commit_count: pr.commit_count,
        },
        MergeStep::VerifyRebased {
            base_branch: branches.base.clone(),
            required_sha: required.clone(),
        },
        MergeStep::Squash {
            head_branch: branches.head.clone(),
            base_branch: branches.base.clone(),
        },
        MergeStep::RewriteMessages {
            filter: options.msg_filter.clone(),
            base_branch: branches.base.clone(),
            head_branch: branches.head.clone(),
        },
    ];

    for target in targets.active() {
        let branch = match target {
            MergeTarget::Master => branches.master.clone(),
            // checked above: merge_patch implies a patch branch
            MergeTarget::Patch => branches.patch.clone().unwrap_or_default(),
        };
        steps.push(MergeStep::CherryPick {
            target,
            branch,
            base_branch: branches.base.clone(),
            head_branch: branches.head.clone(),
        });
    }

    steps.push(MergeStep::RestoreBranch {
        branch: ctx.original_branch.clone(),
    });

    if !options.dry_run {
        steps.push(MergeStep::Push {
            remote,
            refspecs: push,
        });
    }

    Ok(MergePlan {
        pr_number: pr.number,
        targets,
        master_branch: config.master_branch.clone(),
        patch_branch: patch_branch.map(String::from),
        required_base_sha: required,
        branches,
        steps,
    })
}
