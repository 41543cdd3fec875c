//! Merge execution - effectful operations
//!
//! This module contains the effectful code that actually performs merges.
//! It takes a `MergePlan` (created by the pure planning functions) and
//! runs its git commands against the working copy, strictly in order.

use crate::error::{Error, Result};
use crate::git::{GitCommand, GitRunner, RepositoryContext};
use crate::merge::plan::{MergePlan, MergeStep, StepKind};
use crate::progress::ProgressCallback;
use tracing::{info, warn};

/// Result of merge execution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeExecutionResult {
    /// Steps that ran to completion, in order
    pub completed: Vec<StepKind>,
    /// Whether the target branches were pushed
    pub pushed: bool,
}

impl MergeExecutionResult {
    /// Check if a step completed
    pub fn ran(&self, kind: StepKind) -> bool {
        self.completed.contains(&kind)
    }
}

/// Execute the merge plan (EFFECTFUL)
///
/// Stops at the first failing command. From the moment HEAD leaves the
/// original branch, every exit path checks the original branch out again
/// before returning; a failed rebase-recency check returns
/// [`Error::RebaseRequired`] after that restore.
///
/// # Arguments
/// * `plan` - The merge plan to execute
/// * `ctx` - The working copy; `checked_out` is kept current
/// * `git` - Runner for git commands
/// * `progress` - Progress callback for status updates
pub async fn execute_merge(
    plan: &MergePlan,
    ctx: &mut RepositoryContext,
    git: &dyn GitRunner,
    progress: &dyn ProgressCallback,
) -> Result<MergeExecutionResult> {
    let mut result = MergeExecutionResult::default();

    for step in &plan.steps {
        progress.on_step(&step.to_string()).await;
        info!(pr_number = plan.pr_number, step = %step, "running step");

        if let Err(e) = run_step(step, ctx, git, progress).await {
            if ctx.is_displaced() {
                restore_after_failure(ctx, git, progress).await;
            }
            return Err(e);
        }

        if matches!(step, MergeStep::Push { .. }) {
            result.pushed = true;
        }
        result.completed.push(step.kind());
    }

    Ok(result)
}

async fn run_step(
    step: &MergeStep,
    ctx: &mut RepositoryContext,
    git: &dyn GitRunner,
    progress: &dyn ProgressCallback,
) -> Result<()> {
    for command in step.commands() {
        let output = run_command(&command, ctx, git, progress).await;

        if let MergeStep::VerifyRebased {
            base_branch,
            required_sha,
        } = step
        {
            return check_rebased(output, base_branch, required_sha);
        }
        output?;
    }
    Ok(())
}

/// Interpret the `branch --contains` output of the recency check.
///
/// Empty output means the base lacks the commit. A commit git has never
/// seen gets the same answer: nothing the PR was built on contains it.
fn check_rebased(output: Result<String>, base_branch: &str, required_sha: &str) -> Result<()> {
    match output {
        Ok(listed) if !listed.trim().is_empty() => return Ok(()),
        Ok(_) => {
            warn!(%base_branch, %required_sha, "PR base does not contain required commit");
        }
        Err(Error::CommandFailed { ref stderr, .. }) if is_unknown_commit(stderr) => {
            warn!(%required_sha, %stderr, "required commit is unknown to git");
        }
        Err(e) => return Err(e),
    }
    Err(Error::RebaseRequired {
        required_sha: required_sha.to_string(),
        base_branch: base_branch.to_string(),
    })
}

fn is_unknown_commit(stderr: &str) -> bool {
    stderr.contains("malformed object name") || stderr.contains("no such commit")
}

async fn run_command(
    command: &GitCommand,
    ctx: &mut RepositoryContext,
    git: &dyn GitRunner,
    progress: &dyn ProgressCallback,
) -> Result<String> {
    progress.on_command(command).await;
    info!(%command, "git");
    let output = git.run(command)?;

    match command {
        GitCommand::Checkout { target } => ctx.checked_out.clone_from(target),
        GitCommand::CheckoutNewBranch { branch, .. } => ctx.checked_out.clone_from(branch),
        _ => {}
    }
    Ok(output)
}

/// Best-effort checkout of the original branch on the failure path
async fn restore_after_failure(
    ctx: &mut RepositoryContext,
    git: &dyn GitRunner,
    progress: &dyn ProgressCallback,
) {
    let restore = MergeStep::RestoreBranch {
        branch: ctx.original_branch.clone(),
    };
    progress.on_step(&restore.to_string()).await;

    for command in restore.commands() {
        if let Err(e) = run_command(&command, ctx, git, progress).await {
            warn!(error = %e, branch = %ctx.original_branch, "failed to restore original branch");
            progress
                .on_warning(&format!(
                    "Could not restore {}: {e}. Check it out manually.",
                    ctx.original_branch
                ))
                .await;
            return;
        }
    }
}
