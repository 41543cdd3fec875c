//! The complete merge run: gather, gate, plan, execute

use crate::config::MergeConfig;
use crate::error::Result;
use crate::gate::{GateReport, evaluate_gates};
use crate::git::{GitCommand, GitRunner, RepositoryContext, discover_patch_branch};
use crate::invocation::Invocation;
use crate::merge::execute::{MergeExecutionResult, execute_merge};
use crate::merge::plan::{MergePlan, MergePlanOptions, create_merge_plan};
use crate::platform::ForgeService;
use crate::progress::ProgressCallback;
use crate::types::PrMetadata;
use std::path::PathBuf;
use tracing::info;

/// Everything a successful run produced
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// PR state the gates saw
    pub pr: PrMetadata,
    /// Gate result, including overridden failures
    pub gates: GateReport,
    /// The plan that ran
    pub plan: MergePlan,
    /// What the executor did
    pub execution: MergeExecutionResult,
}

/// Merge one PR end to end.
///
/// Gate failures return before any git command runs. The working copy is
/// only inspected once every gate has passed.
///
/// # Arguments
/// * `invocation` - PR number and flags
/// * `config` - Repository configuration
/// * `forge` - Forge service for the PR reads
/// * `git` - Runner for git commands
/// * `workdir` - Working copy the runner operates on
/// * `msg_filter` - Message filter command for `git filter-branch`
/// * `progress` - Progress callback for status updates
pub async fn run_merge_workflow(
    invocation: &Invocation,
    config: &MergeConfig,
    forge: &dyn ForgeService,
    git: &dyn GitRunner,
    workdir: PathBuf,
    msg_filter: &str,
    progress: &dyn ProgressCallback,
) -> Result<MergeOutcome> {
    // =========================================================================
    // Phase 1: GATHER
    // =========================================================================

    let pr = forge.fetch_pr_state(invocation.pr_number).await?;

    // =========================================================================
    // Phase 2: GATE + PLAN
    // =========================================================================

    let gates = evaluate_gates(&pr, invocation.force)?;
    for warning in &gates.warnings {
        progress.on_warning(warning).await;
    }
    info!(
        pr_number = pr.number,
        merge_master = gates.targets.merge_master,
        merge_patch = gates.targets.merge_patch,
        "gates passed"
    );

    let mut ctx = RepositoryContext::capture(workdir, git)?;

    let heads = git.run(&GitCommand::ListRemoteHeads {
        remote: config.remote_url.clone(),
    })?;
    let patch_branch = discover_patch_branch(&heads);
    if let Some(ref branch) = patch_branch {
        progress
            .on_message(&format!("Patch branch: {branch}"))
            .await;
    }

    let options = MergePlanOptions {
        dry_run: invocation.dry_run,
        msg_filter: msg_filter.to_string(),
    };
    let plan = create_merge_plan(
        &pr,
        gates.targets,
        patch_branch.as_deref(),
        &ctx,
        config,
        &options,
    )?;

    // =========================================================================
    // Phase 3: EXECUTE
    // =========================================================================

    let execution = execute_merge(&plan, &mut ctx, git, progress).await?;

    Ok(MergeOutcome {
        pr,
        gates,
        plan,
        execution,
    })
}
